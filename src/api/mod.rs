//! Client for the wiki's MediaWiki `api.php` endpoint.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;

use crate::config::FetchConfig;
use crate::error::Result;

/// A file page the wiki reported as existing, with its image URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// Title as reported by the wiki (normalised by the server).
    pub title: String,
    /// Direct URL of the original file.
    pub url: String,
}

/// Remote operations a fetch run needs.
#[async_trait]
pub trait WikiClient: Send + Sync {
    /// Looks up image info for up to one batch of file titles.
    ///
    /// Titles that do not exist are simply absent from the result.
    async fn image_info(&self, titles: &[String]) -> Result<Vec<ImageInfo>>;

    /// Fetches the raw bytes at `url`.
    async fn fetch(&self, url: &str) -> Result<Bytes>;
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<Query>,
}

#[derive(Debug, Deserialize)]
struct Query {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    title: String,
    #[serde(default)]
    imageinfo: Vec<ImageInfoEntry>,
}

#[derive(Debug, Deserialize)]
struct ImageInfoEntry {
    url: String,
}

/// Decodes an `action=query&prop=imageinfo` response body.
///
/// Pages with a negative id (missing) or without image info are dropped.
/// The result is sorted by title so callers see a stable order.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] if the body is not the expected JSON.
pub fn parse_image_info(body: &[u8]) -> Result<Vec<ImageInfo>> {
    let response: QueryResponse = serde_json::from_slice(body)?;
    let Some(query) = response.query else {
        return Ok(Vec::new());
    };

    let mut found: Vec<ImageInfo> = query
        .pages
        .into_iter()
        .filter(|(id, _)| id.parse::<i64>().map_or(true, |id| id >= 0))
        .filter_map(|(_, page)| {
            let url = page.imageinfo.into_iter().next()?.url;
            Some(ImageInfo {
                title: page.title,
                url,
            })
        })
        .collect();
    found.sort_by(|a, b| a.title.cmp(&b.title));
    Ok(found)
}

/// [`WikiClient`] backed by `reqwest`.
pub struct MediaWikiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl MediaWikiClient {
    /// Builds a client with the configured user agent and timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Returns the API endpoint this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl WikiClient for MediaWikiClient {
    async fn image_info(&self, titles: &[String]) -> Result<Vec<ImageInfo>> {
        let joined = titles.join("|");
        log::debug!("Querying {} title(s): {joined}", titles.len());
        let body = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("titles", joined.as_str()),
                ("prop", "imageinfo"),
                ("iiprop", "url"),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        parse_image_info(&body)
    }

    async fn fetch(&self, url: &str) -> Result<Bytes> {
        log::debug!("GET {url}");
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes)
    }
}
