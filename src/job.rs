//! The batch loop: look up candidate titles, download what resolves.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::api::WikiClient;
use crate::config::FetchConfig;
use crate::download::Downloader;
use crate::error::{Error, Result};
use crate::fs::FileSystem;
use crate::names::{AliasTable, candidate_titles, normalize_title};
use crate::report::{FailureReason, RunReport, RunReportBuilder};

/// Trait for receiving progress updates during a run.
///
/// All methods have default no-op implementations for convenience.
pub trait FetchProgress: Send + Sync {
    /// Called before batch `index` (1-based) of `total` is looked up.
    fn on_batch_start(&self, _index: usize, _total: usize, _files: &[String]) {}

    /// Called after a file has been written.
    fn on_downloaded(&self, _filename: &str, _bytes: u64) {}

    /// Called for each file in a looked-up batch that was not written.
    fn on_missed(&self, _filename: &str, _reason: &FailureReason) {}

    /// Called when a whole batch lookup fails.
    fn on_lookup_error(&self, _files: &[String], _error: &Error) {}
}

/// A null progress implementation that ignores all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl FetchProgress for NoProgress {}

/// Reverse lookup from sent titles to the file that generated them.
struct TitleIndex {
    /// normalised title -> (file index within the batch, candidate rank)
    entries: HashMap<String, (usize, usize)>,
}

impl TitleIndex {
    /// Builds the title list for a batch and indexes it.
    ///
    /// Only the first `max_titles` titles are kept. When two files share a
    /// title, the one for which it ranks higher keeps it.
    fn build(batch: &[String], aliases: &AliasTable, max_titles: usize) -> (Vec<String>, Self) {
        let all: Vec<(usize, usize, String)> = batch
            .iter()
            .enumerate()
            .flat_map(|(file_idx, filename)| {
                candidate_titles(filename, aliases)
                    .into_iter()
                    .enumerate()
                    .map(move |(rank, title)| (file_idx, rank, title))
            })
            .collect();

        if all.len() > max_titles {
            log::debug!(
                "Batch has {} candidate titles, sending the first {max_titles}",
                all.len()
            );
        }

        let mut titles = Vec::with_capacity(all.len().min(max_titles));
        let mut entries: HashMap<String, (usize, usize)> = HashMap::new();
        for (file_idx, rank, title) in all.into_iter().take(max_titles) {
            entries
                .entry(normalize_title(&title))
                .and_modify(|slot| {
                    if rank < slot.1 {
                        *slot = (file_idx, rank);
                    }
                })
                .or_insert((file_idx, rank));
            titles.push(title);
        }
        (titles, Self { entries })
    }

    fn lookup(&self, title: &str) -> Option<(usize, usize)> {
        self.entries.get(&normalize_title(title)).copied()
    }
}

/// Runs lookups and downloads for a list of missing files.
pub struct FetchJob<'a, C: WikiClient + ?Sized, F: FileSystem + ?Sized> {
    client: &'a C,
    fs: &'a F,
    config: &'a FetchConfig,
    aliases: &'a AliasTable,
}

impl<'a, C: WikiClient + ?Sized, F: FileSystem + ?Sized> FetchJob<'a, C, F> {
    /// Creates a job that resolves names with `aliases` and paces requests
    /// per `config`.
    #[must_use]
    pub const fn new(
        client: &'a C,
        fs: &'a F,
        config: &'a FetchConfig,
        aliases: &'a AliasTable,
    ) -> Self {
        Self {
            client,
            fs,
            config,
            aliases,
        }
    }

    /// Processes `missing` in batches, saving images into `out_dir`.
    ///
    /// Lookup and download failures are recorded in the report and do not
    /// stop the run.
    ///
    /// # Errors
    ///
    /// Returns an error only if `out_dir` cannot be created.
    pub async fn run(
        &self,
        missing: &[String],
        out_dir: &Path,
        progress: &dyn FetchProgress,
    ) -> Result<RunReport> {
        let mut builder = RunReportBuilder::new();
        if missing.is_empty() {
            return Ok(builder.build());
        }

        self.fs.create_dir_all(out_dir).await?;

        let batch_size = self.config.batch_size.max(1);
        let total = missing.len().div_ceil(batch_size);
        for (i, batch) in missing.chunks(batch_size).enumerate() {
            progress.on_batch_start(i + 1, total, batch);
            self.run_batch(batch, out_dir, progress, &mut builder).await;
            tokio::time::sleep(self.config.batch_delay()).await;
        }

        let report = builder.build();
        log::info!(
            "Run finished: {} downloaded, {} failed",
            report.success_count(),
            report.failure_count()
        );
        Ok(report)
    }

    async fn run_batch(
        &self,
        batch: &[String],
        out_dir: &Path,
        progress: &dyn FetchProgress,
        builder: &mut RunReportBuilder,
    ) {
        let (titles, index) = TitleIndex::build(batch, self.aliases, self.config.max_titles);

        let found = match self.client.image_info(&titles).await {
            Ok(found) => found,
            Err(e) => {
                log::error!("Lookup failed for batch starting at {}: {e}", batch[0]);
                progress.on_lookup_error(batch, &e);
                for filename in batch {
                    builder.add_failure(filename, FailureReason::LookupFailed(e.to_string()));
                }
                return;
            }
        };

        // Resolved URLs per file, best-ranked candidate first.
        let mut resolved: Vec<Vec<(usize, String)>> = vec![Vec::new(); batch.len()];
        for info in found {
            match index.lookup(&info.title) {
                Some((file_idx, rank)) => resolved[file_idx].push((rank, info.url)),
                None => log::debug!("Ignoring unrequested title {}", info.title),
            }
        }

        let downloader = Downloader::new(self.client, self.fs);
        for (filename, mut urls) in batch.iter().zip(resolved) {
            urls.sort_by_key(|(rank, _)| *rank);
            let mut seen = HashSet::new();
            urls.retain(|(_, url)| seen.insert(url.clone()));

            let mut reason = FailureReason::NotFound;
            let mut written = None;
            for (_, url) in urls {
                let result = downloader.download(&url, &out_dir.join(filename)).await;
                tokio::time::sleep(self.config.download_delay()).await;
                match result {
                    Ok(bytes) => {
                        written = Some(bytes);
                        break;
                    }
                    Err(Error::NotPng { len }) => {
                        log::warn!("{filename}: {url} is not a PNG ({len} bytes)");
                        reason = FailureReason::Rejected;
                    }
                    Err(e) => {
                        log::warn!("{filename}: download of {url} failed: {e}");
                        reason = FailureReason::DownloadFailed(e.to_string());
                    }
                }
            }

            match written {
                Some(bytes) => {
                    builder.add_download(filename, bytes);
                    progress.on_downloaded(filename, bytes);
                }
                None => {
                    progress.on_missed(filename, &reason);
                    builder.add_failure(filename, reason);
                }
            }
        }
    }
}
