//! Error types for the wiki-assets library.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching wiki images.
#[derive(Error, Debug)]
pub enum Error {
    /// The needed-list file does not exist.
    #[error("needed list not found: {}", path.display())]
    ListNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API response was not the JSON we expected.
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration file or value.
    #[error("config error: {0}")]
    Config(String),

    /// Downloaded payload does not carry the PNG signature.
    #[error("payload is not a PNG ({len} bytes)")]
    NotPng {
        /// Size of the rejected payload.
        len: usize,
    },

    /// Run mode is neither `items` nor `materials`.
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// Malformed command line.
    #[error("{0}")]
    Usage(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// A specialized `Result` type for wiki-assets operations.
pub type Result<T> = std::result::Result<T, Error>;
