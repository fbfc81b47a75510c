//! wiki-assets - fetches missing item and material images from a MediaWiki wiki.
//!
//! A run reads a list of wanted filenames, skips the ones already on disk,
//! guesses the wiki file titles for the rest, looks them up in batches and
//! downloads every title that resolves to a PNG.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use wiki_assets::{AliasTable, FetchConfig, FetchJob, MediaWikiClient, NoProgress, TokioFileSystem};
//!
//! # async fn example() -> wiki_assets::Result<()> {
//! let config = FetchConfig::default();
//! let client = MediaWikiClient::new(&config)?;
//! let fs = TokioFileSystem::new();
//! let aliases = AliasTable::builtin();
//!
//! let out_dir = Path::new("public/images/items");
//! let missing = wiki_assets::load_missing(&fs, Path::new("/tmp/items_needed.txt"), out_dir).await?;
//!
//! let report = FetchJob::new(&client, &fs, &config, &aliases)
//!     .run(&missing, out_dir, &NoProgress)
//!     .await?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod api;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod job;
pub mod names;
pub mod needed;
pub mod report;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export main types for convenience
pub use api::{ImageInfo, MediaWikiClient, WikiClient};
pub use config::{AppConfig, FetchConfig, Mode, ModePaths, PathConfig};
pub use download::{Downloader, is_png};
pub use error::{Error, Result};
pub use fs::{FileSystem, TokioFileSystem};
pub use job::{FetchJob, FetchProgress, NoProgress};
pub use names::{AliasTable, candidate_titles};
pub use needed::{load_missing, missing_from};
pub use report::{Failure, FailureReason, RunReport};
