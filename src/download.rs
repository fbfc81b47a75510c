//! Fetching a single image and writing it safely to disk.

use std::path::{Path, PathBuf};

use crate::api::WikiClient;
use crate::error::{Error, Result};
use crate::fs::FileSystem;

/// Returns true if `data` starts with the PNG signature (`89 50 4E 47`).
#[must_use]
pub fn is_png(data: &[u8]) -> bool {
    infer::image::is_png(data)
}

/// Returns the `.part` file path for a given final path.
fn part_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Downloads images through a [`WikiClient`] onto a [`FileSystem`].
pub struct Downloader<'a, C: WikiClient + ?Sized, F: FileSystem + ?Sized> {
    client: &'a C,
    fs: &'a F,
}

impl<'a, C: WikiClient + ?Sized, F: FileSystem + ?Sized> Downloader<'a, C, F> {
    #[must_use]
    pub const fn new(client: &'a C, fs: &'a F) -> Self {
        Self { client, fs }
    }

    /// Fetches `url` and stores it at `dest` if it is a PNG.
    ///
    /// Writes to `{dest}.part` first, then renames onto `dest`, replacing
    /// any existing file. Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotPng`] if the payload lacks the PNG signature, in
    /// which case nothing is written, or the underlying HTTP/I/O error.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let data = self.client.fetch(url).await?;
        if !is_png(&data) {
            return Err(Error::NotPng { len: data.len() });
        }

        let pp = part_path(dest);
        let written = async {
            self.fs.write(&pp, &data).await?;
            self.fs.rename_file(&pp, dest).await
        }
        .await;

        if let Err(e) = written {
            let _ = self.fs.remove_file(&pp).await;
            return Err(Error::Io(e));
        }
        Ok(data.len() as u64)
    }
}
