//! Computes which wanted images are not yet on disk.

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{Error, Result};
use crate::fs::FileSystem;

/// Returns the sorted set of names in `needed_text` that are not in `existing`.
///
/// `needed_text` holds one filename per line; surrounding whitespace is
/// trimmed and blank lines are ignored.
#[must_use]
pub fn missing_from<S: AsRef<str>>(needed_text: &str, existing: &[S]) -> Vec<String> {
    let existing: BTreeSet<&str> = existing.iter().map(|name| name.as_ref()).collect();
    needed_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !existing.contains(line))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Reads the needed list and the output directory, returning what is missing.
///
/// # Errors
///
/// Returns [`Error::ListNotFound`] if the list file does not exist, or an
/// I/O error if either path cannot be read.
pub async fn load_missing<F: FileSystem + ?Sized>(
    fs: &F,
    list_path: &Path,
    out_dir: &Path,
) -> Result<Vec<String>> {
    let needed_text = fs.read_to_string(list_path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::ListNotFound {
                path: list_path.to_path_buf(),
            }
        } else {
            Error::Io(e)
        }
    })?;
    let existing = fs.list_dir(out_dir).await?;
    log::debug!(
        "{} entries already in {}",
        existing.len(),
        out_dir.display()
    );
    Ok(missing_from(&needed_text, &existing))
}
