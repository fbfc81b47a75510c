//! File system abstraction for testability.

use async_trait::async_trait;
use std::path::Path;

/// Abstraction over file system operations for testability.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Reads a whole file as UTF-8 text.
    async fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    /// Returns the names of all entries in a directory.
    ///
    /// A directory that does not exist yields an empty list.
    async fn list_dir(&self, path: &Path) -> std::io::Result<Vec<String>>;

    /// Creates all directories in the given path.
    async fn create_dir_all(&self, path: &Path) -> std::io::Result<()>;

    /// Writes `data` to `path`, truncating any existing file.
    async fn write(&self, path: &Path, data: &[u8]) -> std::io::Result<()>;

    /// Renames a file from `from` to `to`, replacing `to` if it exists.
    async fn rename_file(&self, from: &Path, to: &Path) -> std::io::Result<()>;

    /// Removes a file.
    async fn remove_file(&self, path: &Path) -> std::io::Result<()>;
}

/// Default file system implementation using `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    /// Creates a new `TokioFileSystem` instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSystem for TokioFileSystem {
    async fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    async fn list_dir(&self, path: &Path) -> std::io::Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    async fn create_dir_all(&self, path: &Path) -> std::io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }

    async fn write(&self, path: &Path, data: &[u8]) -> std::io::Result<()> {
        tokio::fs::write(path, data).await
    }

    async fn rename_file(&self, from: &Path, to: &Path) -> std::io::Result<()> {
        tokio::fs::rename(from, to).await
    }

    async fn remove_file(&self, path: &Path) -> std::io::Result<()> {
        tokio::fs::remove_file(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn tokio_fs_read_to_string() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("list.txt");
        std::fs::write(&path, "Axe.png\n").unwrap();

        let fs = TokioFileSystem::new();
        assert_eq!(fs.read_to_string(&path).await.unwrap(), "Axe.png\n");
        assert!(fs.read_to_string(&dir.path().join("nope.txt")).await.is_err());
    }

    #[tokio::test]
    async fn tokio_fs_list_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.png"), b"x").unwrap();
        std::fs::write(dir.path().join("b.png"), b"x").unwrap();

        let fs = TokioFileSystem::new();
        let mut names = fs.list_dir(dir.path()).await.unwrap();
        names.sort();
        assert_eq!(names, vec!["a.png".to_string(), "b.png".to_string()]);
    }

    #[tokio::test]
    async fn tokio_fs_list_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let fs = TokioFileSystem::new();
        let names = fs.list_dir(&dir.path().join("missing")).await.unwrap();
        assert!(names.is_empty());
    }

    #[tokio::test]
    async fn tokio_fs_write_and_rename() {
        let dir = TempDir::new().unwrap();
        let part = dir.path().join("x.png.part");
        let dest = dir.path().join("x.png");
        std::fs::write(&dest, b"old").unwrap();

        let fs = TokioFileSystem::new();
        fs.write(&part, b"new").await.unwrap();
        fs.rename_file(&part, &dest).await.unwrap();

        assert!(!part.exists());
        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
    }

    #[tokio::test]
    async fn tokio_fs_create_dir_all() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("public/images/items");

        let fs = TokioFileSystem::new();
        fs.create_dir_all(&nested).await.unwrap();
        assert!(nested.exists());
    }
}
