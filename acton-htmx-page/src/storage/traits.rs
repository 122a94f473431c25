//! File storage trait definitions

use super::types::StorageResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Abstraction over the filesystem operations used by the page pipeline
///
/// All operations are async so that a request only suspends at I/O
/// boundaries. Implementations must be safe to share between requests.
///
/// # Examples
///
/// ```rust,no_run
/// use acton_htmx_page::storage::{FileStorage, LocalFileStorage};
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let storage = LocalFileStorage::new();
///
/// if !storage.exists(Path::new("public")).await? {
///     storage.create_dir(Path::new("public")).await?;
/// }
///
/// let fragments = storage.collect(Path::new("components"), ".html").await?;
/// println!("found {} fragments", fragments.len());
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Returns whether a file or directory exists at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined (permissions, etc.)
    async fn exists(&self, path: &Path) -> StorageResult<bool>;

    /// Reads the raw bytes of the file at `path`
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the file does not exist, or an
    /// I/O error if it cannot be read.
    async fn read(&self, path: &Path) -> StorageResult<Vec<u8>>;

    /// Reads the file at `path` as UTF-8 text
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the file does not exist, or an
    /// I/O error if it cannot be read or is not valid UTF-8.
    async fn read_to_string(&self, path: &Path) -> StorageResult<String>;

    /// Creates the directory at `path`, including missing parents
    ///
    /// Creating a directory that already exists is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    async fn create_dir(&self, path: &Path) -> StorageResult<()>;

    /// Copies the file at `from` to `to`, overwriting `to` if present
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if `from` does not exist, or an I/O
    /// error if the copy fails.
    async fn copy(&self, from: &Path, to: &Path) -> StorageResult<()>;

    /// Collects every file under `dir` whose extension matches `extension`
    ///
    /// The extension may be given with or without its leading dot. The walk
    /// descends into subdirectories and returns paths in sorted order.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` or one of its subdirectories cannot be listed.
    async fn collect(&self, dir: &Path, extension: &str) -> StorageResult<Vec<PathBuf>>;
}
