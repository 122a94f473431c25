//! Local filesystem storage implementation

use super::traits::FileStorage;
use super::types::{StorageError, StorageResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

/// Local filesystem storage backend
///
/// Paths are used as given: relative paths resolve against the process
/// working directory, the same way the vendored asset path does.
///
/// # Examples
///
/// ```rust,no_run
/// use acton_htmx_page::storage::{FileStorage, LocalFileStorage};
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let storage = LocalFileStorage::new();
/// let shell = storage.read_to_string(Path::new("static/index.html")).await?;
/// println!("{shell}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStorage;

impl LocalFileStorage {
    /// Creates a new local file storage instance
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Unique sibling of `target` used to stage copies
    fn staging_path(target: &Path) -> StorageResult<PathBuf> {
        static NEXT: AtomicU64 = AtomicU64::new(0);

        let name = target
            .file_name()
            .ok_or_else(|| StorageError::InvalidPath(format!("{} has no file name", target.display())))?;
        let staging = format!(
            ".{}.{}-{}.tmp",
            name.to_string_lossy(),
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        );
        Ok(target.with_file_name(staging))
    }

    /// Normalizes an extension argument to the form `Path::extension` returns
    fn bare_extension(extension: &str) -> &str {
        extension.strip_prefix('.').unwrap_or(extension)
    }
}

/// Maps a not-found I/O error onto `StorageError::NotFound`
fn map_io(path: &Path, error: std::io::Error) -> StorageError {
    if error.kind() == ErrorKind::NotFound {
        StorageError::NotFound(path.display().to_string())
    } else {
        StorageError::Io(error)
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn exists(&self, path: &Path) -> StorageResult<bool> {
        Ok(fs::try_exists(path).await?)
    }

    async fn read(&self, path: &Path) -> StorageResult<Vec<u8>> {
        fs::read(path).await.map_err(|e| map_io(path, e))
    }

    async fn read_to_string(&self, path: &Path) -> StorageResult<String> {
        fs::read_to_string(path).await.map_err(|e| map_io(path, e))
    }

    async fn create_dir(&self, path: &Path) -> StorageResult<()> {
        fs::create_dir_all(path).await?;
        Ok(())
    }

    async fn copy(&self, from: &Path, to: &Path) -> StorageResult<()> {
        // Readers never see a partially written target: write a sibling, then rename
        let staging = Self::staging_path(to)?;
        if let Err(e) = fs::copy(from, &staging).await {
            let _ = fs::remove_file(&staging).await;
            return Err(map_io(from, e));
        }
        if let Err(e) = fs::rename(&staging, to).await {
            let _ = fs::remove_file(&staging).await;
            return Err(StorageError::Io(e));
        }
        Ok(())
    }

    async fn collect(&self, dir: &Path, extension: &str) -> StorageResult<Vec<PathBuf>> {
        let wanted = Self::bare_extension(extension);
        let mut pending = vec![dir.to_path_buf()];
        let mut found = Vec::new();

        while let Some(current) = pending.pop() {
            let mut entries = fs::read_dir(&current)
                .await
                .map_err(|e| map_io(&current, e))?;

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let file_type = entry.file_type().await?;

                if file_type.is_dir() {
                    pending.push(path);
                } else if path.extension().and_then(|ext| ext.to_str()) == Some(wanted) {
                    found.push(path);
                }
            }
        }

        found.sort();
        Ok(found)
    }
}
