//! Component fragment loading
//!
//! Components are plain HTML files (for example `components/greeting.html`)
//! that templates reference by file stem (`${greeting}`). They are loaded
//! fresh for every page so edits show up without a restart.

use crate::error::{PageError, PageResult};
use crate::storage::{FileStorage, StorageError};
use futures_util::future::try_join_all;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Mapping from component name to its normalized HTML
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Components {
    fragments: HashMap<String, String>,
}

impl Components {
    /// Creates an empty component set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the content of the named fragment
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fragments.get(name).map(String::as_str)
    }

    /// Adds a fragment, returning the content it replaced
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) -> Option<String> {
        self.fragments.insert(name.into(), content.into())
    }

    /// Returns whether a fragment with this name is loaded
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    /// Number of loaded fragments
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns whether no fragments are loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Iterates over `(name, content)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fragments.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Components {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fragments: iter.into_iter().collect(),
        }
    }
}

/// Strips every newline so a fragment can be spliced into a single line
#[must_use]
pub fn normalize(content: &str) -> String {
    content.replace('\n', "")
}

/// Loads every fragment under `dir` whose extension matches `extension`
///
/// A missing directory is a valid "no components" state and yields an empty
/// set. All files are read concurrently; if two files share a stem, the one
/// that sorts last by path wins.
///
/// # Errors
///
/// Returns `PageError::ComponentRead` if the directory cannot be listed or
/// any single fragment cannot be read. No partial set is returned.
pub async fn load_components<S>(storage: &S, dir: &Path, extension: &str) -> PageResult<Components>
where
    S: FileStorage + ?Sized,
{
    let present = storage
        .exists(dir)
        .await
        .map_err(|source| PageError::ComponentRead {
            path: dir.to_path_buf(),
            source,
        })?;
    if !present {
        tracing::debug!(dir = %dir.display(), "Components directory missing, using none");
        return Ok(Components::new());
    }

    let files = storage
        .collect(dir, extension)
        .await
        .map_err(|source| PageError::ComponentRead {
            path: dir.to_path_buf(),
            source,
        })?;

    let loaded = try_join_all(files.into_iter().map(|path| load_file(storage, path))).await?;

    let mut components = Components::new();
    for (name, content) in loaded {
        if components.insert(name.clone(), content).is_some() {
            tracing::warn!(component = %name, "Duplicate component name, keeping the last file");
        }
    }

    tracing::debug!(dir = %dir.display(), count = components.len(), "Loaded components");
    Ok(components)
}

async fn load_file<S>(storage: &S, path: PathBuf) -> PageResult<(String, String)>
where
    S: FileStorage + ?Sized,
{
    let Some(name) = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
    else {
        let source = StorageError::InvalidPath(format!("{} has no file name", path.display()));
        return Err(PageError::ComponentRead { path, source });
    };

    match storage.read_to_string(&path).await {
        Ok(content) => Ok((name, normalize(&content))),
        Err(source) => Err(PageError::ComponentRead { path, source }),
    }
}
