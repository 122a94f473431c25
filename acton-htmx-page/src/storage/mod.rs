//! File storage collaborator
//!
//! The page pipeline never touches the filesystem directly. Everything it
//! needs (existence checks, reads, directory creation, asset copies and
//! component discovery) goes through the [`FileStorage`] trait so the
//! pipeline can be exercised against a mock backend in tests.

mod local;
mod traits;
mod types;

pub use local::LocalFileStorage;
pub use traits::FileStorage;
#[cfg(test)]
pub use traits::MockFileStorage;
pub use types::{StorageError, StorageResult};
