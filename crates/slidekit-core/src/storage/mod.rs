//! Snapshot persistence for the history log.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::slides::Slide;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Snapshot not found: {0}")]
    NotFound(SnapshotKey),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async storage operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Key of a stored snapshot. Keys increase strictly with insertion order.
pub type SnapshotKey = u64;

/// One history entry: the whole deck plus the slide that was current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub index: usize,
    pub slides: Vec<Slide>,
}

impl Snapshot {
    pub fn new(index: usize, slides: Vec<Slide>) -> Self {
        Self { index, slides }
    }
}

/// Backend holding history snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Store a snapshot under a fresh key, larger than every key handed out before.
    fn add(&self, snapshot: &Snapshot) -> BoxFuture<'_, StorageResult<SnapshotKey>>;

    /// All stored keys in ascending order.
    fn keys(&self) -> BoxFuture<'_, StorageResult<Vec<SnapshotKey>>>;

    fn get(&self, key: SnapshotKey) -> BoxFuture<'_, StorageResult<Snapshot>>;

    /// Overwrite the slide index of a stored snapshot.
    fn update_index(&self, key: SnapshotKey, index: usize) -> BoxFuture<'_, StorageResult<()>>;

    /// Delete the given keys. Missing keys are ignored.
    fn bulk_delete(&self, keys: &[SnapshotKey]) -> BoxFuture<'_, StorageResult<()>>;

    /// Delete every snapshot.
    fn clear(&self) -> BoxFuture<'_, StorageResult<()>>;
}
