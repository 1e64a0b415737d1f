//! In-memory snapshot store.

use super::{BoxFuture, Snapshot, SnapshotKey, SnapshotStore, StorageError, StorageResult};
use std::collections::BTreeMap;
use std::sync::RwLock;

#[derive(Default)]
struct Inner {
    snapshots: BTreeMap<SnapshotKey, Snapshot>,
    next_key: SnapshotKey,
}

/// In-memory store for tests and sessions that need no persistence.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl SnapshotStore for MemoryStore {
    fn add(&self, snapshot: &Snapshot) -> BoxFuture<'_, StorageResult<SnapshotKey>> {
        let snapshot = snapshot.clone();
        Box::pin(async move {
            let mut inner = self.inner.write().map_err(lock_error)?;
            let key = inner.next_key;
            inner.next_key += 1;
            inner.snapshots.insert(key, snapshot);
            Ok(key)
        })
    }

    fn keys(&self) -> BoxFuture<'_, StorageResult<Vec<SnapshotKey>>> {
        Box::pin(async move {
            let inner = self.inner.read().map_err(lock_error)?;
            Ok(inner.snapshots.keys().copied().collect())
        })
    }

    fn get(&self, key: SnapshotKey) -> BoxFuture<'_, StorageResult<Snapshot>> {
        Box::pin(async move {
            let inner = self.inner.read().map_err(lock_error)?;
            inner
                .snapshots
                .get(&key)
                .cloned()
                .ok_or(StorageError::NotFound(key))
        })
    }

    fn update_index(&self, key: SnapshotKey, index: usize) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            let mut inner = self.inner.write().map_err(lock_error)?;
            let snapshot = inner
                .snapshots
                .get_mut(&key)
                .ok_or(StorageError::NotFound(key))?;
            snapshot.index = index;
            Ok(())
        })
    }

    fn bulk_delete(&self, keys: &[SnapshotKey]) -> BoxFuture<'_, StorageResult<()>> {
        let keys = keys.to_vec();
        Box::pin(async move {
            let mut inner = self.inner.write().map_err(lock_error)?;
            for key in keys {
                inner.snapshots.remove(&key);
            }
            Ok(())
        })
    }

    fn clear(&self) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            let mut inner = self.inner.write().map_err(lock_error)?;
            inner.snapshots.clear();
            Ok(())
        })
    }
}
