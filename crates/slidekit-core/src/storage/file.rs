//! File-based snapshot store.

use super::{BoxFuture, Snapshot, SnapshotKey, SnapshotStore, StorageError, StorageResult};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

const EXTENSION: &str = "json";

/// Stores each snapshot as a JSON file in a directory.
///
/// File names are zero-padded keys so directory order matches key order.
/// Writes go to a temporary file that is then renamed into place.
pub struct FileStore {
    base_path: PathBuf,
    next_key: AtomicU64,
}

impl FileStore {
    /// Open a store in `base_path`, creating the directory if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        let next_key = list_keys(&base_path)?
            .last()
            .map_or(0, |last| last + 1);
        debug!("opened snapshot store at {} (next key {})", base_path.display(), next_key);
        Ok(Self {
            base_path,
            next_key: AtomicU64::new(next_key),
        })
    }

    /// Open the store in the default location.
    ///
    /// On Linux: `~/.local/share/slidekit/history/`
    /// On Windows: `%LOCALAPPDATA%\slidekit\history\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("slidekit").join("history"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn snapshot_path(&self, key: SnapshotKey) -> PathBuf {
        self.base_path.join(format!("{:020}.{}", key, EXTENSION))
    }

    fn read(&self, key: SnapshotKey) -> StorageResult<Snapshot> {
        let path = self.snapshot_path(key);
        if !path.exists() {
            return Err(StorageError::NotFound(key));
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&json).map_err(|e| {
            StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn write(&self, key: SnapshotKey, snapshot: &Snapshot) -> StorageResult<()> {
        let json = serde_json::to_string(snapshot)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let path = self.snapshot_path(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &path).map_err(|e| {
            StorageError::Io(format!("Failed to move {} into place: {}", path.display(), e))
        })
    }

    fn remove(&self, key: SnapshotKey) -> StorageResult<()> {
        let path = self.snapshot_path(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }
}

/// Keys of the snapshot files in `dir`, ascending.
fn list_keys(dir: &Path) -> StorageResult<Vec<SnapshotKey>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;
    let mut keys: Vec<SnapshotKey> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
        .filter_map(|path| path.file_stem()?.to_str()?.parse().ok())
        .collect();
    keys.sort_unstable();
    Ok(keys)
}

impl SnapshotStore for FileStore {
    fn add(&self, snapshot: &Snapshot) -> BoxFuture<'_, StorageResult<SnapshotKey>> {
        let snapshot = snapshot.clone();
        Box::pin(async move {
            let key = self.next_key.fetch_add(1, Ordering::SeqCst);
            self.write(key, &snapshot)?;
            Ok(key)
        })
    }

    fn keys(&self) -> BoxFuture<'_, StorageResult<Vec<SnapshotKey>>> {
        Box::pin(async move { list_keys(&self.base_path) })
    }

    fn get(&self, key: SnapshotKey) -> BoxFuture<'_, StorageResult<Snapshot>> {
        Box::pin(async move { self.read(key) })
    }

    fn update_index(&self, key: SnapshotKey, index: usize) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            let mut snapshot = self.read(key)?;
            snapshot.index = index;
            self.write(key, &snapshot)
        })
    }

    fn bulk_delete(&self, keys: &[SnapshotKey]) -> BoxFuture<'_, StorageResult<()>> {
        let keys = keys.to_vec();
        Box::pin(async move {
            for key in keys {
                self.remove(key)?;
            }
            Ok(())
        })
    }

    fn clear(&self) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            for key in list_keys(&self.base_path)? {
                self.remove(key)?;
            }
            Ok(())
        })
    }
}
