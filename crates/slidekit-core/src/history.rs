//! Bounded undo/redo log of deck snapshots backed by a [`SnapshotStore`].
//!
//! The cursor addresses a position in the store's ascending key list. Writing
//! while the cursor is not at the tail discards the redo branch first.

use crate::config::HISTORY_LIMIT;
use crate::slides::Deck;
use crate::storage::{Snapshot, SnapshotKey, SnapshotStore, StorageError};
use log::{debug, info, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("History storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("No snapshot stored at position {0}")]
    MissingSnapshot(usize),
}

pub type HistoryResult<T> = Result<T, HistoryError>;

/// Undo/redo log.
///
/// Operations take `&mut self`, so each one observes every write made by the
/// previous one.
pub struct HistoryLog<S> {
    store: S,
    cursor: Option<usize>,
    len: usize,
    limit: usize,
}

impl<S: SnapshotStore> HistoryLog<S> {
    pub fn new(store: S) -> Self {
        Self::with_limit(store, HISTORY_LIMIT)
    }

    pub fn with_limit(store: S, limit: usize) -> Self {
        Self {
            store,
            cursor: None,
            len: 0,
            limit: limit.max(1),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current position, `None` before the first snapshot.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.len)
    }

    /// Drop any stale snapshots and store `deck` as the only entry.
    pub async fn init(&mut self, deck: &Deck) -> HistoryResult<()> {
        let result = self.try_init(deck).await;
        if result.is_err() {
            self.resync().await;
        }
        result
    }

    async fn try_init(&mut self, deck: &Deck) -> HistoryResult<()> {
        self.store.clear().await?;
        self.cursor = None;
        self.len = 0;
        self.store.add(&snapshot_of(deck)).await?;
        self.cursor = Some(0);
        self.len = 1;
        info!("history initialised");
        Ok(())
    }

    /// Append a snapshot of `deck`, discarding the redo branch and the oldest
    /// entries beyond the limit.
    pub async fn record(&mut self, deck: &Deck) -> HistoryResult<()> {
        let result = self.try_record(deck).await;
        if result.is_err() {
            self.resync().await;
        }
        result
    }

    async fn try_record(&mut self, deck: &Deck) -> HistoryResult<()> {
        let mut keys = self.store.keys().await?;

        // An uninitialised log has no redo branch to prune.
        if let Some(c) = self.cursor.filter(|&c| c + 1 < keys.len()) {
            let discarded = keys.split_off(c + 1);
            debug!("discarding {} redo snapshot(s)", discarded.len());
            self.store.bulk_delete(&discarded).await?;
        }

        let key = self.store.add(&snapshot_of(deck)).await?;
        keys.push(key);

        if keys.len() > self.limit {
            let evicted: Vec<SnapshotKey> = keys.drain(..keys.len() - self.limit).collect();
            debug!("evicting {} oldest snapshot(s)", evicted.len());
            self.store.bulk_delete(&evicted).await?;
        }

        // Undoing back to the previous entry should land on the slide edited now.
        if keys.len() >= 2 {
            let previous = keys[keys.len() - 2];
            self.store.update_index(previous, deck.slide_index).await?;
        }

        self.len = keys.len();
        self.cursor = Some(self.len - 1);
        info!("history recorded: {} snapshot(s), cursor {}", self.len, self.len - 1);
        Ok(())
    }

    /// Step back one snapshot. Returns `None` at the oldest entry.
    pub async fn undo(&mut self) -> HistoryResult<Option<Snapshot>> {
        match self.cursor {
            Some(c) if c > 0 => self.load_at(c - 1).await.map(Some),
            _ => {
                debug!("nothing to undo");
                Ok(None)
            }
        }
    }

    /// Step forward one snapshot. Returns `None` at the newest entry.
    pub async fn redo(&mut self) -> HistoryResult<Option<Snapshot>> {
        match self.cursor {
            Some(c) if c + 1 < self.len => self.load_at(c + 1).await.map(Some),
            _ => {
                debug!("nothing to redo");
                Ok(None)
            }
        }
    }

    /// Load the snapshot at `position` and move the cursor there on success.
    async fn load_at(&mut self, position: usize) -> HistoryResult<Snapshot> {
        let result = self.try_load(position).await;
        match result {
            Ok(_) => self.cursor = Some(position),
            Err(_) => self.resync().await,
        }
        result
    }

    async fn try_load(&self, position: usize) -> HistoryResult<Snapshot> {
        let keys = self.store.keys().await?;
        let key = *keys
            .get(position)
            .ok_or(HistoryError::MissingSnapshot(position))?;
        let mut snapshot = self.store.get(key).await?;
        snapshot.index = snapshot.index.min(snapshot.slides.len().saturating_sub(1));
        Ok(snapshot)
    }

    /// Re-read the length from the store after a failure, keeping the cursor in range.
    async fn resync(&mut self) {
        match self.store.keys().await {
            Ok(keys) => {
                self.len = keys.len();
                self.cursor = match (self.cursor, self.len) {
                    (_, 0) => None,
                    (Some(c), len) => Some(c.min(len - 1)),
                    (None, len) => Some(len - 1),
                };
                warn!("history resynced: {} snapshot(s), cursor {:?}", self.len, self.cursor);
            }
            Err(e) => warn!("history resync failed: {}", e),
        }
    }
}

fn snapshot_of(deck: &Deck) -> Snapshot {
    Snapshot::new(deck.slide_index, deck.slides.clone())
}
