//! In-process document store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::{DocumentStore, ScorePatch, rank_by_score};
use crate::error::{StoreError, StoreResult};
use crate::record::{UserId, UserScoreRecord};

/// Documents held in a map behind a read-write lock.
///
/// Every [`update`](DocumentStore::update) runs under one write lock, so
/// increments are atomic with respect to other callers of the same store.
///
/// The failure counters make the next N reads or writes return
/// [`StoreError::Unavailable`], which is how tests exercise the best-effort
/// path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<HashMap<UserId, UserScoreRecord>>,
    failing_reads: AtomicU32,
    failing_writes: AtomicU32,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or replaces a user's document.
    pub fn insert(&self, user: impl Into<UserId>, record: UserScoreRecord) {
        self.docs.write().insert(user.into(), record);
    }

    /// Returns a copy of a user's document without going through the
    /// failure counters.
    pub fn snapshot(&self, user: &UserId) -> Option<UserScoreRecord> {
        self.docs.read().get(user).cloned()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    /// Returns true if no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    /// Makes the next `count` reads fail.
    pub fn fail_next_reads(&self, count: u32) {
        self.failing_reads.store(count, Ordering::SeqCst);
    }

    /// Makes the next `count` writes fail.
    pub fn fail_next_writes(&self, count: u32) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    fn take_failure(counter: &AtomicU32, op: &str) -> StoreResult<()> {
        let tripped = counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if tripped {
            Err(StoreError::Unavailable(format!("injected {op} failure")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, user: &UserId) -> StoreResult<Option<UserScoreRecord>> {
        Self::take_failure(&self.failing_reads, "read")?;
        Ok(self.docs.read().get(user).cloned())
    }

    async fn update(&self, user: &UserId, patch: ScorePatch) -> StoreResult<UserScoreRecord> {
        Self::take_failure(&self.failing_writes, "write")?;
        let mut docs = self.docs.write();
        let record = docs
            .get_mut(user)
            .ok_or_else(|| StoreError::NotFound(user.clone()))?;
        patch.apply_to(record);
        debug!(user = %user, score = ?record.score, "Memory document updated");
        Ok(record.clone())
    }

    fn supports_increment(&self) -> bool {
        true
    }

    async fn top_by_score(&self, limit: usize) -> StoreResult<Vec<(UserId, UserScoreRecord)>> {
        Self::take_failure(&self.failing_reads, "read")?;
        let docs = self
            .docs
            .read()
            .iter()
            .map(|(id, record)| (id.clone(), record.clone()))
            .collect();
        Ok(rank_by_score(docs, limit))
    }
}
