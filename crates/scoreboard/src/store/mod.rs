//! The document store contract and its implementations.
//!
//! The aggregator only needs a keyed read and a partial-field write. The
//! ordered read backs the leaderboard, which sits outside the aggregation
//! path.
//!
//! # Example
//!
//! ```rust,ignore
//! use scoreboard::store::{DocumentStore, ScorePatch, ScoreWrite};
//! use async_trait::async_trait;
//!
//! struct RemoteStore { /* client handle */ }
//!
//! #[async_trait]
//! impl DocumentStore for RemoteStore {
//!     async fn get(&self, user: &UserId) -> StoreResult<Option<UserScoreRecord>> {
//!         // fetch users/{user}
//!     }
//!     // ...
//! }
//! ```

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::record::{Subject, UserId, UserScoreRecord};

/// How a patch writes the cumulative `score` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreWrite {
    /// Overwrite with this value.
    Set(i64),
    /// Add this delta to the stored value, reading "never attempted" as 0.
    ///
    /// Only valid on stores where
    /// [`supports_increment`](DocumentStore::supports_increment) is true.
    Increment(i64),
}

/// A partial-field write. Fields left `None` are not touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScorePatch {
    /// New last-attempt value for a subject.
    pub subject: Option<(Subject, u32)>,
    /// New cumulative score.
    pub score: Option<ScoreWrite>,
}

impl ScorePatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a subject's last-attempt field.
    pub fn subject(mut self, subject: Subject, score: u32) -> Self {
        self.subject = Some((subject, score));
        self
    }

    /// Writes the cumulative score.
    pub fn score(mut self, write: ScoreWrite) -> Self {
        self.score = Some(write);
        self
    }

    /// Returns true if the patch carries an increment.
    pub fn has_increment(&self) -> bool {
        matches!(self.score, Some(ScoreWrite::Increment(_)))
    }

    /// Applies the patch to `record` in place.
    pub fn apply_to(&self, record: &mut UserScoreRecord) {
        if let Some((subject, score)) = self.subject {
            record.set_subject_score(subject, score);
        }
        match self.score {
            Some(ScoreWrite::Set(value)) => record.score = Some(value),
            Some(ScoreWrite::Increment(delta)) => {
                record.score = Some(record.score_or_zero() + delta);
            }
            None => {}
        }
    }
}

/// Keyed per-user document persistence.
///
/// Implementations must be shareable across tasks. A single
/// [`update`](Self::update) call applies all of its fields together.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads the user's document. `Ok(None)` means no such document.
    async fn get(&self, user: &UserId) -> StoreResult<Option<UserScoreRecord>>;

    /// Writes the patch's fields to an existing document and returns the
    /// document as stored afterwards.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the user has no document
    /// - [`StoreError::Unsupported`] for [`ScoreWrite::Increment`] on a store
    ///   without atomic increments
    async fn update(&self, user: &UserId, patch: ScorePatch) -> StoreResult<UserScoreRecord>;

    /// Whether [`ScoreWrite::Increment`] is applied atomically.
    fn supports_increment(&self) -> bool {
        false
    }

    /// Up to `limit` documents ordered by cumulative score, highest first.
    /// Documents without a score sort last.
    async fn top_by_score(&self, limit: usize) -> StoreResult<Vec<(UserId, UserScoreRecord)>>;
}

/// Orders `(id, record)` pairs for a leaderboard read and truncates.
///
/// Ties are broken by user id so the order is stable across stores.
pub(crate) fn rank_by_score(
    mut docs: Vec<(UserId, UserScoreRecord)>,
    limit: usize,
) -> Vec<(UserId, UserScoreRecord)> {
    docs.sort_by(|(a_id, a), (b_id, b)| {
        b.score
            .unwrap_or(-1)
            .cmp(&a.score.unwrap_or(-1))
            .then_with(|| a_id.cmp(b_id))
    });
    docs.truncate(limit);
    docs
}

/// Rejects an increment on stores that cannot apply one atomically.
pub(crate) fn reject_increment(patch: &ScorePatch) -> StoreResult<()> {
    if patch.has_increment() {
        Err(StoreError::Unsupported("atomic increment"))
    } else {
        Ok(())
    }
}
