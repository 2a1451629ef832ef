//! Cumulative score aggregation on quiz completion.
//!
//! A completion adds its final score to the user's cumulative `score` and
//! overwrites the subject's last-attempt field. Persistence is best effort:
//! the quiz result has already been shown, so store failures are logged and
//! reported in the returned [`Outcome`] but never raised.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::StoreError;
use crate::quiz::QuizCompletion;
use crate::record::UserId;
use crate::store::{DocumentStore, ScorePatch, ScoreWrite};

/// How the aggregator writes the cumulative score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateStrategy {
    /// Read the document, add, write back. Two completions for the same
    /// user that interleave may lose one contribution.
    ReadModifyWrite,
    /// Read-modify-write queued per user behind an async mutex. Race-free
    /// among callers sharing one aggregator.
    Serialized,
    /// One write that increments `score` inside the store. Falls back to
    /// [`Serialized`](Self::Serialized) on stores without increments.
    #[default]
    AtomicIncrement,
}

/// Why a completion was not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No authenticated user.
    NotAuthenticated,
    /// The user has no score document.
    MissingDocument,
}

/// Result of persisting one completion.
#[derive(Debug)]
pub enum Outcome {
    /// The new cumulative score was written.
    Committed {
        /// Cumulative score before this completion (unset reads as 0).
        previous: i64,
        /// Cumulative score after this completion.
        total: i64,
    },
    /// Nothing was written.
    Skipped(SkipReason),
    /// The store failed; the error was logged and nothing was retried.
    Failed(StoreError),
}

impl Outcome {
    /// Returns true if the score was written.
    pub fn is_committed(&self) -> bool {
        matches!(self, Outcome::Committed { .. })
    }

    /// The cumulative score after a committed write.
    pub fn total(&self) -> Option<i64> {
        match self {
            Outcome::Committed { total, .. } => Some(*total),
            _ => None,
        }
    }
}

type UserLocks = HashMap<UserId, Arc<tokio::sync::Mutex<()>>>;

/// Applies quiz completions to a [`DocumentStore`].
///
/// Cloning is cheap and clones share the store and the per-user queues, so
/// the [`Serialized`](UpdateStrategy::Serialized) guarantee holds across
/// clones.
///
/// # Example
///
/// ```rust
/// # use std::sync::Arc;
/// # use scoreboard::{MemoryStore, QuizCompletion, ScoreAggregator, Subject, UserScoreRecord};
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), scoreboard::QuizError> {
/// let store = Arc::new(MemoryStore::new());
/// store.insert("u1", UserScoreRecord::registered("sari"));
///
/// let aggregator = ScoreAggregator::new(store);
/// let completion = QuizCompletion::new(Subject::English, 3)?;
/// let outcome = aggregator.record_completion(Some(&"u1".into()), completion).await;
/// assert_eq!(outcome.total(), Some(60));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ScoreAggregator {
    store: Arc<dyn DocumentStore>,
    strategy: UpdateStrategy,
    locks: Arc<Mutex<UserLocks>>,
}

impl std::fmt::Debug for ScoreAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreAggregator")
            .field("strategy", &self.strategy)
            .field("queued_users", &self.locks.lock().len())
            .finish_non_exhaustive()
    }
}

impl ScoreAggregator {
    /// Creates an aggregator using [`UpdateStrategy::AtomicIncrement`].
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            strategy: UpdateStrategy::default(),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Sets the update strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: UpdateStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Configured strategy.
    pub fn strategy(&self) -> UpdateStrategy {
        self.strategy
    }

    /// Strategy actually used against this store.
    pub fn effective_strategy(&self) -> UpdateStrategy {
        match self.strategy {
            UpdateStrategy::AtomicIncrement if !self.store.supports_increment() => {
                UpdateStrategy::Serialized
            }
            other => other,
        }
    }

    /// Adds a completion to `user`'s cumulative score.
    ///
    /// Never fails: missing preconditions come back as
    /// [`Outcome::Skipped`] and store errors as [`Outcome::Failed`].
    pub async fn record_completion(
        &self,
        user: Option<&UserId>,
        completion: QuizCompletion,
    ) -> Outcome {
        let Some(user) = user else {
            warn!(
                subject = %completion.subject(),
                final_score = completion.final_score(),
                "No authenticated user, score not saved"
            );
            return Outcome::Skipped(SkipReason::NotAuthenticated);
        };

        match self.effective_strategy() {
            UpdateStrategy::ReadModifyWrite => self.read_modify_write(user, completion).await,
            UpdateStrategy::Serialized => {
                if self.strategy == UpdateStrategy::AtomicIncrement {
                    debug!(user = %user, "Store has no atomic increment, serializing instead");
                }
                let lock = self.user_lock(user);
                let outcome = {
                    let _queued = lock.lock().await;
                    self.read_modify_write(user, completion).await
                };
                self.release_user_lock(user, lock);
                outcome
            }
            UpdateStrategy::AtomicIncrement => self.increment(user, completion).await,
        }
    }

    /// Runs [`record_completion`](Self::record_completion) as a detached
    /// task. It finishes even if the handle is dropped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_completion(
        &self,
        user: Option<UserId>,
        completion: QuizCompletion,
    ) -> JoinHandle<Outcome> {
        let aggregator = self.clone();
        tokio::spawn(async move { aggregator.record_completion(user.as_ref(), completion).await })
    }

    fn user_lock(&self, user: &UserId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock();
        Arc::clone(locks.entry(user.clone()).or_default())
    }

    /// Drops `user`'s queue once nobody else holds or waits on it. Clones
    /// are only handed out under the map lock, so the count cannot grow
    /// while it is checked.
    fn release_user_lock(&self, user: &UserId, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.locks.lock();
        drop(lock);
        if locks.get(user).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(user);
        }
    }

    async fn read_modify_write(&self, user: &UserId, completion: QuizCompletion) -> Outcome {
        let final_score = completion.final_score();

        let record = match self.store.get(user).await {
            Ok(Some(record)) => record,
            Ok(None) | Err(StoreError::NotFound(_)) => return missing_document(user),
            Err(e) => return failed(user, completion, e),
        };

        let previous = record.score_or_zero();
        let total = previous + i64::from(final_score);
        let patch = ScorePatch::new()
            .subject(completion.subject(), final_score)
            .score(ScoreWrite::Set(total));

        match self.store.update(user, patch).await {
            Ok(_) => committed(user, completion, previous, total),
            Err(StoreError::NotFound(_)) => missing_document(user),
            Err(e) => failed(user, completion, e),
        }
    }

    async fn increment(&self, user: &UserId, completion: QuizCompletion) -> Outcome {
        let final_score = completion.final_score();
        let patch = ScorePatch::new()
            .subject(completion.subject(), final_score)
            .score(ScoreWrite::Increment(i64::from(final_score)));

        match self.store.update(user, patch).await {
            Ok(after) => {
                let total = after.score_or_zero();
                committed(user, completion, total - i64::from(final_score), total)
            }
            Err(StoreError::NotFound(_)) => missing_document(user),
            Err(e) => failed(user, completion, e),
        }
    }
}

fn committed(user: &UserId, completion: QuizCompletion, previous: i64, total: i64) -> Outcome {
    info!(
        user = %user,
        subject = %completion.subject(),
        current_score = previous,
        final_score = completion.final_score(),
        new_score = total,
        "Score updated"
    );
    Outcome::Committed { previous, total }
}

fn missing_document(user: &UserId) -> Outcome {
    warn!(user = %user, "User document does not exist, score not saved");
    Outcome::Skipped(SkipReason::MissingDocument)
}

fn failed(user: &UserId, completion: QuizCompletion, e: StoreError) -> Outcome {
    error!(
        user = %user,
        subject = %completion.subject(),
        final_score = completion.final_score(),
        error = %e,
        "Error updating score"
    );
    Outcome::Failed(e)
}
