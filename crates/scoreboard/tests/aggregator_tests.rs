//! Integration tests for the score aggregator.
//!
//! Tests verify:
//! - The sequential read-add-write case
//! - Lost updates under read-modify-write and their absence under the
//!   serialized and atomic strategies
//! - Store failures and missing preconditions are absorbed
//! - Detached completions run to the end

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use scoreboard::{
    DocumentStore, JsonFileStore, MemoryStore, Outcome, QuizCompletion, ScoreAggregator,
    ScorePatch, SkipReason, StoreError, StoreResult, Subject, UpdateStrategy, UserId,
    UserScoreRecord,
};
use tempfile::TempDir;

fn completion(subject: Subject, correct: u8) -> QuizCompletion {
    QuizCompletion::new(subject, correct).unwrap()
}

fn seeded(user: &str) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.insert(user, UserScoreRecord::registered(user));
    store
}

/// Wraps a [`MemoryStore`] and yields after every read, so a concurrent
/// completion gets to read before this one writes. Records the subject of
/// each write in the order writes land.
struct YieldingStore {
    inner: MemoryStore,
    writes: Mutex<Vec<Subject>>,
}

impl YieldingStore {
    fn seeded(user: &str) -> Arc<Self> {
        let inner = MemoryStore::new();
        inner.insert(user, UserScoreRecord::registered(user));
        Arc::new(Self {
            inner,
            writes: Mutex::new(Vec::new()),
        })
    }

    fn last_write(&self) -> Option<Subject> {
        self.writes.lock().last().copied()
    }
}

#[async_trait]
impl DocumentStore for YieldingStore {
    async fn get(&self, user: &UserId) -> StoreResult<Option<UserScoreRecord>> {
        let record = self.inner.get(user).await;
        tokio::task::yield_now().await;
        record
    }

    async fn update(&self, user: &UserId, patch: ScorePatch) -> StoreResult<UserScoreRecord> {
        let updated = self.inner.update(user, patch).await?;
        if let Some((subject, _)) = patch.subject {
            self.writes.lock().push(subject);
        }
        Ok(updated)
    }

    fn supports_increment(&self) -> bool {
        self.inner.supports_increment()
    }

    async fn top_by_score(&self, limit: usize) -> StoreResult<Vec<(UserId, UserScoreRecord)>> {
        self.inner.top_by_score(limit).await
    }
}

mod sequential_tests {
    use super::*;

    #[tokio::test]
    async fn test_first_completion_from_sentinel() {
        for strategy in [
            UpdateStrategy::ReadModifyWrite,
            UpdateStrategy::Serialized,
            UpdateStrategy::AtomicIncrement,
        ] {
            let store = seeded("u1");
            let aggregator = ScoreAggregator::new(store.clone()).with_strategy(strategy);
            let id = UserId::from("u1");

            let outcome = aggregator
                .record_completion(Some(&id), completion(Subject::English, 3))
                .await;
            assert!(
                matches!(
                    outcome,
                    Outcome::Committed {
                        previous: 0,
                        total: 60
                    }
                ),
                "{strategy:?}: {outcome:?}"
            );

            let record = store.snapshot(&id).unwrap();
            assert_eq!(record.english, Some(60));
            assert_eq!(record.score, Some(60));
            assert_eq!(record.indonesian, None);
        }
    }

    #[tokio::test]
    async fn test_scores_accumulate_and_subject_is_last_attempt() {
        let store = seeded("u1");
        let aggregator = ScoreAggregator::new(store.clone());
        let id = UserId::from("u1");

        aggregator
            .record_completion(Some(&id), completion(Subject::English, 3))
            .await;
        aggregator
            .record_completion(Some(&id), completion(Subject::Indonesian, 5))
            .await;
        let outcome = aggregator
            .record_completion(Some(&id), completion(Subject::English, 1))
            .await;
        assert_eq!(outcome.total(), Some(180));

        let record = store.snapshot(&id).unwrap();
        assert_eq!(record.english, Some(20));
        assert_eq!(record.indonesian, Some(100));
        assert_eq!(record.score, Some(180));
    }

    #[tokio::test]
    async fn test_zero_score_is_recorded() {
        let store = seeded("u1");
        let aggregator = ScoreAggregator::new(store.clone());
        let id = UserId::from("u1");

        aggregator
            .record_completion(Some(&id), completion(Subject::Indonesian, 0))
            .await;

        let record = store.snapshot(&id).unwrap();
        assert_eq!(record.indonesian, Some(0));
        assert_eq!(record.score, Some(0));
    }

    #[tokio::test]
    async fn test_unmanaged_fields_untouched() {
        let store = Arc::new(MemoryStore::new());
        let mut record = UserScoreRecord::registered("sari");
        record
            .extra
            .insert("email".into(), serde_json::json!("sari@example.com"));
        store.insert("u1", record);

        ScoreAggregator::new(store.clone())
            .record_completion(Some(&"u1".into()), completion(Subject::English, 2))
            .await;

        let after = store.snapshot(&"u1".into()).unwrap();
        assert_eq!(after.username.as_deref(), Some("sari"));
        assert_eq!(after.extra["email"], "sari@example.com");
    }
}

mod race_tests {
    use super::*;

    async fn race(strategy: UpdateStrategy) -> UserScoreRecord {
        race_with_last_writer(strategy).await.0
    }

    async fn race_with_last_writer(strategy: UpdateStrategy) -> (UserScoreRecord, Subject) {
        let store = YieldingStore::seeded("u1");
        let aggregator = ScoreAggregator::new(store.clone()).with_strategy(strategy);
        let id = UserId::from("u1");

        let (a, b) = tokio::join!(
            aggregator.record_completion(Some(&id), completion(Subject::English, 3)),
            aggregator.record_completion(Some(&id), completion(Subject::Indonesian, 5)),
        );
        assert!(a.is_committed() && b.is_committed());

        let last = store.last_write().unwrap();
        (store.inner.snapshot(&id).unwrap(), last)
    }

    #[tokio::test]
    async fn test_read_modify_write_keeps_only_last_writer() {
        let (record, last) = race_with_last_writer(UpdateStrategy::ReadModifyWrite).await;
        // Both read 0, so the total is whatever the last write carried.
        let expected = match last {
            Subject::English => 60,
            Subject::Indonesian => 100,
        };
        assert_eq!(record.score, Some(expected));
        assert_eq!(record.english, Some(60));
        assert_eq!(record.indonesian, Some(100));
    }

    #[tokio::test]
    async fn test_serialized_keeps_both() {
        let record = race(UpdateStrategy::Serialized).await;
        assert_eq!(record.score, Some(160));
    }

    #[tokio::test]
    async fn test_atomic_increment_keeps_both() {
        let record = race(UpdateStrategy::AtomicIncrement).await;
        assert_eq!(record.score, Some(160));
    }

    #[tokio::test]
    async fn test_serialized_across_clones() {
        let store = YieldingStore::seeded("u1");
        let aggregator =
            ScoreAggregator::new(store.clone()).with_strategy(UpdateStrategy::Serialized);
        let other = aggregator.clone();
        let id = UserId::from("u1");

        tokio::join!(
            aggregator.record_completion(Some(&id), completion(Subject::English, 5)),
            other.record_completion(Some(&id), completion(Subject::English, 5)),
        );
        assert_eq!(store.inner.snapshot(&id).unwrap().score, Some(200));
    }

    #[tokio::test]
    async fn test_many_concurrent_increments() {
        let store = YieldingStore::seeded("u1");
        let aggregator = ScoreAggregator::new(store.clone());

        let handles: Vec<_> = (0..10)
            .map(|_| {
                aggregator.spawn_completion(Some(UserId::from("u1")), completion(Subject::English, 1))
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().is_committed());
        }
        assert_eq!(
            store.inner.snapshot(&UserId::from("u1")).unwrap().score,
            Some(200)
        );
    }

    #[tokio::test]
    async fn test_json_store_falls_back_and_keeps_both() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonFileStore::new(dir.path().join("users.json")));
        let id = UserId::from("u1");
        store.register(&id, "sari").unwrap();

        let aggregator = ScoreAggregator::new(store.clone());
        assert_eq!(aggregator.effective_strategy(), UpdateStrategy::Serialized);

        tokio::join!(
            aggregator.record_completion(Some(&id), completion(Subject::English, 3)),
            aggregator.record_completion(Some(&id), completion(Subject::Indonesian, 4)),
        );

        let record = store.get(&id).await.unwrap().unwrap();
        assert_eq!(record.score, Some(140));
        assert_eq!(record.english, Some(60));
        assert_eq!(record.indonesian, Some(80));
    }
}

mod best_effort_tests {
    use super::*;

    #[tokio::test]
    async fn test_no_user_is_skipped() {
        let store = seeded("u1");
        let outcome = ScoreAggregator::new(store.clone())
            .record_completion(None, completion(Subject::English, 5))
            .await;
        assert!(matches!(
            outcome,
            Outcome::Skipped(SkipReason::NotAuthenticated)
        ));
        assert_eq!(store.snapshot(&"u1".into()).unwrap().score, None);
    }

    #[tokio::test]
    async fn test_missing_document_is_skipped() {
        for strategy in [
            UpdateStrategy::ReadModifyWrite,
            UpdateStrategy::Serialized,
            UpdateStrategy::AtomicIncrement,
        ] {
            let store = Arc::new(MemoryStore::new());
            let outcome = ScoreAggregator::new(store.clone())
                .with_strategy(strategy)
                .record_completion(Some(&"ghost".into()), completion(Subject::English, 2))
                .await;
            assert!(
                matches!(outcome, Outcome::Skipped(SkipReason::MissingDocument)),
                "{strategy:?}: {outcome:?}"
            );
            assert!(store.is_empty());
        }
    }

    #[tokio::test]
    async fn test_read_failure_is_absorbed() {
        let store = seeded("u1");
        store.fail_next_reads(1);
        let outcome = ScoreAggregator::new(store.clone())
            .with_strategy(UpdateStrategy::ReadModifyWrite)
            .record_completion(Some(&"u1".into()), completion(Subject::English, 4))
            .await;

        assert!(matches!(
            outcome,
            Outcome::Failed(StoreError::Unavailable(_))
        ));
        assert_eq!(store.snapshot(&"u1".into()).unwrap().score, None);
    }

    #[tokio::test]
    async fn test_write_failure_is_absorbed() {
        for strategy in [UpdateStrategy::Serialized, UpdateStrategy::AtomicIncrement] {
            let store = seeded("u1");
            store.fail_next_writes(1);
            let outcome = ScoreAggregator::new(store.clone())
                .with_strategy(strategy)
                .record_completion(Some(&"u1".into()), completion(Subject::English, 4))
                .await;

            assert!(matches!(outcome, Outcome::Failed(_)), "{strategy:?}");
            let record = store.snapshot(&"u1".into()).unwrap();
            assert_eq!(record.score, None);
            assert_eq!(record.english, None);
        }
    }

    #[tokio::test]
    async fn test_no_retry_after_failure() {
        let store = seeded("u1");
        store.fail_next_writes(1);
        let aggregator = ScoreAggregator::new(store.clone());
        let id = UserId::from("u1");

        aggregator
            .record_completion(Some(&id), completion(Subject::English, 5))
            .await;
        aggregator
            .record_completion(Some(&id), completion(Subject::English, 2))
            .await;

        // Only the second completion landed.
        assert_eq!(store.snapshot(&id).unwrap().score, Some(40));
    }

    #[tokio::test]
    async fn test_corrupt_json_store_is_absorbed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let outcome = ScoreAggregator::new(Arc::new(JsonFileStore::new(&path)))
            .record_completion(Some(&"u1".into()), completion(Subject::English, 1))
            .await;
        assert!(matches!(outcome, Outcome::Failed(StoreError::Json(_))));
    }
}

mod spawn_tests {
    use super::*;

    #[tokio::test]
    async fn test_spawned_completion_reports_outcome() {
        let store = seeded("u1");
        let handle = ScoreAggregator::new(store.clone())
            .spawn_completion(Some("u1".into()), completion(Subject::Indonesian, 5));
        assert_eq!(handle.await.unwrap().total(), Some(100));
    }

    #[tokio::test]
    async fn test_dropped_handle_still_completes() {
        let store = seeded("u1");
        let aggregator = ScoreAggregator::new(store.clone());
        drop(aggregator.spawn_completion(Some("u1".into()), completion(Subject::English, 3)));

        for _ in 0..100 {
            if store.snapshot(&"u1".into()).unwrap().score.is_some() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(store.snapshot(&"u1".into()).unwrap().score, Some(60));
    }

    #[tokio::test]
    async fn test_spawned_anonymous_is_skipped() {
        let handle = ScoreAggregator::new(Arc::new(MemoryStore::new()))
            .spawn_completion(None, completion(Subject::English, 3));
        assert!(matches!(
            handle.await.unwrap(),
            Outcome::Skipped(SkipReason::NotAuthenticated)
        ));
    }
}
