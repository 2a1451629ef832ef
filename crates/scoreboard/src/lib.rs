#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::doc_markdown)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Scoreboard
//!
//! Cumulative quiz scores kept in a per-user document store.
//!
//! When a quiz finishes, [`ScoreAggregator`] adds its score to the user's
//! running total and records it as the subject's last attempt. Writes are
//! best effort: a failed or skipped write is logged and reported, never
//! raised, so the caller's flow always continues.
//!
//! ## Features
//!
//! - **Pluggable storage**: anything implementing [`DocumentStore`]
//! - **Three update strategies**: the plain read-modify-write, a per-user
//!   serialized variant, and a single atomic increment
//! - **Grading**: answer keys for the bundled quizzes
//! - **Read views**: per-user [`QuizStatus`] and the top-N [`Leaderboard`]
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use scoreboard::{MemoryStore, QuizCompletion, ScoreAggregator, Subject, UserScoreRecord};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let store = Arc::new(MemoryStore::new());
//!     store.insert("u1", UserScoreRecord::registered("sari"));
//!
//!     let aggregator = ScoreAggregator::new(store.clone());
//!     let completion = QuizCompletion::new(Subject::English, 3).unwrap();
//!     aggregator.record_completion(Some(&"u1".into()), completion).await;
//!
//!     let record = store.snapshot(&"u1".into()).unwrap();
//!     assert_eq!(record.score, Some(60));
//!     assert_eq!(record.english, Some(60));
//! }
//! ```

mod aggregator;
mod error;
mod leaderboard;
mod quiz;
mod record;
pub mod store;

pub use aggregator::{Outcome, ScoreAggregator, SkipReason, UpdateStrategy};
pub use error::{QuizError, StoreError, StoreResult};
pub use leaderboard::{
    DEFAULT_LEADERBOARD_LIMIT, Leaderboard, LeaderboardEntry, QuizStatus, SubjectStatus,
    display_points,
};
pub use quiz::{AnswerKey, POINTS_PER_CORRECT, QUESTIONS_PER_QUIZ, QuizCompletion};
pub use record::{Subject, UserId, UserScoreRecord};
pub use store::{DocumentStore, JsonFileStore, MemoryStore, ScorePatch, ScoreWrite};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        AnswerKey, DocumentStore, Leaderboard, MemoryStore, Outcome, QuizCompletion, QuizStatus,
        ScoreAggregator, Subject, UpdateStrategy, UserId, UserScoreRecord,
    };
}
