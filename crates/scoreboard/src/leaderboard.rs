//! Read-side views: per-user quiz status and the top-N leaderboard.

use serde::Serialize;

use crate::error::StoreResult;
use crate::record::{Subject, UserId, UserScoreRecord};
use crate::store::DocumentStore;

/// Entries shown on the dashboard leaderboard.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 3;

/// Points shown for a document: the cumulative score, with "never
/// attempted" and negative values shown as 0.
pub fn display_points(record: &UserScoreRecord) -> u64 {
    record
        .score
        .and_then(|score| u64::try_from(score).ok())
        .unwrap_or(0)
}

/// One subject's status for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubjectStatus {
    /// Subject.
    pub subject: Subject,
    /// Whether the quiz has been taken at least once.
    pub attempted: bool,
    /// Last attempt, percent.
    pub score: Option<u32>,
}

/// Quiz status for every subject, in [`Subject::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizStatus {
    /// Per-subject entries.
    pub subjects: Vec<SubjectStatus>,
}

impl QuizStatus {
    /// Builds the status from a stored document.
    ///
    /// A stored 0 counts as attempted; only "never attempted" does not.
    pub fn from_record(record: &UserScoreRecord) -> Self {
        let subjects = Subject::ALL
            .iter()
            .map(|&subject| {
                let score = record.subject_score(subject);
                SubjectStatus {
                    subject,
                    attempted: score.is_some(),
                    score,
                }
            })
            .collect();
        Self { subjects }
    }

    /// Status for one subject.
    pub fn subject(&self, subject: Subject) -> Option<&SubjectStatus> {
        self.subjects.iter().find(|s| s.subject == subject)
    }

    /// Returns true when every subject has been attempted.
    pub fn all_attempted(&self) -> bool {
        self.subjects.iter().all(|s| s.attempted)
    }
}

/// A leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    /// Document id.
    pub user: UserId,
    /// Display name, if the document has one.
    pub username: Option<String>,
    /// Displayed points, never negative.
    pub points: u64,
}

/// The top users by cumulative score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Leaderboard {
    /// Rows, best first.
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Reads the top `limit` users from `store`.
    ///
    /// # Errors
    ///
    /// Propagates the store's read error.
    pub async fn fetch<S>(store: &S, limit: usize) -> StoreResult<Self>
    where
        S: DocumentStore + ?Sized,
    {
        let docs = store.top_by_score(limit).await?;
        Ok(Self::from_ranked(docs))
    }

    /// Builds rows from documents already in leaderboard order.
    pub fn from_ranked(docs: Vec<(UserId, UserScoreRecord)>) -> Self {
        let entries = docs
            .into_iter()
            .enumerate()
            .map(|(i, (user, record))| LeaderboardEntry {
                rank: i + 1,
                points: display_points(&record),
                username: record.username,
                user,
            })
            .collect();
        Self { entries }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
