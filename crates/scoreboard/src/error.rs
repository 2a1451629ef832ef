//! Error types for the score aggregator and its stores.

use std::io;

use thiserror::Error;

use crate::record::UserId;

/// Errors raised by a [`DocumentStore`](crate::DocumentStore).
///
/// The aggregator never propagates these to its caller; it logs them and
/// reports them in [`Outcome::Failed`](crate::Outcome::Failed).
/// Leaderboard and status reads do propagate them.
///
/// # Recovery Strategies
///
/// | Error Variant | Recovery Strategy |
/// |--------------|-------------------|
/// | [`NotFound`](StoreError::NotFound) | Treat as "no account document"; skip |
/// | [`Unavailable`](StoreError::Unavailable) | Log and carry on; no retry |
/// | [`Unsupported`](StoreError::Unsupported) | Fall back to a plain read-then-write |
/// | [`Io`](StoreError::Io) | Check the store path and permissions |
/// | [`Json`](StoreError::Json) | The store file is corrupt; inspect it by hand |
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document exists for the user.
    #[error("no document for user {0}")]
    NotFound(UserId),

    /// The backing service could not be reached or refused the request.
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    /// The store does not implement the requested write.
    #[error("document store does not support {0}")]
    Unsupported(&'static str),

    /// Filesystem error from a file-backed store.
    #[error("document store I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed store contents.
    #[error("document store contents are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors building a quiz completion event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// More correct answers than the quiz has questions.
    #[error("{correct} correct answers reported for a {questions}-question quiz")]
    TooManyCorrect {
        /// Reported correct answers.
        correct: u8,
        /// Questions in the quiz.
        questions: u8,
    },

    /// Subject id not recognised.
    #[error("unknown subject: {0:?} (expected \"english\" or \"indonesian\")")]
    UnknownSubject(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_not_found_display() {
        let e = StoreError::NotFound(UserId::from("u-1"));
        assert_eq!(e.to_string(), "no document for user u-1");
    }

    #[test]
    fn test_io_from_and_source() {
        let e: StoreError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(e, StoreError::Io(_)));
        assert!(e.to_string().contains("denied"));
        assert!(e.source().is_some());
    }

    #[test]
    fn test_json_from() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: StoreError = bad.into();
        assert!(matches!(e, StoreError::Json(_)));
    }

    #[test]
    fn test_quiz_error_display() {
        let e = QuizError::TooManyCorrect {
            correct: 7,
            questions: 5,
        };
        assert_eq!(e.to_string(), "7 correct answers reported for a 5-question quiz");

        let e = QuizError::UnknownSubject("biology".into());
        assert!(e.to_string().contains("\"biology\""));
    }
}
