//! The per-user score document and its identifiers.
//!
//! Stored documents use `-1` to mean "never attempted". That sentinel is
//! translated to `None` while deserializing and back to `-1` while
//! serializing, so Rust code only ever sees `Option`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::QuizError;

/// Identifier of a user document (the authentication uid).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a user id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A quiz subject with its own last-attempt field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    /// English quiz, stored in `EngScore`.
    English,
    /// Indonesian quiz, stored in `IndScore`.
    Indonesian,
}

impl Subject {
    /// All subjects, in display order.
    pub const ALL: [Subject; 2] = [Subject::English, Subject::Indonesian];

    /// Identifier used in completion events.
    pub const fn id(self) -> &'static str {
        match self {
            Subject::English => "english",
            Subject::Indonesian => "indonesian",
        }
    }

    /// Name of the document field holding this subject's last score.
    pub const fn field_name(self) -> &'static str {
        match self {
            Subject::English => "EngScore",
            Subject::Indonesian => "IndScore",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Subject {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" => Ok(Subject::English),
            "indonesian" => Ok(Subject::Indonesian),
            _ => Err(QuizError::UnknownSubject(s.to_string())),
        }
    }
}

/// One user's score document.
///
/// Fields this crate does not manage (email, creation time, ...) are kept
/// in [`extra`](Self::extra) and written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserScoreRecord {
    /// Cumulative score across subjects and retakes.
    #[serde(default, with = "sentinel")]
    pub score: Option<i64>,

    /// Last English attempt, percent.
    #[serde(rename = "EngScore", default, with = "sentinel")]
    pub english: Option<u32>,

    /// Last Indonesian attempt, percent.
    #[serde(rename = "IndScore", default, with = "sentinel")]
    pub indonesian: Option<u32>,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Unmanaged fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserScoreRecord {
    /// A freshly registered user: nothing attempted yet.
    pub fn registered(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }

    /// Last attempt for `subject`, if any.
    pub fn subject_score(&self, subject: Subject) -> Option<u32> {
        match subject {
            Subject::English => self.english,
            Subject::Indonesian => self.indonesian,
        }
    }

    /// Overwrites the last attempt for `subject`.
    pub fn set_subject_score(&mut self, subject: Subject, score: u32) {
        match subject {
            Subject::English => self.english = Some(score),
            Subject::Indonesian => self.indonesian = Some(score),
        }
    }

    /// Cumulative score with "never attempted" read as zero.
    pub fn score_or_zero(&self) -> i64 {
        self.score.unwrap_or(0)
    }
}

/// Serde adapter for the `-1` sentinel.
///
/// Missing, `null` and negative values all read as `None`; `None` writes
/// as `-1`.
mod sentinel {
    use serde::{Deserialize, Deserializer, Serializer};

    const UNSET: i64 = -1;

    pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Copy + Into<i64>,
    {
        serializer.serialize_i64(value.map_or(UNSET, Into::into))
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<i64>,
    {
        let raw = Option::<i64>::deserialize(deserializer)?;
        Ok(raw
            .filter(|value| *value >= 0)
            .and_then(|value| T::try_from(value).ok()))
    }
}
