//! Document store backed by a single JSON file.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::{DocumentStore, ScorePatch, rank_by_score, reject_increment};
use crate::error::{StoreError, StoreResult};
use crate::record::{UserId, UserScoreRecord};

type Documents = BTreeMap<UserId, UserScoreRecord>;

/// A JSON object mapping user id to document, re-read on every call.
///
/// Writes go to a sibling temp file that is then renamed over the store file,
/// so a crash never leaves a half-written store. The in-process lock only
/// orders callers sharing this value; separate processes writing the same
/// file are not coordinated, which is why increments are not offered.
///
/// A missing file reads as an empty store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens a store at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates a fresh document for `user` unless one exists.
    ///
    /// Returns `true` if a document was created.
    ///
    /// # Errors
    ///
    /// Returns an I/O or JSON error if the file cannot be read or written.
    pub fn register(&self, user: &UserId, username: &str) -> StoreResult<bool> {
        let _guard = self.lock.lock();
        let mut docs = self.load()?;
        if docs.contains_key(user) {
            return Ok(false);
        }
        docs.insert(user.clone(), UserScoreRecord::registered(username));
        self.save(&docs)?;
        debug!(user = %user, path = %self.path.display(), "Registered document");
        Ok(true)
    }

    fn load(&self) -> StoreResult<Documents> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(Documents::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Documents::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, docs: &Documents) -> StoreResult<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let text = serde_json::to_string_pretty(docs)?;
        replace_file(&tmp, &self.path, &text)?;
        Ok(())
    }
}

/// Writes `text` to `tmp` and renames it over `path`. `tmp` is removed if
/// either step fails.
fn replace_file(tmp: &Path, path: &Path, text: &str) -> io::Result<()> {
    let result = fs::write(tmp, text).and_then(|()| fs::rename(tmp, path));
    if result.is_err() {
        if let Err(e) = fs::remove_file(tmp) {
            if e.kind() != io::ErrorKind::NotFound {
                debug!(path = %tmp.display(), error = %e, "Could not remove temp file");
            }
        }
    }
    result
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn get(&self, user: &UserId) -> StoreResult<Option<UserScoreRecord>> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(user))
    }

    async fn update(&self, user: &UserId, patch: ScorePatch) -> StoreResult<UserScoreRecord> {
        reject_increment(&patch)?;
        let _guard = self.lock.lock();
        let mut docs = self.load()?;
        let record = docs
            .get_mut(user)
            .ok_or_else(|| StoreError::NotFound(user.clone()))?;
        patch.apply_to(record);
        let updated = record.clone();
        self.save(&docs)?;
        debug!(user = %user, path = %self.path.display(), "Document written");
        Ok(updated)
    }

    async fn top_by_score(&self, limit: usize) -> StoreResult<Vec<(UserId, UserScoreRecord)>> {
        let _guard = self.lock.lock();
        let docs = self.load()?.into_iter().collect();
        Ok(rank_by_score(docs, limit))
    }
}
