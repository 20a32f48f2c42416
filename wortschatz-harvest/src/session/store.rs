//! Durable session records
//!
//! One JSON file per session, keyed by session id, so concurrent sessions
//! never contend on the same record. Writes go through a temp file and an
//! atomic rename so a crash mid-write cannot corrupt an existing record.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use wortschatz_common::{Error, Result};

use crate::models::SessionRecord;

#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist a session record
    pub fn save(&self, record: &SessionRecord) -> Result<()> {
        validate_id(&record.session_id)?;
        std::fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_vec_pretty(record)?;

        let temp = tempfile::NamedTempFile::new_in(&self.dir)?;
        std::fs::write(temp.path(), &json)?;
        temp.persist(self.record_path(&record.session_id))
            .map_err(|e| Error::Io(e.error))?;

        debug!(session_id = %record.session_id, "saved session record");
        Ok(())
    }

    /// Load one record; None when no record exists for the id
    pub fn load(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        validate_id(session_id)?;
        let path = self.record_path(session_id);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        let record: SessionRecord = serde_json::from_str(&content)?;
        Ok(Some(record))
    }

    /// Load every readable record in the directory.
    ///
    /// Unreadable or malformed files are skipped with a warning — one bad
    /// record must not block resumption of the others.
    pub fn load_all(&self) -> Result<Vec<SessionRecord>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            match std::fs::read_to_string(&path)
                .map_err(Error::from)
                .and_then(|content| serde_json::from_str(&content).map_err(Error::from))
            {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable session record");
                }
            }
        }

        Ok(records)
    }

    /// Remove a record. False when none existed — deleting twice is fine.
    pub fn delete(&self, session_id: &str) -> Result<bool> {
        validate_id(session_id)?;
        let path = self.record_path(session_id);
        if !path.exists() {
            return Ok(false);
        }

        std::fs::remove_file(&path)?;
        debug!(session_id = %session_id, "deleted session record");
        Ok(true)
    }

    fn record_path(&self, session_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", session_id))
    }
}

/// Session ids become file names; refuse anything that could escape the
/// sessions directory.
fn validate_id(session_id: &str) -> Result<()> {
    if session_id.is_empty()
        || session_id.contains(['/', '\\'])
        || session_id.contains("..")
    {
        return Err(Error::InvalidInput(format!(
            "invalid session id: {:?}",
            session_id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SessionStatistics, SessionStatus};
    use chrono::Utc;

    fn record(id: &str) -> SessionRecord {
        SessionRecord {
            session_id: id.to_string(),
            status: SessionStatus::PendingReview,
            created_at: Utc::now(),
            completed_at: Some(Utc::now()),
            error_message: None,
            statistics: SessionStatistics {
                total_words_processed: 5,
                words_added: 2,
                words_translated: 1,
                words_failed: 0,
            },
            text_preview: "Der Hund läuft durch den Park".to_string(),
        }
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());

        let original = record("session_20260806_120000_aabbccdd");
        store.save(&original).unwrap();

        let loaded = store.load("session_20260806_120000_aabbccdd").unwrap();
        assert_eq!(loaded, Some(original));
    }

    #[test]
    fn load_missing_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        assert_eq!(store.load("session_nope").unwrap(), None);
    }

    #[test]
    fn save_overwrites_existing_record() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());

        let mut rec = record("session_x");
        store.save(&rec).unwrap();
        rec.status = SessionStatus::Completed;
        store.save(&rec).unwrap();

        let loaded = store.load("session_x").unwrap().unwrap();
        assert_eq!(loaded.status, SessionStatus::Completed);
    }

    #[test]
    fn load_all_skips_garbage_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());

        store.save(&record("session_good")).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let records = store.load_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].session_id, "session_good");
    }

    #[test]
    fn load_all_on_missing_dir_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("never-created"));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());

        store.save(&record("session_x")).unwrap();
        assert!(store.delete("session_x").unwrap());
        assert!(!store.delete("session_x").unwrap());
    }

    #[test]
    fn path_escaping_ids_are_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());

        assert!(store.load("../outside").is_err());
        assert!(store.delete("a/b").is_err());
    }
}
