//! Test helper utilities
//!
//! Shared fixtures for integration tests: a temp-backed database plus
//! session store, and a scripted pipeline standing in for the external
//! NLP/translation collaborators.

#![allow(dead_code)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use tempfile::TempDir;
use wortschatz_common::db::init_database;
use wortschatz_common::{Error, Result, StoreConfig};
use wortschatz_harvest::db::staging;
use wortschatz_harvest::models::{Regularity, StagedCandidate};
use wortschatz_harvest::pipeline::{Pipeline, PipelineOutcome};
use wortschatz_harvest::session::SessionStore;

/// Create a temp directory holding a real database file and a sessions dir.
///
/// The TempDir must be kept alive for the duration of the test.
pub async fn create_test_env() -> (TempDir, SqlitePool, SessionStore) {
    let temp_dir = TempDir::new().unwrap();
    let config = StoreConfig::new(temp_dir.path());
    let pool = init_database(&config.database_path()).await.unwrap();
    let store = SessionStore::new(config.sessions_dir());
    (temp_dir, pool, store)
}

enum Mode {
    Stage,
    Fail,
    NoContent,
}

/// Pipeline stub with scripted behavior
pub struct ScriptedPipeline {
    pool: SqlitePool,
    candidates: Vec<(String, String)>,
    words_processed: u64,
    mode: Mode,
}

impl ScriptedPipeline {
    /// Stages the given (surface, lemma) pairs into the session
    pub fn staging(pool: SqlitePool, candidates: &[(&str, &str)]) -> Self {
        let candidates: Vec<(String, String)> = candidates
            .iter()
            .map(|(s, l)| (s.to_string(), l.to_string()))
            .collect();
        let words_processed = candidates.len() as u64;
        Self {
            pool,
            candidates,
            words_processed,
            mode: Mode::Stage,
        }
    }

    /// Processes words but stages nothing (everything already known)
    pub fn all_known(pool: SqlitePool, words_processed: u64) -> Self {
        Self {
            pool,
            candidates: Vec::new(),
            words_processed,
            mode: Mode::Stage,
        }
    }

    /// Fails with an internal error
    pub fn failing(pool: SqlitePool) -> Self {
        Self {
            pool,
            candidates: Vec::new(),
            words_processed: 0,
            mode: Mode::Fail,
        }
    }

    /// Reports no processable content
    pub fn no_content(pool: SqlitePool) -> Self {
        Self {
            pool,
            candidates: Vec::new(),
            words_processed: 0,
            mode: Mode::NoContent,
        }
    }
}

#[async_trait]
impl Pipeline for ScriptedPipeline {
    async fn process(
        &self,
        _cleaned_text: &str,
        session_id: &str,
    ) -> Result<Option<PipelineOutcome>> {
        match self.mode {
            Mode::Fail => Err(Error::Internal("pipeline exploded".to_string())),
            Mode::NoContent => Ok(None),
            Mode::Stage => {
                for (surface, lemma) in &self.candidates {
                    let candidate = StagedCandidate::new(
                        surface.clone(),
                        lemma.clone(),
                        Some("NOUN".to_string()),
                        None,
                        Regularity::NotApplicable,
                        session_id,
                    );
                    staging::add_candidate(&self.pool, &candidate).await?;
                }

                Ok(Some(PipelineOutcome {
                    session_id: session_id.to_string(),
                    words_processed: self.words_processed,
                    words_staged: self.candidates.len() as u64,
                    words_translated: 0,
                }))
            }
        }
    }
}
