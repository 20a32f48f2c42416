//! Multi-session coordinator
//!
//! CRUD over the full session set. All durable records are loaded eagerly
//! on construction; lookups for an unknown id fall back to disk once before
//! reporting "not found".

use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{error, warn};

use crate::db::staging;
use crate::models::{SessionOverview, SessionResult, SessionStatus, SessionStatusReport};
use crate::pipeline::Pipeline;
use crate::session::lifecycle::ProcessingSession;
use crate::session::store::SessionStore;

pub struct SessionManager {
    store: SessionStore,
    sessions: HashMap<String, ProcessingSession>,
}

impl SessionManager {
    /// Create a manager, eagerly resuming every durable session record
    pub fn new(store: SessionStore) -> Self {
        let sessions = match store.load_all() {
            Ok(records) => records
                .into_iter()
                .map(|record| (record.session_id.clone(), ProcessingSession::from_record(record)))
                .collect(),
            Err(err) => {
                warn!(error = %err, "could not load saved sessions");
                HashMap::new()
            }
        };

        Self { store, sessions }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Create a session and run the pipeline over the given text
    pub async fn create_session(
        &mut self,
        pipeline: &dyn Pipeline,
        pool: &SqlitePool,
        text: &str,
    ) -> SessionResult {
        let mut session = ProcessingSession::new();
        let result = session.start_session(pipeline, pool, &self.store, text).await;
        self.sessions.insert(session.session_id.clone(), session);
        result
    }

    /// Look up a session, falling back to its durable record on a miss
    pub fn get_session(&mut self, session_id: &str) -> Option<&ProcessingSession> {
        if !self.sessions.contains_key(session_id) {
            match self.store.load(session_id) {
                Ok(Some(record)) => {
                    self.sessions
                        .insert(session_id.to_string(), ProcessingSession::from_record(record));
                }
                Ok(None) => return None,
                Err(err) => {
                    warn!(session_id = %session_id, error = %err, "could not load session record");
                    return None;
                }
            }
        }

        self.sessions.get(session_id)
    }

    /// Live status report for one session
    pub async fn session_status(
        &mut self,
        pool: &SqlitePool,
        session_id: &str,
    ) -> Option<SessionStatusReport> {
        let session = self.get_session(session_id)?;
        Some(session.session_status(pool).await)
    }

    /// Clear one session's staged candidates; 0 for an unknown session
    pub async fn clear_session_data(&mut self, pool: &SqlitePool, session_id: &str) -> u64 {
        if self.get_session(session_id).is_none() {
            return 0;
        }

        let store = self.store.clone();
        match self.sessions.get_mut(session_id) {
            Some(session) => session.clear_session_data(pool, &store).await,
            None => 0,
        }
    }

    /// All sessions, newest first, optionally filtered by status.
    ///
    /// Pending counts are computed live per session.
    pub async fn list_sessions(
        &self,
        pool: &SqlitePool,
        status_filter: Option<SessionStatus>,
    ) -> Vec<SessionOverview> {
        let mut overviews = Vec::new();

        for session in self.sessions.values() {
            if let Some(filter) = status_filter {
                if session.status != filter {
                    continue;
                }
            }

            let pending_words = match staging::count_candidates(pool, &session.session_id).await {
                Ok(count) => count,
                Err(err) => {
                    error!(session_id = %session.session_id, error = %err, "pending count unavailable");
                    0
                }
            };

            overviews.push(SessionOverview {
                session_id: session.session_id.clone(),
                status: session.status,
                created_at: session.created_at,
                words_added: session.statistics.words_added,
                pending_words,
            });
        }

        overviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        overviews
    }

    /// Delete a session entirely: staged candidates, durable record, and
    /// the in-memory entry. Idempotent — deleting an unknown session
    /// succeeds.
    pub async fn delete_session(&mut self, pool: &SqlitePool, session_id: &str) -> bool {
        let mut ok = true;

        if let Err(err) = staging::clear_session(pool, session_id).await {
            error!(session_id = %session_id, error = %err, "could not clear staged candidates");
            ok = false;
        }

        if let Err(err) = self.store.delete(session_id) {
            error!(session_id = %session_id, error = %err, "could not delete session record");
            ok = false;
        }

        self.sessions.remove(session_id);
        ok
    }

    /// Delete every session that is Completed AND has no words pending.
    ///
    /// The live pending count is double-checked on purpose: status is a
    /// processing snapshot, and a PendingReview session is never touched
    /// here even when its queue has drained.
    pub async fn clear_completed_sessions(&mut self, pool: &SqlitePool) -> u64 {
        let completed: Vec<String> = self
            .sessions
            .values()
            .filter(|s| s.status == SessionStatus::Completed)
            .map(|s| s.session_id.clone())
            .collect();

        let mut cleared = 0;
        for session_id in completed {
            let pending = match staging::count_candidates(pool, &session_id).await {
                Ok(count) => count,
                Err(err) => {
                    error!(session_id = %session_id, error = %err, "pending count unavailable");
                    continue;
                }
            };

            if pending == 0 && self.delete_session(pool, &session_id).await {
                cleared += 1;
            }
        }

        cleared
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
