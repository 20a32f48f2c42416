//! Processing session lifecycle
//!
//! `Created` → `Processing` → `Failed` | `Completed` | `PendingReview`.
//! The terminal status is a snapshot of the processing outcome: approvals
//! and rejections later drain the staging store without touching it, so
//! "still has pending words" must always be computed live, never read from
//! the status field. The single exception is `clear_session_data`, which
//! demotes `PendingReview` to `Completed` once nothing is left pending.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{error, warn};
use uuid::Uuid;

use crate::db::staging;
use crate::models::{
    SessionRecord, SessionResult, SessionStatistics, SessionStatus, SessionStatusReport,
    StagedCandidate,
};
use crate::pipeline::{clean_text_input, Pipeline};
use crate::session::store::SessionStore;

/// Characters of cleaned text kept in the durable record
const PREVIEW_STORED_CHARS: usize = 200;
/// Characters of cleaned text shown in status reports
const PREVIEW_REPORT_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct ProcessingSession {
    pub session_id: String,
    pub status: SessionStatus,
    pub created_at: chrono::DateTime<Utc>,
    pub completed_at: Option<chrono::DateTime<Utc>>,
    pub error_message: Option<String>,
    pub statistics: SessionStatistics,
    cleaned_text: String,
}

impl ProcessingSession {
    /// New session with a generated id: timestamp plus random suffix,
    /// human-inspectable and globally unique.
    pub fn new() -> Self {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let suffix = Uuid::new_v4().simple().to_string();
        let session_id = format!("session_{}_{}", timestamp, &suffix[..8]);
        Self::with_id(session_id)
    }

    pub fn with_id(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            status: SessionStatus::Created,
            created_at: Utc::now(),
            completed_at: None,
            error_message: None,
            statistics: SessionStatistics::default(),
            cleaned_text: String::new(),
        }
    }

    /// Restore a session from its durable record
    pub fn from_record(record: SessionRecord) -> Self {
        Self {
            session_id: record.session_id,
            status: record.status,
            created_at: record.created_at,
            completed_at: record.completed_at,
            error_message: record.error_message,
            statistics: record.statistics,
            cleaned_text: record.text_preview,
        }
    }

    /// Durable form of this session. The text preview is lossy.
    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            session_id: self.session_id.clone(),
            status: self.status,
            created_at: self.created_at,
            completed_at: self.completed_at,
            error_message: self.error_message.clone(),
            statistics: self.statistics,
            text_preview: truncate_chars(&self.cleaned_text, PREVIEW_STORED_CHARS),
        }
    }

    /// Run the pipeline over the given text and assign the terminal status.
    ///
    /// Collaborator failures are captured into a `Failed` status with an
    /// error message; they never propagate past this method.
    pub async fn start_session(
        &mut self,
        pipeline: &dyn Pipeline,
        pool: &SqlitePool,
        store: &SessionStore,
        text: &str,
    ) -> SessionResult {
        self.status = SessionStatus::Processing;
        self.cleaned_text = clean_text_input(text);

        if self.cleaned_text.is_empty() {
            return self.fail(store, "Empty or invalid text input");
        }

        match pipeline.process(&self.cleaned_text, &self.session_id).await {
            Ok(Some(outcome)) => {
                self.statistics = SessionStatistics {
                    total_words_processed: outcome.words_processed,
                    words_added: outcome.words_staged,
                    words_translated: outcome.words_translated,
                    words_failed: 0,
                };

                self.status = if outcome.words_staged > 0 {
                    SessionStatus::PendingReview
                } else {
                    SessionStatus::Completed
                };
                self.completed_at = Some(Utc::now());
                self.persist(store);

                self.build_result(true)
            }
            Ok(None) => self.fail(store, "Text processing failed"),
            Err(err) => self.fail(store, &format!("Unexpected error: {}", err)),
        }
    }

    /// Live status report. Pending count comes from the staging store, not
    /// from the status field.
    pub async fn session_status(&self, pool: &SqlitePool) -> SessionStatusReport {
        let pending_words = match staging::count_candidates(pool, &self.session_id).await {
            Ok(count) => count,
            Err(err) => {
                error!(session_id = %self.session_id, error = %err, "pending count unavailable");
                0
            }
        };

        let end = self.completed_at.unwrap_or_else(Utc::now);
        let duration = (end - self.created_at).num_milliseconds() as f64 / 1000.0;

        SessionStatusReport {
            session_id: self.session_id.clone(),
            status: self.status,
            created_at: self.created_at,
            completed_at: self.completed_at,
            duration_seconds: (duration * 100.0).round() / 100.0,
            statistics: self.statistics,
            pending_words,
            error_message: self.error_message.clone(),
            text_preview: preview_for_report(&self.cleaned_text),
        }
    }

    /// All candidates of this session still awaiting review
    pub async fn session_words(&self, pool: &SqlitePool) -> Vec<StagedCandidate> {
        match staging::get_candidates(pool, Some(&self.session_id)).await {
            Ok(candidates) => candidates,
            Err(err) => {
                error!(session_id = %self.session_id, error = %err, "could not load session words");
                Vec::new()
            }
        }
    }

    /// Drop all staged candidates of this session.
    ///
    /// The one retroactive status adjustment: a `PendingReview` session has
    /// nothing pending afterwards and is demoted to `Completed`.
    pub async fn clear_session_data(&mut self, pool: &SqlitePool, store: &SessionStore) -> u64 {
        let removed = match staging::clear_session(pool, &self.session_id).await {
            Ok(removed) => removed,
            Err(err) => {
                error!(session_id = %self.session_id, error = %err, "clearing session failed");
                return 0;
            }
        };

        if self.status == SessionStatus::PendingReview {
            self.status = SessionStatus::Completed;
            self.persist(store);
        }

        removed
    }

    fn fail(&mut self, store: &SessionStore, message: &str) -> SessionResult {
        self.status = SessionStatus::Failed;
        self.error_message = Some(message.to_string());
        self.completed_at = Some(Utc::now());
        self.persist(store);
        self.build_result(false)
    }

    fn persist(&self, store: &SessionStore) {
        if let Err(err) = store.save(&self.to_record()) {
            warn!(session_id = %self.session_id, error = %err, "could not save session record");
        }
    }

    fn build_result(&self, success: bool) -> SessionResult {
        SessionResult {
            success,
            session_id: self.session_id.clone(),
            status: self.status,
            statistics: self.statistics,
            error_message: self.error_message.clone(),
        }
    }
}

impl Default for ProcessingSession {
    fn default() -> Self {
        Self::new()
    }
}

fn preview_for_report(text: &str) -> String {
    if text.chars().count() > PREVIEW_REPORT_CHARS {
        format!("{}...", truncate_chars(text, PREVIEW_REPORT_CHARS))
    } else {
        text.to_string()
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
