//! Session state machine and durable record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing session state.
///
/// `Created` → `Processing` → one of the terminal states. `PendingReview`
/// is terminal for the lifecycle manager: it records the processing
/// outcome, not the live count of words still awaiting review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Created,
    Processing,
    Completed,
    Failed,
    PendingReview,
}

/// Counters captured from one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatistics {
    pub total_words_processed: u64,
    pub words_added: u64,
    pub words_translated: u64,
    pub words_failed: u64,
}

/// Durable session record, one JSON file per session.
///
/// `text_preview` is truncated for display only; the truncation is lossy
/// and never round-tripped back into processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub statistics: SessionStatistics,
    #[serde(default)]
    pub text_preview: String,
}

/// Outcome of `start_session`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub success: bool,
    pub session_id: String,
    pub status: SessionStatus,
    pub statistics: SessionStatistics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Live status report for one session.
///
/// `pending_words` is always computed freshly from the staging store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatusReport {
    pub session_id: String,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_seconds: f64,
    pub statistics: SessionStatistics,
    pub pending_words: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub text_preview: String,
}

/// One row in a manager session listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOverview {
    pub session_id: String,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub words_added: u64,
    pub pending_words: u64,
}
