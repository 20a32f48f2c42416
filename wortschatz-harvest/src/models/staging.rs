//! Staged candidate types

use crate::models::Regularity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A word staged for review, scoped to one processing session.
///
/// Identity is (lemma, session_id); `surface_form` records the inflected
/// token that was actually seen in the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedCandidate {
    pub surface_form: String,
    pub lemma: String,
    pub part_of_speech: Option<String>,
    pub translation: Option<String>,
    pub regularity: Regularity,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}

impl StagedCandidate {
    pub fn new(
        surface_form: impl Into<String>,
        lemma: impl Into<String>,
        part_of_speech: Option<String>,
        translation: Option<String>,
        regularity: Regularity,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            surface_form: surface_form.into(),
            lemma: lemma.into(),
            part_of_speech,
            translation,
            regularity,
            session_id: session_id.into(),
            created_at: Utc::now(),
        }
    }
}

/// Grouped aggregate over the staging store, one row per session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub word_count: i64,
    pub earliest_created_at: DateTime<Utc>,
}
