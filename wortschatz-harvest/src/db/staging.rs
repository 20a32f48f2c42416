//! Staging store operations
//!
//! Ephemeral, session-partitioned holding area for candidate words. One
//! logical row per (lemma, session); rows are destroyed by approval,
//! rejection, or session clearing.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::info;
use wortschatz_common::{Error, Result};

use crate::models::{Regularity, SessionSummary, StagedCandidate};

/// Stage a candidate, upserting on the (lemma, session) key.
///
/// A repeated call with the same key overwrites the candidate's fields —
/// the same lemma can appear several times in one text — while the original
/// `created_at` is preserved so creation order stays stable.
pub async fn add_candidate(pool: &SqlitePool, candidate: &StagedCandidate) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO staged_candidates (
            surface_form, lemma, pos, translation, is_regular, session_id, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(lemma, session_id) DO UPDATE SET
            surface_form = excluded.surface_form,
            pos = excluded.pos,
            translation = excluded.translation,
            is_regular = excluded.is_regular
        "#,
    )
    .bind(&candidate.surface_form)
    .bind(&candidate.lemma)
    .bind(&candidate.part_of_speech)
    .bind(&candidate.translation)
    .bind(candidate.regularity.as_db())
    .bind(&candidate.session_id)
    .bind(candidate.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Candidates in creation order, for one session or across all sessions
pub async fn get_candidates(
    pool: &SqlitePool,
    session_id: Option<&str>,
) -> Result<Vec<StagedCandidate>> {
    let rows = match session_id {
        Some(session_id) => {
            sqlx::query(
                r#"
                SELECT surface_form, lemma, pos, translation, is_regular, session_id, created_at
                FROM staged_candidates
                WHERE session_id = ?
                ORDER BY created_at ASC
                "#,
            )
            .bind(session_id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(
                r#"
                SELECT surface_form, lemma, pos, translation, is_regular, session_id, created_at
                FROM staged_candidates
                ORDER BY created_at ASC
                "#,
            )
            .fetch_all(pool)
            .await?
        }
    };

    rows.iter().map(candidate_from_row).collect()
}

/// Whether a surface form was already staged in this session.
///
/// Keyed by surface form, not lemma: the pipeline uses this to skip a token
/// it has already seen in the same batch run.
pub async fn candidate_exists(
    pool: &SqlitePool,
    surface_form: &str,
    session_id: &str,
) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM staged_candidates WHERE surface_form = ? AND session_id = ?)",
    )
    .bind(surface_form)
    .bind(session_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Remove one candidate. False when no matching row exists.
pub async fn remove_candidate(pool: &SqlitePool, lemma: &str, session_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM staged_candidates WHERE lemma = ? AND session_id = ?")
        .bind(lemma)
        .bind(session_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete all candidates of a session, returning the count removed.
///
/// Idempotent: clearing an empty or unknown session returns 0.
pub async fn clear_session(pool: &SqlitePool, session_id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM staged_candidates WHERE session_id = ?")
        .bind(session_id)
        .execute(pool)
        .await?;

    let removed = result.rows_affected();
    if removed > 0 {
        info!(session_id = %session_id, removed, "cleared staged candidates");
    }

    Ok(removed)
}

/// Number of candidates currently staged for a session
pub async fn count_candidates(pool: &SqlitePool, session_id: &str) -> Result<u64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM staged_candidates WHERE session_id = ?")
            .bind(session_id)
            .fetch_one(pool)
            .await?;

    Ok(count as u64)
}

/// One summary row per distinct session, earliest first
pub async fn list_session_summaries(pool: &SqlitePool) -> Result<Vec<SessionSummary>> {
    let rows = sqlx::query(
        r#"
        SELECT session_id, COUNT(*) AS word_count, MIN(created_at) AS earliest_created_at
        FROM staged_candidates
        GROUP BY session_id
        ORDER BY earliest_created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(SessionSummary {
                session_id: row.get("session_id"),
                word_count: row.get("word_count"),
                earliest_created_at: parse_timestamp(row.get("earliest_created_at"))?,
            })
        })
        .collect()
}

fn candidate_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<StagedCandidate> {
    let is_regular: Option<i64> = row.get("is_regular");

    Ok(StagedCandidate {
        surface_form: row.get("surface_form"),
        lemma: row.get("lemma"),
        part_of_speech: row.get("pos"),
        translation: row.get("translation"),
        regularity: Regularity::from_db(is_regular),
        session_id: row.get("session_id"),
        created_at: parse_timestamp(row.get("created_at"))?,
    })
}

fn parse_timestamp(raw: String) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Failed to parse created_at: {}", e)))
}
