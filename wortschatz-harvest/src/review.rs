//! Approval workflow
//!
//! Moves a staged candidate out of the staging store: promotion into the
//! vocabulary (with difficulty and tags) or plain rejection. Both paths
//! delete the staging row; the fact of promotion is recorded only by the
//! word's presence in the vocabulary store.
//!
//! These entry points are called from interactive review loops, so they
//! return plain booleans and never let a storage fault escape.

use sqlx::{Row, SqlitePool};
use tracing::{debug, error, info, warn};
use wortschatz_common::Result;

use crate::db::tags::ensure_tag;
use crate::db::vocabulary::normalize;
use crate::models::Difficulty;

/// Promote a staged candidate into the vocabulary store.
///
/// The whole transition — insert word, create/associate tags, delete
/// candidate — happens in one transaction; a failure partway leaves no
/// half state. When the word already exists (raced by another session or a
/// duplicate submission) the candidate is still deleted but the call
/// reports failure, so staging never accumulates orphaned duplicates.
pub async fn approve_word(
    pool: &SqlitePool,
    lemma: &str,
    session_id: &str,
    difficulty: Difficulty,
    tags: &[String],
) -> bool {
    if lemma.trim().is_empty() || session_id.trim().is_empty() {
        warn!("approve called with blank lemma or session id");
        return false;
    }

    match approve_in_tx(pool, lemma, session_id, difficulty, tags).await {
        Ok(approved) => approved,
        Err(err) => {
            error!(lemma = %lemma, session_id = %session_id, error = %err, "approval failed");
            false
        }
    }
}

async fn approve_in_tx(
    pool: &SqlitePool,
    lemma: &str,
    session_id: &str,
    difficulty: Difficulty,
    tags: &[String],
) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let candidate = sqlx::query(
        r#"
        SELECT pos, translation, is_regular
        FROM staged_candidates
        WHERE lemma = ? AND session_id = ?
        "#,
    )
    .bind(lemma)
    .bind(session_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(candidate) = candidate else {
        debug!(lemma = %lemma, session_id = %session_id, "no staged candidate to approve");
        return Ok(false);
    };

    let word = normalize(lemma);

    let already_known: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM vocabulary WHERE word = ?)")
            .bind(&word)
            .fetch_one(&mut *tx)
            .await?;

    if already_known {
        // Loser still gets cleaned up: the candidate is stale either way.
        sqlx::query("DELETE FROM staged_candidates WHERE lemma = ? AND session_id = ?")
            .bind(lemma)
            .bind(session_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        info!(word = %word, session_id = %session_id, "word already in vocabulary; candidate discarded");
        return Ok(false);
    }

    let pos: Option<String> = candidate.get("pos");
    let translation: Option<String> = candidate.get("translation");
    let is_regular: Option<i64> = candidate.get("is_regular");

    sqlx::query(
        r#"
        INSERT INTO vocabulary (word, pos, is_regular, translation, difficulty)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&word)
    .bind(&pos)
    .bind(is_regular)
    .bind(&translation)
    .bind(difficulty.as_i64())
    .execute(&mut *tx)
    .await?;

    // Duplicate tag names dedup through the association's primary key
    for tag_name in tags {
        let tag_name = tag_name.trim();
        if tag_name.is_empty() {
            continue;
        }
        let tag_id = ensure_tag(&mut *tx, tag_name, None).await?;
        sqlx::query("INSERT OR IGNORE INTO word_tags (word, tag_id) VALUES (?, ?)")
            .bind(&word)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query("DELETE FROM staged_candidates WHERE lemma = ? AND session_id = ?")
        .bind(lemma)
        .bind(session_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(
        word = %word,
        session_id = %session_id,
        difficulty = difficulty.as_i64(),
        "approved word into vocabulary"
    );

    Ok(true)
}

/// Discard a staged candidate without touching the vocabulary store.
pub async fn reject_word(pool: &SqlitePool, lemma: &str, session_id: &str) -> bool {
    if lemma.trim().is_empty() || session_id.trim().is_empty() {
        warn!("reject called with blank lemma or session id");
        return false;
    }

    match crate::db::staging::remove_candidate(pool, lemma, session_id).await {
        Ok(removed) => {
            if removed {
                info!(lemma = %lemma, session_id = %session_id, "rejected staged candidate");
            } else {
                debug!(lemma = %lemma, session_id = %session_id, "no staged candidate to reject");
            }
            removed
        }
        Err(err) => {
            error!(lemma = %lemma, session_id = %session_id, error = %err, "rejection failed");
            false
        }
    }
}
