//! Tag store operations
//!
//! Tags are created on first use and associated many-to-many with
//! vocabulary entries. Association cleanup on deletion is handled by the
//! schema's ON DELETE CASCADE, not application code.

use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};
use wortschatz_common::Result;

use crate::db::vocabulary::{self, entry_from_row, normalize};
use crate::models::{Tag, VocabularyEntry};

/// Create a tag, or return the existing id when the name is already taken.
///
/// Race-safe against concurrent creation: the unique constraint absorbs the
/// duplicate insert and the fallback lookup resolves the winner's id.
pub async fn create_tag(pool: &SqlitePool, name: &str, description: Option<&str>) -> Result<i64> {
    let mut conn = pool.acquire().await?;
    let tag_id = ensure_tag(&mut conn, name, description).await?;
    Ok(tag_id)
}

/// Get-or-create on an explicit connection, usable inside a transaction
pub(crate) async fn ensure_tag(
    conn: &mut SqliteConnection,
    name: &str,
    description: Option<&str>,
) -> Result<i64> {
    let result = sqlx::query("INSERT OR IGNORE INTO tags (name, description) VALUES (?, ?)")
        .bind(name)
        .bind(description)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() > 0 {
        info!(tag = %name, "created tag");
        return Ok(result.last_insert_rowid());
    }

    let tag_id: i64 = sqlx::query_scalar("SELECT tag_id FROM tags WHERE name = ?")
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

    Ok(tag_id)
}

/// Look up a tag id by name
pub async fn get_tag_id(pool: &SqlitePool, name: &str) -> Result<Option<i64>> {
    let tag_id: Option<i64> = sqlx::query_scalar("SELECT tag_id FROM tags WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    Ok(tag_id)
}

/// Attach a tag to a word, creating the tag on demand.
///
/// Returns false when the word does not exist. An already-present
/// association is reported distinctly but still counts as success.
pub async fn add_tag_to_word(pool: &SqlitePool, word: &str, tag_name: &str) -> Result<bool> {
    let word = normalize(word);

    if !vocabulary::word_exists(pool, &word).await? {
        warn!(word = %word, tag = %tag_name, "cannot tag unknown word");
        return Ok(false);
    }

    let mut conn = pool.acquire().await?;
    let tag_id = ensure_tag(&mut conn, tag_name, None).await?;

    let result = sqlx::query("INSERT OR IGNORE INTO word_tags (word, tag_id) VALUES (?, ?)")
        .bind(&word)
        .bind(tag_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() > 0 {
        info!(word = %word, tag = %tag_name, "tagged word");
    } else {
        debug!(word = %word, tag = %tag_name, "word already has tag");
    }

    Ok(true)
}

/// Detach a tag from a word. False when the tag or association is absent.
pub async fn remove_tag_from_word(pool: &SqlitePool, word: &str, tag_name: &str) -> Result<bool> {
    let Some(tag_id) = get_tag_id(pool, tag_name).await? else {
        debug!(tag = %tag_name, "tag does not exist");
        return Ok(false);
    };

    let result = sqlx::query("DELETE FROM word_tags WHERE word = ? AND tag_id = ?")
        .bind(normalize(word))
        .bind(tag_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// All tags on a word, alphabetical by name
pub async fn get_word_tags(pool: &SqlitePool, word: &str) -> Result<Vec<Tag>> {
    let rows = sqlx::query(
        r#"
        SELECT t.tag_id, t.name, t.description
        FROM tags t
        JOIN word_tags wt ON t.tag_id = wt.tag_id
        WHERE wt.word = ?
        ORDER BY t.name
        "#,
    )
    .bind(normalize(word))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(tag_from_row).collect())
}

/// All words carrying a tag, ordered ascending by word
pub async fn get_words_with_tag(pool: &SqlitePool, tag_name: &str) -> Result<Vec<VocabularyEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT v.word, v.pos, v.is_regular, v.translation, v.difficulty
        FROM vocabulary v
        JOIN word_tags wt ON v.word = wt.word
        JOIN tags t ON wt.tag_id = t.tag_id
        WHERE t.name = ?
        ORDER BY v.word ASC
        "#,
    )
    .bind(tag_name)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(entry_from_row).collect())
}

/// All tags, alphabetical by name
pub async fn list_all_tags(pool: &SqlitePool) -> Result<Vec<Tag>> {
    let rows = sqlx::query("SELECT tag_id, name, description FROM tags ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(tag_from_row).collect())
}

/// Delete a tag; its word associations go with it (cascade).
pub async fn delete_tag(pool: &SqlitePool, tag_name: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM tags WHERE name = ?")
        .bind(tag_name)
        .execute(pool)
        .await?;

    if result.rows_affected() > 0 {
        info!(tag = %tag_name, "deleted tag and its associations");
        Ok(true)
    } else {
        debug!(tag = %tag_name, "tag does not exist");
        Ok(false)
    }
}

fn tag_from_row(row: &sqlx::sqlite::SqliteRow) -> Tag {
    Tag {
        tag_id: row.get("tag_id"),
        name: row.get("name"),
        description: row.get("description"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::vocabulary::add_word;
    use crate::models::{Difficulty, Regularity};
    use wortschatz_common::db::init_memory_database;

    async fn seed_word(pool: &SqlitePool, word: &str) {
        let entry = VocabularyEntry {
            word: word.to_string(),
            part_of_speech: Some("NOUN".to_string()),
            regularity: Regularity::NotApplicable,
            translation: None,
            difficulty: Difficulty::Medium,
        };
        add_word(pool, &entry).await.unwrap();
    }

    #[tokio::test]
    async fn create_tag_returns_existing_id_on_duplicate() {
        let pool = init_memory_database().await.unwrap();

        let first = create_tag(&pool, "noun", Some("nouns")).await.unwrap();
        let second = create_tag(&pool, "noun", None).await.unwrap();
        assert_eq!(first, second);

        let tags = list_all_tags(&pool).await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].description.as_deref(), Some("nouns"));
    }

    #[tokio::test]
    async fn tagging_unknown_word_fails() {
        let pool = init_memory_database().await.unwrap();

        assert!(!add_tag_to_word(&pool, "geist", "noun").await.unwrap());
        // The tag must not have been created as a side effect of the failure
        assert!(get_tag_id(&pool, "noun").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_association_is_success() {
        let pool = init_memory_database().await.unwrap();
        seed_word(&pool, "haus").await;

        assert!(add_tag_to_word(&pool, "haus", "noun").await.unwrap());
        assert!(add_tag_to_word(&pool, "haus", "noun").await.unwrap());

        let tags = get_word_tags(&pool, "haus").await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "noun");
    }

    #[tokio::test]
    async fn remove_tag_from_word_reports_absence() {
        let pool = init_memory_database().await.unwrap();
        seed_word(&pool, "haus").await;
        add_tag_to_word(&pool, "haus", "noun").await.unwrap();

        assert!(remove_tag_from_word(&pool, "haus", "noun").await.unwrap());
        assert!(!remove_tag_from_word(&pool, "haus", "noun").await.unwrap());
        assert!(!remove_tag_from_word(&pool, "haus", "ghost").await.unwrap());
    }

    #[tokio::test]
    async fn delete_tag_cascades_associations() {
        let pool = init_memory_database().await.unwrap();
        seed_word(&pool, "haus").await;
        seed_word(&pool, "maus").await;
        add_tag_to_word(&pool, "haus", "noun").await.unwrap();
        add_tag_to_word(&pool, "maus", "noun").await.unwrap();

        assert!(delete_tag(&pool, "noun").await.unwrap());
        assert!(get_word_tags(&pool, "haus").await.unwrap().is_empty());
        assert!(get_word_tags(&pool, "maus").await.unwrap().is_empty());

        // Idempotent second delete
        assert!(!delete_tag(&pool, "noun").await.unwrap());
    }

    #[tokio::test]
    async fn list_all_tags_is_alphabetical() {
        let pool = init_memory_database().await.unwrap();

        for name in ["verb", "adjective", "noun"] {
            create_tag(&pool, name, None).await.unwrap();
        }

        let names: Vec<String> = list_all_tags(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["adjective", "noun", "verb"]);
    }

    #[tokio::test]
    async fn words_with_tag_ordered_by_word() {
        let pool = init_memory_database().await.unwrap();
        seed_word(&pool, "zeitung").await;
        seed_word(&pool, "apfel").await;
        add_tag_to_word(&pool, "zeitung", "common").await.unwrap();
        add_tag_to_word(&pool, "apfel", "common").await.unwrap();

        let words: Vec<String> = get_words_with_tag(&pool, "common")
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.word)
            .collect();
        assert_eq!(words, vec!["apfel", "zeitung"]);
    }
}
