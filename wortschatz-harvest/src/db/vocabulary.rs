//! Vocabulary store operations
//!
//! The permanent record of known words. Entries are created only through
//! the approval workflow (or direct `add_word` from interactive callers)
//! and are never deleted here.

use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::info;
use wortschatz_common::Result;

use crate::models::{Difficulty, Regularity, VocabularyEntry, WordQuery};

/// Check whether a word is already known
pub async fn word_exists(pool: &SqlitePool, word: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM vocabulary WHERE word = ?)")
        .bind(normalize(word))
        .fetch_one(pool)
        .await?;

    Ok(exists)
}

/// Insert a new word.
///
/// Idempotent: if the word already exists the call logs and returns without
/// error, since interactive re-entry of the same word is routine.
pub async fn add_word(pool: &SqlitePool, entry: &VocabularyEntry) -> Result<()> {
    let word = normalize(&entry.word);

    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO vocabulary (word, pos, is_regular, translation, difficulty)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&word)
    .bind(&entry.part_of_speech)
    .bind(entry.regularity.as_db())
    .bind(&entry.translation)
    .bind(entry.difficulty.as_i64())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        info!(word = %word, "word already in vocabulary, skipping");
    } else {
        info!(word = %word, "added word to vocabulary");
    }

    Ok(())
}

/// List vocabulary entries, optionally filtered and searched.
///
/// The difficulty filter is an exact match; the search term is a substring
/// match over word OR translation. Both compose with AND. Results are
/// always ordered ascending by word.
pub async fn get_all_words(pool: &SqlitePool, query: &WordQuery) -> Result<Vec<VocabularyEntry>> {
    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT word, pos, is_regular, translation, difficulty FROM vocabulary");

    let mut has_where = false;

    if let Some(difficulty) = query.difficulty {
        builder.push(" WHERE difficulty = ");
        builder.push_bind(difficulty.as_i64());
        has_where = true;
    }

    if let Some(term) = query.search_term.as_deref().filter(|t| !t.is_empty()) {
        builder.push(if has_where { " AND " } else { " WHERE " });
        if query.case_sensitive {
            builder.push("(instr(word, ");
            builder.push_bind(term.to_string());
            builder.push(") > 0 OR instr(COALESCE(translation, ''), ");
            builder.push_bind(term.to_string());
            builder.push(") > 0)");
        } else {
            builder.push("(instr(lower(word), lower(");
            builder.push_bind(term.to_string());
            builder.push(")) > 0 OR instr(lower(COALESCE(translation, '')), lower(");
            builder.push_bind(term.to_string());
            builder.push(")) > 0)");
        }
    }

    builder.push(" ORDER BY word ASC");

    let rows = builder.build().fetch_all(pool).await?;

    Ok(rows.iter().map(entry_from_row).collect())
}

/// Total number of vocabulary entries
pub async fn get_word_count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vocabulary")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub(crate) fn entry_from_row(row: &sqlx::sqlite::SqliteRow) -> VocabularyEntry {
    let is_regular: Option<i64> = row.get("is_regular");
    let difficulty: i64 = row.get("difficulty");

    VocabularyEntry {
        word: row.get("word"),
        part_of_speech: row.get("pos"),
        regularity: Regularity::from_db(is_regular),
        translation: row.get("translation"),
        difficulty: Difficulty::from_i64(difficulty).unwrap_or_default(),
    }
}

/// Canonical word form: trimmed and lowercased
pub(crate) fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wortschatz_common::db::init_memory_database;

    fn entry(word: &str, translation: Option<&str>, difficulty: Difficulty) -> VocabularyEntry {
        VocabularyEntry {
            word: word.to_string(),
            part_of_speech: Some("NOUN".to_string()),
            regularity: Regularity::NotApplicable,
            translation: translation.map(str::to_string),
            difficulty,
        }
    }

    #[tokio::test]
    async fn add_word_roundtrip() {
        let pool = init_memory_database().await.unwrap();

        let original = VocabularyEntry {
            word: "laufen".to_string(),
            part_of_speech: Some("VERB".to_string()),
            regularity: Regularity::Irregular,
            translation: Some("run".to_string()),
            difficulty: Difficulty::Hard,
        };
        add_word(&pool, &original).await.unwrap();

        let words = get_all_words(&pool, &WordQuery::default()).await.unwrap();
        assert_eq!(words, vec![original]);
    }

    #[tokio::test]
    async fn add_word_is_idempotent() {
        let pool = init_memory_database().await.unwrap();

        add_word(&pool, &entry("haus", Some("house"), Difficulty::Medium))
            .await
            .unwrap();
        // Second insert keeps the first entry, no error
        add_word(&pool, &entry("haus", Some("building"), Difficulty::Hard))
            .await
            .unwrap();

        let words = get_all_words(&pool, &WordQuery::default()).await.unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].translation.as_deref(), Some("house"));
        assert_eq!(get_word_count(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn word_is_case_normalized() {
        let pool = init_memory_database().await.unwrap();

        add_word(&pool, &entry("  Haus ", None, Difficulty::Medium))
            .await
            .unwrap();

        assert!(word_exists(&pool, "haus").await.unwrap());
        assert!(word_exists(&pool, "HAUS").await.unwrap());
        assert!(!word_exists(&pool, "maus").await.unwrap());
    }

    #[tokio::test]
    async fn difficulty_filter_is_exact() {
        let pool = init_memory_database().await.unwrap();

        add_word(&pool, &entry("haus", Some("house"), Difficulty::Medium))
            .await
            .unwrap();
        add_word(&pool, &entry("zeitung", Some("newspaper"), Difficulty::Hard))
            .await
            .unwrap();

        let query = WordQuery {
            difficulty: Some(Difficulty::Hard),
            ..WordQuery::default()
        };
        let words = get_all_words(&pool, &query).await.unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].word, "zeitung");
    }

    #[tokio::test]
    async fn search_matches_word_or_translation() {
        let pool = init_memory_database().await.unwrap();

        add_word(&pool, &entry("mann", Some("man"), Difficulty::Medium))
            .await
            .unwrap();
        add_word(&pool, &entry("zeitung", Some("newspaper"), Difficulty::Medium))
            .await
            .unwrap();

        let by_word = WordQuery {
            search_term: Some("mann".to_string()),
            ..WordQuery::default()
        };
        let words = get_all_words(&pool, &by_word).await.unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].word, "mann");

        let by_translation = WordQuery {
            search_term: Some("paper".to_string()),
            ..WordQuery::default()
        };
        let words = get_all_words(&pool, &by_translation).await.unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].word, "zeitung");
    }

    #[tokio::test]
    async fn search_case_sensitivity_switch() {
        let pool = init_memory_database().await.unwrap();

        add_word(&pool, &entry("zeitung", Some("Newspaper"), Difficulty::Medium))
            .await
            .unwrap();

        let insensitive = WordQuery {
            search_term: Some("newspaper".to_string()),
            ..WordQuery::default()
        };
        assert_eq!(get_all_words(&pool, &insensitive).await.unwrap().len(), 1);

        let sensitive = WordQuery {
            search_term: Some("newspaper".to_string()),
            case_sensitive: true,
            ..WordQuery::default()
        };
        assert!(get_all_words(&pool, &sensitive).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn filters_compose_with_and() {
        let pool = init_memory_database().await.unwrap();

        add_word(&pool, &entry("haus", Some("house"), Difficulty::Medium))
            .await
            .unwrap();
        add_word(&pool, &entry("hausaufgabe", Some("homework"), Difficulty::Hard))
            .await
            .unwrap();

        let query = WordQuery {
            difficulty: Some(Difficulty::Hard),
            search_term: Some("haus".to_string()),
            ..WordQuery::default()
        };
        let words = get_all_words(&pool, &query).await.unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].word, "hausaufgabe");
    }

    #[tokio::test]
    async fn listing_is_ordered_by_word() {
        let pool = init_memory_database().await.unwrap();

        for word in ["zeitung", "apfel", "mann"] {
            add_word(&pool, &entry(word, None, Difficulty::Medium))
                .await
                .unwrap();
        }

        let words = get_all_words(&pool, &WordQuery::default()).await.unwrap();
        let names: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(names, vec!["apfel", "mann", "zeitung"]);
    }
}
