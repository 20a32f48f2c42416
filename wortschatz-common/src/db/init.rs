//! Database initialization
//!
//! Creates the database file on first run and brings the schema up
//! idempotently. Safe to call on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Initialize database connection and create tables if needed.
///
/// Pragmas are set through the connect options because they are
/// per-connection in SQLite: every pooled connection gets foreign keys
/// enforced. WAL allows a reader to overlap the single writer; the busy
/// timeout covers short lock contention between interleaved sessions.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    apply_schema(&pool).await?;

    Ok(pool)
}

/// In-memory database with the full schema, for tests.
///
/// Pinned to a single connection: each SQLite in-memory connection is its
/// own database, so a wider pool would hand out empty ones.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    apply_schema(&pool).await?;
    Ok(pool)
}

/// Create all tables and indexes (idempotent)
pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    create_vocabulary_table(pool).await?;
    create_tags_table(pool).await?;
    create_word_tags_table(pool).await?;
    create_staged_candidates_table(pool).await?;

    Ok(())
}

/// Create the vocabulary table
///
/// The permanent record of known words. `is_regular` is nullable on purpose:
/// NULL means regularity does not apply (non-verbs), 1 regular, 0 irregular.
async fn create_vocabulary_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS vocabulary (
            word TEXT PRIMARY KEY,
            pos TEXT,
            is_regular INTEGER,
            translation TEXT,
            difficulty INTEGER NOT NULL DEFAULT 3,
            CHECK (difficulty >= 0 AND difficulty <= 4),
            CHECK (is_regular IS NULL OR is_regular IN (0, 1))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_tags_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            tag_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the word_tags junction table
///
/// Many-to-many between vocabulary and tags. Deleting either side cascades
/// the association rows.
async fn create_word_tags_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS word_tags (
            word TEXT NOT NULL REFERENCES vocabulary(word) ON DELETE CASCADE,
            tag_id INTEGER NOT NULL REFERENCES tags(tag_id) ON DELETE CASCADE,
            PRIMARY KEY (word, tag_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_word_tags_tag ON word_tags(tag_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the staged_candidates table
///
/// Session-partitioned holding area for words awaiting review. One row per
/// (lemma, session); the surface form that triggered staging is recorded but
/// is not part of the key.
async fn create_staged_candidates_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS staged_candidates (
            surface_form TEXT NOT NULL,
            lemma TEXT NOT NULL,
            pos TEXT,
            translation TEXT,
            is_regular INTEGER,
            session_id TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (lemma, session_id),
            CHECK (is_regular IS NULL OR is_regular IN (0, 1))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_staged_candidates_session ON staged_candidates(session_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_staged_candidates_surface ON staged_candidates(surface_form, session_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
