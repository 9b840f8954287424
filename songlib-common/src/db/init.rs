//! Database initialization
//!
//! Opens (or creates) the catalog database, creates the schema if needed and
//! seeds configured groups. All statements are idempotent, so it is safe to
//! run on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// SQLite busy timeout applied to every connection
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Per-connection options so every pooled connection enforces foreign keys
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database with the catalog schema
///
/// The pool holds exactly one connection that never expires, since each
/// SQLite in-memory connection is its own database.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create catalog tables and indexes
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_groups_table(pool).await?;
    create_songs_table(pool).await?;
    debug!("Catalog schema ready (groups, songs)");
    Ok(())
}

async fn create_groups_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS groups (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            group_id INTEGER NOT NULL REFERENCES groups(id),
            name TEXT NOT NULL,
            release_date TEXT,
            lyrics TEXT,
            link TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_songs_group_id ON songs(group_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Insert groups that are not present yet
///
/// Blank names are skipped. Returns the number of groups actually created.
pub async fn seed_groups(pool: &SqlitePool, names: &[String]) -> Result<u64> {
    let mut created = 0;

    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        let result = sqlx::query("INSERT OR IGNORE INTO groups (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await?;
        created += result.rows_affected();
    }

    if created > 0 {
        info!("Seeded {} group(s)", created);
    }

    Ok(created)
}
