//! Database initialization
//!
//! A missing database file is created with an empty `chants` table so the
//! service can start before any songs are loaded. Song records themselves
//! are maintained outside this service.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// How long a connection waits on a locked database before failing
const BUSY_TIMEOUT_MS: u64 = 5000;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_chants_table(&pool).await?;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chants")
        .fetch_one(&pool)
        .await?;
    info!("Chants available: {}", count);

    Ok(pool)
}

/// Create the chants table
///
/// `type` is restricted to the five role keys. The `(type, temps)` index
/// backs every lookup the service performs.
pub async fn create_chants_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chants (
            id INTEGER PRIMARY KEY,
            nom TEXT NOT NULL,
            type TEXT NOT NULL
                CHECK (type IN ('Entree', 'Ordinaire', 'Offertoire', 'Communion', 'Sortie')),
            temps TEXT NOT NULL,
            numero_carnet INTEGER,
            lien_partition TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_chants_type_temps ON chants(type, temps)")
        .execute(pool)
        .await?;

    Ok(())
}
