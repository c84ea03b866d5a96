//! Unit tests for database initialization
//!
//! Tests cover:
//! - Automatic database creation with the chants schema
//! - Reopening an existing database
//! - Idempotent initialization
//! - Role constraint on the `type` column

use chants_common::db::init::init_database;
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("chants.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_chants_table_created_empty() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("chants.db")).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chants")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);

    let index: Option<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'index' AND name = 'idx_chants_type_temps'",
    )
    .fetch_optional(&pool)
    .await
    .unwrap();
    assert!(index.is_some(), "Lookup index not created");
}

#[tokio::test]
async fn test_idempotent_initialization_keeps_rows() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("chants.db");

    let pool1 = init_database(&db_path).await.unwrap();
    sqlx::query("INSERT INTO chants (nom, type, temps) VALUES ('Venez Divin Messie', 'Entree', 'Avent')")
        .execute(&pool1)
        .await
        .unwrap();
    pool1.close().await;

    // Open database second time (should succeed and keep data)
    let pool2 = init_database(&db_path).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chants")
        .fetch_one(&pool2)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_type_column_rejects_unknown_role() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("chants.db")).await.unwrap();

    let result = sqlx::query("INSERT INTO chants (nom, type, temps) VALUES ('Kyrie', 'Kyrie', 'Ordinaire')")
        .execute(&pool)
        .await;

    assert!(result.is_err(), "CHECK constraint should reject unknown type");
}
