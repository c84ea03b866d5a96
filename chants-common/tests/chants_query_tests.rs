//! Tests for random chant selection
//!
//! Tests cover:
//! - Empty (type, temps) pairs yield `None`, not an error
//! - Selected chants always match the requested type and season
//! - Every matching chant can be drawn
//! - Propositions always carry one slot per role

use chants_common::db::{count_chants, init_database, random_chant, random_propositions};
use chants_common::{ChantType, Error};
use sqlx::SqlitePool;
use std::collections::HashSet;
use tempfile::TempDir;

/// Test helper: fresh database in a temp directory
async fn setup_db() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("chants.db")).await.unwrap();
    (dir, pool)
}

/// Test helper: insert one chant
async fn insert_chant(pool: &SqlitePool, nom: &str, chant_type: ChantType, temps: &str) -> i64 {
    sqlx::query(
        "INSERT INTO chants (nom, type, temps, numero_carnet, lien_partition) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(nom)
    .bind(chant_type.key())
    .bind(temps)
    .bind(100_i64)
    .bind(format!("https://partitions.example/{}", nom))
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}

#[tokio::test]
async fn test_no_match_is_none() {
    let (_dir, pool) = setup_db().await;
    insert_chant(&pool, "Peuple de Dieu", ChantType::Entree, "Ordinaire").await;

    // Wrong season
    let chant = random_chant(&pool, ChantType::Entree, "Careme").await.unwrap();
    assert!(chant.is_none());

    // Wrong type
    let chant = random_chant(&pool, ChantType::Sortie, "Ordinaire").await.unwrap();
    assert!(chant.is_none());
}

#[tokio::test]
async fn test_selection_matches_filter() {
    let (_dir, pool) = setup_db().await;
    insert_chant(&pool, "Peuple de Dieu", ChantType::Entree, "Ordinaire").await;
    insert_chant(&pool, "Venez Divin Messie", ChantType::Entree, "Avent").await;
    insert_chant(&pool, "Pain de vie", ChantType::Communion, "Ordinaire").await;

    for _ in 0..20 {
        let chant = random_chant(&pool, ChantType::Entree, "Ordinaire")
            .await
            .unwrap()
            .expect("one chant matches");
        assert_eq!(chant.chant_type, ChantType::Entree);
        assert_eq!(chant.temps, "Ordinaire");
        assert_eq!(chant.nom, "Peuple de Dieu");
        assert_eq!(chant.numero_carnet, Some(100));
    }
}

#[tokio::test]
async fn test_every_matching_chant_can_be_drawn() {
    let (_dir, pool) = setup_db().await;
    let mut expected = HashSet::new();
    for nom in ["Chant A", "Chant B", "Chant C"] {
        expected.insert(insert_chant(&pool, nom, ChantType::Offertoire, "Paques").await);
    }
    insert_chant(&pool, "Autre", ChantType::Offertoire, "Noel").await;

    let mut seen = HashSet::new();
    for _ in 0..200 {
        let chant = random_chant(&pool, ChantType::Offertoire, "Paques")
            .await
            .unwrap()
            .unwrap();
        seen.insert(chant.id);
    }

    assert_eq!(seen, expected);
}

#[tokio::test]
async fn test_count_chants() {
    let (_dir, pool) = setup_db().await;
    insert_chant(&pool, "A", ChantType::Sortie, "Noel").await;
    insert_chant(&pool, "B", ChantType::Sortie, "Noel").await;
    insert_chant(&pool, "C", ChantType::Sortie, "Avent").await;

    assert_eq!(count_chants(&pool, ChantType::Sortie, "Noel").await.unwrap(), 2);
    assert_eq!(count_chants(&pool, ChantType::Entree, "Noel").await.unwrap(), 0);
}

#[tokio::test]
async fn test_count_chants_inside_transaction() {
    let (_dir, pool) = setup_db().await;
    insert_chant(&pool, "A", ChantType::Communion, "Careme").await;

    let mut tx = pool.begin().await.unwrap();
    sqlx::query("INSERT INTO chants (nom, type, temps) VALUES ('B', 'Communion', 'Careme')")
        .execute(&mut *tx)
        .await
        .unwrap();

    // Sees the uncommitted row on its own connection
    assert_eq!(count_chants(&mut *tx, ChantType::Communion, "Careme").await.unwrap(), 2);
    tx.rollback().await.unwrap();

    assert_eq!(count_chants(&pool, ChantType::Communion, "Careme").await.unwrap(), 1);
}

#[tokio::test]
async fn test_propositions_partial_match() {
    let (_dir, pool) = setup_db().await;
    insert_chant(&pool, "Peuple de Dieu", ChantType::Entree, "Ordinaire").await;
    insert_chant(&pool, "Pain de vie", ChantType::Communion, "Ordinaire").await;

    let propositions = random_propositions(&pool, "Ordinaire").await.unwrap();

    assert_eq!(propositions.get(ChantType::Entree).unwrap().nom, "Peuple de Dieu");
    assert_eq!(propositions.get(ChantType::Communion).unwrap().nom, "Pain de vie");
    assert!(propositions.get(ChantType::Ordinaire).is_none());
    assert!(propositions.get(ChantType::Offertoire).is_none());
    assert!(propositions.get(ChantType::Sortie).is_none());
}

#[tokio::test]
async fn test_propositions_on_empty_store() {
    let (_dir, pool) = setup_db().await;

    let propositions = random_propositions(&pool, "Ordinaire").await.unwrap();

    for chant_type in ChantType::ALL {
        assert!(propositions.get(chant_type).is_none());
    }
}

#[tokio::test]
async fn test_store_failure_is_error() {
    let (_dir, pool) = setup_db().await;
    pool.close().await;

    let result = random_chant(&pool, ChantType::Entree, "Ordinaire").await;
    assert!(matches!(result, Err(Error::Database(_))));

    let result = random_propositions(&pool, "Ordinaire").await;
    assert!(matches!(result, Err(Error::Database(_))));
}
