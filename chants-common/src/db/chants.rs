//! Random chant selection
//!
//! A chant is drawn by counting the rows matching (type, temps), picking a
//! uniform offset in that range and fetching the row at that offset. Both
//! statements run in one read transaction so they see the same snapshot.
//!
//! "No matching chant" is `Ok(None)`. Only store failures are errors.

use crate::db::models::{Chant, ChantType, Propositions};
use crate::Result;
use futures::future::try_join_all;
use rand::Rng;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::{debug, warn};

/// Number of chants available for one role in one season
///
/// Takes any executor so it can run on the pool or inside a transaction.
pub async fn count_chants<'e, E>(executor: E, chant_type: ChantType, temps: &str) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chants WHERE type = ? AND temps = ?")
        .bind(chant_type.key())
        .bind(temps)
        .fetch_one(executor)
        .await?;

    Ok(count)
}

/// Pick one chant uniformly at random for a role and season
pub async fn random_chant(
    pool: &SqlitePool,
    chant_type: ChantType,
    temps: &str,
) -> Result<Option<Chant>> {
    let mut tx = pool.begin().await?;

    let count = count_chants(&mut *tx, chant_type, temps).await?;

    // ThreadRng is !Send, keep it out of any await
    let offset = {
        let mut rng = rand::thread_rng();
        pick_offset(count, &mut rng)
    };

    let chant = match offset {
        Some(offset) => {
            sqlx::query_as::<_, Chant>(
                "SELECT id, nom, type, temps, numero_carnet, lien_partition
                 FROM chants
                 WHERE type = ? AND temps = ?
                 ORDER BY id
                 LIMIT 1 OFFSET ?",
            )
            .bind(chant_type.key())
            .bind(temps)
            .bind(offset)
            .fetch_optional(&mut *tx)
            .await?
        }
        None => None,
    };

    tx.commit().await?;

    match &chant {
        Some(c) => debug!(
            "Picked chant {} '{}' for {} / {} (1 of {})",
            c.id, c.nom, chant_type, temps, count
        ),
        None => warn!("No chant found for {} / {}", chant_type, temps),
    }

    Ok(chant)
}

/// Pick one chant for every role, running the five lookups concurrently
///
/// An empty role leaves its slot `None` without affecting the others.
/// Any store error fails the whole set.
pub async fn random_propositions(pool: &SqlitePool, temps: &str) -> Result<Propositions> {
    let lookups = ChantType::ALL
        .into_iter()
        .map(move |chant_type| async move {
            random_chant(pool, chant_type, temps)
                .await
                .map(|chant| (chant_type, chant))
        });

    let slots = try_join_all(lookups).await?;

    Ok(slots.into_iter().collect())
}

/// Uniform row offset in `0..count`, or `None` when there are no rows
pub fn pick_offset<R: Rng + ?Sized>(count: i64, rng: &mut R) -> Option<i64> {
    if count <= 0 {
        return None;
    }
    Some(rng.gen_range(0..count))
}
