//! Fake data for the training catalog, agents and sessions.
//!
//! Rows are generated in parallel with rayon and written with multi-row
//! `INSERT` statements, one transaction per table. Users, roles and the
//! permission tables are never touched.

mod agents;
mod catalog;
mod models;
mod sessions;

use std::time::Instant;

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

pub use models::SeedConfig;

/// Rows per `INSERT`. Eight binds per agent keeps this well under Postgres'
/// 65535 parameter limit.
pub(crate) const BATCH_SIZE: usize = 500;

/// Seeds everything described by `config`.
pub async fn seed_all(db: &PgPool, config: &SeedConfig) -> anyhow::Result<()> {
    seed_all_at(db, config, Utc::now().date_naive()).await
}

/// Same as [`seed_all`], with sessions scheduled around `today`.
pub async fn seed_all_at(db: &PgPool, config: &SeedConfig, today: NaiveDate) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("🌊 Seeding Helmsman data...\n");

    let formations = catalog::seed_formations(db, config.formations).await?;
    let cours_ids = catalog::seed_cours(db, &formations, config.cours_per_formation).await?;
    let formateur_ids = catalog::seed_formateurs(db, config.formateurs).await?;
    catalog::seed_assignments(db, &cours_ids, &formateur_ids).await?;

    let agent_ids = agents::seed_agents(db, config.agents).await?;

    let formation_ids: Vec<uuid::Uuid> = formations.iter().map(|(id, _)| *id).collect();
    let durations: Vec<(uuid::Uuid, i32)> = sqlx::query_as(
        "SELECT id, duration_days FROM formations WHERE id = ANY($1)",
    )
    .bind(&formation_ids)
    .fetch_all(db)
    .await?;

    let seeded_sessions =
        sessions::seed_sessions(db, &durations, config.sessions_per_formation, today).await?;
    sessions::seed_enrollments(db, &seeded_sessions, &agent_ids, config, today).await?;

    println!("\n✅ Seeding complete in {:?}", start_time.elapsed());
    Ok(())
}

/// Deletes all training data. Accounts and authorization tables are kept.
pub async fn clear_all(db: &PgPool) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("🗑️  Clearing training data...");

    let mut tx = db.begin().await?;
    // children first
    for table in [
        "agent_formations",
        "training_sessions",
        "cours_formateurs",
        "cours",
        "formations",
        "formateurs",
        "agents",
    ] {
        let deleted = sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        println!("   ✓ {}: {} rows", table, deleted);
    }
    tx.commit().await?;

    println!("✅ Cleared in {:?}", start_time.elapsed());
    Ok(())
}
