//! Training sessions and the agents enrolled in them.

use std::time::Instant;

use chrono::{Duration, NaiveDate};
use fake::Fake;
use helmsman_models::enrollments::EnrollmentResult;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::BATCH_SIZE;
use super::models::{EnrollmentSeed, SeedConfig, SeededSession, SessionSeed};

const LOCATIONS: &[&str] = &[
    "Salle A - Bâtiment principal",
    "Salle B - Bâtiment principal",
    "Simulateur passerelle",
    "Bassin de survie",
    "Aire d'entraînement incendie",
    "Atelier machine",
];

/// Schedules sessions for each formation within ±`spread_days` of `today`.
pub fn generate_sessions(
    formations: &[(Uuid, i32)],
    per_formation: usize,
    today: NaiveDate,
    spread_days: i64,
) -> Vec<SessionSeed> {
    formations
        .par_iter()
        .flat_map(|&(formation_id, duration_days)| {
            (0..per_formation)
                .map(|_| {
                    let start_date = today + Duration::days((-spread_days..=spread_days).fake::<i64>());
                    let end_date = start_date + Duration::days((duration_days.max(1) - 1) as i64);

                    SessionSeed {
                        formation_id,
                        start_date,
                        end_date,
                        capacity: (8..=24).fake::<i32>(),
                        location: LOCATIONS[(0..LOCATIONS.len()).fake::<usize>()].to_string(),
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

fn finished_result() -> (EnrollmentResult, Option<f64>) {
    match (0..10).fake::<u8>() {
        0 => (EnrollmentResult::Absent, None),
        1 | 2 => (
            EnrollmentResult::Failed,
            Some((20..50).fake::<i32>() as f64),
        ),
        _ => (
            EnrollmentResult::Passed,
            Some((50..=100).fake::<i32>() as f64),
        ),
    }
}

/// Fills each session up to its share of seats.
///
/// Agents for a session are a contiguous run starting at a random index, so
/// nobody is enrolled twice in the same session. Sessions that ended before
/// `today` get an outcome; the others stay pending.
pub fn generate_enrollments(
    sessions: &[SeededSession],
    agent_ids: &[Uuid],
    config: &SeedConfig,
    today: NaiveDate,
) -> Vec<EnrollmentSeed> {
    if agent_ids.is_empty() {
        return Vec::new();
    }

    sessions
        .par_iter()
        .flat_map(|session| {
            let seats = config.seats_to_fill(session.capacity).min(agent_ids.len());
            let start = (0..agent_ids.len()).fake::<usize>();

            (0..seats)
                .map(|n| {
                    let (result, score) = if session.end_date < today {
                        finished_result()
                    } else {
                        (EnrollmentResult::Pending, None)
                    };

                    EnrollmentSeed {
                        agent_id: agent_ids[(start + n) % agent_ids.len()],
                        formation_id: session.formation_id,
                        session_id: session.id,
                        result,
                        score,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_sessions(
    db: &PgPool,
    formations: &[(Uuid, i32)],
    per_formation: usize,
    today: NaiveDate,
) -> anyhow::Result<Vec<SeededSession>> {
    let start_time = Instant::now();
    println!(
        "📅 Seeding {} sessions ({} per formation)...",
        formations.len() * per_formation,
        per_formation
    );

    let sessions = generate_sessions(formations, per_formation, today, 120);
    let mut tx = db.begin().await?;
    let mut seeded = Vec::with_capacity(sessions.len());
    for chunk in sessions.chunks(BATCH_SIZE) {
        seeded.extend(insert_sessions_chunk(&mut tx, chunk).await?);
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} sessions in {:?}",
        seeded.len(),
        start_time.elapsed()
    );
    Ok(seeded)
}

async fn insert_sessions_chunk(
    tx: &mut Transaction<'_, Postgres>,
    sessions: &[SessionSeed],
) -> anyhow::Result<Vec<SeededSession>> {
    if sessions.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO training_sessions (formation_id, start_date, end_date, capacity, location) VALUES ",
    );
    for i in 0..sessions.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 5;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5
        ));
    }
    query.push_str(" RETURNING id, formation_id, end_date, capacity");

    let mut q = sqlx::query_as::<_, (Uuid, Uuid, NaiveDate, i32)>(&query);
    for s in sessions {
        q = q
            .bind(s.formation_id)
            .bind(s.start_date)
            .bind(s.end_date)
            .bind(s.capacity)
            .bind(&s.location);
    }

    let rows = q.fetch_all(&mut **tx).await?;
    Ok(rows
        .into_iter()
        .map(|(id, formation_id, end_date, capacity)| SeededSession {
            id,
            formation_id,
            end_date,
            capacity,
        })
        .collect())
}

pub async fn seed_enrollments(
    db: &PgPool,
    sessions: &[SeededSession],
    agent_ids: &[Uuid],
    config: &SeedConfig,
    today: NaiveDate,
) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!(
        "📝 Enrolling agents ({}% of each session's seats)...",
        config.fill_percent
    );

    let enrollments = generate_enrollments(sessions, agent_ids, config, today);
    let mut tx = db.begin().await?;
    let mut inserted = 0;
    for chunk in enrollments.chunks(BATCH_SIZE) {
        inserted += insert_enrollments_chunk(&mut tx, chunk).await?;
    }
    tx.commit().await?;

    println!(
        "   ✓ Created {} enrollments in {:?}",
        inserted,
        start_time.elapsed()
    );
    Ok(inserted)
}

async fn insert_enrollments_chunk(
    tx: &mut Transaction<'_, Postgres>,
    enrollments: &[EnrollmentSeed],
) -> anyhow::Result<u64> {
    if enrollments.is_empty() {
        return Ok(0);
    }

    let mut query = String::from(
        "INSERT INTO agent_formations (agent_id, formation_id, session_id, result, score) VALUES ",
    );
    for i in 0..enrollments.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 5;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5
        ));
    }
    query.push_str(" ON CONFLICT (agent_id, session_id) DO NOTHING");

    let mut q = sqlx::query(&query);
    for e in enrollments {
        q = q
            .bind(e.agent_id)
            .bind(e.formation_id)
            .bind(e.session_id)
            .bind(e.result)
            .bind(e.score);
    }

    Ok(q.execute(&mut **tx).await?.rows_affected())
}
