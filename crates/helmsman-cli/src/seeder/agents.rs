//! Agent seeding.

use std::time::Instant;

use chrono::{Duration, NaiveDate};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::BATCH_SIZE;
use super::models::AgentSeed;

const RANKS: &[&str] = &[
    "Matelot",
    "Quartier-maître",
    "Maître d'équipage",
    "Lieutenant",
    "Second capitaine",
    "Capitaine",
    "Officier mécanicien",
    "Chef mécanicien",
];

const DEPARTMENTS: &[&str] = &["Pont", "Machine", "Service général", "Sûreté", "Administration"];

/// Agents are born between 1965 and 2004.
fn birth_date() -> NaiveDate {
    let base = NaiveDate::from_ymd_opt(1965, 1, 1).unwrap_or_default();
    base + Duration::days((0..40 * 365).fake::<i64>())
}

/// Generates agents in parallel. `offset` shifts the matricule sequence so
/// repeated runs do not collide.
pub fn generate_agents(count: usize, offset: usize) -> Vec<AgentSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let number = offset + idx + 1;
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let email = format!(
                "{}.{}+agent{}@example.com",
                first_name.to_lowercase(),
                last_name.to_lowercase(),
                number
            );

            AgentSeed {
                matricule: format!("AG{:05}", number),
                first_name,
                last_name,
                email,
                phone: PhoneNumber().fake(),
                rank: RANKS[(0..RANKS.len()).fake::<usize>()].to_string(),
                department: DEPARTMENTS[(0..DEPARTMENTS.len()).fake::<usize>()].to_string(),
                birth_date: birth_date(),
            }
        })
        .collect()
}

pub async fn seed_agents(db: &PgPool, count: usize) -> anyhow::Result<Vec<Uuid>> {
    let start_time = Instant::now();
    println!("🧭 Seeding {} agents...", count);

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM agents")
        .fetch_one(db)
        .await?;
    let agents = generate_agents(count, existing.max(0) as usize);

    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(agents.len());
    for chunk in agents.chunks(BATCH_SIZE) {
        ids.extend(insert_agents_chunk(&mut tx, chunk).await?);
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} agents in {:?}",
        ids.len(),
        start_time.elapsed()
    );
    Ok(ids)
}

async fn insert_agents_chunk(
    tx: &mut Transaction<'_, Postgres>,
    agents: &[AgentSeed],
) -> anyhow::Result<Vec<Uuid>> {
    if agents.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO agents (matricule, first_name, last_name, email, phone, rank, department, birth_date) VALUES ",
    );
    for i in 0..agents.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 8;
        let placeholders: Vec<String> = (1..=8).map(|n| format!("${}", p + n)).collect();
        query.push('(');
        query.push_str(&placeholders.join(", "));
        query.push(')');
    }
    query.push_str(" ON CONFLICT DO NOTHING RETURNING id");

    let mut q = sqlx::query_scalar::<_, Uuid>(&query);
    for agent in agents {
        q = q
            .bind(&agent.matricule)
            .bind(&agent.first_name)
            .bind(&agent.last_name)
            .bind(&agent.email)
            .bind(&agent.phone)
            .bind(&agent.rank)
            .bind(&agent.department)
            .bind(agent.birth_date);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_matricules_continue_from_offset() {
        let agents = generate_agents(3, 40);
        let matricules: Vec<_> = agents.iter().map(|a| a.matricule.as_str()).collect();
        assert_eq!(matricules, vec!["AG00041", "AG00042", "AG00043"]);
    }

    #[test]
    fn test_agents_are_unique_and_adult() {
        let agents = generate_agents(200, 0);
        let emails: HashSet<_> = agents.iter().map(|a| a.email.clone()).collect();
        assert_eq!(emails.len(), 200);

        let earliest = NaiveDate::from_ymd_opt(1965, 1, 1).unwrap();
        let latest = NaiveDate::from_ymd_opt(2005, 1, 1).unwrap();
        assert!(
            agents
                .iter()
                .all(|a| a.birth_date >= earliest && a.birth_date < latest)
        );
    }
}
