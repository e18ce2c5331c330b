//! Formations, their cours, and the formateurs who teach them.

use std::time::Instant;

use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::BATCH_SIZE;
use super::models::{CoursSeed, FormateurSeed, FormationSeed};

const PROGRAMS: &[(&str, &str)] = &[
    ("Sécurité de base", "securite"),
    ("Lutte contre l'incendie avancée", "securite"),
    ("Premiers secours en mer", "medical"),
    ("Survie en mer", "securite"),
    ("Sûreté du navire", "surete"),
    ("Navigation radar ARPA", "navigation"),
    ("ECDIS", "navigation"),
    ("Gestion des ressources passerelle", "navigation"),
    ("Radiocommunications GMDSS", "communication"),
    ("Manutention des marchandises dangereuses", "cargaison"),
    ("Conduite des machines", "machine"),
    ("Embarcations de sauvetage", "securite"),
];

const MODULES: &[&str] = &[
    "Réglementation",
    "Théorie",
    "Exercices pratiques",
    "Simulateur",
    "Évaluation",
    "Études de cas",
];

const SPECIALTIES: &[&str] = &[
    "Navigation",
    "Machine",
    "Sécurité",
    "Médical",
    "Radiocommunications",
    "Cargaison",
];

fn pick<'a>(items: &[&'a str]) -> &'a str {
    items[(0..items.len()).fake::<usize>()]
}

pub fn generate_formations(count: usize) -> Vec<FormationSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let (title, category) = PROGRAMS[idx % PROGRAMS.len()];
            let cycle = idx / PROGRAMS.len();
            let title = if cycle == 0 {
                title.to_string()
            } else {
                format!("{} ({})", title, cycle + 1)
            };

            FormationSeed {
                code: format!("FRM-{:03}", idx + 1),
                description: format!("Programme « {} »", title),
                title,
                duration_days: (1..11).fake::<i32>(),
                category: category.to_string(),
            }
        })
        .collect()
}

pub fn generate_cours(formations: &[(Uuid, String)], per_formation: usize) -> Vec<CoursSeed> {
    formations
        .par_iter()
        .enumerate()
        .flat_map(|(formation_idx, (formation_id, formation_title))| {
            (0..per_formation)
                .map(|module_idx| CoursSeed {
                    code: format!("CRS-{:03}-{:02}", formation_idx + 1, module_idx + 1),
                    title: format!(
                        "{} : {}",
                        formation_title,
                        MODULES[module_idx % MODULES.len()]
                    ),
                    duration_hours: (2..25).fake::<i32>(),
                    formation_id: *formation_id,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn generate_formateurs(count: usize) -> Vec<FormateurSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            // The index keeps emails unique across runs of the same batch.
            let email = format!(
                "{}.{}+formateur{}@example.com",
                first_name.to_lowercase(),
                last_name.to_lowercase(),
                idx
            );

            FormateurSeed {
                first_name,
                last_name,
                email,
                phone: PhoneNumber().fake(),
                specialty: pick(SPECIALTIES).to_string(),
            }
        })
        .collect()
}

/// Inserts formations and returns `(id, title)` in insert order.
pub async fn seed_formations(db: &PgPool, count: usize) -> anyhow::Result<Vec<(Uuid, String)>> {
    let start_time = Instant::now();
    println!("📘 Seeding {} formations...", count);

    let formations = generate_formations(count);
    let mut tx = db.begin().await?;
    let mut rows = Vec::with_capacity(formations.len());
    for chunk in formations.chunks(BATCH_SIZE) {
        rows.extend(insert_formations_chunk(&mut tx, chunk).await?);
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} formations in {:?}",
        rows.len(),
        start_time.elapsed()
    );
    Ok(rows)
}

async fn insert_formations_chunk(
    tx: &mut Transaction<'_, Postgres>,
    formations: &[FormationSeed],
) -> anyhow::Result<Vec<(Uuid, String)>> {
    if formations.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO formations (code, title, description, duration_days, category) VALUES ",
    );
    for i in 0..formations.len() {
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
    query.push_str(" RETURNING id, title");

    let mut q = sqlx::query_as::<_, (Uuid, String)>(&query);
    for formation in formations {
        q = q
            .bind(&formation.code)
            .bind(&formation.title)
            .bind(&formation.description)
            .bind(formation.duration_days)
            .bind(&formation.category);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

pub async fn seed_cours(
    db: &PgPool,
    formations: &[(Uuid, String)],
    per_formation: usize,
) -> anyhow::Result<Vec<Uuid>> {
    let start_time = Instant::now();
    println!(
        "📗 Seeding {} cours ({} per formation)...",
        formations.len() * per_formation,
        per_formation
    );

    let cours = generate_cours(formations, per_formation);
    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(cours.len());
    for chunk in cours.chunks(BATCH_SIZE) {
        ids.extend(insert_cours_chunk(&mut tx, chunk).await?);
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} cours in {:?}",
        ids.len(),
        start_time.elapsed()
    );
    Ok(ids)
}

async fn insert_cours_chunk(
    tx: &mut Transaction<'_, Postgres>,
    cours: &[CoursSeed],
) -> anyhow::Result<Vec<Uuid>> {
    if cours.is_empty() {
        return Ok(Vec::new());
    }

    let mut query =
        String::from("INSERT INTO cours (code, title, duration_hours, formation_id) VALUES ");
    for i in 0..cours.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 4;
        query.push_str(&format!("(${}, ${}, ${}, ${})", p + 1, p + 2, p + 3, p + 4));
    }
    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar::<_, Uuid>(&query);
    for c in cours {
        q = q
            .bind(&c.code)
            .bind(&c.title)
            .bind(c.duration_hours)
            .bind(c.formation_id);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

pub async fn seed_formateurs(db: &PgPool, count: usize) -> anyhow::Result<Vec<Uuid>> {
    let start_time = Instant::now();
    println!("🧑‍🏫 Seeding {} formateurs...", count);

    let formateurs = generate_formateurs(count);
    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(formateurs.len());
    for chunk in formateurs.chunks(BATCH_SIZE) {
        ids.extend(insert_formateurs_chunk(&mut tx, chunk).await?);
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} formateurs in {:?}",
        ids.len(),
        start_time.elapsed()
    );
    Ok(ids)
}

async fn insert_formateurs_chunk(
    tx: &mut Transaction<'_, Postgres>,
    formateurs: &[FormateurSeed],
) -> anyhow::Result<Vec<Uuid>> {
    if formateurs.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO formateurs (first_name, last_name, email, phone, specialty) VALUES ",
    );
    for i in 0..formateurs.len() {
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
    query.push_str(" ON CONFLICT (email) DO NOTHING RETURNING id");

    let mut q = sqlx::query_scalar::<_, Uuid>(&query);
    for f in formateurs {
        q = q
            .bind(&f.first_name)
            .bind(&f.last_name)
            .bind(&f.email)
            .bind(&f.phone)
            .bind(&f.specialty);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

/// Pairs every cours with one or two formateurs.
pub fn generate_assignments(cours_ids: &[Uuid], formateur_ids: &[Uuid]) -> Vec<(Uuid, Uuid)> {
    if formateur_ids.is_empty() {
        return Vec::new();
    }

    cours_ids
        .par_iter()
        .flat_map(|cours_id| {
            let first = (0..formateur_ids.len()).fake::<usize>();
            let mut pairs = vec![(*cours_id, formateur_ids[first])];
            if formateur_ids.len() > 1 && (0..2).fake::<u8>() == 1 {
                let second = (first + 1) % formateur_ids.len();
                pairs.push((*cours_id, formateur_ids[second]));
            }
            pairs
        })
        .collect()
}

pub async fn seed_assignments(
    db: &PgPool,
    cours_ids: &[Uuid],
    formateur_ids: &[Uuid],
) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🔗 Assigning formateurs to cours...");

    let pairs = generate_assignments(cours_ids, formateur_ids);
    let mut tx = db.begin().await?;
    let mut inserted = 0;
    for chunk in pairs.chunks(BATCH_SIZE) {
        let mut query = String::from("INSERT INTO cours_formateurs (cours_id, formateur_id) VALUES ");
        for i in 0..chunk.len() {
            if i > 0 {
                query.push_str(", ");
            }
            query.push_str(&format!("(${}, ${})", i * 2 + 1, i * 2 + 2));
        }
        query.push_str(" ON CONFLICT DO NOTHING");

        let mut q = sqlx::query(&query);
        for (cours_id, formateur_id) in chunk {
            q = q.bind(cours_id).bind(formateur_id);
        }
        inserted += q.execute(&mut *tx).await?.rows_affected();
    }
    tx.commit().await?;

    println!(
        "   ✓ Created {} assignments in {:?}",
        inserted,
        start_time.elapsed()
    );
    Ok(inserted)
}
