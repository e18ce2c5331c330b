use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use helmsman_core::{AppError, PaginationMeta};
use helmsman_db::DbResultExt;
use helmsman_models::{
    Cours, CoursFilterParams, CoursFormateur, CreateCoursDto, PaginatedCoursResponse,
    UpdateCoursDto,
};

const COURS_COLUMNS: &str =
    "id, code, title, description, duration_hours, formation_id, created_at, updated_at";

pub struct CoursService;

impl CoursService {
    #[instrument(skip(db))]
    pub async fn get_cours_list(
        db: &PgPool,
        filters: CoursFilterParams,
    ) -> Result<PaginatedCoursResponse, AppError> {
        let search = filters
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let where_clause = r#"WHERE ($1::text IS NULL OR code ILIKE $1 OR title ILIKE $1)
                                AND ($2::uuid IS NULL OR formation_id = $2)"#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM cours {}",
            where_clause
        ))
        .bind(&search)
        .bind(filters.formation_id)
        .fetch_one(db)
        .await
        .or_db_error()?;

        let cours = sqlx::query_as::<_, Cours>(&format!(
            "SELECT {} FROM cours {} ORDER BY code LIMIT $3 OFFSET $4",
            COURS_COLUMNS, where_clause
        ))
        .bind(&search)
        .bind(filters.formation_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .or_db_error()?;

        let meta = PaginationMeta::new(total, &filters.pagination, cours.len());
        Ok(PaginatedCoursResponse { data: cours, meta })
    }

    #[instrument(skip(db))]
    pub async fn get_cours(db: &PgPool, id: Uuid) -> Result<Cours, AppError> {
        sqlx::query_as::<_, Cours>(&format!("SELECT {} FROM cours WHERE id = $1", COURS_COLUMNS))
            .bind(id)
            .fetch_optional(db)
            .await
            .or_db_error()?
            .ok_or_else(|| AppError::not_found(anyhow!("Cours not found")))
    }

    /// An unknown `formation_id` is a 404 (foreign key).
    #[instrument(skip(db))]
    pub async fn create_cours(db: &PgPool, dto: CreateCoursDto) -> Result<Cours, AppError> {
        sqlx::query_as::<_, Cours>(&format!(
            r#"INSERT INTO cours (code, title, description, duration_hours, formation_id)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {}"#,
            COURS_COLUMNS
        ))
        .bind(dto.code.trim())
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(dto.duration_hours)
        .bind(dto.formation_id)
        .fetch_one(db)
        .await
        .or_conflict("A cours with this code already exists")
    }

    #[instrument(skip(db))]
    pub async fn update_cours(
        db: &PgPool,
        id: Uuid,
        dto: UpdateCoursDto,
    ) -> Result<Cours, AppError> {
        sqlx::query_as::<_, Cours>(&format!(
            r#"UPDATE cours
               SET code = COALESCE($2, code),
                   title = COALESCE($3, title),
                   description = COALESCE($4, description),
                   duration_hours = COALESCE($5, duration_hours),
                   formation_id = COALESCE($6, formation_id),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {}"#,
            COURS_COLUMNS
        ))
        .bind(id)
        .bind(dto.code.as_deref().map(str::trim))
        .bind(dto.title.as_deref().map(str::trim))
        .bind(&dto.description)
        .bind(dto.duration_hours)
        .bind(dto.formation_id)
        .fetch_optional(db)
        .await
        .or_conflict("A cours with this code already exists")?
        .ok_or_else(|| AppError::not_found(anyhow!("Cours not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_cours(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM cours WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .or_db_error()?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Cours not found")));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_cours_formateurs(
        db: &PgPool,
        cours_id: Uuid,
    ) -> Result<Vec<CoursFormateur>, AppError> {
        Self::get_cours(db, cours_id).await?;

        sqlx::query_as::<_, CoursFormateur>(
            r#"SELECT cf.cours_id, cf.formateur_id, f.first_name, f.last_name, f.email,
                      f.specialty, cf.created_at AS assigned_at
               FROM cours_formateurs cf
               JOIN formateurs f ON f.id = cf.formateur_id
               WHERE cf.cours_id = $1
               ORDER BY f.last_name, f.first_name"#,
        )
        .bind(cours_id)
        .fetch_all(db)
        .await
        .or_db_error()
    }

    /// Unknown cours or formateur is a 404; an existing assignment is a 409.
    #[instrument(skip(db))]
    pub async fn assign_formateur(
        db: &PgPool,
        cours_id: Uuid,
        formateur_id: Uuid,
    ) -> Result<CoursFormateur, AppError> {
        let assignment = sqlx::query_as::<_, CoursFormateur>(
            r#"WITH inserted AS (
                   INSERT INTO cours_formateurs (cours_id, formateur_id)
                   VALUES ($1, $2)
                   RETURNING cours_id, formateur_id, created_at
               )
               SELECT i.cours_id, i.formateur_id, f.first_name, f.last_name, f.email,
                      f.specialty, i.created_at AS assigned_at
               FROM inserted i
               JOIN formateurs f ON f.id = i.formateur_id"#,
        )
        .bind(cours_id)
        .bind(formateur_id)
        .fetch_one(db)
        .await
        .or_conflict("Formateur is already assigned to this cours")?;

        tracing::info!(%cours_id, %formateur_id, "Formateur assigned to cours");
        Ok(assignment)
    }

    #[instrument(skip(db))]
    pub async fn unassign_formateur(
        db: &PgPool,
        cours_id: Uuid,
        formateur_id: Uuid,
    ) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM cours_formateurs WHERE cours_id = $1 AND formateur_id = $2")
                .bind(cours_id)
                .bind(formateur_id)
                .execute(db)
                .await
                .or_db_error()?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!(
                "Formateur is not assigned to this cours"
            )));
        }
        Ok(())
    }
}
