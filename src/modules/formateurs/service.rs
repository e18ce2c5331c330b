use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use helmsman_core::{AppError, PaginationMeta};
use helmsman_db::DbResultExt;
use helmsman_models::{
    Cours, CreateFormateurDto, Formateur, FormateurFilterParams, PaginatedFormateursResponse,
    UpdateFormateurDto,
};

const FORMATEUR_COLUMNS: &str =
    "id, first_name, last_name, email, phone, specialty, created_at, updated_at";

const DUPLICATE_FORMATEUR: &str = "A formateur with this email already exists";

pub struct FormateurService;

impl FormateurService {
    #[instrument(skip(db))]
    pub async fn get_formateurs(
        db: &PgPool,
        filters: FormateurFilterParams,
    ) -> Result<PaginatedFormateursResponse, AppError> {
        let search = filters
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let where_clause = r#"WHERE $1::text IS NULL
                                 OR first_name ILIKE $1
                                 OR last_name ILIKE $1
                                 OR email ILIKE $1
                                 OR specialty ILIKE $1"#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM formateurs {}",
            where_clause
        ))
        .bind(&search)
        .fetch_one(db)
        .await
        .or_db_error()?;

        let formateurs = sqlx::query_as::<_, Formateur>(&format!(
            "SELECT {} FROM formateurs {} ORDER BY last_name, first_name, id LIMIT $2 OFFSET $3",
            FORMATEUR_COLUMNS, where_clause
        ))
        .bind(&search)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .or_db_error()?;

        let meta = PaginationMeta::new(total, &filters.pagination, formateurs.len());
        Ok(PaginatedFormateursResponse {
            data: formateurs,
            meta,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_formateur(db: &PgPool, id: Uuid) -> Result<Formateur, AppError> {
        sqlx::query_as::<_, Formateur>(&format!(
            "SELECT {} FROM formateurs WHERE id = $1",
            FORMATEUR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .or_db_error()?
        .ok_or_else(|| AppError::not_found(anyhow!("Formateur not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn create_formateur(
        db: &PgPool,
        dto: CreateFormateurDto,
    ) -> Result<Formateur, AppError> {
        sqlx::query_as::<_, Formateur>(&format!(
            r#"INSERT INTO formateurs (first_name, last_name, email, phone, specialty)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {}"#,
            FORMATEUR_COLUMNS
        ))
        .bind(dto.first_name.trim())
        .bind(dto.last_name.trim())
        .bind(dto.email.trim().to_lowercase())
        .bind(&dto.phone)
        .bind(&dto.specialty)
        .fetch_one(db)
        .await
        .or_conflict(DUPLICATE_FORMATEUR)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_formateur(
        db: &PgPool,
        id: Uuid,
        dto: UpdateFormateurDto,
    ) -> Result<Formateur, AppError> {
        sqlx::query_as::<_, Formateur>(&format!(
            r#"UPDATE formateurs
               SET first_name = COALESCE($2, first_name),
                   last_name = COALESCE($3, last_name),
                   email = COALESCE($4, email),
                   phone = COALESCE($5, phone),
                   specialty = COALESCE($6, specialty),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {}"#,
            FORMATEUR_COLUMNS
        ))
        .bind(id)
        .bind(dto.first_name.as_deref().map(str::trim))
        .bind(dto.last_name.as_deref().map(str::trim))
        .bind(dto.email.as_deref().map(|e| e.trim().to_lowercase()))
        .bind(&dto.phone)
        .bind(&dto.specialty)
        .fetch_optional(db)
        .await
        .or_conflict(DUPLICATE_FORMATEUR)?
        .ok_or_else(|| AppError::not_found(anyhow!("Formateur not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_formateur(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM formateurs WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .or_db_error()?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Formateur not found")));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_formateur_cours(db: &PgPool, id: Uuid) -> Result<Vec<Cours>, AppError> {
        Self::get_formateur(db, id).await?;

        sqlx::query_as::<_, Cours>(
            r#"SELECT c.id, c.code, c.title, c.description, c.duration_hours, c.formation_id,
                      c.created_at, c.updated_at
               FROM cours c
               JOIN cours_formateurs cf ON cf.cours_id = c.id
               WHERE cf.formateur_id = $1
               ORDER BY c.code"#,
        )
        .bind(id)
        .fetch_all(db)
        .await
        .or_db_error()
    }
}
