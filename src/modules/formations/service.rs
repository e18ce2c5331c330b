use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use helmsman_core::{AppError, PaginationMeta};
use helmsman_db::DbResultExt;
use helmsman_models::{
    CreateFormationDto, Formation, FormationFilterParams, PaginatedFormationsResponse,
    UpdateFormationDto,
};

const FORMATION_COLUMNS: &str =
    "id, code, title, description, duration_days, category, created_at, updated_at";

pub struct FormationService;

impl FormationService {
    #[instrument(skip(db))]
    pub async fn get_formations(
        db: &PgPool,
        filters: FormationFilterParams,
    ) -> Result<PaginatedFormationsResponse, AppError> {
        let search = filters
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let where_clause = r#"WHERE ($1::text IS NULL OR code ILIKE $1 OR title ILIKE $1)
                                AND ($2::text IS NULL OR category = $2)"#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM formations {}",
            where_clause
        ))
        .bind(&search)
        .bind(&filters.category)
        .fetch_one(db)
        .await
        .or_db_error()?;

        let formations = sqlx::query_as::<_, Formation>(&format!(
            "SELECT {} FROM formations {} ORDER BY code LIMIT $3 OFFSET $4",
            FORMATION_COLUMNS, where_clause
        ))
        .bind(&search)
        .bind(&filters.category)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .or_db_error()?;

        let meta = PaginationMeta::new(total, &filters.pagination, formations.len());
        Ok(PaginatedFormationsResponse {
            data: formations,
            meta,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_formation(db: &PgPool, id: Uuid) -> Result<Formation, AppError> {
        sqlx::query_as::<_, Formation>(&format!(
            "SELECT {} FROM formations WHERE id = $1",
            FORMATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .or_db_error()?
        .ok_or_else(|| AppError::not_found(anyhow!("Formation not found")))
    }

    #[instrument(skip(db))]
    pub async fn create_formation(
        db: &PgPool,
        dto: CreateFormationDto,
    ) -> Result<Formation, AppError> {
        let formation = sqlx::query_as::<_, Formation>(&format!(
            r#"INSERT INTO formations (code, title, description, duration_days, category)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {}"#,
            FORMATION_COLUMNS
        ))
        .bind(dto.code.trim())
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(dto.duration_days)
        .bind(&dto.category)
        .fetch_one(db)
        .await
        .or_conflict("A formation with this code already exists")?;

        tracing::info!(formation_id = %formation.id, code = %formation.code, "Formation created");
        Ok(formation)
    }

    #[instrument(skip(db))]
    pub async fn update_formation(
        db: &PgPool,
        id: Uuid,
        dto: UpdateFormationDto,
    ) -> Result<Formation, AppError> {
        sqlx::query_as::<_, Formation>(&format!(
            r#"UPDATE formations
               SET code = COALESCE($2, code),
                   title = COALESCE($3, title),
                   description = COALESCE($4, description),
                   duration_days = COALESCE($5, duration_days),
                   category = COALESCE($6, category),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {}"#,
            FORMATION_COLUMNS
        ))
        .bind(id)
        .bind(dto.code.as_deref().map(str::trim))
        .bind(dto.title.as_deref().map(str::trim))
        .bind(&dto.description)
        .bind(dto.duration_days)
        .bind(&dto.category)
        .fetch_optional(db)
        .await
        .or_conflict("A formation with this code already exists")?
        .ok_or_else(|| AppError::not_found(anyhow!("Formation not found")))
    }

    /// Sessions and their enrollments go with the formation; cours are detached.
    #[instrument(skip(db))]
    pub async fn delete_formation(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM formations WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .or_db_error()?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Formation not found")));
        }

        tracing::info!(formation_id = %id, "Formation deleted");
        Ok(())
    }
}
