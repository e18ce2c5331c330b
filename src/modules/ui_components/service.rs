use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use helmsman_core::AppError;
use helmsman_db::DbResultExt;
use helmsman_models::{
    CreateUiComponentDto, UiComponent, UiComponentFilterParams, UpdateUiComponentDto,
};

const COMPONENT_COLUMNS: &str =
    "id, name, display_name, category, description, icon, created_at, updated_at";

pub struct UiComponentService;

impl UiComponentService {
    #[instrument(skip(db))]
    pub async fn get_components(
        db: &PgPool,
        filters: UiComponentFilterParams,
    ) -> Result<Vec<UiComponent>, AppError> {
        sqlx::query_as::<_, UiComponent>(&format!(
            r#"SELECT {} FROM ui_components
               WHERE ($1::text IS NULL OR category = $1)
               ORDER BY category, name"#,
            COMPONENT_COLUMNS
        ))
        .bind(&filters.category)
        .fetch_all(db)
        .await
        .or_db_error()
    }

    #[instrument(skip(db))]
    pub async fn get_component(db: &PgPool, id: Uuid) -> Result<UiComponent, AppError> {
        sqlx::query_as::<_, UiComponent>(&format!(
            "SELECT {} FROM ui_components WHERE id = $1",
            COMPONENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .or_db_error()?
        .ok_or_else(|| AppError::not_found(anyhow!("UI component not found")))
    }

    #[instrument(skip(db))]
    pub async fn create_component(
        db: &PgPool,
        dto: CreateUiComponentDto,
    ) -> Result<UiComponent, AppError> {
        sqlx::query_as::<_, UiComponent>(&format!(
            r#"INSERT INTO ui_components (name, display_name, category, description, icon)
               VALUES ($1, $2, COALESCE($3, 'general'), $4, $5)
               RETURNING {}"#,
            COMPONENT_COLUMNS
        ))
        .bind(&dto.name)
        .bind(dto.display_name.trim())
        .bind(&dto.category)
        .bind(&dto.description)
        .bind(&dto.icon)
        .fetch_one(db)
        .await
        .or_conflict(&format!("UI component '{}' already exists", dto.name))
    }

    #[instrument(skip(db))]
    pub async fn update_component(
        db: &PgPool,
        id: Uuid,
        dto: UpdateUiComponentDto,
    ) -> Result<UiComponent, AppError> {
        sqlx::query_as::<_, UiComponent>(&format!(
            r#"UPDATE ui_components
               SET display_name = COALESCE($2, display_name),
                   category = COALESCE($3, category),
                   description = COALESCE($4, description),
                   icon = COALESCE($5, icon),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {}"#,
            COMPONENT_COLUMNS
        ))
        .bind(id)
        .bind(dto.display_name.as_deref().map(str::trim))
        .bind(&dto.category)
        .bind(&dto.description)
        .bind(&dto.icon)
        .fetch_optional(db)
        .await
        .or_db_error()?
        .ok_or_else(|| AppError::not_found(anyhow!("UI component not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_component(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM ui_components WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .or_db_error()?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("UI component not found")));
        }
        Ok(())
    }
}
