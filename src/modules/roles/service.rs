use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use helmsman_core::AppError;
use helmsman_core::permissions::roles;
use helmsman_db::DbResultExt;
use helmsman_models::{CreateRoleDto, Role, RoleDeletedResponse, RoleWithUserCount, UpdateRoleDto};

const ROLE_COLUMNS: &str =
    "id, name, display_name, description, color, is_system, created_at, updated_at";

#[instrument(skip(db))]
pub async fn get_roles(db: &PgPool) -> Result<Vec<RoleWithUserCount>, AppError> {
    sqlx::query_as::<_, RoleWithUserCount>(
        r#"SELECT r.id, r.name, r.display_name, r.description, r.color, r.is_system,
                  r.created_at, r.updated_at,
                  COUNT(u.id) AS user_count
           FROM roles r
           LEFT JOIN users u ON u.role = r.name
           GROUP BY r.id
           ORDER BY r.is_system DESC, r.name"#,
    )
    .fetch_all(db)
    .await
    .or_db_error()
}

#[instrument(skip(db))]
pub async fn find_role_by_name(db: &PgPool, name: &str) -> Result<Option<Role>, AppError> {
    sqlx::query_as::<_, Role>(&format!("SELECT {} FROM roles WHERE name = $1", ROLE_COLUMNS))
        .bind(name)
        .fetch_optional(db)
        .await
        .or_db_error()
}

#[instrument(skip(db))]
pub async fn get_role(db: &PgPool, name: &str) -> Result<Role, AppError> {
    find_role_by_name(db, name)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Role '{}' not found", name)))
}

#[instrument(skip(db))]
pub async fn create_role(db: &PgPool, dto: CreateRoleDto) -> Result<Role, AppError> {
    let role = sqlx::query_as::<_, Role>(&format!(
        r#"INSERT INTO roles (name, display_name, description, color)
           VALUES ($1, $2, $3, $4)
           RETURNING {}"#,
        ROLE_COLUMNS
    ))
    .bind(&dto.name)
    .bind(dto.display_name.trim())
    .bind(&dto.description)
    .bind(&dto.color)
    .fetch_one(db)
    .await
    .or_conflict(&format!("Role '{}' already exists", dto.name))?;

    tracing::info!(role = %role.name, "Role created");
    Ok(role)
}

#[instrument(skip(db))]
pub async fn update_role(db: &PgPool, name: &str, dto: UpdateRoleDto) -> Result<Role, AppError> {
    sqlx::query_as::<_, Role>(&format!(
        r#"UPDATE roles
           SET display_name = COALESCE($2, display_name),
               description = COALESCE($3, description),
               color = COALESCE($4, color),
               updated_at = NOW()
           WHERE name = $1
           RETURNING {}"#,
        ROLE_COLUMNS
    ))
    .bind(name)
    .bind(dto.display_name.as_deref().map(str::trim))
    .bind(&dto.description)
    .bind(&dto.color)
    .fetch_optional(db)
    .await
    .or_db_error()?
    .ok_or_else(|| AppError::not_found(anyhow!("Role '{}' not found", name)))
}

/// Moves the role's users to the default role, then deletes it. One transaction:
/// either both happen or neither does. Permission rows go with the role (cascade).
#[instrument(skip(db))]
pub async fn delete_role(db: &PgPool, name: &str) -> Result<RoleDeletedResponse, AppError> {
    let mut tx = db.begin().await.or_db_error()?;

    let role = sqlx::query_as::<_, Role>(&format!(
        "SELECT {} FROM roles WHERE name = $1 FOR UPDATE",
        ROLE_COLUMNS
    ))
    .bind(name)
    .fetch_optional(&mut *tx)
    .await
    .or_db_error()?
    .ok_or_else(|| AppError::not_found(anyhow!("Role '{}' not found", name)))?;

    if role.is_system || role.name == roles::DEFAULT {
        return Err(AppError::forbidden(format!(
            "System role '{}' cannot be deleted",
            role.name
        )));
    }

    let reassigned = sqlx::query("UPDATE users SET role = $1, updated_at = NOW() WHERE role = $2")
        .bind(roles::DEFAULT)
        .bind(&role.name)
        .execute(&mut *tx)
        .await
        .or_db_error()?
        .rows_affected();

    sqlx::query("DELETE FROM roles WHERE id = $1")
        .bind(role.id)
        .execute(&mut *tx)
        .await
        .or_db_error()?;

    tx.commit().await.or_db_error()?;

    tracing::info!(role = %role.name, reassigned_users = reassigned, "Role deleted");

    Ok(RoleDeletedResponse {
        name: role.name,
        reassigned_users: reassigned as i64,
    })
}
