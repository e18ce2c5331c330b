use std::collections::BTreeMap;

use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use helmsman_core::permissions::RoleGrants;
use helmsman_core::{AppError, PermissionMatrix, UiPermissionMatrix};
use helmsman_db::DbResultExt;
use helmsman_models::Resource;

pub struct PermissionService;

impl PermissionService {
    /// Role → resource → actions, folded in `(updated_at, id)` order so the
    /// most recently written row for a pair wins.
    #[instrument(skip(db))]
    pub async fn load_permission_matrix(db: &PgPool) -> Result<PermissionMatrix, AppError> {
        let rows = sqlx::query_as::<_, (String, String, Vec<String>)>(
            r#"SELECT r.name, res.name, rp.actions
               FROM role_permissions rp
               JOIN roles r ON r.id = rp.role_id
               JOIN resources res ON res.id = rp.resource_id
               ORDER BY rp.updated_at, rp.id"#,
        )
        .fetch_all(db)
        .await
        .or_db_error()?;

        tracing::debug!(rows = rows.len(), "Loaded permission matrix");

        Ok(PermissionMatrix::from_rows(rows))
    }

    #[instrument(skip(db))]
    pub async fn load_ui_permission_matrix(db: &PgPool) -> Result<UiPermissionMatrix, AppError> {
        let rows = sqlx::query_as::<_, (String, String, bool)>(
            r#"SELECT r.name, c.name, ucp.enabled
               FROM ui_component_permissions ucp
               JOIN roles r ON r.id = ucp.role_id
               JOIN ui_components c ON c.id = ucp.component_id
               ORDER BY ucp.updated_at, ucp.id"#,
        )
        .fetch_all(db)
        .await
        .or_db_error()?;

        tracing::debug!(rows = rows.len(), "Loaded UI permission matrix");

        Ok(UiPermissionMatrix::from_rows(rows))
    }

    #[instrument(skip(db))]
    pub async fn get_role_permissions(db: &PgPool, role: &str) -> Result<RoleGrants, AppError> {
        Self::role_id(db, role).await?;

        let rows = sqlx::query_as::<_, (String, Vec<String>)>(
            r#"SELECT res.name, rp.actions
               FROM role_permissions rp
               JOIN roles r ON r.id = rp.role_id
               JOIN resources res ON res.id = rp.resource_id
               WHERE r.name = $1
               ORDER BY rp.updated_at, rp.id"#,
        )
        .bind(role)
        .fetch_all(db)
        .await
        .or_db_error()?;

        Ok(rows.into_iter().collect())
    }

    /// Upserts the given resource → actions entries of one role in a single
    /// transaction. Actions outside a resource's vocabulary are rejected; an
    /// empty list removes the entry. Other resources of the role are untouched.
    #[instrument(skip(db))]
    pub async fn set_role_permissions(
        db: &PgPool,
        role: &str,
        permissions: BTreeMap<String, Vec<String>>,
    ) -> Result<RoleGrants, AppError> {
        let mut tx = db.begin().await.or_db_error()?;

        let role_id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM roles WHERE name = $1")
            .bind(role)
            .fetch_optional(&mut *tx)
            .await
            .or_db_error()?
            .ok_or_else(|| AppError::not_found(anyhow!("Role '{}' not found", role)))?;

        for (resource_name, requested) in permissions {
            let resource = sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE name = $1")
                .bind(&resource_name)
                .fetch_optional(&mut *tx)
                .await
                .or_db_error()?
                .ok_or_else(|| {
                    AppError::not_found(anyhow!("Resource '{}' not found", resource_name))
                })?;

            let actions = normalize_actions(&resource, &requested)?;

            if actions.is_empty() {
                sqlx::query("DELETE FROM role_permissions WHERE role_id = $1 AND resource_id = $2")
                    .bind(role_id)
                    .bind(resource.id)
                    .execute(&mut *tx)
                    .await
                    .or_db_error()?;
            } else {
                sqlx::query(
                    r#"INSERT INTO role_permissions (role_id, resource_id, actions)
                       VALUES ($1, $2, $3)
                       ON CONFLICT (role_id, resource_id)
                       DO UPDATE SET actions = EXCLUDED.actions, updated_at = NOW()"#,
                )
                .bind(role_id)
                .bind(resource.id)
                .bind(&actions)
                .execute(&mut *tx)
                .await
                .or_db_error()?;
            }

            tracing::info!(role, resource = %resource_name, ?actions, "Role permissions updated");
        }

        tx.commit().await.or_db_error()?;

        Self::get_role_permissions(db, role).await
    }

    #[instrument(skip(db))]
    pub async fn get_role_ui_permissions(
        db: &PgPool,
        role: &str,
    ) -> Result<BTreeMap<String, bool>, AppError> {
        Self::role_id(db, role).await?;

        let rows = sqlx::query_as::<_, (String, bool)>(
            r#"SELECT c.name, ucp.enabled
               FROM ui_component_permissions ucp
               JOIN roles r ON r.id = ucp.role_id
               JOIN ui_components c ON c.id = ucp.component_id
               WHERE r.name = $1
               ORDER BY ucp.updated_at, ucp.id"#,
        )
        .bind(role)
        .fetch_all(db)
        .await
        .or_db_error()?;

        Ok(rows.into_iter().collect())
    }

    /// Upserts component → enabled flags of one role in a single transaction.
    #[instrument(skip(db))]
    pub async fn set_role_ui_permissions(
        db: &PgPool,
        role: &str,
        components: BTreeMap<String, bool>,
    ) -> Result<BTreeMap<String, bool>, AppError> {
        let mut tx = db.begin().await.or_db_error()?;

        let role_id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM roles WHERE name = $1")
            .bind(role)
            .fetch_optional(&mut *tx)
            .await
            .or_db_error()?
            .ok_or_else(|| AppError::not_found(anyhow!("Role '{}' not found", role)))?;

        for (component, enabled) in components {
            let component_id =
                sqlx::query_scalar::<_, Uuid>("SELECT id FROM ui_components WHERE name = $1")
                    .bind(&component)
                    .fetch_optional(&mut *tx)
                    .await
                    .or_db_error()?
                    .ok_or_else(|| {
                        AppError::not_found(anyhow!("UI component '{}' not found", component))
                    })?;

            sqlx::query(
                r#"INSERT INTO ui_component_permissions (role_id, component_id, enabled)
                   VALUES ($1, $2, $3)
                   ON CONFLICT (role_id, component_id)
                   DO UPDATE SET enabled = EXCLUDED.enabled, updated_at = NOW()"#,
            )
            .bind(role_id)
            .bind(component_id)
            .bind(enabled)
            .execute(&mut *tx)
            .await
            .or_db_error()?;
        }

        tx.commit().await.or_db_error()?;

        Self::get_role_ui_permissions(db, role).await
    }

    async fn role_id(db: &PgPool, role: &str) -> Result<Uuid, AppError> {
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM roles WHERE name = $1")
            .bind(role)
            .fetch_optional(db)
            .await
            .or_db_error()?
            .ok_or_else(|| AppError::not_found(anyhow!("Role '{}' not found", role)))
    }
}

/// Checks `requested` against the resource vocabulary and returns the granted
/// actions deduplicated, in vocabulary order.
pub fn normalize_actions(resource: &Resource, requested: &[String]) -> Result<Vec<String>, AppError> {
    let unknown: Vec<&str> = requested
        .iter()
        .filter(|a| !resource.has_action(a))
        .map(String::as_str)
        .collect();

    if !unknown.is_empty() {
        return Err(AppError::bad_request(anyhow!(
            "Unknown action(s) for resource '{}': {}",
            resource.name,
            unknown.join(", ")
        )));
    }

    Ok(resource
        .actions
        .iter()
        .filter(|a| requested.contains(a))
        .cloned()
        .collect())
}
