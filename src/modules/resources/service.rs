use std::collections::BTreeMap;

use anyhow::anyhow;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;

use helmsman_core::AppError;
use helmsman_db::DbResultExt;
use helmsman_models::{CreateResourceDto, Resource, UpdateResourceDto};

const RESOURCE_COLUMNS: &str =
    "id, name, display_name, description, actions, action_labels, created_at, updated_at";

/// Labels may only name actions of the vocabulary.
fn check_labels(actions: &[String], labels: &BTreeMap<String, String>) -> Result<(), AppError> {
    let stray: Vec<&str> = labels
        .keys()
        .filter(|key| !actions.contains(key))
        .map(String::as_str)
        .collect();

    if stray.is_empty() {
        Ok(())
    } else {
        Err(AppError::bad_request(anyhow!(
            "action_labels: unknown action(s) {}",
            stray.join(", ")
        )))
    }
}

pub struct ResourceService;

impl ResourceService {
    #[instrument(skip(db))]
    pub async fn get_resources(db: &PgPool) -> Result<Vec<Resource>, AppError> {
        sqlx::query_as::<_, Resource>(&format!(
            "SELECT {} FROM resources ORDER BY name",
            RESOURCE_COLUMNS
        ))
        .fetch_all(db)
        .await
        .or_db_error()
    }

    #[instrument(skip(db))]
    pub async fn get_resource(db: &PgPool, name: &str) -> Result<Resource, AppError> {
        sqlx::query_as::<_, Resource>(&format!(
            "SELECT {} FROM resources WHERE name = $1",
            RESOURCE_COLUMNS
        ))
        .bind(name)
        .fetch_optional(db)
        .await
        .or_db_error()?
        .ok_or_else(|| AppError::not_found(anyhow!("Resource '{}' not found", name)))
    }

    /// A duplicate name is a 409 and leaves the table untouched.
    #[instrument(skip(db))]
    pub async fn create_resource(
        db: &PgPool,
        dto: CreateResourceDto,
    ) -> Result<Resource, AppError> {
        check_labels(&dto.actions, &dto.action_labels)?;

        let resource = sqlx::query_as::<_, Resource>(&format!(
            r#"INSERT INTO resources (name, display_name, description, actions, action_labels)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {}"#,
            RESOURCE_COLUMNS
        ))
        .bind(&dto.name)
        .bind(dto.display_name.trim())
        .bind(&dto.description)
        .bind(&dto.actions)
        .bind(Json(&dto.action_labels))
        .fetch_one(db)
        .await
        .or_conflict(&format!("Resource '{}' already exists", dto.name))?;

        tracing::info!(resource = %resource.name, actions = ?resource.actions, "Resource created");
        Ok(resource)
    }

    /// When the vocabulary changes, every role's grants on this resource lose
    /// the actions that left it, in the same transaction.
    #[instrument(skip(db))]
    pub async fn update_resource(
        db: &PgPool,
        name: &str,
        dto: UpdateResourceDto,
    ) -> Result<Resource, AppError> {
        let mut tx = db.begin().await.or_db_error()?;

        let current = sqlx::query_as::<_, Resource>(&format!(
            "SELECT {} FROM resources WHERE name = $1 FOR UPDATE",
            RESOURCE_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&mut *tx)
        .await
        .or_db_error()?
        .ok_or_else(|| AppError::not_found(anyhow!("Resource '{}' not found", name)))?;

        let actions = dto.actions.unwrap_or_else(|| current.actions.clone());
        let labels = match dto.action_labels {
            Some(labels) => {
                check_labels(&actions, &labels)?;
                labels
            }
            None => {
                // labels of removed actions go with them
                let mut labels = current.action_labels.0.clone();
                labels.retain(|action, _| actions.contains(action));
                labels
            }
        };

        let resource = sqlx::query_as::<_, Resource>(&format!(
            r#"UPDATE resources
               SET display_name = COALESCE($2, display_name),
                   description = COALESCE($3, description),
                   actions = $4,
                   action_labels = $5,
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {}"#,
            RESOURCE_COLUMNS
        ))
        .bind(current.id)
        .bind(dto.display_name.as_deref().map(str::trim))
        .bind(&dto.description)
        .bind(&actions)
        .bind(Json(&labels))
        .fetch_one(&mut *tx)
        .await
        .or_db_error()?;

        let pruned = sqlx::query(
            r#"UPDATE role_permissions
               SET actions = ARRAY(
                       SELECT a FROM unnest(actions) WITH ORDINALITY AS t(a, n)
                       WHERE a = ANY($2)
                       ORDER BY n
                   ),
                   updated_at = NOW()
               WHERE resource_id = $1 AND NOT (actions <@ $2)"#,
        )
        .bind(resource.id)
        .bind(&actions)
        .execute(&mut *tx)
        .await
        .or_db_error()?
        .rows_affected();

        tx.commit().await.or_db_error()?;

        if pruned > 0 {
            tracing::info!(
                resource = %resource.name,
                pruned_grants = pruned,
                "Removed actions dropped from role grants"
            );
        }

        Ok(resource)
    }

    /// Role grants on the resource go with it (cascade).
    #[instrument(skip(db))]
    pub async fn delete_resource(db: &PgPool, name: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM resources WHERE name = $1")
            .bind(name)
            .execute(db)
            .await
            .or_db_error()?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Resource '{}' not found", name)));
        }

        tracing::warn!(resource = name, "Resource deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_labels_must_name_known_actions() {
        let actions = strings(&["view", "issue"]);

        let mut labels = BTreeMap::new();
        labels.insert("view".to_string(), "Consulter".to_string());
        assert!(check_labels(&actions, &labels).is_ok());

        labels.insert("revoke".to_string(), "Révoquer".to_string());
        let err = check_labels(&actions, &labels).unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
        assert!(err.public_message().contains("revoke"));
    }
}
