//! Resources: the nouns of the permission matrix and their action vocabulary.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_action_list, validate_identifier};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Resource {
    pub id: Uuid,
    #[schema(example = "formation")]
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    /// Ordered action vocabulary
    pub actions: Vec<String>,
    /// Action → display label
    #[schema(value_type = Object)]
    pub action_labels: Json<BTreeMap<String, String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    pub fn has_action(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == action)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateResourceDto {
    #[validate(custom(function = "validate_identifier"))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    pub description: Option<String>,
    #[validate(custom(function = "validate_action_list"))]
    #[schema(example = json!(["view", "create", "edit", "delete"]))]
    pub actions: Vec<String>,
    #[serde(default)]
    pub action_labels: BTreeMap<String, String>,
}

/// Replacing `actions` prunes grants of removed actions from every role.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateResourceDto {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_action_list"))]
    pub actions: Option<Vec<String>>,
    pub action_labels: Option<BTreeMap<String, String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_resource_dto_validation() {
        let dto: CreateResourceDto = serde_json::from_str(
            r#"{"name":"certificat","display_name":"Certificats","actions":["view","issue"]}"#,
        )
        .unwrap();
        assert!(dto.validate().is_ok());
        assert!(dto.action_labels.is_empty());

        let dto: CreateResourceDto = serde_json::from_str(
            r#"{"name":"certificat","display_name":"Certificats","actions":[]}"#,
        )
        .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_has_action() {
        let resource = Resource {
            id: Uuid::new_v4(),
            name: "agent".to_string(),
            display_name: "Agents".to_string(),
            description: None,
            actions: vec!["view".to_string(), "edit".to_string()],
            action_labels: Json(BTreeMap::new()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(resource.has_action("edit"));
        assert!(!resource.has_action("delete"));
    }

    #[test]
    fn test_action_labels_serialize_as_plain_object() {
        let mut labels = BTreeMap::new();
        labels.insert("view".to_string(), "Consulter".to_string());
        let json = serde_json::to_value(Json(labels)).unwrap();
        assert_eq!(json, serde_json::json!({"view": "Consulter"}));
    }
}
