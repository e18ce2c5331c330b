//! UI components whose visibility is configured per role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_identifier;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UiComponent {
    pub id: Uuid,
    #[schema(example = "agents.export_button")]
    pub name: String,
    pub display_name: String,
    pub category: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUiComponentDto {
    #[validate(custom(function = "validate_identifier"))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    #[validate(length(min = 1, max = 64))]
    pub category: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 64))]
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUiComponentDto {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub category: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 64))]
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct UiComponentFilterParams {
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_name_allows_dots() {
        let dto = CreateUiComponentDto {
            name: "sessions.calendar".to_string(),
            display_name: "Calendrier".to_string(),
            category: Some("sessions".to_string()),
            description: None,
            icon: None,
        };
        assert!(dto.validate().is_ok());

        let dto = CreateUiComponentDto {
            name: "Sessions Calendar".to_string(),
            ..dto
        };
        assert!(dto.validate().is_err());
    }
}
