//! Formateurs: the trainers who teach cours.

use chrono::{DateTime, Utc};
use helmsman_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Formateur {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFormateurDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    #[schema(example = "formateur@helmsman.test")]
    pub email: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 100))]
    #[schema(example = "Navigation")]
    pub specialty: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFormateurDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 100))]
    pub specialty: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct FormateurFilterParams {
    /// Matches name, email or specialty
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedFormateursResponse {
    pub data: Vec<Formateur>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_formateur_requires_email() {
        let dto = CreateFormateurDto {
            first_name: "Anne".to_string(),
            last_name: "Kerbrat".to_string(),
            email: "anne".to_string(),
            phone: None,
            specialty: None,
        };
        assert!(dto.validate().is_err());

        let dto = CreateFormateurDto {
            email: "anne.kerbrat@helmsman.test".to_string(),
            ..dto
        };
        assert!(dto.validate().is_ok());
    }
}
