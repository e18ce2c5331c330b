//! Agents: the trainees enrolled in formations.

use chrono::{DateTime, NaiveDate, Utc};
use helmsman_core::serde::deserialize_optional_calendar_date;
use helmsman_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Agent {
    pub id: Uuid,
    pub matricule: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub rank: Option<String>,
    pub department: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAgentDto {
    #[validate(length(min = 1, max = 32, message = "Matricule must be between 1 and 32 characters"))]
    #[schema(example = "MAR-2025-0042")]
    pub matricule: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 64))]
    pub rank: Option<String>,
    #[validate(length(max = 100))]
    pub department: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339
    #[serde(default, deserialize_with = "deserialize_optional_calendar_date")]
    #[schema(value_type = Option<String>, example = "1994-07-21")]
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAgentDto {
    #[validate(length(min = 1, max = 32, message = "Matricule must be between 1 and 32 characters"))]
    pub matricule: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 64))]
    pub rank: Option<String>,
    #[validate(length(max = 100))]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_calendar_date")]
    #[schema(value_type = Option<String>)]
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct AgentFilterParams {
    /// Matches matricule, first name, last name or email
    pub search: Option<String>,
    pub department: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedAgentsResponse {
    pub data: Vec<Agent>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> CreateAgentDto {
        CreateAgentDto {
            matricule: "MAR-001".to_string(),
            first_name: "Yann".to_string(),
            last_name: "Le Goff".to_string(),
            email: Some("yann.legoff@marine.test".to_string()),
            phone: None,
            rank: Some("Matelot".to_string()),
            department: Some("Pont".to_string()),
            birth_date: None,
        }
    }

    #[test]
    fn test_create_agent_dto_validation() {
        assert!(valid_dto().validate().is_ok());

        let mut dto = valid_dto();
        dto.matricule = String::new();
        assert!(dto.validate().is_err());

        let mut dto = valid_dto();
        dto.email = Some("not-an-email".to_string());
        assert!(dto.validate().is_err());

        let mut dto = valid_dto();
        dto.email = None;
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_birth_date_accepts_offset_timestamp() {
        let dto: CreateAgentDto = serde_json::from_str(
            r#"{"matricule":"M1","first_name":"A","last_name":"B","birth_date":"1990-05-04T00:00:00+02:00"}"#,
        )
        .unwrap();
        assert_eq!(dto.birth_date, NaiveDate::from_ymd_opt(1990, 5, 4));
    }

    #[test]
    fn test_update_agent_dto_allows_empty() {
        let dto: UpdateAgentDto = serde_json::from_str("{}").unwrap();
        assert!(dto.validate().is_ok());
    }
}
