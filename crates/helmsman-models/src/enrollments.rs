//! Enrollments: an agent registered in a session, with the outcome.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "enrollment_result", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentResult {
    #[default]
    Pending,
    Passed,
    Failed,
    Absent,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AgentFormation {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub formation_id: Uuid,
    pub session_id: Uuid,
    pub result: EnrollmentResult,
    pub score: Option<f64>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An enrollment seen from its session: who is enrolled.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SessionEnrollment {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub matricule: String,
    pub first_name: String,
    pub last_name: String,
    pub result: EnrollmentResult,
    pub score: Option<f64>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An enrollment seen from its agent: which formations, when.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AgentEnrollment {
    pub id: Uuid,
    pub session_id: Uuid,
    pub formation_id: Uuid,
    pub formation_code: String,
    pub formation_title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub result: EnrollmentResult,
    pub score: Option<f64>,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EnrollAgentDto {
    pub agent_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEnrollmentDto {
    pub result: Option<EnrollmentResult>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub score: Option<f64>,
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_wire_format() {
        let dto: UpdateEnrollmentDto =
            serde_json::from_str(r#"{"result":"passed","score":14.5}"#).unwrap();
        assert_eq!(dto.result, Some(EnrollmentResult::Passed));
        assert!(dto.validate().is_ok());

        assert!(serde_json::from_str::<UpdateEnrollmentDto>(r#"{"result":"excellent"}"#).is_err());
        assert_eq!(
            serde_json::to_value(EnrollmentResult::Absent).unwrap(),
            serde_json::json!("absent")
        );
    }

    #[test]
    fn test_score_bounds() {
        let dto = UpdateEnrollmentDto {
            result: None,
            score: Some(120.0),
            comment: None,
        };
        assert!(dto.validate().is_err());

        let dto = UpdateEnrollmentDto {
            result: None,
            score: Some(-1.0),
            comment: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_default_result_is_pending() {
        assert_eq!(EnrollmentResult::default(), EnrollmentResult::Pending);
    }
}
