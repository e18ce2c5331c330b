//! Scheduled training sessions ("sessions de formation").
//!
//! A session runs a formation over an inclusive date range for a bounded
//! number of agents. Its [`SessionStatus`] is derived from the dates and the
//! current day; it is never stored.

use chrono::{DateTime, NaiveDate, Utc};
use helmsman_core::serde::{
    deserialize_calendar_date, deserialize_optional_calendar_date, deserialize_optional_uuid,
};
use helmsman_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
}

impl SessionStatus {
    /// `today` before `start` is upcoming, after `end` completed, otherwise
    /// ongoing. Both bounds are inclusive.
    pub fn from_dates(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Self {
        if today < start {
            Self::Upcoming
        } else if today > end {
            Self::Completed
        } else {
            Self::Ongoing
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TrainingSession {
    pub id: Uuid,
    pub formation_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub capacity: i32,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A session joined with its formation and enrollment count.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SessionSummary {
    pub id: Uuid,
    pub formation_id: Uuid,
    pub formation_code: String,
    pub formation_title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub capacity: i32,
    pub enrolled_count: i64,
    #[sqlx(skip)]
    pub status: SessionStatus,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn with_status(mut self, today: NaiveDate) -> Self {
        self.status = SessionStatus::from_dates(self.start_date, self.end_date, today);
        self
    }

    pub fn is_full(&self) -> bool {
        self.enrolled_count >= i64::from(self.capacity)
    }
}

fn validate_session_dates(dto: &CreateSessionDto) -> Result<(), ValidationError> {
    check_date_order(dto.start_date, dto.end_date)
}

pub fn check_date_order(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if end < start {
        let mut err = ValidationError::new("date_range");
        err.message = Some("end_date must not be before start_date".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_session_dates"))]
pub struct CreateSessionDto {
    pub formation_id: Uuid,
    /// `YYYY-MM-DD` or RFC 3339
    #[serde(deserialize_with = "deserialize_calendar_date")]
    #[schema(value_type = String, example = "2025-03-03")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    #[schema(value_type = String, example = "2025-03-07")]
    pub end_date: NaiveDate,
    #[validate(range(min = 1, max = 500))]
    pub capacity: i32,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Date order is checked against the stored values once merged.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSessionDto {
    pub formation_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_calendar_date")]
    #[schema(value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_calendar_date")]
    #[schema(value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 500))]
    pub capacity: Option<i32>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct SessionFilterParams {
    /// Window start: sessions ending on or after this day
    #[serde(default, deserialize_with = "deserialize_optional_calendar_date")]
    #[param(value_type = Option<String>)]
    #[schema(value_type = Option<String>)]
    pub from: Option<NaiveDate>,
    /// Window end: sessions starting on or before this day
    #[serde(default, deserialize_with = "deserialize_optional_calendar_date")]
    #[param(value_type = Option<String>)]
    #[schema(value_type = Option<String>)]
    pub to: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub formation_id: Option<Uuid>,
    pub status: Option<SessionStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedSessionsResponse {
    pub data: Vec<SessionSummary>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_from_dates() {
        let start = ymd(2025, 3, 3);
        let end = ymd(2025, 3, 7);

        assert_eq!(
            SessionStatus::from_dates(start, end, ymd(2025, 3, 2)),
            SessionStatus::Upcoming
        );
        assert_eq!(
            SessionStatus::from_dates(start, end, start),
            SessionStatus::Ongoing
        );
        assert_eq!(
            SessionStatus::from_dates(start, end, ymd(2025, 3, 5)),
            SessionStatus::Ongoing
        );
        assert_eq!(
            SessionStatus::from_dates(start, end, end),
            SessionStatus::Ongoing
        );
        assert_eq!(
            SessionStatus::from_dates(start, end, ymd(2025, 3, 8)),
            SessionStatus::Completed
        );
    }

    #[test]
    fn test_single_day_session() {
        let day = ymd(2025, 6, 1);
        assert_eq!(
            SessionStatus::from_dates(day, day, day),
            SessionStatus::Ongoing
        );
    }

    #[test]
    fn test_create_dto_rejects_reversed_dates() {
        let dto: CreateSessionDto = serde_json::from_str(
            r#"{"formation_id":"6f1c2b1e-3f0a-4c5e-9d2a-1b2c3d4e5f60","start_date":"2025-03-07","end_date":"2025-03-03","capacity":12}"#,
        )
        .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_dto_keeps_client_calendar_day() {
        let dto: CreateSessionDto = serde_json::from_str(
            r#"{"formation_id":"6f1c2b1e-3f0a-4c5e-9d2a-1b2c3d4e5f60","start_date":"2025-03-03T00:00:00+01:00","end_date":"2025-03-07T00:00:00+01:00","capacity":12}"#,
        )
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.start_date, ymd(2025, 3, 3));
        assert_eq!(dto.end_date, ymd(2025, 3, 7));
    }

    #[test]
    fn test_capacity_must_be_positive() {
        let dto = CreateSessionDto {
            formation_id: Uuid::new_v4(),
            start_date: ymd(2025, 3, 3),
            end_date: ymd(2025, 3, 3),
            capacity: 0,
            location: None,
            notes: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_filter_params_from_query() {
        let params: SessionFilterParams = serde_json::from_str(
            r#"{"from":"2025-03-01","to":"2025-03-31","status":"ongoing","formation_id":"","page":"2"}"#,
        )
        .unwrap();
        assert_eq!(params.from, Some(ymd(2025, 3, 1)));
        assert_eq!(params.to, Some(ymd(2025, 3, 31)));
        assert_eq!(params.status, Some(SessionStatus::Ongoing));
        assert!(params.formation_id.is_none());
        assert_eq!(params.pagination.page(), Some(2));
    }

    #[test]
    fn test_is_full() {
        let summary = SessionSummary {
            id: Uuid::new_v4(),
            formation_id: Uuid::new_v4(),
            formation_code: "BST".to_string(),
            formation_title: "Basic Safety".to_string(),
            start_date: ymd(2025, 3, 3),
            end_date: ymd(2025, 3, 7),
            capacity: 2,
            enrolled_count: 2,
            status: SessionStatus::default(),
            location: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(summary.is_full());
        assert_eq!(
            summary.with_status(ymd(2025, 3, 10)).status,
            SessionStatus::Completed
        );
    }
}
