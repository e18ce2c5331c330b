//! Formations: training programs that sessions are scheduled for.

use chrono::{DateTime, Utc};
use helmsman_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Formation {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub duration_days: i32,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFormationDto {
    #[validate(length(min = 1, max = 32))]
    #[schema(example = "STCW-BST")]
    pub code: String,
    #[validate(length(min = 1, max = 200))]
    #[schema(example = "Basic Safety Training")]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 1, max = 365))]
    pub duration_days: i32,
    #[validate(length(max = 64))]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFormationDto {
    #[validate(length(min = 1, max = 32))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, max = 365))]
    pub duration_days: Option<i32>,
    #[validate(length(max = 64))]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct FormationFilterParams {
    /// Matches code or title
    pub search: Option<String>,
    pub category: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedFormationsResponse {
    pub data: Vec<Formation>,
    pub meta: PaginationMeta,
}
