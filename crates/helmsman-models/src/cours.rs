//! Cours: individual courses, optionally part of a formation, taught by formateurs.

use chrono::{DateTime, Utc};
use helmsman_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Cours {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub duration_hours: i32,
    pub formation_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCoursDto {
    #[validate(length(min = 1, max = 32))]
    #[schema(example = "NAV-101")]
    pub code: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 1, max = 1000))]
    pub duration_hours: i32,
    pub formation_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCoursDto {
    #[validate(length(min = 1, max = 32))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, max = 1000))]
    pub duration_hours: Option<i32>,
    pub formation_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct CoursFilterParams {
    pub search: Option<String>,
    #[serde(default, deserialize_with = "helmsman_core::serde::deserialize_optional_uuid")]
    pub formation_id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCoursResponse {
    pub data: Vec<Cours>,
    pub meta: PaginationMeta,
}

/// A formateur assigned to a cours.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CoursFormateur {
    pub cours_id: Uuid,
    pub formateur_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub specialty: Option<String>,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignFormateurDto {
    pub formateur_id: Uuid,
}
