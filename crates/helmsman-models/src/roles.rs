//! Roles and the per-role views of both permission matrices.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_identifier;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Role {
    pub id: Uuid,
    /// Stable key referenced by users and permission rows
    #[schema(example = "coordinateur")]
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    #[schema(example = "#1d4ed8")]
    pub color: Option<String>,
    /// System roles cannot be deleted
    pub is_system: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RoleWithUserCount {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub role: Role,
    pub user_count: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoleDto {
    #[validate(custom(function = "validate_identifier"))]
    #[schema(example = "auditeur")]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 32))]
    pub color: Option<String>,
}

/// The role name is immutable; only display metadata changes.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleDto {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 32))]
    pub color: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleDeletedResponse {
    pub name: String,
    /// Users moved to the default role before deletion
    pub reassigned_users: i64,
}

/// Resource → actions for one role. An empty list clears the entry.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRolePermissionsDto {
    #[validate(length(min = 1, message = "At least one resource is required"))]
    pub permissions: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RolePermissionsResponse {
    pub role: String,
    pub permissions: BTreeMap<String, Vec<String>>,
}

/// Component → enabled for one role.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUiPermissionsDto {
    #[validate(length(min = 1, message = "At least one component is required"))]
    pub components: BTreeMap<String, bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleUiPermissionsResponse {
    pub role: String,
    pub components: BTreeMap<String, bool>,
}
