//! Login and "who am I" payloads.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::roles::Role;
use crate::users::User;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    #[schema(example = "admin@helmsman.test")]
    pub email: String,
    #[validate(length(min = 1))]
    #[schema(example = "password123")]
    pub password: String,
}

/// The token is also set as the session cookie.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// The caller, their role, and what that role may do and see.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: User,
    pub role: Option<Role>,
    /// Resource → allowed actions
    pub permissions: BTreeMap<String, Vec<String>>,
    /// Components enabled for the role; anything not listed is hidden
    pub ui_components: Vec<String>,
}
