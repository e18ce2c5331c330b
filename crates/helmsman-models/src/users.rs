//! Application accounts.

use chrono::{DateTime, Utc};
use helmsman_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_identifier;

/// A user as exposed by the API. The password hash is never selected into it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[schema(example = "coordinateur")]
    pub role: String,
    pub email_verified: bool,
    pub banned: bool,
    pub ban_reason: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns needed to check a login.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub banned: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(email)]
    #[schema(example = "officier@helmsman.test")]
    pub email: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Defaults to `user`
    #[validate(custom(function = "validate_identifier"))]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_identifier"))]
    pub role: Option<String>,
    pub email_verified: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BanUserDto {
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct UserFilterParams {
    /// Matches name or email
    pub search: Option<String>,
    pub role: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<User>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_dto_validation() {
        let dto = CreateUserDto {
            email: "officier@helmsman.test".to_string(),
            name: "Officier de quart".to_string(),
            password: "hunter2hunter2".to_string(),
            role: None,
        };
        assert!(dto.validate().is_ok());

        let dto = CreateUserDto {
            password: "short".to_string(),
            ..dto
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_role_must_be_an_identifier() {
        let dto = UpdateUserDto {
            name: None,
            role: Some("Coordinateur".to_string()),
            email_verified: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_user_serialization_has_no_password() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.test".to_string(),
            name: "A".to_string(),
            role: "user".to_string(),
            email_verified: false,
            banned: false,
            ban_reason: None,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "user");
    }
}
