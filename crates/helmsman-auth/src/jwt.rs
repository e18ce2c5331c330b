use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use helmsman_config::JwtConfig;
use helmsman_core::AppError;

use crate::claims::SessionClaims;

/// Why a presented credential did not resolve to a session.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Missing session credential")]
    Missing,
    #[error("Session has expired")]
    Expired,
    #[error("Invalid session credential")]
    Invalid,
}

impl SessionError {
    /// Every session failure is an authentication failure (401).
    pub fn into_app_error(self) -> AppError {
        AppError::unauthorized(self.to_string())
    }
}

/// Issues a session token valid for `jwt_config.session_expiry_days`.
pub fn create_session_token(
    user_id: Uuid,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.session_expiry_seconds() as usize;

    let claims = SessionClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("Failed to create token: {}", e)))
}

/// Verifies signature and expiry of a session token.
pub fn verify_session_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<SessionClaims, SessionError> {
    if token.trim().is_empty() {
        return Err(SessionError::Missing);
    }

    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => SessionError::Expired,
        _ => SessionError::Invalid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            session_expiry_days: 7,
        }
    }

    #[test]
    fn test_create_and_verify() {
        let user_id = Uuid::new_v4();
        let token = create_session_token(user_id, "officer@test.com", &config()).unwrap();
        let claims = verify_session_token(&token, &config()).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "officer@test.com");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_tokens_are_unique_per_login() {
        let user_id = Uuid::new_v4();
        let a = create_session_token(user_id, "a@test.com", &config()).unwrap();
        let b = create_session_token(user_id, "a@test.com", &config()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = create_session_token(Uuid::new_v4(), "a@test.com", &config()).unwrap();
        let other = JwtConfig {
            secret: "another-secret".to_string(),
            session_expiry_days: 7,
        };
        assert_eq!(
            verify_session_token(&token, &other).unwrap_err(),
            SessionError::Invalid
        );
    }

    #[test]
    fn test_expired_token() {
        let now = Utc::now().timestamp() as usize;
        let claims = SessionClaims {
            sub: Uuid::new_v4().to_string(),
            email: "old@test.com".to_string(),
            exp: now - 3600,
            iat: now - 7200,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_eq!(
            verify_session_token(&token, &config()).unwrap_err(),
            SessionError::Expired
        );
    }

    #[test]
    fn test_garbage_and_empty_tokens() {
        assert_eq!(
            verify_session_token("not.a.jwt", &config()).unwrap_err(),
            SessionError::Invalid
        );
        assert_eq!(
            verify_session_token("", &config()).unwrap_err(),
            SessionError::Missing
        );
    }

    #[test]
    fn test_session_error_is_unauthorized() {
        let err = SessionError::Expired.into_app_error();
        assert_eq!(err.status.as_u16(), 401);
        assert_eq!(err.public_message(), "Session has expired");
    }
}
