//! Session resolution.
//!
//! The session token is read from the session cookie, falling back to an
//! `Authorization: Bearer` header for API clients. A verified token only names
//! the user; the user row (and with it the role) is loaded on every request so
//! role changes and bans apply immediately.

use axum::http::{HeaderMap, header};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::time::Duration;
use uuid::Uuid;

use helmsman_auth::{SessionError, verify_session_token};
use helmsman_config::{JwtConfig, SessionConfig};
use helmsman_core::AppError;
use helmsman_db::PgPool;
use helmsman_models::User;

use crate::modules::users::service::UserService;

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
}

impl Session {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    pub fn role(&self) -> &str {
        &self.user.role
    }
}

/// Session token from the cookie, or from a bearer header when there is no cookie.
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(cookie_name) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Verifies the presented credential and loads its user.
///
/// Every failure is a 401: no credential, a bad or expired token, a user that
/// no longer exists, or a banned user.
pub async fn resolve_session(
    db: &PgPool,
    headers: &HeaderMap,
    jwt_config: &JwtConfig,
    session_config: &SessionConfig,
) -> Result<Session, AppError> {
    let token = extract_token(headers, &session_config.cookie_name)
        .ok_or_else(|| SessionError::Missing.into_app_error())?;

    let claims = verify_session_token(&token, jwt_config).map_err(|e| {
        tracing::debug!(reason = %e, "Rejected session token");
        e.into_app_error()
    })?;

    let user_id =
        Uuid::parse_str(&claims.sub).map_err(|_| SessionError::Invalid.into_app_error())?;

    let user = UserService::find_by_id(db, user_id)
        .await?
        .ok_or_else(|| AppError::unauthorized("Session user no longer exists"))?;

    if user.banned {
        tracing::warn!(user_id = %user.id, "Banned user presented a session");
        return Err(AppError::unauthorized("Account is banned"));
    }

    Ok(Session { user })
}

/// The cookie set on login: HttpOnly, SameSite=Lax, Path=/, expiring with the token.
pub fn session_cookie(
    token: String,
    session_config: &SessionConfig,
    jwt_config: &JwtConfig,
) -> Cookie<'static> {
    Cookie::build((session_config.cookie_name.clone(), token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(session_config.secure)
        .max_age(Duration::days(jwt_config.session_expiry_days))
        .build()
}

/// The cookie sent on logout: same name and path, empty and already expired.
pub fn cleared_session_cookie(session_config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((session_config.cookie_name.clone(), ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(session_config.secure)
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_token_from_cookie() {
        let map = headers(&[(header::COOKIE, "theme=dark; helmsman_session=abc.def.ghi")]);
        assert_eq!(
            extract_token(&map, "helmsman_session").as_deref(),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn test_cookie_wins_over_bearer() {
        let map = headers(&[
            (header::COOKIE, "helmsman_session=from-cookie"),
            (header::AUTHORIZATION, "Bearer from-header"),
        ]);
        assert_eq!(
            extract_token(&map, "helmsman_session").as_deref(),
            Some("from-cookie")
        );
    }

    #[test]
    fn test_bearer_fallback() {
        let map = headers(&[(header::AUTHORIZATION, "Bearer from-header")]);
        assert_eq!(
            extract_token(&map, "helmsman_session").as_deref(),
            Some("from-header")
        );
    }

    #[test]
    fn test_no_credential() {
        assert!(extract_token(&HeaderMap::new(), "helmsman_session").is_none());

        let map = headers(&[(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")]);
        assert!(extract_token(&map, "helmsman_session").is_none());

        let map = headers(&[(header::COOKIE, "helmsman_session=")]);
        assert!(extract_token(&map, "helmsman_session").is_none());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let jwt_config = JwtConfig {
            secret: "s".to_string(),
            session_expiry_days: 7,
        };
        let session_config = SessionConfig::default();
        let cookie = session_cookie("tok".to_string(), &session_config, &jwt_config);

        assert_eq!(cookie.name(), "helmsman_session");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
    }

    #[test]
    fn test_cleared_cookie_expires_immediately() {
        let cookie = cleared_session_cookie(&SessionConfig::default());
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.path(), Some("/"));
    }
}
