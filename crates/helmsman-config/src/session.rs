use std::env;

pub const DEFAULT_COOKIE_NAME: &str = "helmsman_session";

/// Attributes of the session cookie. HttpOnly, SameSite=Lax and Path=/ are
/// always set; only the name and the Secure flag are configurable.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            secure: false,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self {
            cookie_name: env::var("SESSION_COOKIE_NAME")
                .ok()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
            secure: crate::env_flag("SESSION_COOKIE_SECURE").unwrap_or(false),
        }
    }
}
