use std::env;

/// Signing settings for session tokens.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Lifetime of a session token and its cookie, in days.
    pub session_expiry_days: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            session_expiry_days: env::var("SESSION_EXPIRY_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|days: &i64| *days > 0)
                .unwrap_or(7),
        }
    }

    pub fn session_expiry_seconds(&self) -> i64 {
        self.session_expiry_days * 24 * 60 * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expiry_seconds() {
        let config = JwtConfig {
            secret: "s".to_string(),
            session_expiry_days: 7,
        };
        assert_eq!(config.session_expiry_seconds(), 604800);
    }
}
