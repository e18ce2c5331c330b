use serde::{Deserialize, Serialize};

/// Payload of a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID
    pub sub: String,
    pub email: String,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Token identifier, unique per login
    pub jti: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_roundtrip_shape() {
        let json = r#"{"sub":"user-456","email":"user@test.com","exp":9999999999,"iat":9999999900,"jti":"abc"}"#;
        let claims: SessionClaims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub, "user-456");
        assert_eq!(claims.email, "user@test.com");
        assert_eq!(claims.exp, 9999999999);

        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""jti":"abc""#));
    }
}
