//! # Helmsman Auth
//!
//! Session tokens for the Helmsman API.
//!
//! A successful login issues a signed session token (HS256 JWT). The server
//! puts it in an HTTP-only cookie; API clients may also present it as
//! `Authorization: Bearer <token>`. The token only identifies the user; the
//! role is always read from the database when the session is resolved.
//!
//! - [`claims`]: the token payload
//! - [`jwt`]: issuing and verifying tokens
//!
//! # Example
//!
//! ```ignore
//! use helmsman_auth::{create_session_token, verify_session_token};
//! use helmsman_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_session_token(user_id, "officer@helmsman.test", &config)?;
//! let claims = verify_session_token(&token, &config)?;
//! ```

pub mod claims;
pub mod jwt;

pub use claims::SessionClaims;
pub use jwt::{SessionError, create_session_token, verify_session_token};
