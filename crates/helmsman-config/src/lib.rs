//! # Helmsman Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: session token signing and lifetime
//! - [`session`]: session cookie attributes
//! - [`cors`]: allowed browser origins
//! - [`server`]: listen address
//!
//! Call `dotenvy::dotenv()` before loading so a local `.env` file is honoured.
//!
//! # Example
//!
//! ```ignore
//! use helmsman_config::{CorsConfig, JwtConfig, ServerConfig, SessionConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let session_config = SessionConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod server;
pub mod session;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;
pub use session::SessionConfig;

pub(crate) fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}
