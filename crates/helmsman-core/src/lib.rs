//! # Helmsman Core
//!
//! Core types shared by every Helmsman crate:
//!
//! - [`errors`]: the application error type and its HTTP rendering
//! - [`pagination`]: pagination parameters and response metadata
//! - [`password`]: bcrypt hashing and verification
//! - [`permissions`]: the role → resource → action matrix, the role → UI
//!   component matrix, and the names of built-in resources, actions and roles
//! - [`serde`]: custom deserializers (optional UUIDs, calendar dates)
//!
//! # Example
//!
//! ```ignore
//! use helmsman_core::permissions::{PermissionMatrix, actions, resources};
//!
//! let matrix = PermissionMatrix::from_rows(rows);
//! if matrix.can(Some("coordinateur"), resources::FORMATION, actions::EDIT) {
//!     // update the formation
//! }
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod permissions;
pub mod serde;

pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
pub use permissions::{PermissionMatrix, UiPermissionMatrix};
