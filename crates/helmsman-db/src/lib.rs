//! # Helmsman DB
//!
//! PostgreSQL pool initialization, the embedded migrations, and the mapping of
//! database failures onto [`AppError`].
//!
//! # Example
//!
//! ```ignore
//! use helmsman_db::{DbResultExt, init_db_pool, MIGRATOR};
//!
//! let pool = init_db_pool().await?;
//! MIGRATOR.run(&pool).await?;
//!
//! let agent = sqlx::query_as::<_, Agent>("INSERT INTO agents ... RETURNING *")
//!     .fetch_one(&pool)
//!     .await
//!     .or_conflict("An agent with this matricule already exists")?;
//! ```

use std::env;

use anyhow::{Context, anyhow};
use helmsman_core::AppError;
use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;

/// Migrations under `migrations/` at the workspace root.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// Connects to `DATABASE_URL`.
///
/// `DATABASE_MAX_CONNECTIONS` caps the pool size (default 10).
pub async fn init_db_pool() -> anyhow::Result<PgPool> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    tracing::info!(max_connections, "Connecting to database");

    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")
}

/// Maps a database error with no caller-specific conflict message.
pub fn db_error(err: sqlx::Error) -> AppError {
    classify(err, "Record already exists")
}

fn classify(err: sqlx::Error, conflict_message: &str) -> AppError {
    match &err {
        sqlx::Error::RowNotFound => AppError::not_found(anyhow!("Record not found")),
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::conflict(anyhow!("{}", conflict_message))
        }
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            AppError::not_found(anyhow!("Referenced record not found"))
        }
        sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
            AppError::bad_request(anyhow!("Value violates a constraint: {}", db_err.message()))
        }
        _ => AppError::internal(err),
    }
}

pub trait DbResultExt<T> {
    /// Unique violations become 409 with `message`; other errors are
    /// classified as in [`db_error`].
    fn or_conflict(self, message: &str) -> Result<T, AppError>;

    fn or_db_error(self) -> Result<T, AppError>;
}

impl<T> DbResultExt<T> for Result<T, sqlx::Error> {
    fn or_conflict(self, message: &str) -> Result<T, AppError> {
        self.map_err(|e| classify(e, message))
    }

    fn or_db_error(self) -> Result<T, AppError> {
        self.map_err(db_error)
    }
}
