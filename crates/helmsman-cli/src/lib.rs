//! # Helmsman CLI
//!
//! Database seeding utilities for development and demos.
//!
//! ## Usage
//!
//! ```ignore
//! use helmsman_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(8); // 8 formations, defaults for the rest
//! seed_all(&pool, &config).await?;
//! ```

pub mod seeder;
