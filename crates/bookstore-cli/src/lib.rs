//! # Bookstore CLI
//!
//! Administration and seeding utilities used by the `bookstore-cli` binary.
//!
//! ## Usage
//!
//! ```ignore
//! use bookstore_cli::seeder::{SeedConfig, seed_all};
//!
//! let config = SeedConfig::default();
//! seed_all(&pool, &config).await?;
//! ```

pub mod admin;
pub mod seeder;
