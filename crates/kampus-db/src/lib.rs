//! # Kampus DB
//!
//! Database pool and data-access layer for the Kampus API.
//!
//! Request handling talks to storage only through the [`Directory`] trait.
//! [`PgDirectory`] is the production adapter; [`InMemoryDirectory`] backs the
//! test suite and demo mode.
//!
//! # Example
//!
//! ```ignore
//! use kampus_db::{init_db_pool, PgDirectory};
//!
//! let pool = init_db_pool().await?;
//! let directory = PgDirectory::new(pool);
//! ```

use std::env;

pub mod directory;
pub mod memory;
pub mod postgres;

pub use directory::{Directory, DirectoryError, NewUser};
pub use memory::InMemoryDirectory;
pub use postgres::PgDirectory;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Initializes a PostgreSQL connection pool from `DATABASE_URL`.
///
/// # Errors
///
/// Returns [`DirectoryError::Connection`] if the variable is missing or the
/// database cannot be reached.
pub async fn init_db_pool() -> Result<PgPool, DirectoryError> {
    let database_url = env::var("DATABASE_URL").map_err(|_| DirectoryError::Connection {
        message: "DATABASE_URL must be set".to_string(),
    })?;

    PgPool::connect(&database_url)
        .await
        .map_err(|e| DirectoryError::Connection {
            message: format!("Failed to connect to database: {}", e),
        })
}

/// Runs the embedded migrations against `pool`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DirectoryError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| DirectoryError::Query {
            message: format!("Migration failed: {}", e),
        })
}
