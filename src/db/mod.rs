//! Database layer
//!
//! SQLite-backed record store for donors and donations:
//! - `pool`: connection pool construction
//! - `migrations`: idempotent schema setup run at startup
//! - `repositories`: one repository per table
//!
//! # Usage
//!
//! ```ignore
//! use donor_registry::config::DatabaseConfig;
//! use donor_registry::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool, ping};

/// Whether `err` was caused by a UNIQUE constraint violation
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    database_error(err).map_or(false, |db| db.is_unique_violation())
}

/// Whether `err` was caused by a FOREIGN KEY constraint violation
pub fn is_foreign_key_violation(err: &anyhow::Error) -> bool {
    database_error(err).map_or(false, |db| db.is_foreign_key_violation())
}

fn database_error(err: &anyhow::Error) -> Option<&dyn sqlx::error::DatabaseError> {
    match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db)) => Some(&**db),
        _ => None,
    }
}
