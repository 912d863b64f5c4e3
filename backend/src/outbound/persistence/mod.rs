//! PostgreSQL persistence adapters for the member repository port.

mod diesel_member_repository;
mod models;
mod pool;
pub(crate) mod schema;

pub use diesel_member_repository::DieselMemberRepository;
pub use pool::{DbPool, PoolError};

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

/// Embedded schema migrations, applied at startup.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying schema migrations.
#[derive(Debug, thiserror::Error)]
#[error("migration failure: {message}")]
pub struct MigrationError {
    /// Underlying driver detail.
    message: String,
}

/// Apply pending migrations over a blocking connection.
///
/// Diesel's migration harness is synchronous; callers on an async runtime
/// should wrap this in `spawn_blocking`.
///
/// # Errors
///
/// Returns [`MigrationError`] when the connection cannot be established or a
/// migration fails to apply.
pub fn run_migrations(database_url: &str) -> Result<(), MigrationError> {
    let mut conn = PgConnection::establish(database_url).map_err(|error| MigrationError {
        message: error.to_string(),
    })?;
    conn.run_pending_migrations(MIGRATIONS)
        .map(|_| ())
        .map_err(|error| MigrationError {
            message: error.to_string(),
        })
}
