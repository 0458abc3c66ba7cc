//! Embedded schema migrations.
//!
//! The SQL under `migrations/` is compiled into the binary and applied at
//! start-up, before the pool hands out connections. Diesel's migration
//! harness is synchronous, so it runs on a blocking thread.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {message}")]
    Connection { message: String },
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
}

fn apply_pending(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn =
        PgConnection::establish(database_url).map_err(|err| MigrationError::Connection {
            message: err.to_string(),
        })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    Ok(applied.len())
}

/// Apply every pending migration to the database at `database_url`.
///
/// # Errors
///
/// Returns [`MigrationError`] when the database is unreachable or a
/// migration fails.
pub async fn run_pending_migrations(database_url: String) -> Result<(), MigrationError> {
    let applied = tokio::task::spawn_blocking(move || apply_pending(&database_url))
        .await
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })??;
    info!(applied, "database migrations up to date");
    Ok(())
}
