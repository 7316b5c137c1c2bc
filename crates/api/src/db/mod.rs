//! Database operations for the catalog `SQLite` file.
//!
//! # Database: single file, shared by the CLI and the API
//!
//! ## Tables
//!
//! - `games` - The game catalog
//! - `admin_users` - Admin accounts with Argon2id password digests
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and embedded at compile
//! time. The API applies them at startup; the CLI applies them before every
//! command, or explicitly via:
//! ```bash
//! cargo run -p retro-games-cli -- init
//! ```

pub mod admin_users;
pub mod games;

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use admin_users::AdminUserRepository;
pub use games::GameRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// How long to wait for a connection or a write lock before giving up.
const LOCK_TIMEOUT: Duration = Duration::from_secs(30);

/// `SQLite` primary result codes for a locked database file.
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Whether the failure means the store could not be reached at all
    /// (pool timeout, I/O failure, or a busy/locked database file).
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)) => true,
            Self::Database(sqlx::Error::Database(db_err)) => db_err
                .code()
                .and_then(|code| code.parse::<i32>().ok())
                .is_some_and(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED)),
            _ => false,
        }
    }
}

/// Map a unique-constraint violation to `RepositoryError::Conflict`.
pub(crate) fn map_unique_violation(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(err)
}

/// Create a `SQLite` connection pool for the catalog file.
///
/// The file is created if it does not exist. Foreign keys are enforced and
/// writers wait up to 30 seconds for the file lock.
///
/// # Errors
///
/// Returns `sqlx::Error` if the database cannot be opened.
pub async fn create_pool(database_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    create_pool_with_timeout(database_path, LOCK_TIMEOUT).await
}

/// Create a connection pool that waits at most `lock_timeout` for a
/// connection or for the file lock.
///
/// # Errors
///
/// Returns `sqlx::Error` if the database cannot be opened.
pub async fn create_pool_with_timeout(
    database_path: &Path,
    lock_timeout: Duration,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(database_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(lock_timeout);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(lock_timeout)
        .connect_with(options)
        .await
}

/// Apply any pending schema migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the applied history does
/// not match the embedded migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Current time in the stored timestamp format.
pub(crate) fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Format a timestamp as fixed-width RFC 3339 (microseconds, `Z` suffix) so
/// text ordering matches chronological ordering.
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp.
pub(crate) fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid {column} {value:?}: {e}")))
}

/// Single-connection in-memory database with migrations applied.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) async fn memory_pool() -> SqlitePool {
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();

    run_migrations(&pool).await.unwrap();
    pool
}
