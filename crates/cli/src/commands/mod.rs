//! CLI command implementations.
//!
//! Commands write their results to the `out` writer they are given (stdout
//! in the binary) and log diagnostics through `tracing`.

pub mod admin;
pub mod games;
pub mod init;

use std::path::Path;

use sqlx::SqlitePool;
use thiserror::Error;

use retro_games_api::db::{self, RepositoryError};
use retro_games_api::services::{AdminError, CsvError};
use retro_games_core::{ConditionError, GameValidationError, Username};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Opening the database failed.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Applying the schema failed.
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// A repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Game fields are invalid.
    #[error("Invalid game: {0}")]
    InvalidGame(#[from] GameValidationError),

    /// Condition argument is not a known grade.
    #[error(transparent)]
    InvalidCondition(#[from] ConditionError),

    /// Date argument is not `YYYY-MM-DD`.
    #[error("date must be in YYYY-MM-DD format (got {0:?})")]
    InvalidDate(String),

    /// CSV import or export failed.
    #[error(transparent)]
    Csv(#[from] CsvError),

    /// An admin credential operation failed.
    #[error(transparent)]
    Admin(#[from] AdminError),

    /// Interactive prompt failed.
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No admin account has this username.
    #[error("no admin user named {0}")]
    UnknownAdmin(Username),

    /// The password did not match (or the account does not exist).
    #[error("password does not match")]
    PasswordMismatch,

    /// No password was supplied on standard input.
    #[error("no password provided on standard input")]
    EmptyPassword,

    /// Every interactive password attempt was rejected by the policy.
    #[error("password rejected {0} times, giving up")]
    TooManyAttempts(u32),
}

/// Open the catalog database and apply any pending migrations.
///
/// # Errors
///
/// Returns `CommandError::Database` if the file cannot be opened, or
/// `CommandError::Migrate` if the schema cannot be applied.
pub async fn open_database(path: &Path) -> Result<SqlitePool, CommandError> {
    let pool = db::create_pool(path).await?;
    db::run_migrations(&pool).await?;
    tracing::debug!(path = %path.display(), "Database opened");
    Ok(pool)
}

/// Render rows as an aligned text table.
///
/// Columns are separated by ` | ` and padded to the widest cell, with a
/// `-+-` separator line under the header.
#[must_use]
pub fn render_table<const N: usize>(headers: [&str; N], rows: &[[String; N]]) -> String {
    let mut widths = headers.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut table = table_line(headers.iter().copied(), &widths);
    table.push('\n');
    table.push_str(
        &widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    table.push('\n');

    for row in rows {
        table.push_str(&table_line(row.iter().map(String::as_str), &widths));
        table.push('\n');
    }
    table
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    padded.join(" | ").trim_end().to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table_pads_columns() {
        let table = render_table(
            ["Title", "Year"],
            &[
                ["Chrono Trigger".to_owned(), "1995".to_owned()],
                ["Doom".to_owned(), "1993".to_owned()],
            ],
        );

        assert_eq!(
            table,
            "Title          | Year\n\
             ---------------+-----\n\
             Chrono Trigger | 1995\n\
             Doom           | 1993\n"
        );
    }

    #[test]
    fn test_render_table_trims_trailing_padding() {
        let table = render_table(
            ["Title", "Condition"],
            &[["Zelda".to_owned(), String::new()]],
        );
        assert!(table.lines().all(|line| !line.ends_with(' ')));
    }

    #[tokio::test]
    async fn test_open_database_creates_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");

        let pool = open_database(&path).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM games")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
