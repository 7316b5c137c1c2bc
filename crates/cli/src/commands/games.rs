//! Game catalog commands: `add`, `import`, `export` and `list`.

use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use sqlx::SqlitePool;

use retro_games_api::db::GameRepository;
use retro_games_api::services::{export_csv, import_csv};
use retro_games_core::{Condition, NewGame};

use super::{CommandError, render_table};

/// Raw `add` arguments as typed on the command line.
#[derive(Debug, Clone)]
pub struct AddGame {
    pub title: String,
    pub release_year: i32,
    pub platform: String,
    pub date_acquired: String,
    pub condition: Option<String>,
}

impl AddGame {
    fn into_new_game(self) -> Result<NewGame, CommandError> {
        let date_acquired = NaiveDate::parse_from_str(self.date_acquired.trim(), "%Y-%m-%d")
            .map_err(|_| CommandError::InvalidDate(self.date_acquired.clone()))?;
        let condition = match self.condition.as_deref() {
            Some(raw) => Condition::parse_optional(raw)?,
            None => None,
        };

        let game = NewGame {
            title: self.title,
            release_year: self.release_year,
            platform: self.platform,
            date_acquired,
            condition,
        };
        game.validate()?;
        Ok(game)
    }
}

/// Add a single game.
///
/// # Errors
///
/// Returns `CommandError` if an argument is invalid or the insert fails.
pub async fn add(pool: &SqlitePool, args: AddGame, out: &mut impl Write) -> Result<(), CommandError> {
    let game = args.into_new_game()?;
    let created = GameRepository::new(pool).create(&game).await?;

    writeln!(
        out,
        "Added: {} ({}, {}) acquired {}{} [id {}]",
        created.title,
        created.platform,
        created.release_year,
        created.date_acquired,
        created
            .condition
            .map(|c| format!(", condition {c}"))
            .unwrap_or_default(),
        created.id
    )?;
    Ok(())
}

/// Import games from a CSV file.
///
/// # Errors
///
/// Returns `CommandError::Csv` if the file is missing or lacks required columns.
pub async fn import(pool: &SqlitePool, csv: &Path, out: &mut impl Write) -> Result<(), CommandError> {
    let summary = import_csv(pool, csv).await?;

    writeln!(out, "Imported {} rows from {}", summary.imported, csv.display())?;
    if summary.skipped > 0 {
        writeln!(out, "Skipped {} invalid rows", summary.skipped)?;
    }
    Ok(())
}

/// Export every game to a CSV file.
///
/// # Errors
///
/// Returns `CommandError::Csv` if the file cannot be written.
pub async fn export(pool: &SqlitePool, csv: &Path, out: &mut impl Write) -> Result<(), CommandError> {
    let count = export_csv(pool, csv).await?;
    writeln!(out, "Exported {count} rows to {}", csv.display())?;
    Ok(())
}

/// Print the catalog as a table ordered by title.
///
/// # Errors
///
/// Returns `CommandError::Repository` if the games cannot be loaded.
pub async fn list(pool: &SqlitePool, out: &mut impl Write) -> Result<(), CommandError> {
    let games = GameRepository::new(pool).list_all().await?;

    if games.is_empty() {
        writeln!(out, "No games found.")?;
        return Ok(());
    }

    let rows: Vec<[String; 5]> = games
        .into_iter()
        .map(|game| {
            [
                game.title,
                game.release_year.to_string(),
                game.platform,
                game.date_acquired.to_string(),
                game.condition.map(|c| c.to_string()).unwrap_or_default(),
            ]
        })
        .collect();

    write!(
        out,
        "{}",
        render_table(["Title", "Year", "Platform", "Acquired", "Condition"], &rows)
    )?;
    Ok(())
}
