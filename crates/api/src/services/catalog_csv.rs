//! CSV import and export for the game catalog.
//!
//! Import is lenient at the row level: a row that cannot become a valid
//! [`NewGame`] is skipped and counted, never fatal. Only a missing file, an
//! unreadable header or missing required columns abort the import.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use sqlx::SqlitePool;
use thiserror::Error;

use retro_games_core::{Condition, NewGame};

use crate::db::{GameRepository, RepositoryError};
use crate::models::game::Game;

/// Columns every import file must have.
pub const REQUIRED_COLUMNS: [&str; 4] = ["title", "release_year", "platform", "date_acquired"];

/// Header written by export.
const EXPORT_HEADER: [&str; 5] = ["title", "release_year", "platform", "date_acquired", "condition"];

/// Errors that abort a CSV import or export.
#[derive(Debug, Error)]
pub enum CsvError {
    /// The import file does not exist.
    #[error("CSV file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The header lacks required columns (sorted).
    #[error("CSV missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// File read or write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV stream itself is unreadable.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Storing or loading games failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Games parsed from an import file.
#[derive(Debug, Default)]
pub struct ParsedGames {
    /// Rows that passed every check.
    pub games: Vec<NewGame>,
    /// Rows that were dropped.
    pub skipped: usize,
}

/// Outcome of [`import_csv`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Games inserted.
    pub imported: usize,
    /// Rows dropped as invalid.
    pub skipped: usize,
}

/// Column positions resolved from the header row.
struct Columns {
    title: usize,
    release_year: usize,
    platform: usize,
    date_acquired: usize,
    condition: Option<usize>,
}

impl Columns {
    fn resolve(header: &[String]) -> Result<Self, CsvError> {
        let find = |name: &str| header.iter().position(|h| h == name);

        let mut missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| find(name).is_none())
            .map(|name| (*name).to_owned())
            .collect();

        match (
            find("title"),
            find("release_year"),
            find("platform"),
            find("date_acquired"),
        ) {
            (Some(title), Some(release_year), Some(platform), Some(date_acquired)) => Ok(Self {
                title,
                release_year,
                platform,
                date_acquired,
                condition: find("condition"),
            }),
            _ => {
                missing.sort();
                Err(CsvError::MissingColumns(missing))
            }
        }
    }
}

/// Parse games from CSV bytes.
///
/// Cells are decoded as UTF-8 with invalid sequences replaced. An unknown
/// condition becomes "no condition" instead of dropping the row.
///
/// # Errors
///
/// Returns `CsvError::MissingColumns` if a required column is absent, or
/// `CsvError::Csv` if the header cannot be read.
pub fn parse_games_csv<R: Read>(input: R) -> Result<ParsedGames, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let header: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect();
    let columns = Columns::resolve(&header)?;

    let mut parsed = ParsedGames::default();

    for (index, result) in reader.byte_records().enumerate() {
        // Header is line 1.
        let line = index + 2;

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(line, error = %e, "Skipping malformed CSV row");
                parsed.skipped += 1;
                continue;
            }
        };

        let cell = |i: usize| {
            record
                .get(i)
                .map(|bytes| String::from_utf8_lossy(bytes).trim().to_owned())
                .unwrap_or_default()
        };

        match row_to_game(
            cell(columns.title),
            &cell(columns.release_year),
            cell(columns.platform),
            &cell(columns.date_acquired),
            columns.condition.map(cell).as_deref(),
        ) {
            Ok(game) => parsed.games.push(game),
            Err(reason) => {
                tracing::debug!(line, reason = %reason, "Skipping invalid CSV row");
                parsed.skipped += 1;
            }
        }
    }

    Ok(parsed)
}

fn row_to_game(
    title: String,
    release_year: &str,
    platform: String,
    date_acquired: &str,
    condition: Option<&str>,
) -> Result<NewGame, String> {
    if title.is_empty() || platform.is_empty() {
        return Err("blank title or platform".to_owned());
    }

    let release_year = release_year
        .parse::<i32>()
        .map_err(|_| format!("invalid release year {release_year:?}"))?;
    let date_acquired = NaiveDate::parse_from_str(date_acquired, "%Y-%m-%d")
        .map_err(|_| format!("invalid date {date_acquired:?}"))?;
    let condition = condition
        .and_then(|raw| Condition::parse_optional(raw).ok())
        .flatten();

    let game = NewGame {
        title,
        release_year,
        platform,
        date_acquired,
        condition,
    };
    game.validate().map_err(|e| e.to_string())?;
    Ok(game)
}

/// Write games as CSV with the export header.
///
/// # Errors
///
/// Returns `CsvError::Csv` if writing fails.
pub fn write_games_csv<W: Write>(output: W, games: &[Game]) -> Result<(), CsvError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(EXPORT_HEADER)?;

    for game in games {
        writer.write_record([
            game.title.as_str(),
            game.release_year.to_string().as_str(),
            game.platform.as_str(),
            game.date_acquired.format("%Y-%m-%d").to_string().as_str(),
            game.condition.map_or("", Condition::as_str),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Import a CSV file into the catalog.
///
/// Accepted rows are inserted in a single transaction.
///
/// # Errors
///
/// Returns `CsvError::NotFound` if the file does not exist, and the errors of
/// [`parse_games_csv`] and the repository otherwise.
pub async fn import_csv(pool: &SqlitePool, path: &Path) -> Result<ImportSummary, CsvError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CsvError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let parsed = parse_games_csv(bytes.as_slice())?;
    let imported = GameRepository::new(pool).create_many(&parsed.games).await?;

    tracing::info!(
        path = %path.display(),
        imported,
        skipped = parsed.skipped,
        "CSV import finished"
    );

    Ok(ImportSummary {
        imported,
        skipped: parsed.skipped,
    })
}

/// Export the whole catalog, ordered by title, to a CSV file.
///
/// # Errors
///
/// Returns `CsvError::Io` if the file cannot be written.
pub async fn export_csv(pool: &SqlitePool, path: &Path) -> Result<usize, CsvError> {
    let games = GameRepository::new(pool).list_all().await?;

    let mut buffer = Vec::new();
    write_games_csv(&mut buffer, &games)?;
    tokio::fs::write(path, buffer).await?;

    tracing::info!(path = %path.display(), exported = games.len(), "CSV export finished");
    Ok(games.len())
}
