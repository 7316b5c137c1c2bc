//! Game repository for database operations.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use retro_games_core::{Condition, GameId, NewGame};

use super::RepositoryError;
use crate::models::game::Game;

/// Internal row type for game queries.
#[derive(Debug, sqlx::FromRow)]
struct GameRow {
    id: GameId,
    title: String,
    release_year: i32,
    platform: String,
    date_acquired: String,
    condition: Option<String>,
}

impl TryFrom<GameRow> for Game {
    type Error = RepositoryError;

    fn try_from(row: GameRow) -> Result<Self, Self::Error> {
        let date_acquired = NaiveDate::parse_from_str(&row.date_acquired, "%Y-%m-%d").map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "invalid date_acquired {:?} for game {}: {e}",
                row.date_acquired, row.id
            ))
        })?;

        let condition = row
            .condition
            .as_deref()
            .map(str::parse::<Condition>)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid condition for game {}: {e}", row.id))
            })?;

        Ok(Self {
            id: row.id,
            title: row.title,
            release_year: row.release_year,
            platform: row.platform,
            date_acquired,
            condition,
        })
    }
}

const GAME_COLUMNS: &str = "id, title, release_year, platform, date_acquired, condition";

/// Stored text form of an acquisition date.
fn date_text(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Repository for game database operations.
pub struct GameRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> GameRepository<'a> {
    /// Create a new game repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a game and return it with its assigned ID.
    ///
    /// Callers validate fields first; the database still enforces the
    /// condition `CHECK` constraint.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, game: &NewGame) -> Result<Game, RepositoryError> {
        let id: GameId = sqlx::query_scalar(
            r"
            INSERT INTO games (title, release_year, platform, date_acquired, condition)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            ",
        )
        .bind(&game.title)
        .bind(game.release_year)
        .bind(&game.platform)
        .bind(date_text(game.date_acquired))
        .bind(game.condition.map(Condition::as_str))
        .fetch_one(self.pool)
        .await?;

        Ok(Game::from_new(id, game.clone()))
    }

    /// Insert many games in one transaction.
    ///
    /// Either every game is inserted or none are.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails.
    pub async fn create_many(&self, games: &[NewGame]) -> Result<usize, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        for game in games {
            sqlx::query(
                r"
                INSERT INTO games (title, release_year, platform, date_acquired, condition)
                VALUES (?, ?, ?, ?, ?)
                ",
            )
            .bind(&game.title)
            .bind(game.release_year)
            .bind(&game.platform)
            .bind(date_text(game.date_acquired))
            .bind(game.condition.map(Condition::as_str))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(games.len())
    }

    /// Get a game by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_id(&self, id: GameId) -> Result<Option<Game>, RepositoryError> {
        let row = sqlx::query_as::<_, GameRow>(&format!(
            "SELECT {GAME_COLUMNS} FROM games WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// List one page of games, newest release year first.
    ///
    /// `page` is 1-indexed. Ties on release year are broken by ID so paging
    /// is stable. Pages past the end are empty, however far out they are.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list_page(&self, page: i64, page_size: i64) -> Result<Vec<Game>, RepositoryError> {
        let offset = (page.max(1) - 1).saturating_mul(page_size.max(0));

        let rows = sqlx::query_as::<_, GameRow>(&format!(
            "SELECT {GAME_COLUMNS} FROM games ORDER BY release_year DESC, id ASC LIMIT ? OFFSET ?"
        ))
        .bind(page_size)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// List every game ordered by title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list_all(&self) -> Result<Vec<Game>, RepositoryError> {
        let rows = sqlx::query_as::<_, GameRow>(&format!(
            "SELECT {GAME_COLUMNS} FROM games ORDER BY title, id"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Count all games.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let total = sqlx::query_scalar("SELECT COUNT(*) FROM games")
            .fetch_one(self.pool)
            .await?;
        Ok(total)
    }

    /// Replace every field of an existing game.
    ///
    /// Returns `None` if no game has this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(&self, id: GameId, game: &NewGame) -> Result<Option<Game>, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE games
            SET title = ?, release_year = ?, platform = ?, date_acquired = ?, condition = ?
            WHERE id = ?
            ",
        )
        .bind(&game.title)
        .bind(game.release_year)
        .bind(&game.platform)
        .bind(date_text(game.date_acquired))
        .bind(game.condition.map(Condition::as_str))
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(Game::from_new(id, game.clone())))
    }

    /// Delete a game.
    ///
    /// Returns `false` if no game has this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: GameId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM games WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
