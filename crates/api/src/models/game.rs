//! Game catalog domain types.

use chrono::NaiveDate;
use serde::Serialize;

use retro_games_core::{Condition, GameId, NewGame};

/// A catalogued game (domain type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    /// Unique game ID.
    pub id: GameId,
    /// Game title.
    pub title: String,
    /// Year the game was released.
    pub release_year: i32,
    /// Platform, e.g. `SNES`.
    pub platform: String,
    /// Date the copy was acquired (serialized as `YYYY-MM-DD`).
    pub date_acquired: NaiveDate,
    /// Condition grade, if recorded.
    pub condition: Option<Condition>,
}

impl Game {
    /// Attach an ID to validated fields.
    #[must_use]
    pub fn from_new(id: GameId, game: NewGame) -> Self {
        Self {
            id,
            title: game.title,
            release_year: game.release_year,
            platform: game.platform,
            date_acquired: game.date_acquired,
            condition: game.condition,
        }
    }
}

/// One page of games plus paging metadata.
#[derive(Debug, Clone, Serialize)]
pub struct GamePage {
    /// Games on this page.
    pub games: Vec<Game>,
    /// Total number of games in the catalog.
    pub total: i64,
    /// Current page number (1-indexed).
    pub page: i64,
    /// Number of items per page.
    pub page_size: i64,
    /// Total number of pages.
    pub total_pages: i64,
}

impl GamePage {
    /// Build a page, deriving `total_pages` by ceiling division.
    #[must_use]
    pub fn new(games: Vec<Game>, total: i64, page: i64, page_size: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total + page_size - 1) / page_size
        } else {
            0
        };
        Self {
            games,
            total,
            page,
            page_size,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(GamePage::new(Vec::new(), 170, 1, 25).total_pages, 7);
        assert_eq!(GamePage::new(Vec::new(), 175, 1, 25).total_pages, 7);
        assert_eq!(GamePage::new(Vec::new(), 176, 1, 25).total_pages, 8);
        assert_eq!(GamePage::new(Vec::new(), 0, 1, 25).total_pages, 0);
    }
}
