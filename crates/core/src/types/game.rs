//! Game catalog entry fields and their validation rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Condition;

/// Reasons a [`NewGame`] is rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameValidationError {
    /// Title is empty or whitespace.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Title exceeds the maximum length.
    #[error("title exceeds maximum length of {max} characters")]
    TitleTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// Platform is empty or whitespace.
    #[error("platform must not be empty")]
    EmptyPlatform,
    /// Platform exceeds the maximum length.
    #[error("platform exceeds maximum length of {max} characters")]
    PlatformTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// Release year is outside the supported range.
    #[error("release year must be between {min} and {max} (got {year})")]
    ReleaseYearOutOfRange {
        /// The rejected year.
        year: i32,
        /// Earliest accepted year.
        min: i32,
        /// Latest accepted year.
        max: i32,
    },
}

/// The user-supplied fields of a game, before it has an ID.
///
/// Used for both creation and full replacement. `date_acquired` serializes as
/// an ISO `YYYY-MM-DD` date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGame {
    /// Game title.
    pub title: String,
    /// Year the game was released.
    pub release_year: i32,
    /// Platform, e.g. `SNES` or `PS1`.
    pub platform: String,
    /// Date the copy was acquired.
    pub date_acquired: NaiveDate,
    /// Condition grade, if recorded.
    #[serde(default)]
    pub condition: Option<Condition>,
}

impl NewGame {
    /// Maximum title length in characters.
    pub const MAX_TITLE_LENGTH: usize = 500;
    /// Maximum platform length in characters.
    pub const MAX_PLATFORM_LENGTH: usize = 100;
    /// Earliest accepted release year.
    pub const MIN_RELEASE_YEAR: i32 = 1970;
    /// Latest accepted release year.
    pub const MAX_RELEASE_YEAR: i32 = 2030;

    /// Check the field rules shared by the CLI, CSV import and the REST API.
    ///
    /// # Errors
    ///
    /// Returns the first rule the fields violate.
    pub fn validate(&self) -> Result<(), GameValidationError> {
        if self.title.trim().is_empty() {
            return Err(GameValidationError::EmptyTitle);
        }
        if self.title.chars().count() > Self::MAX_TITLE_LENGTH {
            return Err(GameValidationError::TitleTooLong {
                max: Self::MAX_TITLE_LENGTH,
            });
        }
        if self.platform.trim().is_empty() {
            return Err(GameValidationError::EmptyPlatform);
        }
        if self.platform.chars().count() > Self::MAX_PLATFORM_LENGTH {
            return Err(GameValidationError::PlatformTooLong {
                max: Self::MAX_PLATFORM_LENGTH,
            });
        }
        if !(Self::MIN_RELEASE_YEAR..=Self::MAX_RELEASE_YEAR).contains(&self.release_year) {
            return Err(GameValidationError::ReleaseYearOutOfRange {
                year: self.release_year,
                min: Self::MIN_RELEASE_YEAR,
                max: Self::MAX_RELEASE_YEAR,
            });
        }
        Ok(())
    }
}
