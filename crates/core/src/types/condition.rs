//! Physical condition of a catalogued game.

use serde::{Deserialize, Serialize};

/// Error returned when a condition string is not one of the known grades.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("condition must be one of ['gc', 'mint', 'used', 'vgc'] (got {0:?})")]
pub struct ConditionError(pub String);

/// Condition grade of a game copy.
///
/// Stored as lowercase text; the database enforces the same set with a
/// `CHECK` constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Mint.
    Mint,
    /// Very good condition.
    Vgc,
    /// Good condition.
    Gc,
    /// Used.
    Used,
}

impl Condition {
    /// All grades, in display order.
    pub const ALL: [Self; 4] = [Self::Mint, Self::Vgc, Self::Gc, Self::Used];

    /// The stored text form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mint => "mint",
            Self::Vgc => "vgc",
            Self::Gc => "gc",
            Self::Used => "used",
        }
    }

    /// Parse optional user input.
    ///
    /// Empty or whitespace-only input means "no condition". Anything else is
    /// trimmed and matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `ConditionError` if the trimmed input is not a known grade.
    pub fn parse_optional(input: &str) -> Result<Option<Self>, ConditionError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Condition {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mint" => Ok(Self::Mint),
            "vgc" => Ok(Self::Vgc),
            "gc" => Ok(Self::Gc),
            "used" => Ok(Self::Used),
            _ => Err(ConditionError(s.to_owned())),
        }
    }
}
