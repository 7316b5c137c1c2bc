//! Admin username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    /// The input is shorter than the minimum length.
    #[error("username must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input is longer than the maximum length.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[A-Za-z0-9_-]`.
    #[error("username may only contain letters, digits, '_' and '-' (found {0:?})")]
    InvalidCharacter(char),
}

/// An admin account username.
///
/// ## Constraints
///
/// - Length: 3-50 characters
/// - Only ASCII letters, digits, underscore and hyphen
///
/// Comparison is exact and case-sensitive: `Alice` and `alice` are different
/// usernames.
///
/// ## Examples
///
/// ```
/// use retro_games_core::Username;
///
/// assert!(Username::parse("alice123").is_ok());
/// assert!(Username::parse("retro-admin_2").is_ok());
///
/// assert!(Username::parse("al").is_err());        // too short
/// assert!(Username::parse("bob smith").is_err()); // space
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Minimum length of a username.
    pub const MIN_LENGTH: usize = 3;

    /// Maximum length of a username.
    pub const MAX_LENGTH: usize = 50;

    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is shorter than 3 or longer than 50
    /// characters, or contains anything other than ASCII alphanumerics,
    /// `_` or `-`.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(UsernameError::InvalidCharacter(c));
        }

        // All characters are ASCII past this point, so byte length == char count.
        if s.len() < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_usernames() {
        assert!(Username::parse("abc").is_ok());
        assert!(Username::parse("alice123").is_ok());
        assert!(Username::parse("retro_admin").is_ok());
        assert!(Username::parse("retro-admin").is_ok());
        assert!(Username::parse(&"a".repeat(50)).is_ok());
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            Username::parse(""),
            Err(UsernameError::TooShort { min: 3 })
        ));
        assert!(matches!(
            Username::parse("ab"),
            Err(UsernameError::TooShort { .. })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            Username::parse(&"a".repeat(51)),
            Err(UsernameError::TooLong { max: 50 })
        ));
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert_eq!(
            Username::parse("bob smith"),
            Err(UsernameError::InvalidCharacter(' '))
        );
        assert_eq!(
            Username::parse("admin@home"),
            Err(UsernameError::InvalidCharacter('@'))
        );
        assert_eq!(
            Username::parse("jos\u{e9}"),
            Err(UsernameError::InvalidCharacter('\u{e9}'))
        );
    }

    #[test]
    fn test_case_is_preserved() {
        let upper = Username::parse("Alice").unwrap();
        let lower = Username::parse("alice").unwrap();
        assert_ne!(upper, lower);
        assert_eq!(upper.as_str(), "Alice");
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let parsed: Username = serde_json::from_str("\"alice123\"").unwrap();
        assert_eq!(parsed.as_str(), "alice123");
        assert!(serde_json::from_str::<Username>("\"a b\"").is_err());
    }
}
