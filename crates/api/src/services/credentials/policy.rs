//! Password strength policy.
//!
//! A fixed rule set checked before a password is hashed. Input is
//! NFC-normalized first, so composed and decomposed spellings of the same
//! text are measured identically.

use unicode_normalization::UnicodeNormalization;

/// Minimum password length, in Unicode scalar values after NFC normalization.
pub const MIN_PASSWORD_LENGTH: usize = 12;

/// Characters that satisfy the symbol rule.
pub const PASSWORD_SYMBOLS: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

/// The first rule a candidate password fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyViolation {
    /// Fewer than [`MIN_PASSWORD_LENGTH`] characters.
    #[error("password must be at least {min} characters long (got {actual})")]
    TooShort {
        /// Required length.
        min: usize,
        /// Length of the candidate.
        actual: usize,
    },
    /// No alphabetic character.
    #[error("password must contain at least one letter")]
    MissingLetter,
    /// No ASCII digit.
    #[error("password must contain at least one digit")]
    MissingDigit,
    /// No character from [`PASSWORD_SYMBOLS`].
    #[error("password must contain at least one symbol from {symbols}")]
    MissingSymbol {
        /// The accepted symbol set.
        symbols: &'static str,
    },
}

/// Check a candidate password against the policy.
///
/// Rules are evaluated in order (length, letter, digit, symbol) and the first
/// failure is returned.
///
/// # Errors
///
/// Returns the first [`PolicyViolation`] the candidate triggers.
pub fn check_password(candidate: &str) -> Result<(), PolicyViolation> {
    let normalized: String = candidate.nfc().collect();

    let length = normalized.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(PolicyViolation::TooShort {
            min: MIN_PASSWORD_LENGTH,
            actual: length,
        });
    }

    if !normalized.chars().any(char::is_alphabetic) {
        return Err(PolicyViolation::MissingLetter);
    }

    if !normalized.chars().any(|c| c.is_ascii_digit()) {
        return Err(PolicyViolation::MissingDigit);
    }

    if !normalized.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        return Err(PolicyViolation::MissingSymbol {
            symbols: PASSWORD_SYMBOLS,
        });
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_password_passes() {
        assert_eq!(check_password("Str0ng!Passw0rd"), Ok(()));
        assert_eq!(check_password("aaaaaaaaaa1!"), Ok(()));
    }

    #[test]
    fn test_every_short_password_fails_on_length() {
        for len in 0..MIN_PASSWORD_LENGTH {
            // Otherwise satisfies every class rule once long enough.
            let candidate: String = "a1!".chars().cycle().take(len).collect();
            assert_eq!(
                check_password(&candidate),
                Err(PolicyViolation::TooShort {
                    min: MIN_PASSWORD_LENGTH,
                    actual: len,
                }),
                "length {len}"
            );
        }
    }

    #[test]
    fn test_missing_character_classes() {
        assert_eq!(
            check_password("1234567890!@#"),
            Err(PolicyViolation::MissingLetter)
        );
        assert_eq!(
            check_password("abcdefghijk!"),
            Err(PolicyViolation::MissingDigit)
        );
        assert!(matches!(
            check_password("abcdefghijk1"),
            Err(PolicyViolation::MissingSymbol { .. })
        ));
    }

    #[test]
    fn test_every_symbol_counts() {
        for symbol in PASSWORD_SYMBOLS.chars() {
            let candidate = format!("abcdefghij1{symbol}");
            assert_eq!(check_password(&candidate), Ok(()), "symbol {symbol:?}");
        }
    }

    #[test]
    fn test_whitespace_is_not_a_symbol() {
        assert!(matches!(
            check_password("abcdefghij1 "),
            Err(PolicyViolation::MissingSymbol { .. })
        ));
    }

    #[test]
    fn test_unicode_letters_count_as_letters() {
        assert_eq!(check_password("\u{3b1}\u{3b2}\u{3b3}\u{3b4}\u{3b5}\u{3b6}\u{3b7}\u{3b8}\u{3b9}\u{3ba}1!"), Ok(()));
    }

    #[test]
    fn test_length_is_measured_after_nfc() {
        // "e" + combining acute is one character once composed.
        let decomposed = "e\u{301}".repeat(6) + "1!";
        assert_eq!(decomposed.chars().count(), 14);
        assert_eq!(
            check_password(&decomposed),
            Err(PolicyViolation::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: 8,
            })
        );
    }

    #[test]
    fn test_reason_is_human_readable() {
        let err = check_password("short").unwrap_err();
        assert_eq!(
            err.to_string(),
            "password must be at least 12 characters long (got 5)"
        );
    }
}
