//! Credential error types.

use thiserror::Error;

use retro_games_core::{Username, UsernameError};

use super::policy::PolicyViolation;
use crate::db::RepositoryError;

/// Errors from the credential hasher.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The stored digest is malformed or unusable.
    #[error("corrupt credential: {0}")]
    Corrupt(String),

    /// Argon2 could not produce a digest.
    #[error("password hashing error")]
    Hash,
}

/// Errors that can occur during admin account operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Password fails the strength policy.
    #[error("password rejected: {0}")]
    PolicyViolation(#[from] PolicyViolation),

    /// Username fails the format rules.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// Username is already taken.
    #[error("admin user already exists with username: {0}")]
    DuplicateUsername(Username),

    /// Stored credential for this account is unusable.
    #[error("corrupt credential for admin {username}: {reason}")]
    CorruptCredential {
        /// Affected account.
        username: Username,
        /// What is wrong with the digest.
        reason: String,
    },

    /// Password hashing failed.
    #[error("password hashing error")]
    Hashing,

    /// The database could not be reached or is locked.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] RepositoryError),

    /// Any other repository/database error.
    #[error("database error: {0}")]
    Repository(#[source] RepositoryError),
}

impl From<RepositoryError> for AdminError {
    fn from(err: RepositoryError) -> Self {
        if err.is_unavailable() {
            Self::StorageUnavailable(err)
        } else {
            Self::Repository(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locked_database_is_storage_unavailable() {
        let err = AdminError::from(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, AdminError::StorageUnavailable(_)));

        let err = AdminError::from(RepositoryError::DataCorruption("bad row".to_owned()));
        assert!(matches!(err, AdminError::Repository(_)));
    }

    #[test]
    fn test_policy_reason_is_surfaced() {
        let err = AdminError::from(PolicyViolation::MissingDigit);
        assert_eq!(
            err.to_string(),
            "password rejected: password must contain at least one digit"
        );
    }
}
