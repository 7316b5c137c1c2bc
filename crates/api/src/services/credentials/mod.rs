//! Admin credential service.
//!
//! Ties the password policy, the Argon2id hasher and the admin user
//! repository together. Plaintext passwords arrive as `SecretString` and are
//! only exposed for the policy check and the hash computation.

mod error;
pub mod hasher;
pub mod policy;

pub use error::{AdminError, CredentialError};
pub use hasher::CredentialHasher;
pub use policy::{MIN_PASSWORD_LENGTH, PASSWORD_SYMBOLS, PolicyViolation, check_password};

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;

use retro_games_core::Username;

use crate::db::RepositoryError;
use crate::db::admin_users::AdminUserRepository;
use crate::models::admin_user::{AdminUser, NewAdminUser, PasswordDigest};

/// Admin account service.
///
/// Handles account creation, listing, removal and password changes.
pub struct AdminService<'a> {
    users: AdminUserRepository<'a>,
    hasher: &'a CredentialHasher,
}

impl<'a> AdminService<'a> {
    /// Create a new admin service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, hasher: &'a CredentialHasher) -> Self {
        Self {
            users: AdminUserRepository::new(pool),
            hasher,
        }
    }

    /// Create an admin account.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::InvalidUsername` if the username is malformed.
    /// Returns `AdminError::PolicyViolation` if the password is too weak.
    /// Returns `AdminError::DuplicateUsername` if the username is taken; the
    /// existing account is left untouched.
    pub async fn add(
        &self,
        username: &str,
        firstname: Option<&str>,
        lastname: Option<&str>,
        password: &SecretString,
    ) -> Result<AdminUser, AdminError> {
        let username = Username::parse(username)?;
        let digest = self.digest_for(password)?;

        let new_user = NewAdminUser {
            username,
            firstname: firstname.map(str::to_owned),
            lastname: lastname.map(str::to_owned),
        };

        let user = self
            .users
            .create(&new_user, &digest)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    AdminError::DuplicateUsername(new_user.username.clone())
                }
                other => other.into(),
            })?;

        tracing::info!(admin_id = %user.id, username = %user.username, "Admin user created");
        Ok(user)
    }

    /// List all admin accounts in creation order, without digests.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::StorageUnavailable` or `AdminError::Repository`
    /// if the query fails.
    pub async fn list(&self) -> Result<Vec<AdminUser>, AdminError> {
        Ok(self.users.list_all().await?)
    }

    /// Look up one admin account.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::InvalidUsername` if the username is malformed.
    pub async fn find(&self, username: &str) -> Result<Option<AdminUser>, AdminError> {
        let username = Username::parse(username)?;
        Ok(self.users.get_by_username(&username).await?)
    }

    /// Remove an admin account.
    ///
    /// Returns `false`, not an error, if there was no such account. A
    /// malformed username can never have been stored, so it is simply not
    /// found.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::StorageUnavailable` or `AdminError::Repository`
    /// if the delete fails.
    pub async fn remove(&self, username: &str) -> Result<bool, AdminError> {
        let Ok(username) = Username::parse(username) else {
            tracing::debug!(username, "No admin user to remove (malformed username)");
            return Ok(false);
        };
        let removed = self.users.delete_by_username(&username).await?;

        if removed {
            tracing::info!(username = %username, "Admin user removed");
        } else {
            tracing::debug!(username = %username, "No admin user to remove");
        }
        Ok(removed)
    }

    /// Replace an account's password.
    ///
    /// Returns `false` if there is no such account.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::PolicyViolation` if the new password is too weak.
    pub async fn change_password(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<bool, AdminError> {
        let username = Username::parse(username)?;
        let digest = self.digest_for(password)?;

        let updated = self.users.update_password(&username, &digest).await?;
        if updated {
            tracing::info!(username = %username, "Admin password changed");
        }
        Ok(updated)
    }

    /// Check a password attempt for an account.
    ///
    /// Unknown accounts and wrong passwords both yield `false`.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::CorruptCredential` if the stored digest is empty
    /// or malformed.
    pub async fn verify(&self, username: &str, password: &SecretString) -> Result<bool, AdminError> {
        let username = Username::parse(username)?;

        let digest = match self.users.get_password_digest(&username).await {
            Ok(Some(digest)) => digest,
            Ok(None) => return Ok(false),
            Err(RepositoryError::DataCorruption(reason)) => {
                return Err(AdminError::CorruptCredential { username, reason });
            }
            Err(other) => return Err(other.into()),
        };

        self.hasher
            .verify(password.expose_secret(), &digest)
            .map_err(|e| match e {
                CredentialError::Corrupt(reason) => AdminError::CorruptCredential {
                    username: username.clone(),
                    reason,
                },
                CredentialError::Hash => AdminError::Hashing,
            })
    }

    /// Policy-check and hash a plaintext password.
    fn digest_for(&self, password: &SecretString) -> Result<PasswordDigest, AdminError> {
        check_password(password.expose_secret())?;
        self.hasher
            .hash(password.expose_secret())
            .map_err(|_| AdminError::Hashing)
    }
}
