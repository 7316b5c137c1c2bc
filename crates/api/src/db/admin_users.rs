//! Admin user repository for database operations.
//!
//! Every operation is a single statement, so each one is atomic on its own.
//! The password digest is only ever read by [`AdminUserRepository::get_password_digest`];
//! all other queries leave the column out.

use sqlx::SqlitePool;

use retro_games_core::{AdminUserId, Username};

use super::{RepositoryError, map_unique_violation, now_timestamp, parse_timestamp};
use crate::models::admin_user::{AdminUser, NewAdminUser, PasswordDigest};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for admin user queries (no digest column).
#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: AdminUserId,
    username: String,
    firstname: Option<String>,
    lastname: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<AdminUserRow> for AdminUser {
    type Error = RepositoryError;

    fn try_from(row: AdminUserRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            username,
            firstname: row.firstname,
            lastname: row.lastname,
            created_at: parse_timestamp(&row.created_at, "created_at")?,
            updated_at: parse_timestamp(&row.updated_at, "updated_at")?,
        })
    }
}

const ADMIN_USER_COLUMNS: &str = "id, username, firstname, lastname, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for admin user database operations.
pub struct AdminUserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AdminUserRepository<'a> {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new admin user.
    ///
    /// `created_at` and `updated_at` are both set to the current time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        user: &NewAdminUser,
        digest: &PasswordDigest,
    ) -> Result<AdminUser, RepositoryError> {
        let now = now_timestamp();

        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            r"
            INSERT INTO admin_users (username, firstname, lastname, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {ADMIN_USER_COLUMNS}
            "
        ))
        .bind(user.username.as_str())
        .bind(user.firstname.as_deref())
        .bind(user.lastname.as_deref())
        .bind(digest.expose())
        .bind(&now)
        .bind(&now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "username"))?;

        row.try_into()
    }

    /// List all admin users in creation order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list_all(&self) -> Result<Vec<AdminUser>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminUserRow>(&format!(
            "SELECT {ADMIN_USER_COLUMNS} FROM admin_users ORDER BY id ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get an admin user by username (exact, case-sensitive match).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<AdminUser>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            "SELECT {ADMIN_USER_COLUMNS} FROM admin_users WHERE username = ?"
        ))
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get the stored password digest for a username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored digest is empty.
    pub async fn get_password_digest(
        &self,
        username: &Username,
    ) -> Result<Option<PasswordDigest>, RepositoryError> {
        let digest: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM admin_users WHERE username = ?")
                .bind(username.as_str())
                .fetch_optional(self.pool)
                .await?;

        digest
            .map(|phc| {
                PasswordDigest::new(phc).ok_or_else(|| {
                    RepositoryError::DataCorruption(format!(
                        "empty password digest for admin {username}"
                    ))
                })
            })
            .transpose()
    }

    /// Replace the password digest for a username and bump `updated_at`.
    ///
    /// Returns `false` if no such user exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update_password(
        &self,
        username: &Username,
        digest: &PasswordDigest,
    ) -> Result<bool, RepositoryError> {
        let now = now_timestamp();

        let result = sqlx::query(
            r"
            UPDATE admin_users
            SET password_hash = ?, updated_at = max(created_at, ?)
            WHERE username = ?
            ",
        )
        .bind(digest.expose())
        .bind(&now)
        .bind(username.as_str())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an admin user by username.
    ///
    /// Returns `false` if no such user exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_by_username(&self, username: &Username) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM admin_users WHERE username = ?")
            .bind(username.as_str())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
