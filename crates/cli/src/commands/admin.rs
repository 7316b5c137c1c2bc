//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create an admin (prompts for a hidden, confirmed password)
//! retro-games admin add alice123 --firstname Alice --lastname Liddell
//!
//! # Non-interactive: read the password from standard input
//! printf '%s\n' "$PASSWORD" | retro-games admin add alice123 --password-stdin
//!
//! # List, change password, check a password, remove
//! retro-games admin list
//! retro-games admin passwd alice123
//! retro-games admin verify alice123
//! retro-games admin remove alice123 --yes
//! ```
//!
//! Passwords are never accepted as command-line arguments.

use std::io::{BufRead, Write};

use chrono::SecondsFormat;
use dialoguer::Password;
use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;

use retro_games_api::services::credentials::{
    AdminError, AdminService, CredentialHasher, check_password,
};
use retro_games_core::Username;

use super::{CommandError, render_table};

/// Interactive password entries allowed before giving up.
pub const MAX_PASSWORD_ATTEMPTS: u32 = 3;

/// Where passwords come from.
pub trait PasswordInput {
    /// Read a password that is about to be stored.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` if input cannot be read.
    fn new_password(&mut self) -> Result<SecretString, CommandError>;

    /// Read a password attempt to check against the stored one.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` if input cannot be read.
    fn existing_password(&mut self) -> Result<SecretString, CommandError>;

    /// Whether a rejected password may be entered again.
    fn can_retry(&self) -> bool;
}

impl<T: PasswordInput + ?Sized> PasswordInput for Box<T> {
    fn new_password(&mut self) -> Result<SecretString, CommandError> {
        (**self).new_password()
    }

    fn existing_password(&mut self) -> Result<SecretString, CommandError> {
        (**self).existing_password()
    }

    fn can_retry(&self) -> bool {
        (**self).can_retry()
    }
}

/// Hidden-input terminal prompts.
pub struct TerminalPrompt;

impl PasswordInput for TerminalPrompt {
    fn new_password(&mut self) -> Result<SecretString, CommandError> {
        let password = Password::new()
            .with_prompt("New password")
            .with_confirmation("Confirm password", "Passwords do not match, try again")
            .interact()?;
        Ok(SecretString::from(password))
    }

    fn existing_password(&mut self) -> Result<SecretString, CommandError> {
        let password = Password::new().with_prompt("Password").interact()?;
        Ok(SecretString::from(password))
    }

    fn can_retry(&self) -> bool {
        true
    }
}

/// One password per line from a reader (standard input in the binary).
pub struct StdinPassword<R> {
    reader: R,
}

impl<R: BufRead> StdinPassword<R> {
    /// Read passwords from `reader`.
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }

    fn read_line(&mut self) -> Result<SecretString, CommandError> {
        let mut line = String::new();
        self.reader.read_line(&mut line)?;

        let password = line.trim_end_matches(['\r', '\n']);
        if password.is_empty() {
            return Err(CommandError::EmptyPassword);
        }
        Ok(SecretString::from(password.to_owned()))
    }
}

impl<R: BufRead> PasswordInput for StdinPassword<R> {
    fn new_password(&mut self) -> Result<SecretString, CommandError> {
        self.read_line()
    }

    fn existing_password(&mut self) -> Result<SecretString, CommandError> {
        self.read_line()
    }

    fn can_retry(&self) -> bool {
        false
    }
}

/// Read a new password until it satisfies the policy.
///
/// Each rejection is reported with the rule it broke. Non-interactive input
/// gets a single attempt.
fn read_acceptable_password(
    input: &mut impl PasswordInput,
    out: &mut impl Write,
) -> Result<SecretString, CommandError> {
    for attempt in 1..=MAX_PASSWORD_ATTEMPTS {
        let password = input.new_password()?;

        match check_password(password.expose_secret()) {
            Ok(()) => return Ok(password),
            Err(violation) if input.can_retry() => {
                writeln!(
                    out,
                    "Password rejected ({attempt}/{MAX_PASSWORD_ATTEMPTS}): {violation}"
                )?;
            }
            Err(violation) => return Err(AdminError::PolicyViolation(violation).into()),
        }
    }

    Err(CommandError::TooManyAttempts(MAX_PASSWORD_ATTEMPTS))
}

/// Fields for `admin add`.
#[derive(Debug, Clone)]
pub struct AddAdmin {
    pub username: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

/// Create an admin account.
///
/// The username is checked, and must be free, before any password is read.
///
/// # Errors
///
/// Returns `CommandError::Admin` for invalid or taken usernames and storage
/// failures, and `CommandError::TooManyAttempts` if every password was weak.
pub async fn add(
    pool: &SqlitePool,
    hasher: &CredentialHasher,
    args: AddAdmin,
    input: &mut impl PasswordInput,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let service = AdminService::new(pool, hasher);

    let username = Username::parse(&args.username).map_err(AdminError::from)?;
    if service.find(username.as_str()).await?.is_some() {
        return Err(AdminError::DuplicateUsername(username).into());
    }

    let password = read_acceptable_password(input, out)?;
    let user = service
        .add(
            username.as_str(),
            args.firstname.as_deref(),
            args.lastname.as_deref(),
            &password,
        )
        .await?;

    writeln!(out, "Created admin user {} (id {})", user.username, user.id)?;
    Ok(())
}

/// Print every admin account. Digests are never shown.
///
/// # Errors
///
/// Returns `CommandError::Admin` if the accounts cannot be loaded.
pub async fn list(
    pool: &SqlitePool,
    hasher: &CredentialHasher,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let users = AdminService::new(pool, hasher).list().await?;

    if users.is_empty() {
        writeln!(out, "No admin users found.")?;
        return Ok(());
    }

    let rows: Vec<[String; 5]> = users
        .iter()
        .map(|user| {
            [
                user.id.to_string(),
                user.username.to_string(),
                user.full_name(),
                user.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                user.updated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            ]
        })
        .collect();

    write!(
        out,
        "{}",
        render_table(["ID", "Username", "Name", "Created", "Updated"], &rows)
    )?;
    Ok(())
}

/// Remove an admin account after confirmation.
///
/// `confirm` is asked unless `yes` is set. A missing account is reported,
/// not treated as a failure.
///
/// # Errors
///
/// Returns `CommandError` if the prompt fails or the store is unavailable.
pub async fn remove(
    pool: &SqlitePool,
    hasher: &CredentialHasher,
    username: &str,
    yes: bool,
    confirm: impl FnOnce(&Username) -> Result<bool, CommandError>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let service = AdminService::new(pool, hasher);
    // A malformed name cannot match a stored account.
    let Ok(username) = Username::parse(username) else {
        writeln!(out, "No admin user named {username}.")?;
        return Ok(());
    };

    if service.find(username.as_str()).await?.is_none() {
        writeln!(out, "No admin user named {username}.")?;
        return Ok(());
    }

    if !yes && !confirm(&username)? {
        writeln!(out, "Aborted; {username} was not removed.")?;
        return Ok(());
    }

    if service.remove(username.as_str()).await? {
        writeln!(out, "Removed admin user {username}.")?;
    } else {
        // Removed concurrently between the lookup and the delete.
        writeln!(out, "No admin user named {username}.")?;
    }
    Ok(())
}

/// Change an admin's password.
///
/// # Errors
///
/// Returns `CommandError::Admin` if the account is missing or the store
/// fails, and `CommandError::TooManyAttempts` if every password was weak.
pub async fn passwd(
    pool: &SqlitePool,
    hasher: &CredentialHasher,
    username: &str,
    input: &mut impl PasswordInput,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let service = AdminService::new(pool, hasher);
    let username = Username::parse(username).map_err(AdminError::from)?;

    if service.find(username.as_str()).await?.is_none() {
        return Err(CommandError::UnknownAdmin(username));
    }

    let password = read_acceptable_password(input, out)?;
    if !service.change_password(username.as_str(), &password).await? {
        return Err(CommandError::UnknownAdmin(username));
    }

    writeln!(out, "Password changed for {username}.")?;
    Ok(())
}

/// Check a password against an admin's stored digest.
///
/// Unknown accounts and wrong passwords are indistinguishable.
///
/// # Errors
///
/// Returns `CommandError::PasswordMismatch` if the password does not match,
/// and `CommandError::Admin` if the stored credential is corrupt.
pub async fn verify(
    pool: &SqlitePool,
    hasher: &CredentialHasher,
    username: &str,
    input: &mut impl PasswordInput,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let service = AdminService::new(pool, hasher);
    // Reject malformed usernames before reading a password.
    let username = Username::parse(username).map_err(AdminError::from)?;

    let password = input.existing_password()?;
    if service.verify(username.as_str(), &password).await? {
        writeln!(out, "Password matches.")?;
        Ok(())
    } else {
        Err(CommandError::PasswordMismatch)
    }
}
