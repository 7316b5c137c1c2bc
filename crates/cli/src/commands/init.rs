//! `retro-games init` - create or upgrade the database schema.

use std::io::Write;
use std::path::Path;

use super::{CommandError, open_database};

/// Apply the schema to the database file, creating it if needed.
///
/// Safe to run repeatedly.
///
/// # Errors
///
/// Returns `CommandError` if the database cannot be opened or migrated.
pub async fn run(db_path: &Path, out: &mut impl Write) -> Result<(), CommandError> {
    let pool = open_database(db_path).await?;
    pool.close().await;

    writeln!(out, "Initialized database at {}", db_path.display())?;
    Ok(())
}
