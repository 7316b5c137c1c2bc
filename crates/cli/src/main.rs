//! Retro Games CLI - catalog and admin user management.
//!
//! # Usage
//!
//! ```bash
//! # Create the database schema
//! retro-games init
//!
//! # Add, import, export and list games
//! retro-games add "Super Mario World" 1990 SNES 2024-01-15 --condition vgc
//! retro-games import games.csv
//! retro-games export backup.csv
//! retro-games list
//!
//! # Manage admin users
//! retro-games admin add alice123 --firstname Alice
//! retro-games admin list
//! retro-games admin remove alice123
//! ```
//!
//! The database file defaults to `retro_games.db`; override it with `--db` or
//! `RETRO_GAMES_DATABASE_PATH`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dialoguer::Confirm;

use retro_games_api::config::{DATABASE_PATH_VAR, DEFAULT_DATABASE_PATH};
use retro_games_api::services::CredentialHasher;

mod commands;

use commands::admin::{AddAdmin, PasswordInput, StdinPassword, TerminalPrompt};
use commands::games::AddGame;
use commands::{CommandError, open_database};

#[derive(Parser)]
#[command(name = "retro-games")]
#[command(author, version, about = "Retro games catalog CLI (SQLite-backed)")]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, global = true, env = DATABASE_PATH_VAR, default_value = DEFAULT_DATABASE_PATH)]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema
    Init,
    /// Add a single game entry
    Add {
        /// Game title
        title: String,
        /// Release year (e.g. 1998)
        release_year: i32,
        /// Platform (e.g. SNES, PS1)
        platform: String,
        /// Date acquired (YYYY-MM-DD)
        date_acquired: String,
        /// Condition (mint|vgc|gc|used)
        #[arg(long)]
        condition: Option<String>,
    },
    /// Import games from a CSV file
    Import {
        /// Path to CSV file
        csv: PathBuf,
    },
    /// Export games to a CSV file
    Export {
        /// Destination CSV file path
        csv: PathBuf,
    },
    /// List games in the database
    List,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Add {
        /// Login name (3-50 characters: letters, digits, '_' or '-')
        username: String,
        /// Given name
        #[arg(long)]
        firstname: Option<String>,
        /// Family name
        #[arg(long)]
        lastname: Option<String>,
        /// Read the password from standard input instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },
    /// List admin users
    List,
    /// Remove an admin user
    Remove {
        /// Login name
        username: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Change an admin user's password
    Passwd {
        /// Login name
        username: String,
        /// Read the password from standard input instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },
    /// Check a password against an admin user's stored credential
    Verify {
        /// Login name
        username: String,
        /// Read the password from standard input instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before parsing so `--db` can fall back to it
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "retro_games_cli=info,retro_games_api=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = std::io::stdout().lock();

    if matches!(cli.command, Commands::Init) {
        commands::init::run(&cli.db, &mut out).await?;
        return Ok(());
    }

    let pool = open_database(&cli.db).await?;

    match cli.command {
        Commands::Init => {}
        Commands::Add {
            title,
            release_year,
            platform,
            date_acquired,
            condition,
        } => {
            let args = AddGame {
                title,
                release_year,
                platform,
                date_acquired,
                condition,
            };
            commands::games::add(&pool, args, &mut out).await?;
        }
        Commands::Import { csv } => commands::games::import(&pool, &csv, &mut out).await?,
        Commands::Export { csv } => commands::games::export(&pool, &csv, &mut out).await?,
        Commands::List => commands::games::list(&pool, &mut out).await?,
        Commands::Admin { action } => run_admin(&pool, action, &mut out).await?,
    }

    out.flush()?;
    pool.close().await;
    Ok(())
}

async fn run_admin(
    pool: &sqlx::SqlitePool,
    action: AdminAction,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let hasher = CredentialHasher::new();

    match action {
        AdminAction::Add {
            username,
            firstname,
            lastname,
            password_stdin,
        } => {
            let args = AddAdmin {
                username,
                firstname,
                lastname,
            };
            let mut input = password_input(password_stdin);
            commands::admin::add(pool, &hasher, args, &mut input, out).await
        }
        AdminAction::List => commands::admin::list(pool, &hasher, out).await,
        AdminAction::Remove { username, yes } => {
            let confirm = |username: &retro_games_core::Username| {
                Confirm::new()
                    .with_prompt(format!("Remove admin user {username}?"))
                    .default(false)
                    .interact()
                    .map_err(CommandError::from)
            };
            commands::admin::remove(pool, &hasher, &username, yes, confirm, out).await
        }
        AdminAction::Passwd {
            username,
            password_stdin,
        } => {
            let mut input = password_input(password_stdin);
            commands::admin::passwd(pool, &hasher, &username, &mut input, out).await
        }
        AdminAction::Verify {
            username,
            password_stdin,
        } => {
            let mut input = password_input(password_stdin);
            commands::admin::verify(pool, &hasher, &username, &mut input, out).await
        }
    }
}

/// Prompt on the terminal, or read one line from stdin when asked to.
fn password_input(from_stdin: bool) -> Box<dyn PasswordInput> {
    if from_stdin {
        Box::new(StdinPassword::new(std::io::stdin().lock()))
    } else {
        Box::new(TerminalPrompt)
    }
}
