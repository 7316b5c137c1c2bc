//! Integration tests for the retro games catalog.
//!
//! Each test starts the real API router in-process on an ephemeral port,
//! backed by a fresh `SQLite` file in a temporary directory, and talks to it
//! over HTTP with `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p retro-games-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `games_api` - REST endpoints end to end
//! - `admin_users` - credential store against a file-backed database

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use reqwest::Client;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tokio::task::JoinHandle;

use retro_games_api::db;
use retro_games_api::routes::build_router;
use retro_games_api::state::AppState;

/// Boxed error for test setup.
pub type SetupError = Box<dyn std::error::Error + Send + Sync>;

/// A running API server with its own database file.
pub struct TestContext {
    /// HTTP client for requests.
    pub client: Client,
    /// Base URL of the server, e.g. `http://127.0.0.1:41234`.
    pub base_url: String,
    /// Pool on the same database file the server uses.
    pub pool: SqlitePool,
    /// Path of the database file.
    pub database_path: PathBuf,
    server: JoinHandle<()>,
    // Dropped last so the file outlives the server.
    _dir: TempDir,
}

impl TestContext {
    /// Create a temp database, apply migrations and serve the router.
    ///
    /// # Errors
    ///
    /// Returns an error if the database or the listener cannot be set up.
    pub async fn start() -> Result<Self, SetupError> {
        let dir = tempfile::tempdir()?;
        let database_path = dir.path().join("retro_games.db");

        let pool = db::create_pool(&database_path).await?;
        db::run_migrations(&pool).await?;

        let listener =
            tokio::net::TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).await?;
        let addr = listener.local_addr()?;

        let app = build_router(AppState::new(pool.clone()));

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Test server stopped");
            }
        });

        Ok(Self {
            client: Client::new(),
            base_url: format!("http://{addr}"),
            pool,
            database_path,
            server,
            _dir: dir,
        })
    }

    /// Absolute URL for a path on the test server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
    }
}
