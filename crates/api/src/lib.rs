//! Retro games catalog API and storage library.
//!
//! The `SQLite` repositories, credential services and CSV import/export live
//! here so the API binary and the CLI share one implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
