//! Retro Games Core - Shared types library.
//!
//! This crate provides the domain types used by every component of the catalog:
//! - `api` - REST API over the games table
//! - `cli` - Command-line catalog and admin-user management
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database access,
//! no HTTP. This keeps it lightweight and allows the CLI and the API to agree on
//! exactly the same rules.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, usernames, game conditions and game validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
