//! Core types for the retro games catalog.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod condition;
pub mod game;
pub mod id;
pub mod username;

pub use condition::{Condition, ConditionError};
pub use game::{GameValidationError, NewGame};
pub use id::*;
pub use username::{Username, UsernameError};
