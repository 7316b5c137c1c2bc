//! Domain types.
//!
//! These types represent validated domain objects separate from database row types.

pub mod admin_user;
pub mod game;

pub use admin_user::{AdminUser, NewAdminUser, PasswordDigest};
pub use game::{Game, GamePage};
