//! User domain
//!
//! Read-only view of the externally-owned user base: the profile entity,
//! the directory lookup trait, and email/id validation helpers.

mod directory;
mod entity;
mod validation;

pub use directory::UserDirectory;
pub use entity::{User, UserId};
pub use validation::{normalize_email, validate_email, validate_user_id, UserValidationError};
