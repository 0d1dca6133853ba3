//! User directory infrastructure
//!
//! In-memory stand-in for the externally-owned user base.

mod directory;

pub use directory::InMemoryUserDirectory;
