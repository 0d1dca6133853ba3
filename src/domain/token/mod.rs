//! Token domain
//!
//! Opaque single-use tokens backing invitations and password resets.

mod entity;
mod repository;

pub use entity::{Token, TokenId, TokenKind, TokenTarget};
pub use repository::TokenRepository;
