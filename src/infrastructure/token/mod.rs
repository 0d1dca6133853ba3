//! Token infrastructure
//!
//! Opaque value generation and in-memory token storage.

mod generator;
mod repository;

pub use generator::TokenValueGenerator;
pub use repository::InMemoryTokenRepository;
