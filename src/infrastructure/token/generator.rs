//! Token value generation
//!
//! Mints the opaque, unguessable values carried by invitation and
//! password-reset links.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;

/// Generator for opaque token values
#[derive(Debug, Clone)]
pub struct TokenValueGenerator {
    /// Number of random bytes per value
    value_bytes: usize,
}

impl TokenValueGenerator {
    /// Create a generator with the default entropy (32 bytes)
    pub fn new() -> Self {
        Self { value_bytes: 32 }
    }

    /// Set the number of random bytes
    pub fn with_value_bytes(mut self, bytes: usize) -> Self {
        self.value_bytes = bytes;
        self
    }

    /// Generate a fresh opaque value, URL-safe so it can ride in a link
    pub fn generate(&self) -> String {
        let mut random_bytes = vec![0u8; self.value_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        URL_SAFE_NO_PAD.encode(&random_bytes)
    }
}

impl Default for TokenValueGenerator {
    fn default() -> Self {
        Self::new()
    }
}
