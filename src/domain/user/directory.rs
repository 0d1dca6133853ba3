//! Read-only user directory trait

use async_trait::async_trait;

use super::entity::{User, UserId};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Lookup interface over the externally-owned user base. The collaboration
/// core resolves invitation targets and caller profiles through this trait
/// and never writes to it.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by their normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;
}
