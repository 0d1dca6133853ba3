//! Token repository trait

use async_trait::async_trait;

use super::entity::{Token, TokenId, TokenTarget};
use crate::domain::project::ProjectId;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for token storage. Lookups by value are exact-match;
/// expiry is the caller's concern (expired rows are still returned).
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Store a new token
    async fn create(&self, token: Token) -> Result<Token, DomainError>;

    /// Find a token by its opaque value
    async fn find_by_value(&self, value: &str) -> Result<Option<Token>, DomainError>;

    /// Find the invitation token addressed to a target within a project.
    /// At most one exists at a time; issuing a replacement deletes the old
    /// row first.
    async fn find_invite_for_target(
        &self,
        project_id: &ProjectId,
        target: &TokenTarget,
    ) -> Result<Option<Token>, DomainError>;

    /// Find the password-reset token of a user, if any
    async fn find_reset_for_user(&self, user_id: &UserId) -> Result<Option<Token>, DomainError>;

    /// Delete a token by row id, returning whether it existed
    async fn delete(&self, id: &TokenId) -> Result<bool, DomainError>;

    /// Remove every expired token, returning the number of rows swept
    async fn purge_expired(&self) -> Result<usize, DomainError>;
}
