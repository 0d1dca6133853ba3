//! Membership repository trait

use async_trait::async_trait;

use super::entity::{Membership, MemberIdentity, MembershipStatus};
use crate::domain::project::ProjectId;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for membership storage. Rows are keyed by
/// (project, identity); a second row for the same key is a conflict.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Create a new membership row
    async fn create(&self, membership: Membership) -> Result<Membership, DomainError>;

    /// Find the row for a (project, identity) pair
    async fn find(
        &self,
        project_id: &ProjectId,
        member: &MemberIdentity,
    ) -> Result<Option<Membership>, DomainError>;

    /// List every membership row of a project
    async fn list_by_project(&self, project_id: &ProjectId) -> Result<Vec<Membership>, DomainError>;

    /// List every membership row of a registered user across projects
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Membership>, DomainError>;

    /// Replace a row, keyed by its (project, identity)
    async fn update(&self, membership: &Membership) -> Result<Membership, DomainError>;

    /// Set the status of a row in place
    async fn update_status(
        &self,
        project_id: &ProjectId,
        member: &MemberIdentity,
        status: MembershipStatus,
    ) -> Result<Membership, DomainError>;

    /// Delete one row, returning whether it existed
    async fn delete(
        &self,
        project_id: &ProjectId,
        member: &MemberIdentity,
    ) -> Result<bool, DomainError>;

    /// Delete every row matching one of the given identities, returning the
    /// number of rows removed. Missing rows are not an error.
    async fn delete_many(
        &self,
        project_id: &ProjectId,
        members: &[MemberIdentity],
    ) -> Result<usize, DomainError>;
}
