//! Admin authorization gate

use std::sync::Arc;
use tracing::debug;

use crate::domain::membership::{MemberIdentity, MembershipRepository};
use crate::domain::project::{Project, ProjectId, ProjectRepository};
use crate::domain::user::{User, UserDirectory, UserId};
use crate::domain::DomainError;

/// Project and admin profile proven by a successful gate check
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub project: Project,
    pub admin: User,
}

/// The single authorization choke point for privileged project operations.
/// Passing requires an accepted admin membership in the target project;
/// the check itself has no side effects.
pub struct AdminGate {
    projects: Arc<dyn ProjectRepository>,
    memberships: Arc<dyn MembershipRepository>,
    users: Arc<dyn UserDirectory>,
}

impl AdminGate {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        memberships: Arc<dyn MembershipRepository>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            projects,
            memberships,
            users,
        }
    }

    /// Resolve the project and prove the caller administers it.
    ///
    /// Failure order matters to callers: a missing project is `NotFound`
    /// before any membership inspection, an insufficient membership is
    /// `Forbidden`, and a dangling caller profile is `NotFound`.
    pub async fn require_admin(
        &self,
        project_id: &ProjectId,
        caller_id: &UserId,
    ) -> Result<AdminContext, DomainError> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Project '{}' not found", project_id)))?;

        let membership = self
            .memberships
            .find(project_id, &MemberIdentity::registered(caller_id.clone()))
            .await?;

        if !membership.map(|m| m.is_active_admin()).unwrap_or(false) {
            debug!(project_id = %project_id, caller_id = %caller_id, "Admin check failed");
            return Err(DomainError::forbidden(format!(
                "User '{}' is not an admin of project '{}'",
                caller_id, project_id
            )));
        }

        let admin = self
            .users
            .find_by_id(caller_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", caller_id)))?;

        Ok(AdminContext { project, admin })
    }
}
