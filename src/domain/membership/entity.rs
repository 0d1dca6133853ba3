//! Membership entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::project::ProjectId;
use crate::domain::user::UserId;

/// Role of a member within a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    /// Full control: invitations, removals, project mutation
    Admin,
    /// Regular collaborator
    #[default]
    Member,
}

impl MemberRole {
    /// Check if this role may invite, remove, and mutate the project
    pub fn can_administer(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Lifecycle status of a membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// Invited but not yet accepted
    #[default]
    Pending,
    /// Invitation accepted, member is active
    Accepted,
}

impl MembershipStatus {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Who a membership row belongs to. Invitees without an account are keyed
/// by email until they register and accept, at which point the row is
/// rekeyed to their user id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MemberIdentity {
    /// A registered account
    Registered(UserId),
    /// An email-only invitee
    Unregistered(String),
}

impl MemberIdentity {
    pub fn registered(user_id: UserId) -> Self {
        Self::Registered(user_id)
    }

    pub fn unregistered(email: impl Into<String>) -> Self {
        Self::Unregistered(email.into())
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered(_))
    }

    /// The user id, when this identity is a registered account
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Registered(id) => Some(id),
            Self::Unregistered(_) => None,
        }
    }

    /// The email, when this identity is an email-only invitee
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Registered(_) => None,
            Self::Unregistered(email) => Some(email),
        }
    }
}

impl std::fmt::Display for MemberIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registered(id) => write!(f, "user:{}", id),
            Self::Unregistered(email) => write!(f, "email:{}", email),
        }
    }
}

/// A single membership row, unique per (project, identity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    /// Project this membership belongs to
    project_id: ProjectId,
    /// Who the member is
    member: MemberIdentity,
    /// Role within the project
    role: MemberRole,
    /// Lifecycle status
    status: MembershipStatus,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl Membership {
    /// Create a new membership row
    pub fn new(
        project_id: ProjectId,
        member: MemberIdentity,
        role: MemberRole,
        status: MembershipStatus,
    ) -> Self {
        let now = Utc::now();

        Self {
            project_id,
            member,
            role,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    // Getters

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn member(&self) -> &MemberIdentity {
        &self.member
    }

    pub fn role(&self) -> MemberRole {
        self.role
    }

    pub fn status(&self) -> MembershipStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Status checks

    pub fn is_accepted(&self) -> bool {
        self.status.is_accepted()
    }

    /// Check if this row grants administrative control: an accepted
    /// membership with the admin role. Pending admins hold no authority yet.
    pub fn is_active_admin(&self) -> bool {
        self.is_accepted() && self.role.can_administer()
    }

    // Mutators

    /// Mark the invitation as accepted
    pub fn accept(&mut self) {
        self.set_status(MembershipStatus::Accepted);
    }

    /// Set the lifecycle status
    pub fn set_status(&mut self, status: MembershipStatus) {
        self.status = status;
        self.touch();
    }

    /// Change the member's role
    pub fn set_role(&mut self, role: MemberRole) {
        self.role = role;
        self.touch();
    }

    /// Rekey an email-only membership onto a registered account
    pub fn assign_user(&mut self, user_id: UserId) {
        self.member = MemberIdentity::Registered(user_id);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
