//! Membership service for the invitation lifecycle

use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::membership::{
    MemberIdentity, MemberRole, Membership, MembershipRepository, MembershipStatus,
};
use crate::domain::notify::{InviteNotification, Notifier};
use crate::domain::project::ProjectId;
use crate::domain::token::{Token, TokenRepository, TokenTarget};
use crate::domain::user::{normalize_email, validate_email, User, UserDirectory, UserId};
use crate::domain::DomainError;
use crate::infrastructure::access::AdminGate;
use crate::infrastructure::token::TokenValueGenerator;

const DEFAULT_INVITE_VALIDITY_DAYS: i64 = 15;

/// Acknowledgement returned by mutating operations. Never carries the
/// token value; that travels only through the notifier.
#[derive(Debug, Clone, Serialize)]
pub struct Ack {
    pub message: String,
}

/// Outcome of probing an invitation token before redeeming it
#[derive(Debug, Clone, Serialize)]
pub struct InviteCheck {
    /// The token exists, is an invitation, and has not expired
    pub is_verified: bool,
    /// The invitee already has an account (route to login, not signup)
    pub is_user: bool,
}

/// Dependencies for the membership service
pub struct MembershipServiceDeps {
    pub gate: Arc<AdminGate>,
    pub memberships: Arc<dyn MembershipRepository>,
    pub tokens: Arc<dyn TokenRepository>,
    pub users: Arc<dyn UserDirectory>,
    pub notifier: Arc<dyn Notifier>,
}

/// Membership service managing the invite / accept / remove lifecycle
pub struct MembershipService {
    deps: MembershipServiceDeps,
    generator: TokenValueGenerator,
    invite_validity: Duration,
}

impl MembershipService {
    /// Create a new membership service with the default token settings
    pub fn new(deps: MembershipServiceDeps) -> Self {
        Self {
            deps,
            generator: TokenValueGenerator::default(),
            invite_validity: Duration::days(DEFAULT_INVITE_VALIDITY_DAYS),
        }
    }

    /// Replace the token value generator
    pub fn with_generator(mut self, generator: TokenValueGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Override how long invitation tokens stay redeemable
    pub fn with_invite_validity(mut self, validity: Duration) -> Self {
        self.invite_validity = validity;
        self
    }

    /// Invite someone into a project by email.
    ///
    /// Admin-only. Re-inviting the same target supersedes the previous
    /// token. The invitee may or may not have an account yet; the token
    /// and the membership row are keyed accordingly.
    pub async fn invite(
        &self,
        caller_id: &UserId,
        project_id: &ProjectId,
        target_email: &str,
    ) -> Result<Ack, DomainError> {
        let context = self.deps.gate.require_admin(project_id, caller_id).await?;

        let email = normalize_email(target_email);
        validate_email(&email).map_err(|e| DomainError::bad_request(e.to_string()))?;

        info!(project_id = %project_id, caller_id = %caller_id, email = %email, "Inviting member");

        let target_user = self.deps.users.find_by_email(&email).await?;

        let (token_target, member_identity) = match &target_user {
            Some(user) => (
                TokenTarget::User(user.id().clone()),
                MemberIdentity::registered(user.id().clone()),
            ),
            None => (
                TokenTarget::Email(email.clone()),
                MemberIdentity::unregistered(email.clone()),
            ),
        };

        // A re-invite supersedes: at most one live token per target
        if let Some(previous) = self
            .deps
            .tokens
            .find_invite_for_target(project_id, &token_target)
            .await?
        {
            self.deps.tokens.delete(previous.id()).await?;
            debug!(project_id = %project_id, "Superseded previous invitation token");
        }

        let value = self.generator.generate();
        let token = Token::invite(
            value.clone(),
            project_id.clone(),
            token_target,
            self.invite_validity,
        );
        self.deps.tokens.create(token).await?;

        self.ensure_pending_membership(project_id, member_identity, target_user.as_ref())
            .await?;

        // Delivery is best-effort; the invitation is already durable
        let notification = InviteNotification {
            to_email: email.clone(),
            inviter_name: context.admin.name().to_string(),
            project_name: context.project.name().to_string(),
            token: value,
        };
        if let Err(e) = self.deps.notifier.send_invite(&notification).await {
            warn!(project_id = %project_id, error = %e, "Invitation notification failed");
        }

        Ok(Ack {
            message: format!("Invitation sent to {}", email),
        })
    }

    /// Redeem an invitation token.
    ///
    /// Authorization is identity-based: the caller must be the user (or
    /// own the email) the token is addressed to. No project role is
    /// required, so a freshly invited outsider can accept.
    pub async fn accept(&self, token_value: &str, accepter_id: &UserId) -> Result<Ack, DomainError> {
        let token = self
            .deps
            .tokens
            .find_by_value(token_value)
            .await?
            .filter(|t| t.is_usable_invite())
            .ok_or_else(|| DomainError::bad_request("Invalid or expired invitation token"))?;

        let project_id = token
            .project_id()
            .cloned()
            .ok_or_else(|| DomainError::internal("Invitation token has no project scope"))?;

        let accepter_profile = self.deps.users.find_by_id(accepter_id).await?;

        match token.target() {
            TokenTarget::User(user_id) => {
                if user_id != accepter_id {
                    return Err(DomainError::forbidden(
                        "Invitation token is addressed to a different user",
                    ));
                }
            }
            TokenTarget::Email(email) => {
                let profile = accepter_profile.as_ref().ok_or_else(|| {
                    DomainError::not_found(format!("User '{}' not found", accepter_id))
                })?;
                if normalize_email(profile.email()) != *email {
                    return Err(DomainError::forbidden(
                        "Invitation token is addressed to a different email",
                    ));
                }
            }
        }

        // Locate the pending row: by the accepter's user id first, falling
        // back to the email key left by a pre-registration invite.
        let registered_key = MemberIdentity::registered(accepter_id.clone());
        let (email_key, mut membership) = match self
            .deps
            .memberships
            .find(&project_id, &registered_key)
            .await?
        {
            Some(m) => (None, m),
            None => {
                let email_key = accepter_profile
                    .as_ref()
                    .map(|u| MemberIdentity::unregistered(normalize_email(u.email())));
                let found = match &email_key {
                    Some(key) => self.deps.memberships.find(&project_id, key).await?,
                    None => None,
                };
                match found {
                    Some(m) => (email_key, m),
                    None => {
                        return Err(DomainError::bad_request(
                            "No invitation exists for this user in this project",
                        ));
                    }
                }
            }
        };

        if membership.is_accepted() {
            return Err(DomainError::bad_request(
                "User is already a member of this project",
            ));
        }

        match email_key {
            Some(key) => {
                // Rekey the email-based row onto the now-registered account
                membership.accept();
                membership.assign_user(accepter_id.clone());
                self.deps.memberships.delete(&project_id, &key).await?;
                self.deps.memberships.create(membership).await?;
            }
            None => {
                self.deps
                    .memberships
                    .update_status(&project_id, &registered_key, MembershipStatus::Accepted)
                    .await?;
            }
        }

        // Single use: the token dies with the acceptance
        self.deps.tokens.delete(token.id()).await?;

        info!(project_id = %project_id, user_id = %accepter_id, "Invitation accepted");

        Ok(Ack {
            message: format!("Joined project '{}'", project_id),
        })
    }

    /// Remove a member (or revoke a pending invitation) by email.
    ///
    /// Admin-only and idempotent: removing someone who is not a member
    /// succeeds with nothing deleted.
    pub async fn remove(
        &self,
        caller_id: &UserId,
        project_id: &ProjectId,
        target_email: &str,
    ) -> Result<Ack, DomainError> {
        let context = self.deps.gate.require_admin(project_id, caller_id).await?;

        let email = normalize_email(target_email);
        validate_email(&email).map_err(|e| DomainError::bad_request(e.to_string()))?;

        // The email may match an email-keyed invitee row, a registered
        // member's row, or both (never more after rekeying).
        let mut targets = vec![MemberIdentity::unregistered(email.clone())];
        if let Some(user) = self.deps.users.find_by_email(&email).await? {
            targets.push(MemberIdentity::registered(user.id().clone()));
        }

        let removed = self.deps.memberships.delete_many(project_id, &targets).await?;

        info!(
            project_id = %project_id,
            caller_id = %caller_id,
            email = %email,
            removed = removed,
            "Removed member"
        );

        Ok(Ack {
            message: format!("Removed {} from project '{}'", email, context.project.name()),
        })
    }

    /// Probe an invitation token without redeeming it, so a client can
    /// route the invitee to login or registration first.
    pub async fn verify(&self, token_value: &str) -> Result<InviteCheck, DomainError> {
        let token = self
            .deps
            .tokens
            .find_by_value(token_value)
            .await?
            .filter(|t| t.is_usable_invite())
            .ok_or_else(|| DomainError::bad_request("Invalid or expired invitation token"))?;

        Ok(InviteCheck {
            is_verified: true,
            is_user: token.target().is_user(),
        })
    }

    /// Change a member's role. Admin-only.
    ///
    /// No last-admin safeguard: demoting the only admin is allowed and
    /// leaves the project without one.
    pub async fn update_role(
        &self,
        caller_id: &UserId,
        project_id: &ProjectId,
        target_email: &str,
        role: MemberRole,
    ) -> Result<Membership, DomainError> {
        self.deps.gate.require_admin(project_id, caller_id).await?;

        let email = normalize_email(target_email);
        validate_email(&email).map_err(|e| DomainError::bad_request(e.to_string()))?;

        info!(project_id = %project_id, caller_id = %caller_id, email = %email, "Updating member role");

        let mut membership = match self.deps.users.find_by_email(&email).await? {
            Some(user) => {
                self.deps
                    .memberships
                    .find(project_id, &MemberIdentity::registered(user.id().clone()))
                    .await?
            }
            None => None,
        };
        if membership.is_none() {
            membership = self
                .deps
                .memberships
                .find(project_id, &MemberIdentity::unregistered(email.clone()))
                .await?;
        }

        let mut membership = membership.ok_or_else(|| {
            DomainError::not_found(format!(
                "No membership for '{}' in project '{}'",
                email, project_id
            ))
        })?;

        membership.set_role(role);
        self.deps.memberships.update(&membership).await
    }

    /// Create the pending row for an invitation, leaving an existing row
    /// untouched. A registered target may still hold a row keyed by the
    /// email it was invited under before registering; that row is rekeyed
    /// instead of duplicated.
    async fn ensure_pending_membership(
        &self,
        project_id: &ProjectId,
        identity: MemberIdentity,
        target_user: Option<&User>,
    ) -> Result<(), DomainError> {
        if self
            .deps
            .memberships
            .find(project_id, &identity)
            .await?
            .is_some()
        {
            return Ok(());
        }

        if let Some(user) = target_user {
            let email_key = MemberIdentity::unregistered(normalize_email(user.email()));
            if let Some(mut stale) = self.deps.memberships.find(project_id, &email_key).await? {
                self.deps.memberships.delete(project_id, &email_key).await?;
                stale.assign_user(user.id().clone());
                self.deps.memberships.create(stale).await?;
                return Ok(());
            }
        }

        self.deps
            .memberships
            .create(Membership::new(
                project_id.clone(),
                identity,
                MemberRole::Member,
                MembershipStatus::Pending,
            ))
            .await?;

        Ok(())
    }
}
