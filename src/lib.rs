//! Project collaboration core
//!
//! Membership and invitation lifecycle for multi-tenant projects:
//! - Admin-gated invitations carried by opaque single-use tokens
//! - Invitees with or without an existing account
//! - Acceptance authorized by the invited identity, not a project role
//! - Account recovery on the same token machinery

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use domain::notify::Notifier;
use domain::token::TokenRepository;
use domain::user::UserDirectory;
use domain::DomainError;
use infrastructure::access::AdminGate;
use infrastructure::membership::{MembershipService, MembershipServiceDeps};
use infrastructure::notify::{NoopNotifier, WebhookNotifier};
use infrastructure::project::{ProjectService, ProjectServiceDeps};
use infrastructure::recovery::{RecoveryService, RecoveryServiceDeps};
use infrastructure::{
    InMemoryMembershipRepository, InMemoryProjectRepository, InMemoryTokenRepository,
};

/// Every service wired over shared stores
pub struct AppServices {
    pub projects: Arc<ProjectService>,
    pub memberships: Arc<MembershipService>,
    pub recovery: Arc<RecoveryService>,
    tokens: Arc<dyn TokenRepository>,
}

impl AppServices {
    /// Sweep expired tokens of every kind, returning how many were
    /// removed. Meant for a scheduled maintenance caller.
    pub async fn purge_expired_tokens(&self) -> Result<usize, DomainError> {
        let purged = self.tokens.purge_expired().await?;
        if purged > 0 {
            info!(purged, "Purged expired tokens");
        }
        Ok(purged)
    }
}

/// Wire every service over fresh in-memory stores.
///
/// The user directory is supplied by the caller since accounts are
/// managed elsewhere; everything here only reads it.
pub fn build_services(config: &AppConfig, users: Arc<dyn UserDirectory>) -> AppServices {
    let projects = Arc::new(InMemoryProjectRepository::new());
    let memberships = Arc::new(InMemoryMembershipRepository::new());
    let tokens: Arc<dyn TokenRepository> = Arc::new(InMemoryTokenRepository::new());

    let gate = Arc::new(AdminGate::new(
        projects.clone(),
        memberships.clone(),
        users.clone(),
    ));

    let notifier: Arc<dyn Notifier> = match &config.notifier.endpoint {
        Some(endpoint) => {
            info!(endpoint = %endpoint, "Using webhook notifier");
            Arc::new(WebhookNotifier::new(
                endpoint.clone(),
                config.notifier.secret.clone(),
                config.notifier.timeout_secs,
            ))
        }
        None => {
            info!("No notifier endpoint configured, notifications will be logged and dropped");
            Arc::new(NoopNotifier::new())
        }
    };

    let membership_service = Arc::new(
        MembershipService::new(MembershipServiceDeps {
            gate: gate.clone(),
            memberships: memberships.clone(),
            tokens: tokens.clone(),
            users: users.clone(),
            notifier: notifier.clone(),
        })
        .with_invite_validity(Duration::days(config.tokens.invite_validity_days)),
    );

    let project_service = Arc::new(ProjectService::new(ProjectServiceDeps {
        gate,
        projects,
        memberships,
        users: users.clone(),
    }));

    let recovery_service = Arc::new(
        RecoveryService::new(RecoveryServiceDeps {
            tokens: tokens.clone(),
            users,
            notifier,
        })
        .with_reset_validity(Duration::hours(config.tokens.reset_validity_hours)),
    );

    AppServices {
        projects: project_service,
        memberships: membership_service,
        recovery: recovery_service,
        tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::user::{User, UserId};
    use infrastructure::InMemoryUserDirectory;

    #[tokio::test]
    async fn test_build_services_wires_the_full_flow() {
        let users = Arc::new(InMemoryUserDirectory::new());
        users
            .add_user(User::new(
                UserId::new("alice").unwrap(),
                "alice@example.com",
                "Alice",
            ))
            .await;
        users
            .add_user(User::new(
                UserId::new("bob").unwrap(),
                "bob@example.com",
                "Bob",
            ))
            .await;

        let services = build_services(&AppConfig::default(), users);
        let alice = UserId::new("alice").unwrap();

        let project = services.projects.create(&alice, "Apollo").await.unwrap();
        services
            .memberships
            .invite(&alice, project.id(), "bob@example.com")
            .await
            .unwrap();

        let found = services.projects.find_by_id(&alice, project.id()).await.unwrap();
        assert_eq!(found.members.len(), 2);

        services
            .memberships
            .remove(&alice, project.id(), "bob@example.com")
            .await
            .unwrap();
        let found = services.projects.find_by_id(&alice, project.id()).await.unwrap();
        assert_eq!(found.members.len(), 1);

        // Nothing has expired yet
        let purged = services.purge_expired_tokens().await.unwrap();
        assert_eq!(purged, 0);
    }
}
