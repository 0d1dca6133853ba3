//! Notification delivery trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Invitation notification payload. This is the only channel that carries
/// the raw token value to the invitee; service responses never include it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InviteNotification {
    pub to_email: String,
    pub inviter_name: String,
    pub project_name: String,
    pub token: String,
}

/// Password-reset notification payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetNotification {
    pub to_email: String,
    pub token: String,
}

/// Outbound notification channel. Callers treat delivery as best-effort:
/// a failed send is logged and never rolls back the mutation that
/// triggered it.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a project invitation
    async fn send_invite(&self, notification: &InviteNotification) -> Result<(), DomainError>;

    /// Deliver a password-reset link
    async fn send_password_reset(
        &self,
        notification: &ResetNotification,
    ) -> Result<(), DomainError>;
}
