//! Fallback notifier used when no relay endpoint is configured

use async_trait::async_trait;
use tracing::info;

use crate::domain::notify::{InviteNotification, Notifier, ResetNotification};
use crate::domain::DomainError;

/// Notifier that records the intent in the log and drops the payload
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl NoopNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send_invite(&self, notification: &InviteNotification) -> Result<(), DomainError> {
        info!(
            to_email = %notification.to_email,
            project_name = %notification.project_name,
            "No notifier endpoint configured; invitation not delivered"
        );
        Ok(())
    }

    async fn send_password_reset(
        &self,
        notification: &ResetNotification,
    ) -> Result<(), DomainError> {
        info!(
            to_email = %notification.to_email,
            "No notifier endpoint configured; password reset not delivered"
        );
        Ok(())
    }
}
