//! Webhook relay notifier
//!
//! Delivers notifications as signed JSON POSTs to a configured relay (the
//! piece that actually renders and sends emails lives behind it).

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Serialize;
use sha2::Sha256;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::notify::{InviteNotification, Notifier, ResetNotification};
use crate::domain::DomainError;

type HmacSha256 = Hmac<Sha256>;

/// Notifier that relays payloads to an HTTP endpoint
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    endpoint: String,
    secret: Option<String>,
    http_client: Client,
}

impl WebhookNotifier {
    /// Creates a new webhook notifier
    pub fn new(endpoint: impl Into<String>, secret: Option<String>, timeout_secs: u64) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.into(),
            secret,
            http_client,
        }
    }

    /// Generates HMAC-SHA256 signature for a payload
    fn generate_signature(secret: &str, payload: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        let result = mac.finalize();
        hex::encode(result.into_bytes())
    }

    async fn post_event<T: Serialize>(&self, event: &str, payload: &T) -> Result<(), DomainError> {
        let body = serde_json::to_string(payload)
            .map_err(|e| DomainError::internal(format!("Failed to serialize notification: {}", e)))?;
        let notification_id = Uuid::new_v4().to_string();

        let mut request = self
            .http_client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("X-Notification-Event", event)
            .header("X-Notification-Id", &notification_id);

        // Add HMAC signature if secret is configured
        if let Some(ref secret) = self.secret {
            let signature = Self::generate_signature(secret, &body);
            request = request.header("X-Notification-Signature", format!("sha256={}", signature));
        }

        match request.body(body).send().await {
            Ok(response) => {
                let status = response.status().as_u16();

                if (200..300).contains(&status) {
                    info!(
                        notification_id = %notification_id,
                        event = event,
                        status = status,
                        "Notification delivered"
                    );
                    Ok(())
                } else {
                    warn!(
                        notification_id = %notification_id,
                        event = event,
                        status = status,
                        "Notification relay returned HTTP error"
                    );
                    Err(DomainError::internal(format!(
                        "Notification relay returned HTTP status {}",
                        status
                    )))
                }
            }
            Err(e) => {
                let error_msg = if e.is_timeout() {
                    "Request timed out".to_string()
                } else if e.is_connect() {
                    "Connection failed".to_string()
                } else {
                    format!("Request failed: {}", e)
                };

                warn!(
                    notification_id = %notification_id,
                    event = event,
                    error = %error_msg,
                    "Notification delivery failed"
                );
                Err(DomainError::internal(error_msg))
            }
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send_invite(&self, notification: &InviteNotification) -> Result<(), DomainError> {
        self.post_event("invitation", notification).await
    }

    async fn send_password_reset(
        &self,
        notification: &ResetNotification,
    ) -> Result<(), DomainError> {
        self.post_event("password_reset", notification).await
    }
}
