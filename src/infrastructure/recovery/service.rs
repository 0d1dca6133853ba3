//! Account recovery via single-use password reset tokens

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};

use crate::domain::notify::{Notifier, ResetNotification};
use crate::domain::token::{Token, TokenKind, TokenRepository};
use crate::domain::user::{normalize_email, validate_email, UserDirectory, UserId};
use crate::domain::DomainError;
use crate::infrastructure::membership::Ack;
use crate::infrastructure::token::TokenValueGenerator;

const DEFAULT_RESET_VALIDITY_HOURS: i64 = 24;

/// Dependencies for the recovery service
pub struct RecoveryServiceDeps {
    pub tokens: Arc<dyn TokenRepository>,
    pub users: Arc<dyn UserDirectory>,
    pub notifier: Arc<dyn Notifier>,
}

/// Password reset lifecycle: request, verify, consume
pub struct RecoveryService {
    deps: RecoveryServiceDeps,
    generator: TokenValueGenerator,
    reset_validity: Duration,
}

impl RecoveryService {
    pub fn new(deps: RecoveryServiceDeps) -> Self {
        Self {
            deps,
            generator: TokenValueGenerator::default(),
            reset_validity: Duration::hours(DEFAULT_RESET_VALIDITY_HOURS),
        }
    }

    /// Replace the token value generator
    pub fn with_generator(mut self, generator: TokenValueGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Override how long reset tokens stay redeemable
    pub fn with_reset_validity(mut self, validity: Duration) -> Self {
        self.reset_validity = validity;
        self
    }

    /// Request a password reset for an email address.
    ///
    /// The acknowledgement is identical whether or not an account exists,
    /// so the endpoint cannot be used to probe for registered addresses.
    /// A repeated request supersedes the previous token.
    pub async fn request_reset(&self, email: &str) -> Result<Ack, DomainError> {
        let email = normalize_email(email);
        validate_email(&email).map_err(|e| DomainError::bad_request(e.to_string()))?;

        let ack = Ack {
            message: "If that address has an account, a reset link is on its way".to_string(),
        };

        let Some(user) = self.deps.users.find_by_email(&email).await? else {
            debug!("Password reset requested for unknown address");
            return Ok(ack);
        };

        if let Some(previous) = self.deps.tokens.find_reset_for_user(user.id()).await? {
            self.deps.tokens.delete(previous.id()).await?;
            debug!(user_id = %user.id(), "Superseded previous reset token");
        }

        let value = self.generator.generate();
        let token = Token::password_reset(value.clone(), user.id().clone(), self.reset_validity);
        self.deps.tokens.create(token).await?;

        info!(user_id = %user.id(), "Password reset token issued");

        let notification = ResetNotification {
            to_email: email,
            token: value,
        };
        if let Err(e) = self.deps.notifier.send_password_reset(&notification).await {
            warn!(user_id = %user.id(), error = %e, "Reset notification failed");
        }

        Ok(ack)
    }

    /// Check a reset token without burning it, returning the account it
    /// belongs to.
    pub async fn verify_reset(&self, token_value: &str) -> Result<UserId, DomainError> {
        let token = self.find_usable_reset(token_value).await?;
        self.owner_of(&token)
    }

    /// Redeem a reset token. The token is deleted, so a second attempt
    /// with the same value fails.
    pub async fn consume_reset(&self, token_value: &str) -> Result<UserId, DomainError> {
        let token = self.find_usable_reset(token_value).await?;
        let user_id = self.owner_of(&token)?;

        self.deps.tokens.delete(token.id()).await?;
        info!(user_id = %user_id, "Password reset token consumed");

        Ok(user_id)
    }

    async fn find_usable_reset(&self, token_value: &str) -> Result<Token, DomainError> {
        self.deps
            .tokens
            .find_by_value(token_value)
            .await?
            .filter(|t| t.kind() == TokenKind::PasswordReset && !t.is_expired())
            .ok_or_else(|| DomainError::bad_request("Invalid or expired reset token"))
    }

    fn owner_of(&self, token: &Token) -> Result<UserId, DomainError> {
        token
            .target()
            .user_id()
            .cloned()
            .ok_or_else(|| DomainError::internal("Reset token has no user target"))
    }
}
