//! In-memory token repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::project::ProjectId;
use crate::domain::token::{Token, TokenId, TokenKind, TokenRepository, TokenTarget};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of TokenRepository
#[derive(Debug)]
pub struct InMemoryTokenRepository {
    tokens: Arc<RwLock<HashMap<String, Token>>>,
    /// Index for opaque value -> token ID lookup
    value_index: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryTokenRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            value_index: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn create(&self, token: Token) -> Result<Token, DomainError> {
        let mut tokens = self.tokens.write().await;
        let mut value_index = self.value_index.write().await;

        let id = token.id().as_str().to_string();

        if tokens.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "Token with ID '{}' already exists",
                id
            )));
        }

        if value_index.contains_key(token.value()) {
            return Err(DomainError::conflict(
                "A token with this value already exists",
            ));
        }

        value_index.insert(token.value().to_string(), id.clone());
        tokens.insert(id, token.clone());

        Ok(token)
    }

    async fn find_by_value(&self, value: &str) -> Result<Option<Token>, DomainError> {
        // Writers lock tokens before value_index; the index guard must be
        // released before the main map is locked.
        let token_id = self.value_index.read().await.get(value).cloned();

        let Some(token_id) = token_id else {
            return Ok(None);
        };

        let tokens = self.tokens.read().await;
        Ok(tokens.get(&token_id).cloned())
    }

    async fn find_invite_for_target(
        &self,
        project_id: &ProjectId,
        target: &TokenTarget,
    ) -> Result<Option<Token>, DomainError> {
        let tokens = self.tokens.read().await;

        Ok(tokens
            .values()
            .find(|t| {
                t.kind() == TokenKind::Invite
                    && t.project_id() == Some(project_id)
                    && t.target() == target
            })
            .cloned())
    }

    async fn find_reset_for_user(&self, user_id: &UserId) -> Result<Option<Token>, DomainError> {
        let tokens = self.tokens.read().await;

        Ok(tokens
            .values()
            .find(|t| {
                t.kind() == TokenKind::PasswordReset && t.target().user_id() == Some(user_id)
            })
            .cloned())
    }

    async fn delete(&self, id: &TokenId) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;
        let mut value_index = self.value_index.write().await;

        if let Some(token) = tokens.remove(id.as_str()) {
            value_index.remove(token.value());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn purge_expired(&self) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let mut value_index = self.value_index.write().await;

        let expired: Vec<String> = tokens
            .values()
            .filter(|t| t.is_expired())
            .map(|t| t.id().as_str().to_string())
            .collect();

        for id in &expired {
            if let Some(token) = tokens.remove(id) {
                value_index.remove(token.value());
            }
        }

        if !expired.is_empty() {
            debug!(count = expired.len(), "Purged expired tokens");
        }

        Ok(expired.len())
    }
}
