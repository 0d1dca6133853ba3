//! Token domain entities

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::project::ProjectId;
use crate::domain::user::UserId;

/// Unique identifier for a stored token row (not the secret value)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId(String);

impl TokenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TokenId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TokenId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// What a token is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Project invitation
    Invite,
    /// Password reset
    PasswordReset,
    /// Reserved kinds carried by the token table but not acted on here
    Other,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invite => "invite",
            Self::PasswordReset => "password_reset",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who a token is addressed to. Exactly one of the two forms exists per
/// token, which is what lets an invitation precede registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TokenTarget {
    /// A registered account
    User(UserId),
    /// An email address without an account yet
    Email(String),
}

impl TokenTarget {
    pub fn is_user(&self) -> bool {
        matches!(self, Self::User(_))
    }

    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::User(id) => Some(id),
            Self::Email(_) => None,
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            Self::User(_) => None,
            Self::Email(email) => Some(email),
        }
    }
}

impl std::fmt::Display for TokenTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{}", id),
            Self::Email(email) => write!(f, "email:{}", email),
        }
    }
}

/// A single-use, time-limited opaque credential. The secret value is
/// compared by exact match and never serialized outward or logged, so
/// the entity is serialize-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    /// Row identifier
    id: TokenId,
    /// Opaque secret value - never exposed in serialization
    #[serde(skip_serializing)]
    value: String,
    /// Purpose of the token
    kind: TokenKind,
    /// Project scope, set for invitations
    #[serde(skip_serializing_if = "Option::is_none")]
    project_id: Option<ProjectId>,
    /// Addressee
    target: TokenTarget,
    /// Hard expiry; the token is invalid from this instant on
    expires_at: DateTime<Utc>,
    /// Creation timestamp
    created_at: DateTime<Utc>,
}

impl Token {
    /// Create an invitation token scoped to a project
    pub fn invite(
        value: impl Into<String>,
        project_id: ProjectId,
        target: TokenTarget,
        valid_for: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: TokenId::generate(),
            value: value.into(),
            kind: TokenKind::Invite,
            project_id: Some(project_id),
            target,
            expires_at: now + valid_for,
            created_at: now,
        }
    }

    /// Create a password-reset token for a registered user
    pub fn password_reset(value: impl Into<String>, user_id: UserId, valid_for: Duration) -> Self {
        let now = Utc::now();

        Self {
            id: TokenId::generate(),
            value: value.into(),
            kind: TokenKind::PasswordReset,
            project_id: None,
            target: TokenTarget::User(user_id),
            expires_at: now + valid_for,
            created_at: now,
        }
    }

    // Getters

    pub fn id(&self) -> &TokenId {
        &self.id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn project_id(&self) -> Option<&ProjectId> {
        self.project_id.as_ref()
    }

    pub fn target(&self) -> &TokenTarget {
        &self.target
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // Validity checks

    /// Check if the expiry instant has passed
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Check if the token is a live invitation
    pub fn is_usable_invite(&self) -> bool {
        self.kind == TokenKind::Invite && !self.is_expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_id() -> ProjectId {
        ProjectId::new("p-1").unwrap()
    }

    fn user_id(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn test_token_kind_as_str() {
        assert_eq!(TokenKind::Invite.as_str(), "invite");
        assert_eq!(TokenKind::PasswordReset.as_str(), "password_reset");
        assert_eq!(TokenKind::Other.as_str(), "other");
    }

    #[test]
    fn test_token_target_accessors() {
        let user_target = TokenTarget::User(user_id("alice"));
        assert!(user_target.is_user());
        assert_eq!(user_target.user_id().unwrap().as_str(), "alice");
        assert!(user_target.email().is_none());

        let email_target = TokenTarget::Email("bob@example.com".to_string());
        assert!(!email_target.is_user());
        assert!(email_target.user_id().is_none());
        assert_eq!(email_target.email(), Some("bob@example.com"));
    }

    #[test]
    fn test_invite_token_shape() {
        let token = Token::invite(
            "secret-value",
            project_id(),
            TokenTarget::Email("bob@example.com".to_string()),
            Duration::days(15),
        );

        assert_eq!(token.kind(), TokenKind::Invite);
        assert_eq!(token.value(), "secret-value");
        assert_eq!(token.project_id().unwrap().as_str(), "p-1");
        assert!(!token.is_expired());
        assert!(token.is_usable_invite());
    }

    #[test]
    fn test_password_reset_token_shape() {
        let token = Token::password_reset("secret-value", user_id("alice"), Duration::hours(24));

        assert_eq!(token.kind(), TokenKind::PasswordReset);
        assert!(token.project_id().is_none());
        assert_eq!(token.target().user_id().unwrap().as_str(), "alice");
        assert!(!token.is_expired());
        assert!(!token.is_usable_invite());
    }

    #[test]
    fn test_expired_token() {
        let token = Token::invite(
            "secret-value",
            project_id(),
            TokenTarget::User(user_id("alice")),
            Duration::seconds(-1),
        );

        assert!(token.is_expired());
        assert!(!token.is_usable_invite());
    }

    #[test]
    fn test_token_serialization_excludes_value() {
        let token = Token::invite(
            "secret-value",
            project_id(),
            TokenTarget::User(user_id("alice")),
            Duration::days(15),
        );

        let json = serde_json::to_string(&token).unwrap();
        assert!(!json.contains("secret-value"));
        assert!(!json.contains("\"value\""));
    }
}
