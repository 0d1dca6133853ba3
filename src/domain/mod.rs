//! Domain layer - Core business logic and entities

pub mod error;
pub mod membership;
pub mod notify;
pub mod project;
pub mod token;
pub mod user;

pub use error::DomainError;
pub use membership::{
    MemberIdentity, MemberRole, Membership, MembershipRepository, MembershipStatus,
};
pub use notify::{InviteNotification, Notifier, ResetNotification};
pub use project::{
    validate_project_id, validate_project_name, Project, ProjectId, ProjectRepository,
    ProjectValidationError,
};
pub use token::{Token, TokenId, TokenKind, TokenRepository, TokenTarget};
pub use user::{
    normalize_email, validate_email, validate_user_id, User, UserDirectory, UserId,
    UserValidationError,
};
