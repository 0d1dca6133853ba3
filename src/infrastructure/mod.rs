//! Infrastructure layer - Concrete stores, services and delivery

pub mod access;
pub mod logging;
pub mod membership;
pub mod notify;
pub mod project;
pub mod recovery;
pub mod token;
pub mod user;

pub use access::{AdminContext, AdminGate};
pub use membership::{
    Ack, InMemoryMembershipRepository, InviteCheck, MembershipService, MembershipServiceDeps,
};
pub use notify::{NoopNotifier, WebhookNotifier};
pub use project::{
    InMemoryProjectRepository, MemberSummary, ProjectService, ProjectServiceDeps,
    ProjectWithMembers, UpdateProjectRequest,
};
pub use recovery::{RecoveryService, RecoveryServiceDeps};
pub use token::{InMemoryTokenRepository, TokenValueGenerator};
pub use user::InMemoryUserDirectory;
