//! Project infrastructure
//!
//! In-memory project storage and the project service.

mod repository;
mod service;

pub use repository::InMemoryProjectRepository;
pub use service::{
    MemberSummary, ProjectService, ProjectServiceDeps, ProjectWithMembers, UpdateProjectRequest,
};
