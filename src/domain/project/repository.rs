//! Project repository trait

use async_trait::async_trait;

use super::entity::{Project, ProjectId};
use crate::domain::DomainError;

/// Repository trait for project storage
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Create a new project
    async fn create(&self, project: Project) -> Result<Project, DomainError>;

    /// Find a project by its ID
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError>;

    /// Update an existing project
    async fn update(&self, project: &Project) -> Result<Project, DomainError>;

    /// Delete a project, returning whether a row was removed
    async fn delete(&self, id: &ProjectId) -> Result<bool, DomainError>;
}
