//! In-memory project repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::project::{Project, ProjectId, ProjectRepository};
use crate::domain::DomainError;

/// In-memory implementation of ProjectRepository
#[derive(Debug)]
pub struct InMemoryProjectRepository {
    projects: Arc<RwLock<HashMap<String, Project>>>,
}

impl InMemoryProjectRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            projects: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryProjectRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn create(&self, project: Project) -> Result<Project, DomainError> {
        let mut projects = self.projects.write().await;
        let id = project.id().as_str().to_string();

        if projects.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "Project with ID '{}' already exists",
                id
            )));
        }

        projects.insert(id, project.clone());
        Ok(project)
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        let projects = self.projects.read().await;
        Ok(projects.get(id.as_str()).cloned())
    }

    async fn update(&self, project: &Project) -> Result<Project, DomainError> {
        let mut projects = self.projects.write().await;
        let id = project.id().as_str().to_string();

        if !projects.contains_key(&id) {
            return Err(DomainError::not_found(format!(
                "Project '{}' not found",
                id
            )));
        }

        projects.insert(id, project.clone());
        Ok(project.clone())
    }

    async fn delete(&self, id: &ProjectId) -> Result<bool, DomainError> {
        let mut projects = self.projects.write().await;
        Ok(projects.remove(id.as_str()).is_some())
    }
}
