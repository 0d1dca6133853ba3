//! Project service: creation, reads gated on membership, renames, deletion

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::membership::{
    MemberIdentity, MemberRole, Membership, MembershipRepository, MembershipStatus,
};
use crate::domain::project::{validate_project_name, Project, ProjectId, ProjectRepository};
use crate::domain::user::{UserDirectory, UserId};
use crate::domain::DomainError;
use crate::infrastructure::access::AdminGate;

/// Fields a project update may change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
}

/// One member as shown on a project roster
#[derive(Debug, Clone, Serialize)]
pub struct MemberSummary {
    pub email: String,
    /// Present only for members with an account
    pub name: Option<String>,
    pub role: MemberRole,
    pub status: MembershipStatus,
}

/// A project together with its full roster
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithMembers {
    pub project: Project,
    pub members: Vec<MemberSummary>,
}

/// Dependencies for the project service
pub struct ProjectServiceDeps {
    pub gate: Arc<AdminGate>,
    pub projects: Arc<dyn ProjectRepository>,
    pub memberships: Arc<dyn MembershipRepository>,
    pub users: Arc<dyn UserDirectory>,
}

/// Project service
pub struct ProjectService {
    deps: ProjectServiceDeps,
}

impl ProjectService {
    pub fn new(deps: ProjectServiceDeps) -> Self {
        Self { deps }
    }

    /// Create a project. The creator becomes its first admin with an
    /// already-accepted membership.
    pub async fn create(&self, caller_id: &UserId, name: &str) -> Result<Project, DomainError> {
        validate_project_name(name).map_err(|e| DomainError::bad_request(e.to_string()))?;

        // Creating on behalf of an unknown account is a malformed request
        self.deps
            .users
            .find_by_id(caller_id)
            .await?
            .ok_or_else(|| DomainError::bad_request(format!("User '{}' not found", caller_id)))?;

        let project = Project::new(ProjectId::generate(), name);
        info!(project_id = %project.id(), caller_id = %caller_id, name = %name, "Creating project");

        self.deps.projects.create(project.clone()).await?;
        self.deps
            .memberships
            .create(Membership::new(
                project.id().clone(),
                MemberIdentity::registered(caller_id.clone()),
                MemberRole::Admin,
                MembershipStatus::Accepted,
            ))
            .await?;

        Ok(project)
    }

    /// Fetch a project with its roster. Any member with an accepted
    /// membership may read it, regardless of role.
    pub async fn find_by_id(
        &self,
        caller_id: &UserId,
        project_id: &ProjectId,
    ) -> Result<ProjectWithMembers, DomainError> {
        let project = self
            .deps
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Project '{}' not found", project_id)))?;

        let caller_key = MemberIdentity::registered(caller_id.clone());
        let accepted = self
            .deps
            .memberships
            .find(project_id, &caller_key)
            .await?
            .map(|m| m.is_accepted())
            .unwrap_or(false);
        if !accepted {
            return Err(DomainError::forbidden(format!(
                "User '{}' is not a member of project '{}'",
                caller_id, project_id
            )));
        }

        let members = self.roster(project_id).await?;
        Ok(ProjectWithMembers { project, members })
    }

    /// List every project the caller holds an accepted membership in,
    /// each with its roster.
    pub async fn list_for_user(
        &self,
        caller_id: &UserId,
    ) -> Result<Vec<ProjectWithMembers>, DomainError> {
        let memberships = self.deps.memberships.list_for_user(caller_id).await?;

        let mut result = Vec::new();
        for membership in memberships.iter().filter(|m| m.is_accepted()) {
            let Some(project) = self.deps.projects.find_by_id(membership.project_id()).await?
            else {
                // Membership rows are not cascaded on project deletion
                debug!(project_id = %membership.project_id(), "Skipping membership of deleted project");
                continue;
            };
            let members = self.roster(membership.project_id()).await?;
            result.push(ProjectWithMembers { project, members });
        }

        Ok(result)
    }

    /// Rename a project. Admin-only.
    pub async fn update(
        &self,
        caller_id: &UserId,
        project_id: &ProjectId,
        request: UpdateProjectRequest,
    ) -> Result<Project, DomainError> {
        let context = self.deps.gate.require_admin(project_id, caller_id).await?;

        let mut project = context.project;
        if let Some(name) = request.name {
            validate_project_name(&name).map_err(|e| DomainError::bad_request(e.to_string()))?;
            info!(project_id = %project_id, caller_id = %caller_id, name = %name, "Renaming project");
            project.set_name(name);
        }

        self.deps.projects.update(&project).await?;
        Ok(project)
    }

    /// Delete a project. Admin-only. Membership rows and outstanding
    /// invitation tokens are left behind and become inert.
    pub async fn delete(
        &self,
        caller_id: &UserId,
        project_id: &ProjectId,
    ) -> Result<(), DomainError> {
        self.deps.gate.require_admin(project_id, caller_id).await?;

        info!(project_id = %project_id, caller_id = %caller_id, "Deleting project");
        self.deps.projects.delete(project_id).await?;
        Ok(())
    }

    async fn roster(&self, project_id: &ProjectId) -> Result<Vec<MemberSummary>, DomainError> {
        let memberships = self.deps.memberships.list_by_project(project_id).await?;

        let mut members = Vec::with_capacity(memberships.len());
        for membership in memberships {
            let summary = match membership.member() {
                MemberIdentity::Registered(user_id) => {
                    let Some(profile) = self.deps.users.find_by_id(user_id).await? else {
                        debug!(user_id = %user_id, "Skipping member with no profile");
                        continue;
                    };
                    MemberSummary {
                        email: profile.email().to_string(),
                        name: Some(profile.name().to_string()),
                        role: membership.role(),
                        status: membership.status(),
                    }
                }
                MemberIdentity::Unregistered(email) => MemberSummary {
                    email: email.clone(),
                    name: None,
                    role: membership.role(),
                    status: membership.status(),
                },
            };
            members.push(summary);
        }

        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::User;
    use crate::infrastructure::membership::InMemoryMembershipRepository;
    use crate::infrastructure::project::InMemoryProjectRepository;
    use crate::infrastructure::user::InMemoryUserDirectory;

    struct Fixture {
        service: ProjectService,
        projects: Arc<InMemoryProjectRepository>,
        memberships: Arc<InMemoryMembershipRepository>,
        users: Arc<InMemoryUserDirectory>,
    }

    fn create_fixture() -> Fixture {
        let projects = Arc::new(InMemoryProjectRepository::new());
        let memberships = Arc::new(InMemoryMembershipRepository::new());
        let users = Arc::new(InMemoryUserDirectory::new());

        let gate = Arc::new(AdminGate::new(
            projects.clone(),
            memberships.clone(),
            users.clone(),
        ));
        let service = ProjectService::new(ProjectServiceDeps {
            gate,
            projects: projects.clone(),
            memberships: memberships.clone(),
            users: users.clone(),
        });

        Fixture {
            service,
            projects,
            memberships,
            users,
        }
    }

    fn user_id(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    async fn seed_user(fixture: &Fixture, id: &str, email: &str) {
        fixture
            .users
            .add_user(User::new(user_id(id), email, format!("User {}", id)))
            .await;
    }

    async fn seed_member(
        fixture: &Fixture,
        project_id: &ProjectId,
        member: MemberIdentity,
        role: MemberRole,
        status: MembershipStatus,
    ) {
        fixture
            .memberships
            .create(Membership::new(project_id.clone(), member, role, status))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_seeds_admin_membership() {
        let fixture = create_fixture();
        seed_user(&fixture, "alice", "alice@example.com").await;

        let project = fixture.service.create(&user_id("alice"), "Apollo").await.unwrap();
        assert_eq!(project.name(), "Apollo");

        let row = fixture
            .memberships
            .find(
                project.id(),
                &MemberIdentity::registered(user_id("alice")),
            )
            .await
            .unwrap()
            .expect("creator membership missing");
        assert_eq!(row.role(), MemberRole::Admin);
        assert!(row.is_accepted());
    }

    #[tokio::test]
    async fn test_create_without_profile_is_bad_request() {
        let fixture = create_fixture();

        let result = fixture.service.create(&user_id("ghost"), "Apollo").await;
        assert!(matches!(result, Err(DomainError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let fixture = create_fixture();
        seed_user(&fixture, "alice", "alice@example.com").await;

        let result = fixture.service.create(&user_id("alice"), "   ").await;
        assert!(matches!(result, Err(DomainError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn test_find_by_id_returns_roster() {
        let fixture = create_fixture();
        seed_user(&fixture, "alice", "alice@example.com").await;

        let project = fixture.service.create(&user_id("alice"), "Apollo").await.unwrap();
        seed_member(
            &fixture,
            project.id(),
            MemberIdentity::unregistered("bob@example.com"),
            MemberRole::Member,
            MembershipStatus::Pending,
        )
        .await;

        let found = fixture
            .service
            .find_by_id(&user_id("alice"), project.id())
            .await
            .unwrap();
        assert_eq!(found.project.id(), project.id());
        assert_eq!(found.members.len(), 2);

        let alice = found
            .members
            .iter()
            .find(|m| m.email == "alice@example.com")
            .unwrap();
        assert_eq!(alice.name.as_deref(), Some("User alice"));
        assert_eq!(alice.role, MemberRole::Admin);
        assert_eq!(alice.status, MembershipStatus::Accepted);

        let bob = found
            .members
            .iter()
            .find(|m| m.email == "bob@example.com")
            .unwrap();
        assert!(bob.name.is_none());
        assert_eq!(bob.status, MembershipStatus::Pending);
    }

    #[tokio::test]
    async fn test_find_by_id_requires_accepted_membership() {
        let fixture = create_fixture();
        seed_user(&fixture, "alice", "alice@example.com").await;
        seed_user(&fixture, "carol", "carol@example.com").await;

        let project = fixture.service.create(&user_id("alice"), "Apollo").await.unwrap();

        // Not a member at all
        let result = fixture.service.find_by_id(&user_id("carol"), project.id()).await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));

        // Invited but not yet accepted
        seed_member(
            &fixture,
            project.id(),
            MemberIdentity::registered(user_id("carol")),
            MemberRole::Member,
            MembershipStatus::Pending,
        )
        .await;
        let result = fixture.service.find_by_id(&user_id("carol"), project.id()).await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_find_by_id_missing_project_is_not_found() {
        let fixture = create_fixture();
        seed_user(&fixture, "alice", "alice@example.com").await;

        let result = fixture
            .service
            .find_by_id(&user_id("alice"), &ProjectId::new("ghost").unwrap())
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_for_user_returns_accepted_projects_only() {
        let fixture = create_fixture();
        seed_user(&fixture, "alice", "alice@example.com").await;
        seed_user(&fixture, "dave", "dave@example.com").await;

        let apollo = fixture.service.create(&user_id("alice"), "Apollo").await.unwrap();
        let borealis = fixture.service.create(&user_id("dave"), "Borealis").await.unwrap();
        let gemini = fixture.service.create(&user_id("dave"), "Gemini").await.unwrap();

        // Accepted into Borealis, still pending on Gemini
        seed_member(
            &fixture,
            borealis.id(),
            MemberIdentity::registered(user_id("alice")),
            MemberRole::Member,
            MembershipStatus::Accepted,
        )
        .await;
        seed_member(
            &fixture,
            gemini.id(),
            MemberIdentity::registered(user_id("alice")),
            MemberRole::Member,
            MembershipStatus::Pending,
        )
        .await;

        let listed = fixture.service.list_for_user(&user_id("alice")).await.unwrap();
        let names: Vec<&str> = listed.iter().map(|p| p.project.name()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Apollo"));
        assert!(names.contains(&"Borealis"));
        assert!(!names.contains(&"Gemini"));

        // Rosters ride along
        let borealis_entry = listed
            .iter()
            .find(|p| p.project.id() == borealis.id())
            .unwrap();
        assert_eq!(borealis_entry.members.len(), 2);

        let _ = apollo;
    }

    #[tokio::test]
    async fn test_list_for_user_skips_deleted_projects() {
        let fixture = create_fixture();
        seed_user(&fixture, "alice", "alice@example.com").await;

        let project = fixture.service.create(&user_id("alice"), "Apollo").await.unwrap();
        fixture.projects.delete(project.id()).await.unwrap();

        let listed = fixture.service.list_for_user(&user_id("alice")).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_update_renames_project() {
        let fixture = create_fixture();
        seed_user(&fixture, "alice", "alice@example.com").await;

        let project = fixture.service.create(&user_id("alice"), "Apollo").await.unwrap();
        let updated = fixture
            .service
            .update(
                &user_id("alice"),
                project.id(),
                UpdateProjectRequest {
                    name: Some("Apollo 11".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name(), "Apollo 11");

        let found = fixture
            .service
            .find_by_id(&user_id("alice"), project.id())
            .await
            .unwrap();
        assert_eq!(found.project.name(), "Apollo 11");
    }

    #[tokio::test]
    async fn test_update_requires_admin() {
        let fixture = create_fixture();
        seed_user(&fixture, "alice", "alice@example.com").await;
        seed_user(&fixture, "carol", "carol@example.com").await;

        let project = fixture.service.create(&user_id("alice"), "Apollo").await.unwrap();
        seed_member(
            &fixture,
            project.id(),
            MemberIdentity::registered(user_id("carol")),
            MemberRole::Member,
            MembershipStatus::Accepted,
        )
        .await;

        let result = fixture
            .service
            .update(
                &user_id("carol"),
                project.id(),
                UpdateProjectRequest {
                    name: Some("Hijacked".to_string()),
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_update_rejects_blank_name() {
        let fixture = create_fixture();
        seed_user(&fixture, "alice", "alice@example.com").await;

        let project = fixture.service.create(&user_id("alice"), "Apollo").await.unwrap();
        let result = fixture
            .service
            .update(
                &user_id("alice"),
                project.id(),
                UpdateProjectRequest {
                    name: Some("  ".to_string()),
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn test_delete_requires_admin() {
        let fixture = create_fixture();
        seed_user(&fixture, "alice", "alice@example.com").await;
        seed_user(&fixture, "carol", "carol@example.com").await;

        let project = fixture.service.create(&user_id("alice"), "Apollo").await.unwrap();

        let result = fixture.service.delete(&user_id("carol"), project.id()).await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));

        fixture.service.delete(&user_id("alice"), project.id()).await.unwrap();
        let result = fixture.service.find_by_id(&user_id("alice"), project.id()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
