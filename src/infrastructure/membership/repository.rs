//! In-memory membership repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::membership::{
    MemberIdentity, Membership, MembershipRepository, MembershipStatus,
};
use crate::domain::project::ProjectId;
use crate::domain::user::UserId;
use crate::domain::DomainError;

type RowKey = (String, MemberIdentity);

fn row_key(project_id: &ProjectId, member: &MemberIdentity) -> RowKey {
    (project_id.as_str().to_string(), member.clone())
}

/// In-memory implementation of MembershipRepository. Rows are keyed by
/// (project, identity), which is also the uniqueness constraint.
#[derive(Debug)]
pub struct InMemoryMembershipRepository {
    rows: Arc<RwLock<HashMap<RowKey, Membership>>>,
}

impl InMemoryMembershipRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryMembershipRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn create(&self, membership: Membership) -> Result<Membership, DomainError> {
        let mut rows = self.rows.write().await;
        let key = row_key(membership.project_id(), membership.member());

        if rows.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "Membership for {} in project '{}' already exists",
                membership.member(),
                membership.project_id()
            )));
        }

        rows.insert(key, membership.clone());
        Ok(membership)
    }

    async fn find(
        &self,
        project_id: &ProjectId,
        member: &MemberIdentity,
    ) -> Result<Option<Membership>, DomainError> {
        let rows = self.rows.read().await;
        Ok(rows.get(&row_key(project_id, member)).cloned())
    }

    async fn list_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Membership>, DomainError> {
        let rows = self.rows.read().await;

        let mut result: Vec<Membership> = rows
            .values()
            .filter(|m| m.project_id() == project_id)
            .cloned()
            .collect();
        result.sort_by_key(|m| m.created_at());

        Ok(result)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Membership>, DomainError> {
        let rows = self.rows.read().await;

        let mut result: Vec<Membership> = rows
            .values()
            .filter(|m| m.member().user_id() == Some(user_id))
            .cloned()
            .collect();
        result.sort_by_key(|m| m.created_at());

        Ok(result)
    }

    async fn update(&self, membership: &Membership) -> Result<Membership, DomainError> {
        let mut rows = self.rows.write().await;
        let key = row_key(membership.project_id(), membership.member());

        if !rows.contains_key(&key) {
            return Err(DomainError::not_found(format!(
                "Membership for {} in project '{}' not found",
                membership.member(),
                membership.project_id()
            )));
        }

        rows.insert(key, membership.clone());
        Ok(membership.clone())
    }

    async fn update_status(
        &self,
        project_id: &ProjectId,
        member: &MemberIdentity,
        status: MembershipStatus,
    ) -> Result<Membership, DomainError> {
        let mut rows = self.rows.write().await;

        match rows.get_mut(&row_key(project_id, member)) {
            Some(row) => {
                row.set_status(status);
                Ok(row.clone())
            }
            None => Err(DomainError::not_found(format!(
                "Membership for {} in project '{}' not found",
                member, project_id
            ))),
        }
    }

    async fn delete(
        &self,
        project_id: &ProjectId,
        member: &MemberIdentity,
    ) -> Result<bool, DomainError> {
        let mut rows = self.rows.write().await;
        Ok(rows.remove(&row_key(project_id, member)).is_some())
    }

    async fn delete_many(
        &self,
        project_id: &ProjectId,
        members: &[MemberIdentity],
    ) -> Result<usize, DomainError> {
        let mut rows = self.rows.write().await;

        let mut removed = 0;
        for member in members {
            if rows.remove(&row_key(project_id, member)).is_some() {
                removed += 1;
            }
        }

        Ok(removed)
    }
}
