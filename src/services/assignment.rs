use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::authz::RoleCatalog;
use crate::database::directory::{DirectoryError, UserDirectory};
use crate::database::models::{Project, User};

#[derive(Debug, Error)]
pub enum AssignmentError {
    #[error("Department not found: {0}")]
    DepartmentNotFound(Uuid),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("User {user_id} has role '{role}', which cannot manage projects")]
    NotAProjectManager { user_id: Uuid, role: String },

    #[error("User {0} is inactive")]
    InactiveUser(Uuid),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Referential rules for department membership and project ownership
pub struct AssignmentRules {
    catalog: Arc<RoleCatalog>,
    directory: Arc<dyn UserDirectory>,
}

impl AssignmentRules {
    pub fn new(catalog: Arc<RoleCatalog>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { catalog, directory }
    }

    /// A missing department reference is always valid
    pub async fn ensure_department(&self, department_id: Option<Uuid>) -> Result<(), AssignmentError> {
        let Some(id) = department_id else {
            return Ok(());
        };
        match self.directory.find_department(id).await? {
            Some(_) => Ok(()),
            None => Err(AssignmentError::DepartmentNotFound(id)),
        }
    }

    pub async fn ensure_user_department(&self, user: &User) -> Result<(), AssignmentError> {
        self.ensure_department(user.department_id).await
    }

    /// The user must exist, be active, and hold a role that manages projects.
    pub async fn ensure_project_manager(&self, user_id: Uuid) -> Result<User, AssignmentError> {
        let user = self
            .directory
            .find_user_by_id(user_id)
            .await?
            .ok_or(AssignmentError::UserNotFound(user_id))?;

        if !user.is_active {
            return Err(AssignmentError::InactiveUser(user_id));
        }

        let manages = self
            .catalog
            .role(&user.role)
            .map(|r| r.can_manage_projects())
            .unwrap_or(false);
        if !manages {
            return Err(AssignmentError::NotAProjectManager {
                user_id,
                role: user.role.clone(),
            });
        }

        Ok(user)
    }

    pub async fn validate_project(&self, project: &Project) -> Result<(), AssignmentError> {
        self.ensure_department(Some(project.department_id)).await?;
        self.ensure_project_manager(project.project_manager_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryDirectory;
    use crate::database::models::Department;
    use chrono::Utc;

    fn user(role: &str, department_id: Option<Uuid>, is_active: bool) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: format!("{}@x.com", Uuid::new_v4().simple()),
            role: role.to_string(),
            department_id,
            external_id: None,
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    async fn setup() -> (Arc<MemoryDirectory>, AssignmentRules, Department) {
        let dir = Arc::new(MemoryDirectory::new());
        let department = dir.insert_department(Department::new("Engineering")).await.unwrap();
        let rules = AssignmentRules::new(Arc::new(RoleCatalog::seeded()), dir.clone());
        (dir, rules, department)
    }

    #[tokio::test]
    async fn project_manager_must_manage_projects() {
        let (dir, rules, department) = setup().await;
        let pm = dir.insert_user(user("ProjectManager", Some(department.id), true)).await.unwrap();
        let member = dir.insert_user(user("TeamMember", Some(department.id), true)).await.unwrap();

        assert_eq!(rules.ensure_project_manager(pm.id).await.unwrap().id, pm.id);
        assert!(matches!(
            rules.ensure_project_manager(member.id).await,
            Err(AssignmentError::NotAProjectManager { .. })
        ));
        assert!(matches!(
            rules.ensure_project_manager(Uuid::new_v4()).await,
            Err(AssignmentError::UserNotFound(_))
        ));
    }

    #[tokio::test]
    async fn inactive_or_unknown_role_rejected() {
        let (dir, rules, _) = setup().await;
        let inactive = dir.insert_user(user("ProjectManager", None, false)).await.unwrap();
        let stranger = dir.insert_user(user("Contractor", None, true)).await.unwrap();

        assert!(matches!(
            rules.ensure_project_manager(inactive.id).await,
            Err(AssignmentError::InactiveUser(_))
        ));
        assert!(matches!(
            rules.ensure_project_manager(stranger.id).await,
            Err(AssignmentError::NotAProjectManager { .. })
        ));
    }

    #[tokio::test]
    async fn validates_project_references() {
        let (dir, rules, department) = setup().await;
        let pm = dir.insert_user(user("PMO", Some(department.id), true)).await.unwrap();

        let project = Project::new("Data platform", department.id, pm.id);
        rules.validate_project(&project).await.unwrap();

        let orphan = Project::new("Orphan", Uuid::new_v4(), pm.id);
        assert!(matches!(
            rules.validate_project(&orphan).await,
            Err(AssignmentError::DepartmentNotFound(_))
        ));

        rules.ensure_user_department(&pm).await.unwrap();
        rules.ensure_department(None).await.unwrap();
    }
}
