use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::database::directory::{DirectoryError, UserDirectory};
use crate::database::models::{Department, NewShadowUser, User};

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    departments: HashMap<Uuid, Department>,
}

impl MemoryState {
    fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }

    fn department_by_name(&self, name: &str) -> Option<&Department> {
        self.departments.values().find(|d| d.name == name)
    }
}

/// In-process `UserDirectory` for development and tests. Writes happen
/// under a single lock, which gives the same uniqueness guarantees as the
/// database constraints on username and department name.
#[derive(Default)]
pub struct MemoryDirectory {
    state: RwLock<MemoryState>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a department, rejecting duplicate names
    pub async fn insert_department(&self, department: Department) -> Result<Department, DirectoryError> {
        let mut state = self.state.write().await;
        if state.department_by_name(&department.name).is_some() {
            return Err(DirectoryError::Conflict(format!("department '{}'", department.name)));
        }
        state.departments.insert(department.id, department.clone());
        Ok(department)
    }

    /// Insert a user row as-is, rejecting duplicate usernames and dangling
    /// department references
    pub async fn insert_user(&self, user: User) -> Result<User, DirectoryError> {
        let mut state = self.state.write().await;
        if state.user_by_username(&user.username).is_some() {
            return Err(DirectoryError::Conflict(format!("username '{}'", user.username)));
        }
        if let Some(department_id) = user.department_id {
            if !state.departments.contains_key(&department_id) {
                return Err(DirectoryError::NotFound(format!("department {}", department_id)));
            }
        }
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }

    pub async fn departments_named(&self, name: &str) -> usize {
        self.state
            .read()
            .await
            .departments
            .values()
            .filter(|d| d.name == name)
            .count()
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DirectoryError> {
        Ok(self.state.read().await.user_by_username(username).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DirectoryError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn backfill_external_id(&self, user_id: Uuid, external_id: &str) -> Result<User, DirectoryError> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| DirectoryError::NotFound(format!("user {}", user_id)))?;

        if !user.is_linked() {
            user.external_id = Some(external_id.to_string());
            user.updated_at = Utc::now();
        }
        Ok(user.clone())
    }

    async fn create_shadow_user(
        &self,
        new_user: NewShadowUser,
        sentinel_department: &str,
    ) -> Result<User, DirectoryError> {
        let mut state = self.state.write().await;

        // Check the username before touching departments so a conflict
        // leaves nothing behind.
        if state.user_by_username(&new_user.username).is_some() {
            return Err(DirectoryError::Conflict(format!("username '{}'", new_user.username)));
        }

        let existing = state.department_by_name(sentinel_department).map(|d| d.id);
        let department_id = match existing {
            Some(id) => id,
            None => {
                let department = Department::new(sentinel_department);
                info!("Created sentinel department '{}'", sentinel_department);
                let id = department.id;
                state.departments.insert(id, department);
                id
            }
        };

        let now = Utc::now();
        let user = User {
            id: new_user.id,
            username: new_user.username,
            role: new_user.role,
            department_id: Some(department_id),
            external_id: Some(new_user.external_id),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_department(&self, id: Uuid) -> Result<Option<Department>, DirectoryError> {
        Ok(self.state.read().await.departments.get(&id).cloned())
    }

    async fn find_department_by_name(&self, name: &str) -> Result<Option<Department>, DirectoryError> {
        Ok(self.state.read().await.department_by_name(name).cloned())
    }

    async fn health_check(&self) -> Result<(), DirectoryError> {
        Ok(())
    }
}
