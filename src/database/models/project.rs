use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Tracked;
use crate::authz::ProjectStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub department_id: Uuid,
    pub project_manager_id: Uuid,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: &str, department_id: Uuid, project_manager_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            department_id,
            project_manager_id,
            status: ProjectStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Tracked for Project {
    type Status = ProjectStatus;

    fn id(&self) -> Uuid {
        self.id
    }

    fn status(&self) -> ProjectStatus {
        self.status
    }

    fn set_status(&mut self, status: ProjectStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}
