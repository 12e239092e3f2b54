use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Tracked;
use crate::authz::ChangeRequestStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub requested_by: Uuid,
    pub status: ChangeRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChangeRequest {
    pub fn new(project_id: Uuid, title: &str, description: &str, requested_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            title: title.to_string(),
            description: description.to_string(),
            requested_by,
            status: ChangeRequestStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Tracked for ChangeRequest {
    type Status = ChangeRequestStatus;

    fn id(&self) -> Uuid {
        self.id
    }

    fn status(&self) -> ChangeRequestStatus {
        self.status
    }

    fn set_status(&mut self, status: ChangeRequestStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}
