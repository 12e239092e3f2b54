use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Tracked;
use crate::authz::UpdateStatus;

/// Weekly status report filed against a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyUpdate {
    pub id: Uuid,
    pub project_id: Uuid,
    pub week_starting: NaiveDate,
    pub summary: String,
    pub submitted_by: Uuid,
    pub status: UpdateStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WeeklyUpdate {
    pub fn new(project_id: Uuid, week_starting: NaiveDate, summary: &str, submitted_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            week_starting,
            summary: summary.to_string(),
            submitted_by,
            status: UpdateStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Tracked for WeeklyUpdate {
    type Status = UpdateStatus;

    fn id(&self) -> Uuid {
        self.id
    }

    fn status(&self) -> UpdateStatus {
        self.status
    }

    fn set_status(&mut self, status: UpdateStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}
