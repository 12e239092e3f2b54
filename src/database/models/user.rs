use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    /// Email address, unique across users
    pub username: String,
    pub role: String,
    pub department_id: Option<Uuid>,
    pub external_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// An empty string counts as "not linked yet", same as NULL.
    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn is_linked(&self) -> bool {
        self.external_id().is_some()
    }
}

/// Row data for a user created from an external identity
#[derive(Debug, Clone)]
pub struct NewShadowUser {
    pub id: Uuid,
    pub username: String,
    pub role: String,
    pub external_id: String,
}

impl NewShadowUser {
    pub fn new(username: &str, role: &str, external_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            role: role.to_string(),
            external_id: external_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(external_id: Option<&str>) -> User {
        User {
            id: Uuid::new_v4(),
            username: "a@x.com".to_string(),
            role: "ProjectManager".to_string(),
            department_id: None,
            external_id: external_id.map(str::to_string),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_external_id_is_unlinked() {
        assert!(!user(None).is_linked());
        assert!(!user(Some("")).is_linked());
        assert_eq!(user(Some("ext1")).external_id(), Some("ext1"));
    }
}
