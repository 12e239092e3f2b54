use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Department, NewShadowUser, User};

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A unique constraint rejected the write; someone else created the row.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl From<crate::database::manager::DatabaseError> for DirectoryError {
    fn from(err: crate::database::manager::DatabaseError) -> Self {
        match err {
            crate::database::manager::DatabaseError::Sqlx(e) => DirectoryError::Sqlx(e),
            other => DirectoryError::Storage(other.to_string()),
        }
    }
}

/// Persistence for users and departments, as needed by identity sync and
/// the assignment rules.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DirectoryError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DirectoryError>;

    /// Set the external id only if the stored one is still empty, then return
    /// the current row. A no-op when another value is already present.
    async fn backfill_external_id(&self, user_id: Uuid, external_id: &str) -> Result<User, DirectoryError>;

    /// Ensure the sentinel department exists and insert the user into it, as
    /// one atomic unit. Returns `Conflict` when the username is taken.
    async fn create_shadow_user(&self, new_user: NewShadowUser, sentinel_department: &str)
        -> Result<User, DirectoryError>;

    async fn find_department(&self, id: Uuid) -> Result<Option<Department>, DirectoryError>;

    async fn find_department_by_name(&self, name: &str) -> Result<Option<Department>, DirectoryError>;

    async fn health_check(&self) -> Result<(), DirectoryError>;
}
