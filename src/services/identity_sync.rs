use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::IdentityConfig;
use crate::database::directory::{DirectoryError, UserDirectory};
use crate::database::models::{NewShadowUser, User};

/// Identity asserted by the upstream provider. Trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityAssertion {
    pub email: String,
    pub external_id: String,
}

impl IdentityAssertion {
    pub fn new(email: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            external_id: external_id.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Invalid identity assertion: missing {0}")]
    InvalidAssertion(&'static str),

    /// Storage failed underneath; callers only need to know sync did not happen
    #[error("User sync failed")]
    SyncFailed(#[source] DirectoryError),
}

/// Reconciles externally authenticated identities with local user rows,
/// creating a shadow user the first time an identity is seen.
pub struct IdentitySync {
    directory: Arc<dyn UserDirectory>,
    settings: IdentityConfig,
}

impl IdentitySync {
    pub fn new(directory: Arc<dyn UserDirectory>, settings: IdentityConfig) -> Self {
        Self { directory, settings }
    }

    pub fn settings(&self) -> &IdentityConfig {
        &self.settings
    }

    pub async fn resolve(&self, assertion: &IdentityAssertion) -> Result<User, SyncError> {
        self.resolve_or_create_user(&assertion.email, &assertion.external_id)
            .await
    }

    pub async fn resolve_or_create_user(&self, email: &str, external_id: &str) -> Result<User, SyncError> {
        let email = email.trim();
        let external_id = external_id.trim();
        if email.is_empty() {
            return Err(SyncError::InvalidAssertion("email"));
        }
        if external_id.is_empty() {
            return Err(SyncError::InvalidAssertion("external id"));
        }

        let attempts = self.settings.sync_retry_attempts.max(1);
        for attempt in 1..=attempts {
            if let Some(user) = self.lookup(email).await? {
                return self.reconcile(user, external_id).await;
            }

            let new_user = NewShadowUser::new(email, &self.settings.default_role, external_id);
            match self
                .directory
                .create_shadow_user(new_user, &self.settings.sentinel_department)
                .await
            {
                Ok(user) => {
                    info!(
                        "Created shadow user {} for '{}' with role '{}'",
                        user.id, user.username, user.role
                    );
                    return Ok(user);
                }
                Err(DirectoryError::Conflict(what)) => {
                    // Another request created the row between our lookup and insert
                    debug!("Shadow user insert lost a race on {} (attempt {}/{}), re-fetching", what, attempt, attempts);
                }
                Err(e) => return Err(SyncError::SyncFailed(e)),
            }
        }

        // The last insert lost a race too; the winner's row should be visible now
        if let Some(user) = self.lookup(email).await? {
            return self.reconcile(user, external_id).await;
        }

        warn!("Gave up syncing '{}' after {} conflicting attempts", email, attempts);
        Err(SyncError::SyncFailed(DirectoryError::Conflict(format!(
            "username '{}'",
            email
        ))))
    }

    async fn lookup(&self, email: &str) -> Result<Option<User>, SyncError> {
        self.directory
            .find_user_by_username(email)
            .await
            .map_err(SyncError::SyncFailed)
    }

    async fn reconcile(&self, user: User, external_id: &str) -> Result<User, SyncError> {
        match user.external_id() {
            None => {
                let user = self
                    .directory
                    .backfill_external_id(user.id, external_id)
                    .await
                    .map_err(SyncError::SyncFailed)?;
                debug!("Linked user {} to external identity", user.id);
                Ok(user)
            }
            Some(current) if current != external_id => {
                // No drift handling: the first linked id wins
                warn!(
                    "User {} is linked to a different external id than asserted; keeping the stored one",
                    user.id
                );
                Ok(user)
            }
            Some(_) => Ok(user),
        }
    }
}
