use std::sync::Arc;

use thiserror::Error;

use crate::authz::{RoleCatalog, Transitions};
use crate::config::IdentityConfig;
use crate::database::directory::UserDirectory;
use crate::services::{AccountService, IdentityProvider, IdentitySync};

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Default shadow role '{0}' is not in the role catalog")]
    UnknownDefaultRole(String),

    #[error("JWT secret is not configured")]
    MissingJwtSecret,
}

/// Shared, immutable request state. Built once at startup and cloned into
/// every handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<RoleCatalog>,
    pub transitions: Arc<Transitions>,
    pub directory: Arc<dyn UserDirectory>,
    pub sync: Arc<IdentitySync>,
    pub accounts: Arc<AccountService>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    /// State over the seeded role catalog and transition tables
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        provider: Arc<dyn IdentityProvider>,
        identity: IdentityConfig,
        jwt_secret: &str,
    ) -> Result<Self, StateError> {
        Self::with_catalog(
            RoleCatalog::seeded(),
            Transitions::seeded(),
            directory,
            provider,
            identity,
            jwt_secret,
        )
    }

    pub fn with_catalog(
        catalog: RoleCatalog,
        transitions: Transitions,
        directory: Arc<dyn UserDirectory>,
        provider: Arc<dyn IdentityProvider>,
        identity: IdentityConfig,
        jwt_secret: &str,
    ) -> Result<Self, StateError> {
        if !catalog.contains(&identity.default_role) {
            return Err(StateError::UnknownDefaultRole(identity.default_role));
        }
        if jwt_secret.is_empty() {
            return Err(StateError::MissingJwtSecret);
        }

        let sync = Arc::new(IdentitySync::new(directory.clone(), identity));
        let accounts = Arc::new(AccountService::new(provider, sync.clone()));

        Ok(Self {
            catalog: Arc::new(catalog),
            transitions: Arc::new(transitions),
            directory,
            sync,
            accounts,
            jwt_secret: Arc::from(jwt_secret),
        })
    }
}
