use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::database::models::User;
use crate::services::identity_sync::{IdentityAssertion, IdentitySync, SyncError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}

/// The external identity provider, reduced to the two calls the tracker makes.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityAssertion, ProviderError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), ProviderError>;
}

/// Used when no provider is wired in; every call fails as unavailable.
pub struct DisabledProvider;

#[async_trait]
impl IdentityProvider for DisabledProvider {
    async fn sign_in(&self, _email: &str, _password: &str) -> Result<IdentityAssertion, ProviderError> {
        Err(ProviderError::Unavailable("no identity provider configured".to_string()))
    }

    async fn send_password_reset(&self, _email: &str) -> Result<(), ProviderError> {
        Err(ProviderError::Unavailable("no identity provider configured".to_string()))
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication failed")]
    AuthenticationFailed(#[source] ProviderError),

    #[error("Account is disabled")]
    AccountDisabled,

    #[error(transparent)]
    Sync(#[from] SyncError),
}

pub struct AccountService {
    provider: Arc<dyn IdentityProvider>,
    sync: Arc<IdentitySync>,
}

impl AccountService {
    pub fn new(provider: Arc<dyn IdentityProvider>, sync: Arc<IdentitySync>) -> Self {
        Self { provider, sync }
    }

    /// Sign in through the provider and map the identity to a local user.
    /// Provider failures are reported as authentication failures, no retry.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let assertion = self.provider.sign_in(email, password).await.map_err(|e| {
            warn!("Sign-in rejected by identity provider: {}", e);
            AuthError::AuthenticationFailed(e)
        })?;

        let user = self.sync.resolve(&assertion).await?;
        if !user.is_active {
            warn!("Inactive user {} attempted to sign in", user.id);
            return Err(AuthError::AccountDisabled);
        }

        info!("User {} signed in", user.id);
        Ok(user)
    }

    /// Always succeeds from the caller's point of view so the response does
    /// not reveal whether the account exists.
    pub async fn request_password_reset(&self, email: &str) {
        match self.provider.send_password_reset(email).await {
            Ok(()) => info!("Password reset requested"),
            Err(e) => warn!("Password reset failed at identity provider (masked): {}", e),
        }
    }
}
