#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use anyhow::{Context, Result};
use async_trait::async_trait;
use uuid::Uuid;

use pmo_tracker::app::build_router;
use pmo_tracker::auth::{generate_jwt, Claims};
use pmo_tracker::config::{IdentityConfig, SecurityConfig};
use pmo_tracker::database::models::{Department, NewShadowUser, User};
use pmo_tracker::database::{DirectoryError, MemoryDirectory, UserDirectory};
use pmo_tracker::services::{DisabledProvider, IdentityAssertion, IdentityProvider, ProviderError};
use pmo_tracker::state::AppState;

pub const TEST_SECRET: &str = "test-secret";

static TRACING: Once = Once::new();

/// Route test logs through the env filter once per test binary
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<reqwest::Response> {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        Ok(req.send().await?)
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: serde_json::Value) -> Result<reqwest::Response> {
        let mut req = self.client.post(self.url(path)).json(&body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        Ok(req.send().await?)
    }
}

/// Serve the router on an ephemeral port with an in-memory directory and
/// no identity provider
pub async fn spawn_app() -> Result<TestApp> {
    spawn_app_with(Arc::new(MemoryDirectory::new()), Arc::new(DisabledProvider)).await
}

pub async fn spawn_app_with(
    directory: Arc<dyn UserDirectory>,
    provider: Arc<dyn IdentityProvider>,
) -> Result<TestApp> {
    init_tracing();

    let state = AppState::new(directory, provider, IdentityConfig::default(), TEST_SECRET)?;
    let security = SecurityConfig {
        jwt_secret: TEST_SECRET.to_string(),
        enable_cors: false,
        cors_origins: Vec::new(),
    };
    let app = build_router(state, &security);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind ephemeral port")?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestApp {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
    })
}

pub fn token_for(email: &str, external_id: &str) -> String {
    generate_jwt(&Claims::new(email, external_id, 1), TEST_SECRET).expect("token")
}

/// A user row already present before any sync, optionally unlinked
pub fn existing_user(username: &str, role: &str, department_id: Option<Uuid>, external_id: Option<&str>) -> User {
    let now = chrono::Utc::now();
    User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        role: role.to_string(),
        department_id,
        external_id: external_id.map(str::to_string),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Identity provider with a fixed set of accounts
#[derive(Default)]
pub struct StubProvider {
    accounts: HashMap<String, (String, String)>,
    reset_fails: bool,
}

impl StubProvider {
    pub fn with_account(mut self, email: &str, password: &str, external_id: &str) -> Self {
        self.accounts
            .insert(email.to_string(), (password.to_string(), external_id.to_string()));
        self
    }

    pub fn failing_resets(mut self) -> Self {
        self.reset_fails = true;
        self
    }
}

#[async_trait]
impl IdentityProvider for StubProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityAssertion, ProviderError> {
        match self.accounts.get(email) {
            Some((pw, external_id)) if pw == password => Ok(IdentityAssertion::new(email, external_id.clone())),
            Some(_) => Err(ProviderError::InvalidCredentials),
            None => Err(ProviderError::AccountNotFound),
        }
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), ProviderError> {
        if self.reset_fails || !self.accounts.contains_key(email) {
            return Err(ProviderError::AccountNotFound);
        }
        Ok(())
    }
}

/// Wraps a directory so the first `blind_lookups` username lookups miss,
/// forcing concurrent callers down the create path together.
pub struct RacingDirectory {
    pub inner: Arc<MemoryDirectory>,
    blind_lookups: usize,
    lookups: AtomicUsize,
}

impl RacingDirectory {
    pub fn new(inner: Arc<MemoryDirectory>, blind_lookups: usize) -> Self {
        Self {
            inner,
            blind_lookups,
            lookups: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl UserDirectory for RacingDirectory {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DirectoryError> {
        if self.lookups.fetch_add(1, Ordering::SeqCst) < self.blind_lookups {
            tokio::task::yield_now().await;
            return Ok(None);
        }
        self.inner.find_user_by_username(username).await
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DirectoryError> {
        self.inner.find_user_by_id(id).await
    }

    async fn backfill_external_id(&self, user_id: Uuid, external_id: &str) -> Result<User, DirectoryError> {
        self.inner.backfill_external_id(user_id, external_id).await
    }

    async fn create_shadow_user(
        &self,
        new_user: NewShadowUser,
        sentinel_department: &str,
    ) -> Result<User, DirectoryError> {
        self.inner.create_shadow_user(new_user, sentinel_department).await
    }

    async fn find_department(&self, id: Uuid) -> Result<Option<Department>, DirectoryError> {
        self.inner.find_department(id).await
    }

    async fn find_department_by_name(&self, name: &str) -> Result<Option<Department>, DirectoryError> {
        self.inner.find_department_by_name(name).await
    }

    async fn health_check(&self) -> Result<(), DirectoryError> {
        self.inner.health_check().await
    }
}

/// Every call fails as if storage were down
pub struct BrokenDirectory;

#[async_trait]
impl UserDirectory for BrokenDirectory {
    async fn find_user_by_username(&self, _username: &str) -> Result<Option<User>, DirectoryError> {
        Err(DirectoryError::Storage("connection refused".to_string()))
    }

    async fn find_user_by_id(&self, _id: Uuid) -> Result<Option<User>, DirectoryError> {
        Err(DirectoryError::Storage("connection refused".to_string()))
    }

    async fn backfill_external_id(&self, _user_id: Uuid, _external_id: &str) -> Result<User, DirectoryError> {
        Err(DirectoryError::Storage("connection refused".to_string()))
    }

    async fn create_shadow_user(
        &self,
        _new_user: NewShadowUser,
        _sentinel_department: &str,
    ) -> Result<User, DirectoryError> {
        Err(DirectoryError::Storage("connection refused".to_string()))
    }

    async fn find_department(&self, _id: Uuid) -> Result<Option<Department>, DirectoryError> {
        Err(DirectoryError::Storage("connection refused".to_string()))
    }

    async fn find_department_by_name(&self, _name: &str) -> Result<Option<Department>, DirectoryError> {
        Err(DirectoryError::Storage("connection refused".to_string()))
    }

    async fn health_check(&self) -> Result<(), DirectoryError> {
        Err(DirectoryError::Storage("connection refused".to_string()))
    }
}
