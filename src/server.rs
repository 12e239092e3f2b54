use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::app::build_router;
use crate::config::{AppConfig, DirectoryBackend, Environment};
use crate::database::{DatabaseManager, MemoryDirectory, PgUserDirectory, UserDirectory};
use crate::services::DisabledProvider;
use crate::state::AppState;

/// Open the configured directory backend, running migrations when enabled
pub async fn open_directory(config: &AppConfig) -> anyhow::Result<Arc<dyn UserDirectory>> {
    match config.directory {
        DirectoryBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            if config.database.run_migrations {
                DatabaseManager::migrate(&pool)
                    .await
                    .context("failed to run migrations")?;
            }
            Ok(Arc::new(PgUserDirectory::new(pool)))
        }
        DirectoryBackend::Memory => {
            if !matches!(config.environment, Environment::Development) {
                warn!("Using in-memory user directory outside development; users will not persist");
            }
            Ok(Arc::new(MemoryDirectory::new()))
        }
    }
}

pub async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let directory = open_directory(config).await?;

    // The identity provider SDK is wired in by the deployment; without one,
    // bearer tokens still work and /auth/login reports provider unavailable.
    let state = AppState::new(
        directory,
        Arc::new(DisabledProvider),
        config.identity.clone(),
        &config.security.jwt_secret,
    )?;

    info!(
        "Shadow users default to role '{}' in department '{}'",
        config.identity.default_role, config.identity.sentinel_department
    );
    Ok(state)
}

pub async fn serve(config: &AppConfig, port: u16) -> anyhow::Result<()> {
    let state = build_state(config).await?;
    let app = build_router(state, &config.security);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("PMO tracker listening on http://{}", bind_addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
