use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Apply pending schema migrations")]
    Migrate {
        #[arg(long, help = "Database URL (defaults to DATABASE_URL)")]
        url: Option<String>,
    },

    #[command(about = "Check database connectivity")]
    Ping {
        #[arg(long, help = "Database URL (defaults to DATABASE_URL)")]
        url: Option<String>,
    },
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DbCommands::Migrate { url } => {
            let pool = connect(url).await?;
            DatabaseManager::migrate(&pool).await?;
            output_success(&output_format, "Migrations applied", None)
        }
        DbCommands::Ping { url } => {
            let pool = connect(url).await?;
            DatabaseManager::health_check(&pool).await?;
            output_success(&output_format, "Database reachable", Some(json!({ "database": "ok" })))
        }
    }
}

async fn connect(url: Option<String>) -> anyhow::Result<sqlx::PgPool> {
    let database = &config().database;
    let pool = match url {
        Some(url) => DatabaseManager::connect_url(&url, database.max_connections, database.connection_timeout).await?,
        None => DatabaseManager::connect(database).await?,
    };
    Ok(pool)
}
