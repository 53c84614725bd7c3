use std::time::Duration;

use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config;
use crate::database::{schema, DatabaseManager};

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Create missing tables and indexes")]
    Migrate,

    #[command(about = "Block until the database accepts connections")]
    Wait {
        #[arg(long, default_value_t = 30, help = "Give up after this many seconds")]
        timeout_secs: u64,
    },

    #[command(about = "Check database connectivity")]
    Health,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let db_config = &config::config().database;

    match cmd {
        DbCommands::Migrate => {
            let pool = DatabaseManager::connect(db_config).await?;
            schema::migrate(&pool).await?;
            output_success(&output_format, "Database schema is up to date", None)
        }
        DbCommands::Wait { timeout_secs } => {
            if let OutputFormat::Text = output_format {
                println!("Waiting for database...");
            }
            match DatabaseManager::wait_for(db_config, Duration::from_secs(timeout_secs)).await {
                Ok(_) => output_success(
                    &output_format,
                    "Database available",
                    Some(json!({ "timeout_secs": timeout_secs })),
                ),
                Err(e) => {
                    output_error(&output_format, &e.to_string(), Some("DATABASE_UNAVAILABLE"))?;
                    Err(anyhow::anyhow!("Database not available after {} seconds", timeout_secs))
                }
            }
        }
        DbCommands::Health => {
            let pool = DatabaseManager::connect(db_config).await?;
            DatabaseManager::health_check(&pool).await?;
            output_success(&output_format, "Database is healthy", Some(json!({ "database": "ok" })))
        }
    }
}
