use clap::Subcommand;
use serde_json::json;

use crate::api::user::MIN_PASSWORD_LENGTH;
use crate::auth::{hash_password, normalize_email};
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config;
use crate::database::models::NewUser;
use crate::database::{schema, DatabaseManager, UserRepository};

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user account")]
    Create {
        #[arg(long, help = "Login email")]
        email: String,

        #[arg(long, help = "Password (at least 5 characters)")]
        password: String,

        #[arg(long, help = "Display name")]
        name: Option<String>,

        #[arg(long, help = "Grant staff status")]
        staff: bool,
    },

    #[command(about = "List user accounts")]
    List,
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config::config().database).await?;
    schema::migrate(&pool).await?;
    let users = UserRepository::new(pool);

    match cmd {
        UserCommands::Create {
            email,
            password,
            name,
            staff,
        } => {
            if password.chars().count() < MIN_PASSWORD_LENGTH {
                anyhow::bail!("Password must be at least {} characters", MIN_PASSWORD_LENGTH);
            }
            let password_hash =
                hash_password(&password).map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?;

            let user = users
                .create(NewUser {
                    email: normalize_email(&email),
                    name: name.unwrap_or_default(),
                    password_hash,
                    is_staff: staff,
                })
                .await?;

            output_success(
                &output_format,
                &format!("Created user {} ({})", user.email, user.id),
                Some(json!({ "user": user })),
            )
        }
        UserCommands::List => {
            let all = users.list().await?;
            if all.is_empty() {
                return output_empty_collection(&output_format, "users", "No users");
            }

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "users": all }))?);
                }
                OutputFormat::Text => {
                    println!("{:<6} {:<32} {:<20} {:<7} {}", "ID", "EMAIL", "NAME", "STAFF", "CREATED");
                    println!("{}", "-".repeat(85));
                    for user in &all {
                        let active_marker = if user.is_active { " " } else { "x" };
                        println!(
                            "{}{:<5} {:<32} {:<20} {:<7} {}",
                            active_marker,
                            user.id,
                            user.email,
                            user.name,
                            user.is_staff,
                            user.created_at.format("%Y-%m-%d %H:%M")
                        );
                    }
                }
            }
            Ok(())
        }
    }
}
