//! Configuration
//! Mission: One typed view of flags, environment and `.env` files

use crate::auth::models::NewUser;
use crate::github::GITHUB_API_BASE;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::warn;

const DEV_JWT_SECRET: &str = "dev-secret-change-in-production-minimum-32-characters";

#[derive(Parser, Debug, Clone)]
#[command(name = "portfolio-backend")]
#[command(about = "Portfolio REST API: accounts, projects, qualifications and contact messages")]
pub struct Cli {
    #[arg(long, env = "HOST", default_value = "0.0.0.0", global = true)]
    pub host: String,

    #[arg(long, env = "PORT", default_value = "5000", global = true)]
    pub port: u16,

    /// SQLite file; relative paths resolve against the crate directory
    #[arg(long, env = "DATABASE_PATH", default_value = "portfolio.db", global = true)]
    pub database_path: String,

    /// HS256 signing secret for bearer tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true, global = true)]
    pub jwt_secret: Option<String>,

    #[arg(long, env = "ADMIN_EMAIL", default_value = "admin@portfolio.com", global = true)]
    pub admin_email: String,

    #[arg(
        long,
        env = "ADMIN_PASSWORD",
        default_value = "Admin123!",
        hide_env_values = true,
        global = true
    )]
    pub admin_password: String,

    #[arg(long, env = "ADMIN_NAME", default_value = "Portfolio Admin", global = true)]
    pub admin_name: String,

    #[arg(long, env = "GITHUB_USERNAME", default_value = "Eddie000321", global = true)]
    pub github_username: String,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub github_token: Option<String>,

    #[arg(long, env = "GITHUB_API_BASE", default_value = GITHUB_API_BASE, global = true)]
    pub github_api_base: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Upsert the sample projects and qualifications, then exit
    Seed,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn database_path(&self) -> String {
        resolve_data_path(&self.database_path)
    }

    /// Configured secret, or the development fallback (logged loudly)
    pub fn jwt_secret(&self) -> String {
        match self.jwt_secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => secret.to_string(),
            _ => {
                warn!("⚠️  JWT_SECRET not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        }
    }

    pub fn admin_account(&self) -> NewUser {
        NewUser {
            name: self.admin_name.clone(),
            email: self.admin_email.clone(),
            password: self.admin_password.clone(),
        }
    }
}

/// Load `.env` from the working directory and the crate directory
pub fn load_env() {
    let _ = dotenv::dotenv();

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let candidate = manifest_dir.join(".env");
    if candidate.exists() {
        let _ = dotenv::from_path(&candidate);
    }
}

/// Absolute paths pass through; relative ones are anchored at the crate directory
pub fn resolve_data_path(raw: &str) -> String {
    let p = PathBuf::from(raw);
    if p.is_absolute() || raw == ":memory:" {
        return raw.to_string();
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join(p)
        .to_string_lossy()
        .to_string()
}
