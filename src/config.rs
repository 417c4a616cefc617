use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the match data API (without the /api suffix)
    pub api_base_url: String,

    /// HTTP request timeout in seconds
    pub http_timeout: u64,

    /// Directory holding the persisted parlay slip
    pub storage_dir: String,

    /// SQLite database path for saved parlay history
    pub database_url: String,

    /// Stake used when none (or an unusable one) is given
    pub default_stake: f64,

    /// Optional JSON file of team name aliases
    pub team_aliases_path: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let default_stake: f64 = env::var("DEFAULT_STAKE")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DEFAULT_STAKE must be a valid number")?;

        if !default_stake.is_finite() || default_stake <= 0.0 {
            anyhow::bail!("DEFAULT_STAKE must be positive, got {}", default_stake);
        }

        Ok(Config {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),

            http_timeout: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("HTTP_TIMEOUT_SECS must be a valid number")?,

            storage_dir: env::var("PARLAY_STORAGE_DIR")
                .unwrap_or_else(|_| "data/storage".to_string()),

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:data/parlays.db".to_string()),

            default_stake,

            team_aliases_path: env::var("TEAM_ALIASES_PATH")
                .unwrap_or_else(|_| "data/team_aliases.json".to_string()),
        })
    }
}
