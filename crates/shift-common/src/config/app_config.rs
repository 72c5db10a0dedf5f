//! Application configuration structs
//!
//! Loads configuration from environment variables. Only the platform
//! credentials are required; every ledger guard rail (admin role, on-shift
//! role, audit channel, guild scope) is optional and simply disables the
//! corresponding behavior when absent.

use serde::Deserialize;
use std::env;

use shift_core::Snowflake;

/// Main bot configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Chat-platform bot token
    pub token: String,
    /// Chat-platform application id
    pub application_id: Snowflake,
    /// Restrict command registration to a single guild when set
    pub guild_id: Option<Snowflake>,
    pub guard_rails: GuardRails,
    pub database: DatabaseSettings,
}

/// Optional role/channel identifiers steering ledger behavior
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuardRails {
    /// Role that marks a caller as admin (management permission also counts)
    pub admin_role_id: Option<Snowflake>,
    /// Role granted while a shift is active or paused
    pub shift_role_id: Option<Snowflake>,
    /// Channel receiving broadcast summaries of ledger mutations
    pub log_channel_id: Option<Snowflake>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

// Default value functions
fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

impl BotConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            token: env::var("TOKEN").map_err(|_| ConfigError::MissingVar("TOKEN"))?,
            application_id: parse_snowflake_var("CLIENT_ID")?
                .ok_or(ConfigError::MissingVar("CLIENT_ID"))?,
            guild_id: parse_snowflake_var("GUILD_ID")?,
            guard_rails: GuardRails {
                admin_role_id: parse_snowflake_var("ADMIN_ROLE_ID")?,
                shift_role_id: parse_snowflake_var("SHIFT_ROLE_ID")?,
                log_channel_id: parse_snowflake_var("LOG_CHANNEL_ID")?,
            },
            database: DatabaseSettings {
                url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
            },
        })
    }
}

fn parse_snowflake_var(name: &'static str) -> Result<Option<Snowflake>, ConfigError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => Snowflake::parse(raw.trim())
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        _ => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
