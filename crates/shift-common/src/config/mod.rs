//! Configuration structs

mod app_config;

pub use app_config::{BotConfig, ConfigError, DatabaseSettings, GuardRails};
