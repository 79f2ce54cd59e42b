//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub pagination: PaginationConfig,
    pub rewards: RewardsConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for rolling log files; stdout only when absent
    pub file_path: Option<String>,
}

/// Listing pagination bounds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaginationConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

/// Reward payout and rank thresholds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RewardsConfig {
    /// Points credited per attended event
    pub points_per_event: i64,
    pub silver_threshold: i64,
    pub gold_threshold: i64,
    pub platinum_threshold: i64,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("VOLUNHUB"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::VolunHubError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/volunhub".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
            },
            pagination: PaginationConfig {
                default_limit: 10,
                max_limit: 100,
            },
            rewards: RewardsConfig {
                points_per_event: 50,
                silver_threshold: 100,
                gold_threshold: 500,
                platinum_threshold: 2000,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_default_pagination_bounds() {
        let settings = Settings::default();
        assert!(settings.pagination.default_limit <= settings.pagination.max_limit);
    }

    #[test]
    fn test_settings_parse_from_toml() {
        let settings: Settings = toml::from_str(
            r#"
            [database]
            url = "postgresql://db.internal/volunhub"
            max_connections = 20
            min_connections = 2

            [logging]
            level = "debug"
            file_path = "/var/log/volunhub"

            [pagination]
            default_limit = 25
            max_limit = 50

            [rewards]
            points_per_event = 10
            silver_threshold = 50
            gold_threshold = 250
            platinum_threshold = 1000
            "#,
        )
        .unwrap();

        assert_eq!(settings.database.max_connections, 20);
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.pagination.max_limit, 50);
        assert_eq!(settings.rewards.points_per_event, 10);
        assert!(settings.validate().is_ok());
    }
}
