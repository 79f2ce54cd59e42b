//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{VolunHubError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_logging_config(&settings.logging)?;
    validate_pagination_config(&settings.pagination)?;
    validate_rewards_config(&settings.rewards)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(VolunHubError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(VolunHubError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(VolunHubError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(VolunHubError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(VolunHubError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    if let Some(ref path) = config.file_path {
        if path.is_empty() {
            return Err(VolunHubError::Config(
                "Log file path cannot be empty when set".to_string()
            ));
        }
    }

    Ok(())
}

/// Validate pagination configuration
fn validate_pagination_config(config: &super::PaginationConfig) -> Result<()> {
    if config.default_limit == 0 {
        return Err(VolunHubError::Config(
            "Default page limit must be greater than 0".to_string()
        ));
    }

    if config.default_limit > config.max_limit {
        return Err(VolunHubError::Config(
            "Default page limit cannot exceed max page limit".to_string()
        ));
    }

    Ok(())
}

/// Validate reward configuration
fn validate_rewards_config(config: &super::RewardsConfig) -> Result<()> {
    if config.points_per_event <= 0 {
        return Err(VolunHubError::Config(
            "Points per event must be greater than 0".to_string()
        ));
    }

    if config.silver_threshold >= config.gold_threshold
        || config.gold_threshold >= config.platinum_threshold
    {
        return Err(VolunHubError::Config(
            "Rank thresholds must be strictly increasing".to_string()
        ));
    }

    if config.silver_threshold <= 0 {
        return Err(VolunHubError::Config(
            "Silver rank threshold must be greater than 0".to_string()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, LoggingConfig, PaginationConfig, RewardsConfig};

    fn valid_settings() -> Settings {
        Settings::default()
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_empty_database_url_rejected() {
        let mut settings = valid_settings();
        settings.database = DatabaseConfig {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
        };
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_min_connections_above_max_rejected() {
        let mut settings = valid_settings();
        settings.database.min_connections = 20;
        settings.database.max_connections = 10;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let mut settings = valid_settings();
        settings.logging = LoggingConfig {
            level: "verbose".to_string(),
            file_path: None,
        };
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_default_limit_above_max_rejected() {
        let mut settings = valid_settings();
        settings.pagination = PaginationConfig {
            default_limit: 200,
            max_limit: 100,
        };
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_non_increasing_rank_thresholds_rejected() {
        let mut settings = valid_settings();
        settings.rewards = RewardsConfig {
            points_per_event: 50,
            silver_threshold: 500,
            gold_threshold: 500,
            platinum_threshold: 2000,
        };
        assert!(validate_settings(&settings).is_err());
    }
}
