//! Membership service configuration.
//!
//! Configuration is loaded from environment variables with defaults suitable
//! for local development.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Page size for searches that don't ask for one.
    pub default_per_page: usize,

    /// Largest page size a search may request.
    pub max_per_page: usize,

    /// Buffered membership events per subscriber before lagging.
    pub event_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_per_page: 1000,
            max_per_page: 1000,
            event_capacity: 256,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `MEMBERSHIP_DEFAULT_PER_PAGE`: Default search page size (default: 1000)
    /// - `MEMBERSHIP_MAX_PER_PAGE`: Largest allowed page size (default: 1000)
    /// - `MEMBERSHIP_EVENT_CAPACITY`: Event channel capacity (default: 256)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            default_per_page: env_usize("MEMBERSHIP_DEFAULT_PER_PAGE")
                .unwrap_or(default.default_per_page),
            max_per_page: env_usize("MEMBERSHIP_MAX_PER_PAGE").unwrap_or(default.max_per_page),
            event_capacity: env_usize("MEMBERSHIP_EVENT_CAPACITY")
                .unwrap_or(default.event_capacity),
        }
    }

    /// Check that the values are usable together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_zero = [
            ("MEMBERSHIP_DEFAULT_PER_PAGE", self.default_per_page),
            ("MEMBERSHIP_MAX_PER_PAGE", self.max_per_page),
            ("MEMBERSHIP_EVENT_CAPACITY", self.event_capacity),
        ];
        for (key, value) in non_zero {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
        }

        if self.default_per_page > self.max_per_page {
            return Err(ConfigError::InvalidValue {
                key: "MEMBERSHIP_DEFAULT_PER_PAGE".to_string(),
                message: format!("exceeds MEMBERSHIP_MAX_PER_PAGE ({})", self.max_per_page),
            });
        }

        Ok(())
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.default_per_page, 1000);
        assert_eq!(config.max_per_page, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero() {
        let config = ServiceConfig {
            event_capacity: 0,
            ..ServiceConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key, .. }) if key == "MEMBERSHIP_EVENT_CAPACITY"
        ));
    }

    #[test]
    fn test_validate_rejects_default_above_max() {
        let config = ServiceConfig {
            default_per_page: 200,
            max_per_page: 100,
            event_capacity: 16,
        };
        assert!(config.validate().is_err());
    }
}
