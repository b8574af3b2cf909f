//! Configuration validation helpers

use std::time::Duration;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid timeout value: {0}")]
    InvalidTimeout(String),

    #[error("Invalid configuration parameter: {0}")]
    InvalidParameter(String),
}

/// Configuration validation trait
pub trait Validator {
    /// Validates the configuration settings
    ///
    /// # Errors
    ///
    /// Returns `InvalidTimeout` for zero or over-long timeouts and
    /// `InvalidParameter` for out-of-range sizes.
    fn validate(&self) -> ConfigResult<()>;
}

/// Common configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate timeout duration
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidTimeout` if the duration is zero or
    /// exceeds one hour.
    pub fn validate_timeout(timeout: Duration, name: &str) -> ConfigResult<()> {
        if timeout.is_zero() {
            return Err(ConfigurationError::InvalidTimeout(format!(
                "{name} cannot be zero"
            )));
        }
        if timeout > Duration::from_secs(3600) {
            return Err(ConfigurationError::InvalidTimeout(format!(
                "{name} must not exceed 1 hour"
            )));
        }
        Ok(())
    }

    /// Validate a pool size
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidParameter` if the size is zero or
    /// above 1000.
    pub fn validate_pool_size(size: usize, name: &str) -> ConfigResult<()> {
        if size == 0 {
            return Err(ConfigurationError::InvalidParameter(format!(
                "{name} must be greater than zero"
            )));
        }
        if size > 1000 {
            return Err(ConfigurationError::InvalidParameter(format!(
                "{name} must not exceed 1000"
            )));
        }
        Ok(())
    }
}
