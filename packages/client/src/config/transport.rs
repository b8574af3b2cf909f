//! Connection and pool settings for the default hyper transport

use std::time::Duration;

use super::validation::{ConfigResult, ConfigValidator, Validator};

/// Settings used when building a `HyperTransport`.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub nodelay: bool,
    /// Offer HTTP/2 through ALPN on TLS connections.
    pub http2: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 32,
            nodelay: true,
            http2: true,
        }
    }
}

impl TransportConfig {
    /// Set the TCP connect timeout
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set how long an idle pooled connection is kept
    #[must_use]
    pub fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set the maximum idle connections per host
    #[must_use]
    pub fn with_pool_max_idle_per_host(mut self, max_idle: usize) -> Self {
        self.pool_max_idle_per_host = max_idle;
        self
    }

    #[must_use]
    pub fn with_http2(mut self, enabled: bool) -> Self {
        self.http2 = enabled;
        self
    }
}

impl Validator for TransportConfig {
    fn validate(&self) -> ConfigResult<()> {
        ConfigValidator::validate_timeout(self.connect_timeout, "connect timeout")?;
        ConfigValidator::validate_timeout(self.pool_idle_timeout, "pool idle timeout")?;
        ConfigValidator::validate_pool_size(self.pool_max_idle_per_host, "pool max idle per host")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigurationError;

    #[test]
    fn default_config_is_valid() {
        assert!(TransportConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_connect_timeout_rejected() {
        let config = TransportConfig::default().with_connect_timeout(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidTimeout(_))
        ));
    }

    #[test]
    fn oversized_pool_rejected() {
        let config = TransportConfig::default().with_pool_max_idle_per_host(5000);
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidParameter(_))
        ));
    }
}
