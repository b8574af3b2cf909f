//! Runtime and transport configuration
//!
//! Defaults follow the usual client conventions: a 30 second request timeout,
//! pooled idle connections, and `TCP_NODELAY` on.

use std::time::Duration;

pub mod transport;
pub mod validation;

pub use transport::TransportConfig;
pub use validation::{ConfigResult, ConfigValidator, ConfigurationError, Validator};

/// Timeout applied to a request unless its parameters override it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
