//! Debug trace sink
//!
//! The runtime writes full request and response dumps to a `Logger` when its
//! debug flag is on. The logger is handed to the runtime explicitly; nothing
//! here is process-global.

use std::fmt;

/// Destination for runtime trace output.
pub trait Logger: Send + Sync {
    fn debugf(&self, args: fmt::Arguments<'_>);
}

/// Logger that forwards to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardLogger;

impl Logger for StandardLogger {
    fn debugf(&self, args: fmt::Arguments<'_>) {
        log::debug!(target: "oasrt", "{args}");
    }
}

/// Whether debug tracing was requested through the environment.
///
/// Any non-empty `SWAGGER_DEBUG` or `DEBUG` turns it on.
#[must_use]
pub fn debug_enabled() -> bool {
    ["SWAGGER_DEBUG", "DEBUG"]
        .iter()
        .any(|name| std::env::var_os(name).is_some_and(|v| !v.is_empty()))
}
