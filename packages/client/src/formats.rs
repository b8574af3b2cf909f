//! Named string formats
//!
//! Parameter writers use the registry to validate values such as `date-time`
//! or `uuid` before they are placed on the wire.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

type FormatValidator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

static UUID: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").ok()
});
static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());
static HOSTNAME: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?i)[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?(\.[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?)*$")
        .ok()
});

fn matches(re: &LazyLock<Option<Regex>>, value: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(value))
}

/// Registry of format name to validator.
#[derive(Clone)]
pub struct Formats {
    validators: HashMap<String, FormatValidator>,
}

impl Formats {
    /// An empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// Register or replace a format.
    pub fn add<F>(&mut self, name: impl Into<String>, validator: F)
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.validators.insert(name.into(), Arc::new(validator));
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Returns `None` for unknown formats.
    #[must_use]
    pub fn validates(&self, name: &str, value: &str) -> Option<bool> {
        self.validators.get(name).map(|v| v(value))
    }
}

impl Default for Formats {
    fn default() -> Self {
        let mut formats = Self::empty();
        formats.add("date", |v| {
            chrono::NaiveDate::parse_from_str(v, "%Y-%m-%d").is_ok()
        });
        formats.add("date-time", |v| chrono::DateTime::parse_from_rfc3339(v).is_ok());
        formats.add("uuid", |v| matches(&UUID, v));
        formats.add("email", |v| matches(&EMAIL, v));
        formats.add("hostname", |v| v.len() <= 253 && matches(&HOSTNAME, v));
        formats
    }
}

impl fmt::Debug for Formats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.validators.keys().collect();
        names.sort();
        f.debug_struct("Formats").field("names", &names).finish()
    }
}
