//! Router configuration.

use crate::error::RouterError;
use serde::{Deserialize, Serialize};

/// Transition records a router keeps unless told otherwise.
pub const DEFAULT_LOG_CAPACITY: usize = 256;

/// Options applied when route templates are compiled and resolved.
///
/// Defaults follow the path-to-regexp conventions: case-insensitive,
/// optional trailing slash, whole-path match.
///
/// # Example
///
/// ```rust
/// use mindset_router::RouterOptions;
///
/// let options = RouterOptions::new().sensitive(true).strict(true);
/// assert!(options.sensitive);
/// assert!(options.end);
///
/// let parsed = RouterOptions::from_json(r#"{ "end": false }"#).unwrap();
/// assert!(!parsed.end);
/// assert!(parsed.tolerant_retry);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterOptions {
    /// Match letter case exactly.
    pub sensitive: bool,
    /// Require the trailing slash to match the template exactly.
    pub strict: bool,
    /// Require the template to cover the whole path; when false it may
    /// match a prefix ending at a `/` boundary.
    pub end: bool,
    /// Run the resolver's normalized second pass when nothing matches.
    pub tolerant_retry: bool,
    /// Most recent transitions kept in the interpreter's log; `None` keeps
    /// every transition for the router's lifetime.
    pub log_capacity: Option<usize>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            sensitive: false,
            strict: false,
            end: true,
            tolerant_retry: true,
            log_capacity: Some(DEFAULT_LOG_CAPACITY),
        }
    }
}

impl RouterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn end(mut self, end: bool) -> Self {
        self.end = end;
        self
    }

    pub fn tolerant_retry(mut self, enabled: bool) -> Self {
        self.tolerant_retry = enabled;
        self
    }

    pub fn log_capacity(mut self, capacity: Option<usize>) -> Self {
        self.log_capacity = capacity;
        self
    }

    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, RouterError> {
        Ok(serde_json::from_str(json)?)
    }
}
