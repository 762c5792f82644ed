//! Session identity and data model
//!
//! A session is the isolated state scope for one analysis request. Everything
//! a session writes to the store is keyed under its own prefix, so two
//! sessions running concurrently can never observe each other's links,
//! counters, or page metadata.

mod model;

pub use model::{Link, LinkCounts, Snapshot};

use uuid::Uuid;

/// Store field names for session state
pub mod keys {
    /// The root URL under analysis
    pub const URL: &str = "url";
    /// The root host, captured when the visit starts
    pub const ROOT_HOST: &str = "root-host";
    /// RFC 3339 timestamp of the visit
    pub const VISITED_AT: &str = "visited-at";
    /// Page title (trimmed text of the first `<title>`)
    pub const TITLE: &str = "title";
    /// Declared HTML version label
    pub const HTML_VERSION: &str = "html-version";
    /// JSON map of heading level to count
    pub const HEADINGS: &str = "headings";
    /// Number of password input fields on the page
    pub const PASSWORD_FIELDS: &str = "password-fields";
    /// List of JSON-encoded classified links
    pub const LINKS: &str = "links";
}

/// Identifier scoping all mutable state for one analysis request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generates a fresh random session id
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wraps an existing identifier (tests, replays)
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The key prefix every store access for this session must use
    pub fn prefix(&self) -> String {
        format!("{}:", self.0)
    }

    /// Builds a fully-qualified store key for a session field
    pub fn key(&self, field: &str) -> String {
        format!("{}:{}", self.0, field)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
