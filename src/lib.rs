//! Pagelens: a single-page structure analyzer
//!
//! This crate implements a web page analyzer service: given one URL it fetches
//! the page, extracts structural metadata (title, declared HTML version,
//! heading counts, login-form presence), discovers outbound links, and probes
//! each link once to classify it accessible/inaccessible and internal/external.
//! Results are aggregated into a session-isolated snapshot.

pub mod analyzer;
pub mod config;
pub mod server;
pub mod session;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Pagelens operations
#[derive(Debug, Error)]
pub enum PagelensError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request timeout for {url}")]
    FetchTimeout { url: String },

    #[error("Failed to fetch root page {url}: {message}")]
    RootFetch { url: String, message: String },

    #[error("Session store error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Probe task failed: {0}")]
    ProbeJoin(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Pagelens operations
pub type Result<T> = std::result::Result<T, PagelensError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use analyzer::SessionCoordinator;
pub use config::Config;
pub use session::{Link, LinkCounts, SessionId, Snapshot};
pub use storage::{MemoryStore, SessionStore, SqliteStore};
