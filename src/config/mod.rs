//! Configuration module for Pagelens
//!
//! Handles loading, parsing, and validating TOML configuration files. Every
//! field has a default, so the service runs from an empty file.
//!
//! # Example
//!
//! ```no_run
//! use pagelens::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Probe parallelism: {}", config.analyzer.probe_parallelism);
//! ```

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{
    AnalyzerConfig, Config, ServerConfig, StorageBackend, StorageConfig, UserAgentConfig,
};
pub use validation::validate;
