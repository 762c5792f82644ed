//! Configuration validation
//!
//! Rejects configurations that would make the analyzer misbehave at runtime:
//! zero timeouts, an empty probe pool, unparsable bind addresses.

use crate::config::types::{Config, StorageBackend};
use crate::ConfigError;
use std::net::SocketAddr;

/// Validates a parsed configuration
///
/// # Arguments
///
/// * `config` - The configuration to validate
///
/// # Returns
///
/// * `Ok(())` - Configuration is valid
/// * `Err(ConfigError::Validation)` - Description of the first problem found
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.analyzer.root_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "analyzer.root-timeout-ms must be greater than 0".to_string(),
        ));
    }

    if config.analyzer.probe_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "analyzer.probe-timeout-ms must be greater than 0".to_string(),
        ));
    }

    if config.analyzer.probe_parallelism == 0 {
        return Err(ConfigError::Validation(
            "analyzer.probe-parallelism must be at least 1".to_string(),
        ));
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        return Err(ConfigError::Validation(format!(
            "server.bind-address '{}' is not a valid socket address",
            config.server.bind_address
        )));
    }

    if !config.server.base_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "server.base-path '{}' must start with '/'",
            config.server.base_path
        )));
    }

    if config.server.base_path.len() > 1 && config.server.base_path.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "server.base-path '{}' must not end with '/'",
            config.server.base_path
        )));
    }

    if config.storage.backend == StorageBackend::Sqlite && config.storage.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "storage.database-path must not be empty for the sqlite backend".to_string(),
        ));
    }

    if config.user_agent.pool.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent.pool must contain at least one entry".to_string(),
        ));
    }

    if config.user_agent.pool.iter().any(|ua| ua.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "user-agent.pool entries must not be blank".to_string(),
        ));
    }

    Ok(())
}
