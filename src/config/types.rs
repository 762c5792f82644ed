use serde::Deserialize;

/// Main configuration structure for Pagelens
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Analyzer behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    /// Timeout for the root page fetch (milliseconds)
    #[serde(rename = "root-timeout-ms", default = "default_root_timeout_ms")]
    pub root_timeout_ms: u64,

    /// Timeout for each link probe (milliseconds)
    #[serde(rename = "probe-timeout-ms", default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Maximum number of probes running concurrently per session
    #[serde(rename = "probe-parallelism", default = "default_probe_parallelism")]
    pub probe_parallelism: u32,

    /// Upper bound for the randomized inter-request delay per domain (milliseconds)
    #[serde(rename = "max-probe-delay-ms", default = "default_max_probe_delay_ms")]
    pub max_probe_delay_ms: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root_timeout_ms: default_root_timeout_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
            probe_parallelism: default_probe_parallelism(),
            max_probe_delay_ms: default_max_probe_delay_ms(),
        }
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP API binds to
    #[serde(rename = "bind-address", default = "default_bind_address")]
    pub bind_address: String,

    /// Path prefix for all routes
    #[serde(rename = "base-path", default = "default_base_path")]
    pub base_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            base_path: default_base_path(),
        }
    }
}

/// Session store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Persistent SQLite store
    Sqlite,
    /// In-process store, lost on restart
    Memory,
}

/// Session store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,

    /// Path to the SQLite database file (sqlite backend only)
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            database_path: default_database_path(),
        }
    }
}

/// User agent rotation pool
///
/// One entry is picked at random for every outgoing request, root fetch and
/// probes alike.
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(default = "default_user_agent_pool")]
    pub pool: Vec<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            pool: default_user_agent_pool(),
        }
    }
}

fn default_root_timeout_ms() -> u64 {
    10_000
}

fn default_probe_timeout_ms() -> u64 {
    10_000
}

fn default_probe_parallelism() -> u32 {
    2
}

fn default_max_probe_delay_ms() -> u64 {
    2_000
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_base_path() -> String {
    "/scraper".to_string()
}

fn default_backend() -> StorageBackend {
    StorageBackend::Sqlite
}

fn default_database_path() -> String {
    "./pagelens.db".to_string()
}

fn default_user_agent_pool() -> Vec<String> {
    vec![
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/120.0.0.0 Safari/537.36"
            .to_string(),
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) \
         Version/17.1 Safari/605.1.15"
            .to_string(),
        "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0".to_string(),
    ]
}
