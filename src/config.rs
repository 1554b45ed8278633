//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::search::SearchConfig;
use crate::store::{GenerateOptions, DEFAULT_SHARD_SIZE};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Record store server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_store_port")]
    pub port: u16,

    #[serde(default = "default_record_count")]
    pub record_count: u64,

    #[serde(default = "default_shard_size")]
    pub shard_size: usize,

    #[serde(default = "default_min_duration")]
    pub min_duration_ms: i64,

    #[serde(default = "default_max_duration")]
    pub max_duration_ms: i64,

    #[serde(default = "default_latency")]
    pub latency_ms: u64,

    /// Fixed seed for a reproducible dataset
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_store_port() -> u16 {
    8901
}

fn default_record_count() -> u64 {
    100_000
}

fn default_shard_size() -> usize {
    DEFAULT_SHARD_SIZE
}

fn default_min_duration() -> i64 {
    5000
}

fn default_max_duration() -> i64 {
    10_000
}

fn default_latency() -> u64 {
    10
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_store_port(),
            record_count: default_record_count(),
            shard_size: default_shard_size(),
            min_duration_ms: default_min_duration(),
            max_duration_ms: default_max_duration(),
            latency_ms: default_latency(),
            seed: None,
        }
    }
}

impl StoreConfig {
    /// Socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Options for generating the fake dataset
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            record_count: self.record_count,
            shard_size: self.shard_size,
            min_duration_ms: self.min_duration_ms,
            max_duration_ms: self.max_duration_ms,
            timeline_start: None,
            seed: self.seed,
            latency: Duration::from_millis(self.latency_ms),
        }
    }
}

/// Gateway server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_gateway_port")]
    pub port: u16,

    #[serde(default = "default_store_url")]
    pub store_url: String,

    /// Timeout for a single request to the record store
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Timeout for a whole lookup, all probes included
    #[serde(default = "default_search_timeout")]
    pub search_timeout_ms: u64,

    /// Answer unparseable positions with 400 instead of 404
    #[serde(default)]
    pub malformed_as_bad_request: bool,
}

fn default_gateway_port() -> u16 {
    8902
}

fn default_store_url() -> String {
    "http://localhost:8901".to_string()
}

fn default_request_timeout() -> u64 {
    5000
}

fn default_search_timeout() -> u64 {
    30_000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_gateway_port(),
            store_url: default_store_url(),
            request_timeout_ms: default_request_timeout(),
            search_timeout_ms: default_search_timeout(),
            malformed_as_bad_request: false,
        }
    }
}

impl GatewayConfig {
    /// Socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }
}

/// Search tuning
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchSettings {
    /// Switch to bisection after this many consecutive clamped predictions
    /// (0 = never)
    #[serde(default)]
    pub bisect_after_clamps: u32,
}

impl SearchSettings {
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            bisect_after_clamps: self.bisect_after_clamps,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("mediaseek").join("config.toml")),
            Some(PathBuf::from("/etc/mediaseek/config.toml")),
            Some(PathBuf::from("./mediaseek.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Store overrides
        if let Ok(host) = std::env::var("MEDIASEEK_STORE_HOST") {
            self.store.host = host;
        }
        if let Some(port) = env_parse("MEDIASEEK_STORE_PORT") {
            self.store.port = port;
        }
        if let Some(count) = env_parse("MEDIASEEK_RECORD_COUNT") {
            self.store.record_count = count;
        }
        if let Some(latency) = env_parse("MEDIASEEK_STORE_LATENCY_MS") {
            self.store.latency_ms = latency;
        }
        if let Some(seed) = env_parse("MEDIASEEK_STORE_SEED") {
            self.store.seed = Some(seed);
        }

        // Gateway overrides
        if let Ok(host) = std::env::var("MEDIASEEK_GATEWAY_HOST") {
            self.gateway.host = host;
        }
        if let Some(port) = env_parse("MEDIASEEK_GATEWAY_PORT") {
            self.gateway.port = port;
        }
        if let Ok(url) = std::env::var("MEDIASEEK_STORE_URL") {
            self.gateway.store_url = url;
        }

        // Search overrides
        if let Some(clamps) = env_parse("MEDIASEEK_BISECT_AFTER_CLAMPS") {
            self.search.bisect_after_clamps = clamps;
        }

        // Logging overrides
        if let Ok(level) = std::env::var("MEDIASEEK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("MEDIASEEK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Mediaseek Configuration
#
# Environment variables override these settings:
# - MEDIASEEK_STORE_HOST, MEDIASEEK_STORE_PORT
# - MEDIASEEK_RECORD_COUNT, MEDIASEEK_STORE_LATENCY_MS, MEDIASEEK_STORE_SEED
# - MEDIASEEK_GATEWAY_HOST, MEDIASEEK_GATEWAY_PORT, MEDIASEEK_STORE_URL
# - MEDIASEEK_BISECT_AFTER_CLAMPS
# - MEDIASEEK_LOG_LEVEL, MEDIASEEK_LOG_FORMAT

[store]
host = "0.0.0.0"
port = 8901

# Number of fake media segments to generate
record_count = 100000

# Records per shard
shard_size = 9000

# Segment durations are drawn uniformly from this range (ms)
min_duration_ms = 5000
max_duration_ms = 10000

# Simulated per-query latency (ms)
latency_ms = 10

# Fixed RNG seed for a reproducible dataset
# seed = 42

[gateway]
host = "0.0.0.0"
port = 8902

# Record store the gateway searches against
store_url = "http://localhost:8901"

# Timeout for one request to the record store (ms)
request_timeout_ms = 5000

# Timeout for a whole lookup (ms)
search_timeout_ms = 30000

# Reply 400 instead of 404 when `position` is not an integer
malformed_as_bad_request = false

[search]
# Fall back to bisection after this many consecutive clamped predictions
# (0 = never)
bisect_after_clamps = 0

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
