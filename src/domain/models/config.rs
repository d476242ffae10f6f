use serde::{Deserialize, Serialize};

use super::detection::DEFAULT_TOP_K;

/// Main configuration structure for Sweetspot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Scoring engine options
    #[serde(default)]
    pub engine: EngineConfig,

    /// Background compute worker options
    #[serde(default)]
    pub offload: OffloadConfig,

    /// Client-local preference storage
    #[serde(default)]
    pub preferences: PreferencesConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Scoring engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Number of convergences returned by detection
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Whether boost tags raise convergence strength
    #[serde(default = "default_true")]
    pub boost_enabled: bool,

    /// Keywords that receive the strength boost
    #[serde(default)]
    pub boost_tags: Vec<String>,
}

const fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

const fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            boost_enabled: true,
            boost_tags: Vec::new(),
        }
    }
}

/// Offload worker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OffloadConfig {
    /// Run computations on a background worker (falls back to synchronous when false)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Debounce window for coalescing compute requests, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Capacity of the request and response channels
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Watchdog timeout for handshake and results, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Re-sends after a watchdog timeout before falling back to synchronous compute
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

const fn default_debounce_ms() -> u64 {
    100
}

const fn default_channel_capacity() -> usize {
    64
}

const fn default_timeout_ms() -> u64 {
    2_000
}

const fn default_max_retries() -> u32 {
    1
}

impl Default for OffloadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: default_debounce_ms(),
            channel_capacity: default_channel_capacity(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

/// Preference storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PreferencesConfig {
    /// Path of the JSON preference file
    #[serde(default = "default_preferences_path")]
    pub path: String,
}

fn default_preferences_path() -> String {
    ".sweetspot/preferences.json".to_string()
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: default_preferences_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,
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
            log_dir: None,
        }
    }
}
