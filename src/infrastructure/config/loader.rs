use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Prefix of environment variable overrides; nested keys split on `__`.
pub const ENV_PREFIX: &str = "SWEETSPOT_";

const PROJECT_CONFIG: &str = ".sweetspot/config.yaml";
const LOCAL_CONFIG: &str = ".sweetspot/local.yaml";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Preferences path cannot be empty")]
    EmptyPreferencesPath,

    #[error("Invalid channel_capacity: {0}. Must be at least 1")]
    InvalidChannelCapacity(usize),

    #[error("Invalid timeout_ms: {0}. Must be positive")]
    InvalidTimeout(u64),

    #[error(
        "Invalid offload configuration: debounce_ms ({0}) must be less than timeout_ms ({1})"
    )]
    DebounceExceedsTimeout(u64, u64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .sweetspot/config.yaml (project config)
    /// 3. .sweetspot/local.yaml (local overrides, optional)
    /// 4. Environment variables (SWEETSPOT_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(PROJECT_CONFIG))
            .merge(Yaml::file(LOCAL_CONFIG))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Environment variables still override the file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.engine.top_k == 0 {
            return Err(ConfigError::InvalidTopK(config.engine.top_k));
        }

        if config.preferences.path.trim().is_empty() {
            return Err(ConfigError::EmptyPreferencesPath);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let offload = &config.offload;
        if offload.channel_capacity == 0 {
            return Err(ConfigError::InvalidChannelCapacity(offload.channel_capacity));
        }

        if offload.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout(offload.timeout_ms));
        }

        if offload.debounce_ms >= offload.timeout_ms {
            return Err(ConfigError::DebounceExceedsTimeout(
                offload.debounce_ms,
                offload.timeout_ms,
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.engine.top_k, 20);
        assert!(config.engine.boost_enabled);
        assert!(config.offload.enabled);
        assert_eq!(config.offload.debounce_ms, 100);
        assert_eq!(config.preferences.path, ".sweetspot/preferences.json");
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
engine:
  top_k: 5
  boost_tags: [design, code]
offload:
  enabled: false
  debounce_ms: 50
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.engine.top_k, 5);
        assert_eq!(config.engine.boost_tags, vec!["design", "code"]);
        assert!(config.engine.boost_enabled);
        assert!(!config.offload.enabled);
        assert_eq!(config.offload.debounce_ms, 50);
        assert_eq!(config.offload.timeout_ms, 2_000);
        assert_eq!(config.logging.format, "json");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_zero_top_k() {
        let mut config = Config::default();
        config.engine.top_k = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTopK(0))
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config) {
            Err(ConfigError::InvalidLogLevel(level)) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogFormat(_))
        ));
    }

    #[test]
    fn test_validate_offload_bounds() {
        let mut config = Config::default();
        config.offload.channel_capacity = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidChannelCapacity(0))
        ));

        let mut config = Config::default();
        config.offload.debounce_ms = 5_000;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::DebounceExceedsTimeout(5_000, 2_000))
        ));
    }

    #[test]
    fn test_validate_empty_preferences_path() {
        let mut config = Config::default();
        config.preferences.path = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyPreferencesPath)
        ));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = yaml_file("engine:\n  top_k: 7\nlogging:\n  level: warn\n");

        temp_env::with_vars(
            [
                ("SWEETSPOT_ENGINE__TOP_K", Some("3")),
                ("SWEETSPOT_OFFLOAD__ENABLED", Some("false")),
            ],
            || {
                let config = ConfigLoader::load_from_file(file.path()).unwrap();
                assert_eq!(config.engine.top_k, 3, "Env should win over file");
                assert!(!config.offload.enabled);
                assert_eq!(config.logging.level, "warn", "File value should persist");
            },
        );
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let result = ConfigLoader::load_from_file("/nonexistent/sweetspot.yaml");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_file_values_are_rejected() {
        let file = yaml_file("logging:\n  format: xml\n");
        temp_env::with_vars_unset(["SWEETSPOT_LOGGING__FORMAT"], || {
            assert!(ConfigLoader::load_from_file(file.path()).is_err());
        });
    }

    #[test]
    fn test_hierarchical_merging() {
        let base_file = yaml_file("engine:\n  top_k: 5\nlogging:\n  level: info\n  format: json\n");
        let override_file = yaml_file("engine:\n  top_k: 15\nlogging:\n  level: debug\n");

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.engine.top_k, 15, "Override should win");
        assert_eq!(
            config.logging.level, "debug",
            "Override should win for nested fields"
        );
        assert_eq!(
            config.logging.format, "json",
            "Base value should persist when not overridden"
        );
    }
}
