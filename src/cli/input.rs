//! Reading command inputs from files and flags.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::domain::models::{Config, WeightVector};
use crate::infrastructure::preferences::FilePreferenceStore;
use crate::services::ProfileSession;

/// Decode a JSON file, or YAML when the extension says so.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if is_yaml {
        serde_yaml::from_str(&raw).with_context(|| format!("Invalid YAML in {}", path.display()))
    } else {
        serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
    }
}

/// Weights given inline as a JSON object, or as a path to a JSON file.
///
/// Out-of-bounds values are pulled back into the spread and floor limits.
pub fn parse_weights(source: &str) -> Result<WeightVector> {
    let trimmed = source.trim();
    if trimmed.starts_with('{') {
        serde_json::from_str(trimmed).context("Invalid inline weights JSON")
    } else {
        read_document(Path::new(trimmed))
    }
}

/// Session backed by the configured preference file.
pub fn open_session(config: &Config) -> ProfileSession<FilePreferenceStore> {
    let store = FilePreferenceStore::new(&config.preferences.path);
    ProfileSession::open(store, &config.engine)
}
