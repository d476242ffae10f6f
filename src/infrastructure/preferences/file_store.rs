//! JSON file preference store.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Preferences;
use crate::domain::ports::PreferenceStore;

/// Stores preferences as one pretty-printed JSON document.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Preferences {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored preferences, using defaults");
                return Preferences::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable preferences, using defaults");
                return Preferences::default();
            }
        };

        // Stored weights pass back through the constraint checks on decode.
        match serde_json::from_str::<Preferences>(&raw) {
            Ok(preferences) => preferences,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt preferences, using defaults");
                Preferences::default()
            }
        }
    }

    fn save(&self, preferences: &Preferences) -> DomainResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(preferences)?;
        let staging = self.staging_path();
        fs::write(&staging, json)?;
        fs::rename(&staging, &self.path).map_err(|e| {
            fs::remove_file(&staging).ok();
            DomainError::StorageError(format!(
                "failed to move preferences into {}: {e}",
                self.path.display()
            ))
        })?;

        debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Axis, PerAxis, WeightVector};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("prefs.json"));
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("nested/prefs.json"));
        let prefs = Preferences {
            weights: WeightVector::from_values(PerAxis::new(0.8, 0.6, 0.5, 0.4)),
            boost_enabled: false,
            active_dimensions: vec![Axis::Enjoyment, Axis::Utility],
            saved_at: None,
        };

        store.save(&prefs).unwrap();
        assert_eq!(store.load(), prefs);
        assert!(!store.staging_path().exists());
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(FilePreferenceStore::new(path).load(), Preferences::default());
    }

    #[test]
    fn test_invalid_stored_weights_are_repaired() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(
            &path,
            r#"{"weights":{"passions":1.0,"talents":0.0,"utilite":0.5,"viabilite":0.0}}"#,
        )
        .unwrap();

        let prefs = FilePreferenceStore::new(path).load();
        assert!(prefs.weights.spread() <= 0.4 + 1e-9);
        assert!(prefs.weights.get(Axis::Viability) >= 0.15);
        assert!(prefs.boost_enabled);
    }
}
