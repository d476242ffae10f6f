//! In-memory preference store.
//!
//! Used when nothing should touch disk (tests, one-shot CLI commands).

use std::sync::Mutex;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Preferences;
use super::PreferenceStore;

/// Keeps the last saved preferences in memory.
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    stored: Mutex<Option<Preferences>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `preferences`.
    pub fn with_preferences(preferences: Preferences) -> Self {
        Self {
            stored: Mutex::new(Some(preferences)),
        }
    }

    /// Last saved value, if any.
    pub fn stored(&self) -> Option<Preferences> {
        self.stored.lock().ok().and_then(|guard| guard.clone())
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn load(&self) -> Preferences {
        self.stored().unwrap_or_default()
    }

    fn save(&self, preferences: &Preferences) -> DomainResult<()> {
        let mut guard = self
            .stored
            .lock()
            .map_err(|e| DomainError::StorageError(e.to_string()))?;
        *guard = Some(preferences.clone());
        Ok(())
    }
}
