use crate::domain::errors::DomainResult;
use crate::domain::models::Preferences;

/// Port for client-local preference persistence.
///
/// Reads never fail: missing or corrupt storage yields the defaults. Writes
/// are synchronous and report storage errors to the caller.
pub trait PreferenceStore: Send + Sync {
    /// Load stored preferences, or defaults when nothing usable is stored
    fn load(&self) -> Preferences;

    /// Persist preferences, replacing whatever was stored
    fn save(&self, preferences: &Preferences) -> DomainResult<()>;
}
