//! Owning mutation point for one user's weights and keyword sets.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::models::{
    AggregatedProfile, Axis, ComputeMode, ComputeRequest, EngineConfig, KeywordSet, Preferences,
    WeightVector,
};
use crate::domain::ports::PreferenceStore;
use crate::services::axis_solver::{AxisConstraintSolver, SolverOutcome};

/// Holds the live weight vector and persists preferences after each change.
///
/// Every weight mutation goes through the solver or the aggregator output, so
/// the vector held here always satisfies the spread and floor bounds.
pub struct ProfileSession<S>
where
    S: PreferenceStore,
{
    store: S,
    preferences: Preferences,
    keywords: KeywordSet,
    boost_tags: Vec<String>,
    top_k: usize,
    solver: AxisConstraintSolver,
}

impl<S> ProfileSession<S>
where
    S: PreferenceStore,
{
    /// Start a session from whatever the store holds.
    pub fn open(store: S, engine: &EngineConfig) -> Self {
        let preferences = store.load();
        info!(
            boost_enabled = preferences.boost_enabled,
            active_dimensions = preferences.active_dimensions.len(),
            "profile session opened"
        );
        Self {
            store,
            preferences,
            keywords: KeywordSet::new(),
            boost_tags: engine.boost_tags.clone(),
            top_k: engine.top_k,
            solver: AxisConstraintSolver::new(),
        }
    }

    pub const fn weights(&self) -> &WeightVector {
        &self.preferences.weights
    }

    pub const fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub const fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Move one slider.
    pub fn set_axis(&mut self, axis: Axis, value: f64) -> SolverOutcome {
        let outcome = self.solver.set_axis(&self.preferences.weights, axis, value);
        self.preferences.weights = outcome.weights.clone();
        self.persist();
        outcome
    }

    /// Replace the weights with a freshly aggregated quiz profile.
    pub fn apply_profile(&mut self, profile: &AggregatedProfile) {
        self.preferences.weights = profile.weights.clone();
        debug!(confidence_avg = profile.confidence_avg, "quiz profile applied");
        self.persist();
    }

    pub fn set_boost_enabled(&mut self, enabled: bool) {
        self.preferences.boost_enabled = enabled;
        self.persist();
    }

    /// Restrict detection to `dimensions`; duplicates are ignored.
    pub fn set_active_dimensions(&mut self, dimensions: Vec<Axis>) {
        self.preferences.active_dimensions = dimensions;
        self.preferences.active_dimensions = self.preferences.normalized_dimensions();
        self.persist();
    }

    pub fn set_keywords(&mut self, keywords: KeywordSet) {
        self.keywords = keywords;
    }

    pub fn set_boost_tags(&mut self, tags: Vec<String>) {
        self.boost_tags = tags;
    }

    /// Snapshot the session as a compute request.
    ///
    /// Keywords on inactive dimensions are left out.
    pub fn request(&self, mode: ComputeMode) -> ComputeRequest {
        let active = self.preferences.normalized_dimensions();
        let mut request = ComputeRequest::new(
            self.preferences.weights.clone(),
            self.keywords.restricted_to(&active),
        )
        .with_boost(self.boost_tags.clone(), self.preferences.boost_enabled);
        request.top_k = self.top_k;
        request.mode = mode;
        request
    }

    fn persist(&mut self) {
        self.preferences.saved_at = Some(Utc::now());
        if let Err(e) = self.store.save(&self.preferences) {
            // The in-memory state stays authoritative for this session.
            warn!(error = %e, "failed to persist preferences");
        }
    }
}
