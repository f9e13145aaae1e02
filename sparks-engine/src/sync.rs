//! Save and load round trips between the control surface and the scenario store.
use async_trait::async_trait;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::Cell;
use std::collections::BTreeMap;

use crate::controls::{ControlSurface, collect};
use crate::error::{SaveFailure, ScenarioError};
use crate::inputs::ScaleInputSet;
use crate::metric::Metric;

/// Remote key-value store addressed by scenario name.
///
/// Implementations own transport concerns (encoding, timeouts). The
/// synchronizer only sees the outcome.
#[async_trait(?Send)]
pub trait ScenarioStore {
    type Error: std::error::Error + 'static;

    /// Persist `inputs` under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached. `Ok(false)` means the
    /// store answered but did not accept the scenario.
    async fn save(&self, name: &str, inputs: &ScaleInputSet) -> Result<bool, Self::Error>;

    /// Fetch a stored scenario. `Ok(None)` means no such name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    async fn load(&self, name: &str) -> Result<Option<StoredScenario>, Self::Error>;

    /// Names of every stored scenario.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    async fn list(&self) -> Result<Vec<String>, Self::Error>;
}

/// Payload returned by the store: arbitrary keys to stored values.
///
/// Keys may be wire keys or control ids; extra keys such as `name` are kept
/// and ignored during rehydration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredScenario(BTreeMap<String, Value>);

impl StoredScenario {
    #[must_use]
    pub const fn new(entries: BTreeMap<String, Value>) -> Self {
        Self(entries)
    }

    /// Payload as written by a save: factors keyed by wire key.
    #[must_use]
    pub fn from_inputs(inputs: &ScaleInputSet) -> Self {
        Self(
            inputs
                .iter()
                .map(|(metric, value)| (metric.wire_key().to_string(), Value::from(value)))
                .collect(),
        )
    }

    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Step of the in-flight save or load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Idle,
    Collecting,
    Persisting,
    Fetching,
    Rehydrating,
}

/// Outcome of a successful load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub name: String,
    /// Controls that were overwritten.
    pub applied: Vec<Metric>,
    /// Stored keys that matched no control on the surface.
    pub ignored: Vec<String>,
}

/// Returns the phase cell to `Idle` however the flow ends.
struct PhaseGuard<'a> {
    phase: &'a Cell<SyncPhase>,
}

impl<'a> PhaseGuard<'a> {
    fn enter(phase: &'a Cell<SyncPhase>, first: SyncPhase) -> Self {
        let guard = Self { phase };
        guard.advance(first);
        guard
    }

    fn advance(&self, next: SyncPhase) {
        debug!("scenario sync: {:?} -> {next:?}", self.phase.get());
        self.phase.set(next);
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.advance(SyncPhase::Idle);
    }
}

pub struct ScenarioSynchronizer<S> {
    store: S,
    phase: Cell<SyncPhase>,
}

impl<S: ScenarioStore> ScenarioSynchronizer<S> {
    pub const fn new(store: S) -> Self {
        Self {
            store,
            phase: Cell::new(SyncPhase::Idle),
        }
    }

    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        self.phase.get()
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Collect the surface and persist it under `name`.
    ///
    /// The surface is never modified.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::SaveFailed`] for an empty name (the store is not
    /// called), a rejected save or an unreachable store;
    /// [`ScenarioError::InputParse`] when the controls do not collect.
    pub async fn save(
        &self,
        name: &str,
        surface: &ControlSurface,
    ) -> Result<ScaleInputSet, ScenarioError> {
        let name = name.trim();
        if name.is_empty() {
            warn!("refusing to save a scenario without a name");
            return Err(ScenarioError::SaveFailed(SaveFailure::EmptyName));
        }
        let guard = PhaseGuard::enter(&self.phase, SyncPhase::Collecting);
        let inputs = collect(surface)?;

        guard.advance(SyncPhase::Persisting);
        match self.store.save(name, &inputs).await {
            Ok(true) => {
                info!("saved scenario `{name}`");
                Ok(inputs)
            }
            Ok(false) => {
                error!("store rejected scenario `{name}`");
                Err(ScenarioError::SaveFailed(SaveFailure::Rejected(
                    name.to_string(),
                )))
            }
            Err(err) => {
                error!("saving scenario `{name}` failed: {err}");
                Err(ScenarioError::SaveFailed(SaveFailure::Transport(
                    err.to_string(),
                )))
            }
        }
    }

    /// Fetch the stored payload for `name` without touching any surface.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::LoadNotFound`] when the store has no such name (or the
    /// name is empty); [`ScenarioError::StoreUnavailable`] when the store
    /// cannot be reached.
    pub async fn fetch(&self, name: &str) -> Result<StoredScenario, ScenarioError> {
        let name = name.trim();
        if name.is_empty() {
            warn!("load requested without a scenario name");
            return Err(ScenarioError::LoadNotFound(String::new()));
        }
        let _guard = PhaseGuard::enter(&self.phase, SyncPhase::Fetching);
        match self.store.load(name).await {
            Ok(Some(stored)) => Ok(stored),
            Ok(None) => {
                error!("scenario `{name}` not found");
                Err(ScenarioError::LoadNotFound(name.to_string()))
            }
            Err(err) => {
                error!("loading scenario `{name}` failed: {err}");
                Err(ScenarioError::StoreUnavailable(err.to_string()))
            }
        }
    }

    /// Fetch `name` and overwrite every matching control and its readout.
    ///
    /// Nothing on the surface changes unless the fetch succeeds. Loading the
    /// same scenario again yields the same control state.
    ///
    /// # Errors
    ///
    /// See [`ScenarioSynchronizer::fetch`].
    pub async fn load(
        &self,
        name: &str,
        surface: &mut ControlSurface,
    ) -> Result<LoadReport, ScenarioError> {
        let stored = self.fetch(name).await?;
        let _guard = PhaseGuard::enter(&self.phase, SyncPhase::Rehydrating);
        Ok(rehydrate(name.trim(), &stored, surface))
    }

    /// Replace the surface's scenario options with the store's names, sorted.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::StoreUnavailable`] when the store cannot be reached;
    /// the options are left as they were.
    pub async fn refresh_names(&self, surface: &mut ControlSurface) -> Result<usize, ScenarioError> {
        let mut names = self.store.list().await.map_err(|err| {
            error!("listing scenarios failed: {err}");
            ScenarioError::StoreUnavailable(err.to_string())
        })?;
        names.sort();
        names.dedup();
        debug!("scenario store lists {} names", names.len());
        surface.scenario_names = names;
        Ok(surface.scenario_names.len())
    }
}

/// Apply a stored payload to the surface.
///
/// Keys resolve through [`Metric::from_key`], so both wire keys and control
/// ids match. Non-numeric values and keys without a control are reported
/// as ignored.
pub fn rehydrate(name: &str, stored: &StoredScenario, surface: &mut ControlSurface) -> LoadReport {
    let mut report = LoadReport {
        name: name.to_string(),
        ..LoadReport::default()
    };
    for (key, value) in stored.entries() {
        let target = Metric::from_key(key).zip(value.as_f64().filter(|v| v.is_finite()));
        match target {
            Some((metric, number)) if surface.rehydrate(metric, number) => {
                report.applied.push(metric);
            }
            _ => report.ignored.push(key.to_string()),
        }
    }
    surface.scenario_name = name.to_string();
    surface.selected_scenario = Some(name.to_string());
    if !report.ignored.is_empty() {
        warn!(
            "scenario `{name}`: ignored keys {}",
            report.ignored.join(", ")
        );
    }
    info!(
        "loaded scenario `{name}` ({} controls)",
        report.applied.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use futures::executor::block_on;

    #[test]
    fn save_then_load_restores_controls() {
        let sync = ScenarioSynchronizer::new(MemoryStore::default());
        let mut surface = ControlSurface::standard();
        surface.set_input(Metric::GameConversion, "1.35");
        surface.set_input(Metric::EventYield, "0.8");
        let saved = block_on(sync.save("plan-b", &surface)).unwrap();

        let mut fresh = ControlSurface::standard();
        let report = block_on(sync.load("plan-b", &mut fresh)).unwrap();
        assert_eq!(report.applied.len(), Metric::COUNT);
        assert!(collect(&fresh).unwrap().approx_eq(&saved, 1e-12));
        assert_eq!(fresh.control(Metric::GameConversion).unwrap().readout, "1.35x");
        assert_eq!(sync.phase(), SyncPhase::Idle);
    }

    #[test]
    fn empty_name_never_reaches_store() {
        let store = MemoryStore::default();
        let sync = ScenarioSynchronizer::new(store.clone());
        let err = block_on(sync.save("   ", &ControlSurface::standard())).unwrap_err();
        assert_eq!(err, ScenarioError::SaveFailed(SaveFailure::EmptyName));
        assert_eq!(store.save_calls(), 0);
    }

    #[test]
    fn rejected_save_is_reported() {
        let sync = ScenarioSynchronizer::new(MemoryStore::rejecting());
        let err = block_on(sync.save("x", &ControlSurface::standard())).unwrap_err();
        assert_eq!(
            err,
            ScenarioError::SaveFailed(SaveFailure::Rejected("x".into()))
        );
        assert_eq!(sync.phase(), SyncPhase::Idle);
    }

    #[test]
    fn unparsable_controls_abort_before_persisting() {
        let store = MemoryStore::default();
        let sync = ScenarioSynchronizer::new(store.clone());
        let mut surface = ControlSurface::standard();
        surface.set_input(Metric::Staffing, "");
        let err = block_on(sync.save("x", &surface)).unwrap_err();
        assert!(matches!(err, ScenarioError::InputParse { .. }));
        assert_eq!(store.save_calls(), 0);
    }

    #[test]
    fn missing_scenario_leaves_controls_untouched() {
        let sync = ScenarioSynchronizer::new(MemoryStore::default());
        let mut surface = ControlSurface::standard();
        surface.set_input(Metric::Staffing, "1.3");
        let before = surface.clone();
        let err = block_on(sync.load("ghost", &mut surface)).unwrap_err();
        assert_eq!(err, ScenarioError::LoadNotFound("ghost".into()));
        assert_eq!(surface, before);
    }

    #[test]
    fn offline_store_maps_to_unavailable() {
        let sync = ScenarioSynchronizer::new(MemoryStore::offline());
        let mut surface = ControlSurface::standard();
        let before = surface.clone();
        let err = block_on(sync.load("any", &mut surface)).unwrap_err();
        assert!(matches!(err, ScenarioError::StoreUnavailable(_)));
        assert_eq!(surface, before);
        assert!(block_on(sync.refresh_names(&mut surface)).is_err());
    }

    #[test]
    fn fetch_returns_payload_and_settles_phase() {
        let store = MemoryStore::default();
        store.insert("lean", StoredScenario::default().with_entry("mau_scale", 0.8));
        let sync = ScenarioSynchronizer::new(store);
        let stored = block_on(sync.fetch(" lean ")).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(sync.phase(), SyncPhase::Idle);
        assert_eq!(
            block_on(sync.fetch("")).unwrap_err(),
            ScenarioError::LoadNotFound(String::new())
        );
    }

    #[test]
    fn rehydrate_accepts_control_ids_and_ignores_extras() {
        let stored = StoredScenario::default()
            .with_entry("conv_course_scale", 1.4)
            .with_entry("mau_scale", 0.9)
            .with_entry("name", "legacy")
            .with_entry("future_scale", 2.0);
        let mut surface = ControlSurface::standard();
        let report = rehydrate("legacy", &stored, &mut surface);
        assert_eq!(
            report.applied,
            vec![Metric::CourseConversion, Metric::AudienceGrowth]
        );
        assert_eq!(report.ignored, vec!["future_scale", "name"]);
        assert_eq!(surface.control(Metric::CourseConversion).unwrap().value, "1.4");
    }

    #[test]
    fn refresh_names_sorts_and_dedups() {
        let store = MemoryStore::default();
        store.insert("zeta", StoredScenario::default());
        store.insert("alpha", StoredScenario::default());
        let sync = ScenarioSynchronizer::new(store);
        let mut surface = ControlSurface::standard();
        assert_eq!(block_on(sync.refresh_names(&mut surface)).unwrap(), 2);
        assert_eq!(surface.scenario_names, vec!["alpha", "zeta"]);
    }
}
