//! SpArks Scenario Engine
//!
//! Platform-agnostic core of the SpArks financial scenario simulator: scale
//! inputs, the baseline catalog, projection, reasonability classification,
//! chart descriptions and scenario round trips. This crate has no browser or
//! transport dependencies; collaborators are injected through traits.

pub mod catalog;
pub mod chart;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod controls;
pub mod dashboard;
pub mod error;
pub mod inputs;
pub mod memory;
pub mod metric;
pub mod projector;
pub mod result;
pub mod sync;

// Re-export commonly used types
pub use catalog::{
    BaselineCatalog, BaselineTrajectory, Bounds, CatalogError, MetricProfile, PhaseRange,
    RangeInterval, ReasonabilityRange, YearIndex,
};
pub use chart::{
    BandSpec, ChartId, ChartSpec, ChartWarning, LineDash, ResultChartKind, ResultCharts,
    SeriesKind, SeriesSpec, ThresholdLine, Tone, WarningIssue, build_input_chart,
    build_input_charts, build_result_chart, build_result_charts,
};
pub use classifier::{Classification, classify, classify_series};
pub use config::{ChartConfig, ConfigError, EndpointConfig, SegmentShare, SimulatorConfig};
pub use controls::{Control, ControlSurface, collect, format_readout};
pub use dashboard::{ComputationService, Dashboard, DashboardView};
pub use error::{ErrorClass, FaultKind, InputFault, SaveFailure, ScenarioError, SetupError};
pub use inputs::ScaleInputSet;
pub use memory::{MemoryStore, StubComputation};
pub use metric::{Metric, SliderDomain};
pub use projector::{ProjectedSeries, project};
pub use result::{
    ComputationResponse, ComputationResult, ReasonabilitySignals, ResultMetric, SignalMarker,
};
pub use sync::{LoadReport, ScenarioStore, ScenarioSynchronizer, StoredScenario, SyncPhase};

/// The dashboard and the synchronizer wired to one pair of collaborators.
pub struct Simulator<C, S>
where
    C: ComputationService,
    S: ScenarioStore,
{
    config: SimulatorConfig,
    dashboard: Dashboard<C>,
    sync: ScenarioSynchronizer<S>,
}

impl<C, S> Simulator<C, S>
where
    C: ComputationService,
    S: ScenarioStore,
{
    /// Validate `catalog` and `config`, then wire the collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the catalog or configuration is inconsistent.
    pub fn new(
        catalog: BaselineCatalog,
        config: SimulatorConfig,
        service: C,
        store: S,
    ) -> Result<Self, SetupError> {
        catalog.validate()?;
        config.validate()?;
        let dashboard = Dashboard::new(catalog, config.charts.clone(), service);
        Ok(Self {
            config,
            dashboard,
            sync: ScenarioSynchronizer::new(store),
        })
    }

    /// Simulator over the reference catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if `config` is inconsistent.
    pub fn with_reference(config: SimulatorConfig, service: C, store: S) -> Result<Self, SetupError> {
        Self::new(BaselineCatalog::reference().clone(), config, service, store)
    }

    pub const fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub const fn dashboard(&self) -> &Dashboard<C> {
        &self.dashboard
    }

    pub const fn synchronizer(&self) -> &ScenarioSynchronizer<S> {
        &self.sync
    }

    /// See [`Dashboard::run`].
    ///
    /// # Errors
    ///
    /// Propagates the run failure.
    pub async fn run(&self, surface: &ControlSurface) -> Result<DashboardView, ScenarioError> {
        self.dashboard.run(surface).await
    }

    /// See [`ScenarioSynchronizer::save`].
    ///
    /// # Errors
    ///
    /// Propagates the save failure.
    pub async fn save(
        &self,
        name: &str,
        surface: &ControlSurface,
    ) -> Result<ScaleInputSet, ScenarioError> {
        self.sync.save(name, surface).await
    }

    /// See [`ScenarioSynchronizer::load`].
    ///
    /// # Errors
    ///
    /// Propagates the load failure; the surface is untouched on error.
    pub async fn load(
        &self,
        name: &str,
        surface: &mut ControlSurface,
    ) -> Result<LoadReport, ScenarioError> {
        self.sync.load(name, surface).await
    }
}
