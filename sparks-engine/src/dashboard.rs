//! Run orchestration: collect, compute, and rebuild every chart.
use async_trait::async_trait;
use log::{debug, error, info};

use crate::catalog::BaselineCatalog;
use crate::chart::{ChartSpec, ChartWarning, build_input_charts, build_result_charts};
use crate::config::ChartConfig;
use crate::controls::{ControlSurface, collect};
use crate::error::ScenarioError;
use crate::inputs::ScaleInputSet;
use crate::result::{ComputationResponse, ReasonabilitySignals};

/// Remote financial projection, an opaque function of the scale factors.
#[async_trait(?Send)]
pub trait ComputationService {
    type Error: Into<ScenarioError>;

    /// # Errors
    ///
    /// Any non-success outcome; converted to [`ScenarioError::ComputationFailed`]
    /// by implementations.
    async fn compute(&self, inputs: &ScaleInputSet) -> Result<ComputationResponse, Self::Error>;
}

/// Everything a completed run renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardView {
    pub inputs: ScaleInputSet,
    pub input_charts: Vec<ChartSpec>,
    pub result_charts: Vec<ChartSpec>,
    pub warnings: Vec<ChartWarning>,
    /// Optional per-result-metric markers for the signal strip.
    pub signals: Option<ReasonabilitySignals>,
}

pub struct Dashboard<C> {
    catalog: BaselineCatalog,
    charts: ChartConfig,
    service: C,
}

impl<C: ComputationService> Dashboard<C> {
    pub const fn new(catalog: BaselineCatalog, charts: ChartConfig, service: C) -> Self {
        Self {
            catalog,
            charts,
            service,
        }
    }

    pub const fn catalog(&self) -> &BaselineCatalog {
        &self.catalog
    }

    pub const fn chart_config(&self) -> &ChartConfig {
        &self.charts
    }

    pub const fn service(&self) -> &C {
        &self.service
    }

    /// Input-driver charts for the current controls, without a remote call.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::InputParse`] when the controls do not collect.
    pub fn preview(&self, surface: &ControlSurface) -> Result<Vec<ChartSpec>, ScenarioError> {
        let inputs = collect(surface)?;
        build_input_charts(&self.catalog, &inputs)
    }

    /// Collect, compute, then build input and result charts.
    ///
    /// Charts are only built once the computation resolves; on any error the
    /// caller keeps its previous view.
    ///
    /// # Errors
    ///
    /// Local errors from collection or projection, or the computation failure.
    pub async fn run(&self, surface: &ControlSurface) -> Result<DashboardView, ScenarioError> {
        let inputs = collect(surface)?;
        debug!("dashboard run with {} scale factors", inputs.len());
        let response = self.service.compute(&inputs).await.map_err(|err| {
            let err: ScenarioError = err.into();
            error!("computation failed: {err}");
            err
        })?;
        self.render(inputs, response)
    }

    /// Build a view from an already-resolved response.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::MissingScaleFactor`] when `inputs` is incomplete.
    pub fn render(
        &self,
        inputs: ScaleInputSet,
        response: ComputationResponse,
    ) -> Result<DashboardView, ScenarioError> {
        let input_charts = build_input_charts(&self.catalog, &inputs)?;
        let results = build_result_charts(&response.results, &self.charts);
        info!(
            "dashboard rendered {} input and {} result charts ({} skipped)",
            input_charts.len(),
            results.charts.len(),
            results.warnings.len()
        );
        Ok(DashboardView {
            inputs,
            input_charts,
            result_charts: results.charts,
            warnings: results.warnings,
            signals: response.reasonability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartId, ResultChartKind, Tone};
    use crate::memory::StubComputation;
    use crate::metric::Metric;
    use crate::result::{ComputationResult, ResultMetric};
    use futures::executor::block_on;

    fn dashboard(service: StubComputation) -> Dashboard<StubComputation> {
        Dashboard::new(
            BaselineCatalog::reference().clone(),
            ChartConfig::default(),
            service,
        )
    }

    #[test]
    fn run_submits_collected_inputs_and_builds_views() {
        let result = ComputationResult::default()
            .with_column(ResultMetric::Years, vec![1.0, 2.0])
            .with_column(ResultMetric::Profit, vec![-1e6, 6e6]);
        let stub = StubComputation::returning(ComputationResponse::new(result));
        let board = dashboard(stub.clone());
        let view = block_on(board.run(&ControlSurface::standard())).unwrap();

        assert_eq!(stub.requests(), vec![ScaleInputSet::baseline()]);
        assert_eq!(view.input_charts.len(), Metric::COUNT);
        let sustainability = view
            .result_charts
            .iter()
            .find(|c| c.id == ChartId::Result(ResultChartKind::Sustainability))
            .unwrap();
        assert_eq!(sustainability.bands[0].tone, Tone::Red);
        assert_eq!(sustainability.bands[1].tone, Tone::Green);
        assert!(!view.warnings.is_empty(), "revenue views lack columns");
    }

    #[test]
    fn computation_failure_is_remote() {
        let board = dashboard(StubComputation::failing(503, "busy"));
        let err = block_on(board.run(&ControlSurface::standard())).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(
            err,
            ScenarioError::ComputationFailed {
                status: 503,
                message: "busy".into()
            }
        );
    }

    #[test]
    fn bad_controls_skip_the_remote_call() {
        let stub = StubComputation::failing(500, "unused");
        let board = dashboard(stub.clone());
        let mut surface = ControlSurface::standard();
        surface.remove(Metric::Staffing);
        let err = block_on(board.run(&surface)).unwrap_err();
        assert!(matches!(err, ScenarioError::InputParse { .. }));
        assert!(stub.requests().is_empty());
    }

    #[test]
    fn preview_tracks_slider_changes() {
        let board = dashboard(StubComputation::failing(500, "unused"));
        let mut surface = ControlSurface::standard();
        surface.set_input(Metric::MarketingSpend, "0.75");
        let charts = board.preview(&surface).unwrap();
        let marketing = &charts[Metric::MarketingSpend.index()];
        assert_eq!(marketing.series[1].name, "Scaled (0.75x)");
    }
}
