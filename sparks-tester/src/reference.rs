//! In-process stand-in for the remote projection service.
//!
//! Reproduces the reference back-end: base curves scaled by the submitted
//! factors, with placeholder CAC/ROAS and per-year reasonability markers.
use async_trait::async_trait;
use sparks_engine::{
    ComputationResponse, ComputationResult, ComputationService, Metric, ReasonabilitySignals,
    ResultMetric, ScaleInputSet, ScenarioError, SignalMarker,
};

const BASE_MAU: [f64; 14] = [
    0.0, 60_000.0, 300_000.0, 600_000.0, 1_200_000.0, 1_600_000.0, 2_000_000.0, 2_000_000.0,
    2_000_000.0, 2_000_000.0, 2_000_000.0, 2_000_000.0, 2_000_000.0, 2_000_000.0,
];

const BASE_REVENUES: [f64; 14] = [
    0.0, 1.3e6, 8.8e6, 24.6e6, 58.4e6, 96e6, 134e6, 148e6, 163e6, 177e6, 177e6, 177e6, 177e6,
    177e6,
];

const BASE_COSTS: [f64; 14] = [
    5.6e6, 8.9e6, 16.6e6, 32.7e6, 52.4e6, 67e6, 87e6, 87e6, 88e6, 88e6, 88e6, 88e6, 88e6, 88e6,
];

const BASE_STAFF: [f64; 14] = [
    14.0, 23.0, 39.0, 54.0, 70.0, 70.0, 70.0, 70.0, 70.0, 70.0, 70.0, 70.0, 70.0, 70.0,
];

const CAC_LIMIT: f64 = 200.0;
const ROAS_FLOOR: f64 = 0.5;

fn scaled(base: &[f64], factor: f64) -> Vec<f64> {
    base.iter().map(|v| v * factor).collect()
}

fn markers(values: &[f64], ok: impl Fn(f64) -> bool) -> Vec<SignalMarker> {
    values.iter().map(|v| SignalMarker::from_ok(ok(*v))).collect()
}

/// Deterministic projection used by logic scenarios and chart dumps.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceComputation;

impl ReferenceComputation {
    /// Missing factors count as 1.0.
    #[must_use]
    pub fn project(inputs: &ScaleInputSet) -> ComputationResponse {
        let factor = |metric| inputs.get(metric).unwrap_or(1.0);
        let years: Vec<f64> = (1_u32..).take(BASE_MAU.len()).map(f64::from).collect();
        let mau = scaled(&BASE_MAU, factor(Metric::AudienceGrowth));
        let revenues = scaled(
            &BASE_REVENUES,
            factor(Metric::GameConversion) * factor(Metric::CourseConversion),
        );
        let costs = scaled(
            &BASE_COSTS,
            factor(Metric::Staffing) * factor(Metric::ServiceHardwareCoefficient),
        );
        let staff = scaled(&BASE_STAFF, factor(Metric::Staffing));
        let profit: Vec<f64> = revenues.iter().zip(&costs).map(|(r, c)| r - c).collect();
        let cac: Vec<f64> = costs
            .iter()
            .zip(&mau)
            .map(|(c, m)| (c / m.max(1.0)).max(1.0))
            .collect();
        let roas: Vec<f64> = revenues
            .iter()
            .zip(&costs)
            .map(|(r, c)| r / c.max(1.0))
            .collect();

        let mut signals = ReasonabilitySignals::new();
        signals.insert("mau".into(), markers(&mau, |v| v >= 0.0));
        signals.insert("revenues".into(), markers(&revenues, |v| v >= 0.0));
        signals.insert("staff".into(), markers(&staff, |v| v >= 0.0));
        signals.insert("cac".into(), markers(&cac, |v| v < CAC_LIMIT));
        signals.insert("roas".into(), markers(&roas, |v| v > ROAS_FLOOR));

        let result = ComputationResult::default()
            .with_column(ResultMetric::Years, years)
            .with_column(ResultMetric::Mau, mau)
            .with_column(ResultMetric::Revenues, revenues)
            .with_column(ResultMetric::Costs, costs)
            .with_column(ResultMetric::Profit, profit)
            .with_column(ResultMetric::Staff, staff)
            .with_column(ResultMetric::Cac, cac)
            .with_column(ResultMetric::Roas, roas);
        ComputationResponse::new(result).with_signals(signals)
    }
}

#[async_trait(?Send)]
impl ComputationService for ReferenceComputation {
    type Error = ScenarioError;

    async fn compute(&self, inputs: &ScaleInputSet) -> Result<ComputationResponse, Self::Error> {
        Ok(Self::project(inputs))
    }
}
