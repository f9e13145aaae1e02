//! Scale-factor snapshots.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::BASELINE_MULTIPLIER;
use crate::error::ScenarioError;
use crate::metric::Metric;

/// Immutable snapshot of scale factors keyed by metric.
///
/// Serialized as a flat object keyed by wire key, the shape sent to the
/// computation service and to the scenario store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, f64>",
    into = "BTreeMap<String, f64>"
)]
pub struct ScaleInputSet {
    factors: BTreeMap<Metric, f64>,
}

impl ScaleInputSet {
    /// Every metric at the unscaled multiplier.
    #[must_use]
    pub fn baseline() -> Self {
        Self::from_factors(Metric::ALL.map(|m| (m, BASELINE_MULTIPLIER)))
    }

    #[must_use]
    pub fn from_factors(factors: impl IntoIterator<Item = (Metric, f64)>) -> Self {
        Self {
            factors: factors.into_iter().collect(),
        }
    }

    /// Copy of this snapshot with one factor replaced.
    #[must_use]
    pub fn with(&self, metric: Metric, value: f64) -> Self {
        let mut factors = self.factors.clone();
        factors.insert(metric, value);
        Self { factors }
    }

    #[must_use]
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.factors.get(&metric).copied()
    }

    /// Factor for `metric`.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MissingScaleFactor`] when the snapshot lacks the metric.
    pub fn factor(&self, metric: Metric) -> Result<f64, ScenarioError> {
        self.get(metric)
            .ok_or(ScenarioError::MissingScaleFactor(metric))
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        Metric::ALL.iter().all(|m| self.factors.contains_key(m))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.factors.iter().map(|(m, v)| (*m, *v))
    }

    /// Same metric set with every factor within `tolerance`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.factors.len() == other.factors.len()
            && self.iter().all(|(metric, value)| {
                other
                    .get(metric)
                    .is_some_and(|theirs| (theirs - value).abs() <= tolerance)
            })
    }
}

impl From<ScaleInputSet> for BTreeMap<String, f64> {
    fn from(set: ScaleInputSet) -> Self {
        set.factors
            .into_iter()
            .map(|(metric, value)| (metric.wire_key().to_string(), value))
            .collect()
    }
}

impl TryFrom<BTreeMap<String, f64>> for ScaleInputSet {
    type Error = ScenarioError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut factors = BTreeMap::new();
        for (key, value) in raw {
            let metric: Metric = key.parse()?;
            factors.insert(metric, value);
        }
        Ok(Self { factors })
    }
}
