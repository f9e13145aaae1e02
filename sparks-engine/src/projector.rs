//! Baseline × scale projection for the input-driver charts.
use serde::{Deserialize, Serialize};

use crate::catalog::BaselineCatalog;
use crate::error::ScenarioError;
use crate::inputs::ScaleInputSet;
use crate::metric::Metric;

/// Baseline and scaled series for one metric, in display units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedSeries {
    pub metric: Metric,
    pub years: Vec<u32>,
    /// `baseline[i] × unit_factor`.
    pub baseline: Vec<f64>,
    /// `baseline[i] × scale × unit_factor`.
    pub scaled: Vec<f64>,
    pub scale: f64,
    pub unit_factor: f64,
}

impl ProjectedSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.years.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

/// Project one metric. No rounding is applied.
///
/// # Errors
///
/// Returns [`ScenarioError::MissingScaleFactor`] if `inputs` lacks `metric`.
pub fn project(
    catalog: &BaselineCatalog,
    metric: Metric,
    inputs: &ScaleInputSet,
    unit_factor: f64,
) -> Result<ProjectedSeries, ScenarioError> {
    let scale = inputs.factor(metric)?;
    let raw = catalog.baseline(metric).values();
    Ok(ProjectedSeries {
        metric,
        years: catalog.years().iter().collect(),
        baseline: raw.iter().map(|b| b * unit_factor).collect(),
        scaled: raw.iter().map(|b| b * scale * unit_factor).collect(),
        scale,
        unit_factor,
    })
}

/// Raw (unit-free) scaled values, the quantity ranges are defined on.
///
/// # Errors
///
/// Returns [`ScenarioError::MissingScaleFactor`] if `inputs` lacks `metric`.
pub fn scaled_raw(
    catalog: &BaselineCatalog,
    metric: Metric,
    inputs: &ScaleInputSet,
) -> Result<Vec<f64>, ScenarioError> {
    let scale = inputs.factor(metric)?;
    Ok(catalog
        .baseline(metric)
        .values()
        .iter()
        .map(|b| b * scale)
        .collect())
}
