//! Control-surface state and the scale input collector.
//!
//! The surface is an explicit value owned by the caller: the web client keeps
//! it in component state, tests build it directly. Collecting never touches
//! anything but the snapshot handed in.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::BASELINE_MULTIPLIER;
use crate::error::{FaultKind, InputFault, ScenarioError};
use crate::inputs::ScaleInputSet;
use crate::metric::Metric;

/// Raw value of a slider and the text shown in its readout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub value: String,
    pub readout: String,
}

impl Control {
    #[must_use]
    pub fn at(value: f64) -> Self {
        Self {
            value: value.to_string(),
            readout: format_readout(value),
        }
    }

    /// Control holding whatever text the user entered.
    #[must_use]
    pub fn raw(value: impl Into<String>) -> Self {
        let value = value.into();
        let readout = value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map_or_else(|| value.clone(), format_readout);
        Self { value, readout }
    }
}

/// Readout text for a multiplier: two decimals and an `x` suffix.
#[must_use]
pub fn format_readout(value: f64) -> String {
    format!("{value:.2}x")
}

/// Everything the dashboard reads from or writes to its controls.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlSurface {
    controls: BTreeMap<Metric, Control>,
    /// Contents of the scenario-name text field.
    #[serde(default)]
    pub scenario_name: String,
    /// Options of the scenario-selection control.
    #[serde(default)]
    pub scenario_names: Vec<String>,
    #[serde(default)]
    pub selected_scenario: Option<String>,
}

impl ControlSurface {
    /// All eight controls at the baseline multiplier.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            controls: Metric::ALL
                .into_iter()
                .map(|m| (m, Control::at(BASELINE_MULTIPLIER)))
                .collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn control(&self, metric: Metric) -> Option<&Control> {
        self.controls.get(&metric)
    }

    pub fn controls(&self) -> impl Iterator<Item = (Metric, &Control)> {
        self.controls.iter().map(|(m, c)| (*m, c))
    }

    /// Record user input on a control, refreshing its readout.
    pub fn set_input(&mut self, metric: Metric, raw: impl Into<String>) {
        self.controls.insert(metric, Control::raw(raw));
    }

    /// Overwrite a control's value and readout, if the control exists.
    ///
    /// Returns `false` when the surface has no control for `metric`.
    pub fn rehydrate(&mut self, metric: Metric, value: f64) -> bool {
        match self.controls.get_mut(&metric) {
            Some(control) => {
                *control = Control::at(value);
                true
            }
            None => false,
        }
    }

    /// Drop a control, as if it were absent from the page.
    pub fn remove(&mut self, metric: Metric) -> Option<Control> {
        self.controls.remove(&metric)
    }

    /// Set every present control from a scale snapshot.
    pub fn apply(&mut self, inputs: &ScaleInputSet) {
        for (metric, value) in inputs.iter() {
            self.rehydrate(metric, value);
        }
    }

    /// Numeric control values only; used to compare control state.
    #[must_use]
    pub fn values(&self) -> BTreeMap<Metric, String> {
        self.controls
            .iter()
            .map(|(m, c)| (*m, c.value.clone()))
            .collect()
    }
}

/// Read every control into a fresh [`ScaleInputSet`].
///
/// # Errors
///
/// Returns [`ScenarioError::InputParse`] listing each control that is missing
/// or does not hold a positive finite number.
pub fn collect(surface: &ControlSurface) -> Result<ScaleInputSet, ScenarioError> {
    let mut factors = Vec::with_capacity(Metric::COUNT);
    let mut faults = Vec::new();
    for metric in Metric::ALL {
        match parse_control(surface.control(metric)) {
            Ok(value) => factors.push((metric, value)),
            Err(kind) => faults.push(InputFault { metric, kind }),
        }
    }
    if faults.is_empty() {
        Ok(ScaleInputSet::from_factors(factors))
    } else {
        log::warn!("scale input collection failed for {} control(s)", faults.len());
        Err(ScenarioError::InputParse { faults })
    }
}

fn parse_control(control: Option<&Control>) -> Result<f64, FaultKind> {
    let raw = control.ok_or(FaultKind::Missing)?.value.trim();
    let value: f64 = raw
        .parse()
        .map_err(|_| FaultKind::NotANumber(raw.to_string()))?;
    if !value.is_finite() {
        return Err(FaultKind::NonFinite(raw.to_string()));
    }
    if value <= 0.0 {
        return Err(FaultKind::NonPositive(raw.to_string()));
    }
    Ok(value)
}
