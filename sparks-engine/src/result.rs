//! Computation results and the optional reasonability signal strip.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Columns of a computation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultMetric {
    Years,
    Revenues,
    Costs,
    Profit,
    Mau,
    Cac,
    Roas,
    Staff,
}

impl ResultMetric {
    pub const ALL: [Self; 8] = [
        Self::Years,
        Self::Revenues,
        Self::Costs,
        Self::Profit,
        Self::Mau,
        Self::Cac,
        Self::Roas,
        Self::Staff,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Years => "years",
            Self::Revenues => "revenues",
            Self::Costs => "costs",
            Self::Profit => "profit",
            Self::Mau => "mau",
            Self::Cac => "cac",
            Self::Roas => "roas",
            Self::Staff => "staff",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "audience" => Some(Self::Mau),
            _ => Self::ALL.into_iter().find(|m| m.key() == key),
        }
    }
}

impl fmt::Display for ResultMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Year-aligned columns returned by the computation service.
///
/// Every column is optional so a missing one surfaces as a chart warning
/// rather than a decode failure. Unknown columns are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComputationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenues: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub costs: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit: Option<Vec<f64>>,
    #[serde(default, alias = "audience", skip_serializing_if = "Option::is_none")]
    pub mau: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cac: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roas: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff: Option<Vec<f64>>,
}

impl ComputationResult {
    #[must_use]
    pub fn column(&self, metric: ResultMetric) -> Option<&[f64]> {
        match metric {
            ResultMetric::Years => self.years.as_deref(),
            ResultMetric::Revenues => self.revenues.as_deref(),
            ResultMetric::Costs => self.costs.as_deref(),
            ResultMetric::Profit => self.profit.as_deref(),
            ResultMetric::Mau => self.mau.as_deref(),
            ResultMetric::Cac => self.cac.as_deref(),
            ResultMetric::Roas => self.roas.as_deref(),
            ResultMetric::Staff => self.staff.as_deref(),
        }
    }

    /// Builder-style column setter, mostly for stubs and tests.
    #[must_use]
    pub fn with_column(mut self, metric: ResultMetric, values: Vec<f64>) -> Self {
        let slot = match metric {
            ResultMetric::Years => &mut self.years,
            ResultMetric::Revenues => &mut self.revenues,
            ResultMetric::Costs => &mut self.costs,
            ResultMetric::Profit => &mut self.profit,
            ResultMetric::Mau => &mut self.mau,
            ResultMetric::Cac => &mut self.cac,
            ResultMetric::Roas => &mut self.roas,
            ResultMetric::Staff => &mut self.staff,
        };
        *slot = Some(values);
        self
    }

    /// Year values, when present.
    #[must_use]
    pub fn years(&self) -> Option<&[f64]> {
        self.years.as_deref()
    }
}

/// Two-valued indicator emitted by the computation service per data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalMarker {
    Green,
    Red,
    #[serde(other)]
    Unknown,
}

impl SignalMarker {
    #[must_use]
    pub const fn from_ok(ok: bool) -> Self {
        if ok { Self::Green } else { Self::Red }
    }
}

/// Raw signal names map to per-year markers; unknown names are kept.
pub type ReasonabilitySignals = BTreeMap<String, Vec<SignalMarker>>;

/// Envelope returned by the computation endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComputationResponse {
    pub results: ComputationResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasonability: Option<ReasonabilitySignals>,
}

impl ComputationResponse {
    #[must_use]
    pub const fn new(results: ComputationResult) -> Self {
        Self {
            results,
            reasonability: None,
        }
    }

    #[must_use]
    pub fn with_signals(mut self, signals: ReasonabilitySignals) -> Self {
        self.reasonability = Some(signals);
        self
    }

    /// Decode a response body.
    ///
    /// Accepts the `{results, reasonability}` envelope or a bare result object.
    /// Signals nested inside `results` are used when the envelope has none.
    ///
    /// # Errors
    ///
    /// Returns the decode error when the body is not an object of number arrays.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(value)
    }

    /// See [`ComputationResponse::from_json`].
    ///
    /// # Errors
    ///
    /// Returns the decode error when the value does not have a result shape.
    pub fn from_value(mut value: Value) -> Result<Self, serde_json::Error> {
        let top_signals = value
            .as_object_mut()
            .and_then(|obj| obj.remove("reasonability"));
        let mut results = match value {
            Value::Object(mut obj) if obj.contains_key("results") => {
                obj.remove("results").unwrap_or(Value::Null)
            }
            other => other,
        };
        let nested_signals = results
            .as_object_mut()
            .and_then(|obj| obj.remove("reasonability"));
        let reasonability = top_signals
            .or(nested_signals)
            .filter(|v| !v.is_null())
            .map(serde_json::from_value::<ReasonabilitySignals>)
            .transpose()?;
        Ok(Self {
            results: serde_json::from_value(results)?,
            reasonability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_envelope_with_signals() {
        let body = r#"{
            "results": {"years": [1, 2], "profit": [-1.0, 2.0], "overall": [1, 3]},
            "reasonability": {"mau": ["green", "red"]}
        }"#;
        let response = ComputationResponse::from_json(body).unwrap();
        assert_eq!(response.results.profit.as_deref(), Some(&[-1.0, 2.0][..]));
        assert_eq!(response.results.years(), Some(&[1.0, 2.0][..]));
        let signals = response.reasonability.unwrap();
        assert_eq!(signals["mau"], vec![SignalMarker::Green, SignalMarker::Red]);
    }

    #[test]
    fn decodes_bare_results_with_nested_signals() {
        let body = r#"{"years": [1], "mau": [10.0], "reasonability": {"cac": ["red"]}}"#;
        let response = ComputationResponse::from_json(body).unwrap();
        assert_eq!(response.results.column(ResultMetric::Mau), Some(&[10.0][..]));
        assert_eq!(
            response.reasonability.unwrap()["cac"],
            vec![SignalMarker::Red]
        );
    }

    #[test]
    fn missing_columns_stay_none() {
        let response = ComputationResponse::from_json(r#"{"results": {"years": [1]}}"#).unwrap();
        assert!(response.results.revenues.is_none());
        assert!(response.reasonability.is_none());
    }

    #[test]
    fn audience_alias_maps_to_mau() {
        let result: ComputationResult = serde_json::from_str(r#"{"audience": [5.0]}"#).unwrap();
        assert_eq!(result.mau, Some(vec![5.0]));
        assert_eq!(ResultMetric::from_key("audience"), Some(ResultMetric::Mau));
    }

    #[test]
    fn unknown_markers_do_not_fail_decode() {
        let signals: ReasonabilitySignals =
            serde_json::from_str(r#"{"x": ["green", "amber"]}"#).unwrap();
        assert_eq!(signals["x"][1], SignalMarker::Unknown);
    }

    #[test]
    fn non_numeric_column_is_a_decode_error() {
        assert!(ComputationResponse::from_json(r#"{"results": {"profit": "lots"}}"#).is_err());
    }

    #[test]
    fn with_column_sets_the_named_column() {
        let result = ComputationResult::default().with_column(ResultMetric::Staff, vec![1.0]);
        assert_eq!(result.column(ResultMetric::Staff), Some(&[1.0][..]));
        assert!(result.column(ResultMetric::Roas).is_none());
    }
}
