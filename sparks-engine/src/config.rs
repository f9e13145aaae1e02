//! Simulator configuration: collaborator endpoints and result chart constants.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_CAC_GREEN_MAX, DEFAULT_CAC_YELLOW_MAX, DEFAULT_COMPUTE_ENDPOINT,
    DEFAULT_LIST_ENDPOINT, DEFAULT_LOAD_ENDPOINT, DEFAULT_ROAS_GREEN_MIN,
    DEFAULT_ROAS_YELLOW_MIN, DEFAULT_SALARY_PER_HEAD, DEFAULT_SAVE_ENDPOINT,
    DEFAULT_SUSTAINABILITY_THRESHOLD, NAME_PLACEHOLDER, SPLIT_TOLERANCE,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid simulator config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{split} split ratios sum to {sum}, expected 1")]
    SplitSum { split: &'static str, sum: f64 },
    #[error("{split} split has an invalid ratio for `{label}`")]
    SplitRatio { split: &'static str, label: String },
    #[error("{name} must be positive and finite, got {value}")]
    Threshold { name: &'static str, value: f64 },
    #[error("{name} bands out of order: {low} > {high}")]
    BandOrder {
        name: &'static str,
        low: f64,
        high: f64,
    },
    #[error("{name} endpoint `{template}` must contain {placeholder}")]
    EndpointPlaceholder {
        name: &'static str,
        template: String,
        placeholder: &'static str,
    },
    #[error("{name} endpoint is empty")]
    EmptyEndpoint { name: &'static str },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulatorConfig {
    #[serde(default)]
    pub endpoints: EndpointConfig,
    #[serde(default)]
    pub charts: ChartConfig,
}

impl SimulatorConfig {
    #[must_use]
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Decode and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document does not decode or fails validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoints.validate()?;
        self.charts.validate()
    }
}

/// Paths of the computation service and scenario store.
///
/// `save` and `load` are templates containing `{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_compute")]
    pub compute: String,
    #[serde(default = "default_save")]
    pub save: String,
    #[serde(default = "default_load")]
    pub load: String,
    #[serde(default = "default_list")]
    pub list: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            compute: default_compute(),
            save: default_save(),
            load: default_load(),
            list: default_list(),
        }
    }
}

impl EndpointConfig {
    /// Substitute an already URL-encoded scenario name into a template.
    #[must_use]
    pub fn scenario_path(template: &str, encoded_name: &str) -> String {
        template.replace(NAME_PLACEHOLDER, encoded_name)
    }

    #[must_use]
    pub fn save_path(&self, encoded_name: &str) -> String {
        Self::scenario_path(&self.save, encoded_name)
    }

    #[must_use]
    pub fn load_path(&self, encoded_name: &str) -> String {
        Self::scenario_path(&self.load, encoded_name)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("compute", &self.compute), ("list", &self.list)] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyEndpoint { name });
            }
        }
        for (name, template) in [("save", &self.save), ("load", &self.load)] {
            if !template.contains(NAME_PLACEHOLDER) {
                return Err(ConfigError::EndpointPlaceholder {
                    name,
                    template: template.clone(),
                    placeholder: NAME_PLACEHOLDER,
                });
            }
        }
        Ok(())
    }
}

/// One segment of a fixed-ratio stacked breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentShare {
    pub label: String,
    pub ratio: f64,
}

impl SegmentShare {
    #[must_use]
    pub fn new(label: impl Into<String>, ratio: f64) -> Self {
        Self {
            label: label.into(),
            ratio,
        }
    }
}

/// Green band `[0, green_max]`, yellow band `(green_max, yellow_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CacBands {
    pub green_max: f64,
    pub yellow_max: f64,
}

impl Default for CacBands {
    fn default() -> Self {
        Self {
            green_max: DEFAULT_CAC_GREEN_MAX,
            yellow_max: DEFAULT_CAC_YELLOW_MAX,
        }
    }
}

/// Yellow band `[yellow_min, green_min)`, green band from `green_min` up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoasBands {
    pub yellow_min: f64,
    pub green_min: f64,
}

impl Default for RoasBands {
    fn default() -> Self {
        Self {
            yellow_min: DEFAULT_ROAS_YELLOW_MIN,
            green_min: DEFAULT_ROAS_GREEN_MIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_threshold")]
    pub sustainability_threshold: f64,
    #[serde(default = "default_salary")]
    pub salary_per_head: f64,
    #[serde(default)]
    pub cac: CacBands,
    #[serde(default)]
    pub roas: RoasBands,
    #[serde(default = "default_revenue_split")]
    pub revenue_split: Vec<SegmentShare>,
    #[serde(default = "default_cost_split")]
    pub cost_split: Vec<SegmentShare>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            sustainability_threshold: default_threshold(),
            salary_per_head: default_salary(),
            cac: CacBands::default(),
            roas: RoasBands::default(),
            revenue_split: default_revenue_split(),
            cost_split: default_cost_split(),
        }
    }
}

impl ChartConfig {
    /// # Errors
    ///
    /// Returns the first inconsistent threshold, band or split.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // The threshold may legitimately be zero or negative (break-even views).
        if !self.sustainability_threshold.is_finite() {
            return Err(ConfigError::Threshold {
                name: "sustainability_threshold",
                value: self.sustainability_threshold,
            });
        }
        if !(self.salary_per_head.is_finite() && self.salary_per_head > 0.0) {
            return Err(ConfigError::Threshold {
                name: "salary_per_head",
                value: self.salary_per_head,
            });
        }
        check_order("cac", 0.0, self.cac.green_max)?;
        check_order("cac", self.cac.green_max, self.cac.yellow_max)?;
        check_order("roas", 0.0, self.roas.yellow_min)?;
        check_order("roas", self.roas.yellow_min, self.roas.green_min)?;
        check_split("revenue", &self.revenue_split)?;
        check_split("cost", &self.cost_split)
    }
}

fn check_order(name: &'static str, low: f64, high: f64) -> Result<(), ConfigError> {
    if low.is_finite() && high.is_finite() && low <= high {
        Ok(())
    } else {
        Err(ConfigError::BandOrder { name, low, high })
    }
}

fn check_split(split: &'static str, shares: &[SegmentShare]) -> Result<(), ConfigError> {
    if let Some(bad) = shares
        .iter()
        .find(|s| !(s.ratio.is_finite() && s.ratio >= 0.0))
    {
        return Err(ConfigError::SplitRatio {
            split,
            label: bad.label.clone(),
        });
    }
    let sum: f64 = shares.iter().map(|s| s.ratio).sum();
    if (sum - 1.0).abs() > SPLIT_TOLERANCE {
        return Err(ConfigError::SplitSum { split, sum });
    }
    Ok(())
}

fn default_compute() -> String {
    DEFAULT_COMPUTE_ENDPOINT.to_string()
}

fn default_save() -> String {
    DEFAULT_SAVE_ENDPOINT.to_string()
}

fn default_load() -> String {
    DEFAULT_LOAD_ENDPOINT.to_string()
}

fn default_list() -> String {
    DEFAULT_LIST_ENDPOINT.to_string()
}

fn default_threshold() -> f64 {
    DEFAULT_SUSTAINABILITY_THRESHOLD
}

fn default_salary() -> f64 {
    DEFAULT_SALARY_PER_HEAD
}

fn default_revenue_split() -> Vec<SegmentShare> {
    vec![
        SegmentShare::new("Game", 0.60),
        SegmentShare::new("Courses", 0.25),
        SegmentShare::new("XR Events", 0.15),
    ]
}

fn default_cost_split() -> Vec<SegmentShare> {
    vec![
        SegmentShare::new("Salaries", 0.35),
        SegmentShare::new("Marketing", 0.40),
        SegmentShare::new("Services & Hardware", 0.15),
        SegmentShare::new("Content", 0.10),
    ]
}
