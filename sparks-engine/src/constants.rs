//! Centralized reference constants for the scenario engine.
//!
//! Chart thresholds listed here are the defaults for [`crate::config::ChartConfig`];
//! deployments override them through the simulator configuration file.

// Year axis ------------------------------------------------------------------
pub const YEAR_COUNT: usize = 14;
pub const FIRST_YEAR: u32 = 1;

/// Half a year on either side of an integer year: bands for an interval
/// `[a, b]` span `[a - 0.5, b + 0.5]` so neighbouring phases meet at `x.5`.
pub const BAND_HALF_WIDTH: f64 = 0.5;

// Scale factors --------------------------------------------------------------
pub const BASELINE_MULTIPLIER: f64 = 1.0;

// Display unit factors -------------------------------------------------------
pub const UNIT_MILLIONS: f64 = 1e-6;
pub const UNIT_PERCENT: f64 = 100.0;
pub const UNIT_IDENTITY: f64 = 1.0;

// Result chart defaults ------------------------------------------------------
pub const DEFAULT_SUSTAINABILITY_THRESHOLD: f64 = 5_000_000.0;
pub const DEFAULT_SALARY_PER_HEAD: f64 = 95_000.0;
pub const DEFAULT_CAC_GREEN_MAX: f64 = 100.0;
pub const DEFAULT_CAC_YELLOW_MAX: f64 = 200.0;
pub const DEFAULT_ROAS_YELLOW_MIN: f64 = 0.5;
pub const DEFAULT_ROAS_GREEN_MIN: f64 = 1.0;

/// Segment split ratios must add up to one within this tolerance.
pub const SPLIT_TOLERANCE: f64 = 1e-6;

// Styling ----------------------------------------------------------------------
pub const BAND_OPACITY: f64 = 0.15;
pub const FILL_OPACITY: f64 = 0.35;
/// Open-ended bands are drawn up to the series maximum times this factor.
pub const CHART_HEADROOM: f64 = 1.15;

// Endpoints --------------------------------------------------------------------
pub const NAME_PLACEHOLDER: &str = "{name}";
pub const DEFAULT_COMPUTE_ENDPOINT: &str = "/run_model";
pub const DEFAULT_SAVE_ENDPOINT: &str = "/save_scenario/{name}";
pub const DEFAULT_LOAD_ENDPOINT: &str = "/load_scenario/{name}";
pub const DEFAULT_LIST_ENDPOINT: &str = "/list_scenarios";
