//! Baseline trajectories and reasonability ranges for the eight input drivers.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::{FIRST_YEAR, YEAR_COUNT};
use crate::error::ScenarioError;
use crate::metric::Metric;

/// Phase tables are at most three entries in practice.
pub type PhaseTable = SmallVec<[PhaseRange; 3]>;

/// Consecutive years `1..=N` shared by every series of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearIndex {
    last: u32,
}

impl YearIndex {
    #[must_use]
    pub const fn new(last: u32) -> Self {
        Self { last }
    }

    #[must_use]
    pub const fn first(self) -> u32 {
        FIRST_YEAR
    }

    #[must_use]
    pub const fn last(self) -> u32 {
        self.last
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.last as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.last < FIRST_YEAR
    }

    pub fn iter(self) -> impl Iterator<Item = u32> {
        FIRST_YEAR..=self.last
    }

    /// Year values as chart x coordinates.
    #[must_use]
    pub fn to_axis(self) -> Vec<f64> {
        self.iter().map(f64::from).collect()
    }
}

/// Unscaled reference values, one per year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaselineTrajectory(Vec<f64>);

impl BaselineTrajectory {
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value for a 1-based year.
    #[must_use]
    pub fn at_year(&self, year: u32) -> Option<f64> {
        let idx = usize::try_from(year.checked_sub(FIRST_YEAR)?).ok()?;
        self.0.get(idx).copied()
    }
}

/// Inclusive acceptable interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub low: f64,
    pub high: f64,
}

impl Bounds {
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.low * factor, self.high * factor)
    }
}

/// Bounds that apply to a closed interval of years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseRange {
    pub first_year: u32,
    /// `None` keeps the phase open through the last projected year.
    #[serde(default)]
    pub last_year: Option<u32>,
    pub bounds: Bounds,
}

impl PhaseRange {
    #[must_use]
    pub const fn closed(first_year: u32, last_year: u32, bounds: Bounds) -> Self {
        Self {
            first_year,
            last_year: Some(last_year),
            bounds,
        }
    }

    #[must_use]
    pub const fn open(first_year: u32, bounds: Bounds) -> Self {
        Self {
            first_year,
            last_year: None,
            bounds,
        }
    }

    #[must_use]
    pub fn contains_year(&self, year: u32) -> bool {
        year >= self.first_year && self.last_year.is_none_or(|last| year <= last)
    }
}

/// A year interval clipped to a chart extent, with its bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeInterval {
    pub first_year: u32,
    pub last_year: u32,
    pub bounds: Bounds,
}

/// Acceptable range for a metric: constant or phase-dependent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonabilityRange {
    Constant(Bounds),
    Phased(PhaseTable),
}

impl ReasonabilityRange {
    /// Bounds in force for `year`.
    ///
    /// Years past the final phase use the final phase; years before the first
    /// phase use the first one.
    #[must_use]
    pub fn bounds_for(&self, year: u32) -> Option<Bounds> {
        match self {
            Self::Constant(bounds) => Some(*bounds),
            Self::Phased(phases) => {
                let first = phases.first()?;
                phases
                    .iter()
                    .find(|phase| phase.contains_year(year))
                    .or_else(|| {
                        if year < first.first_year {
                            Some(first)
                        } else {
                            phases.last()
                        }
                    })
                    .map(|phase| phase.bounds)
            }
        }
    }

    /// Intervals overlapping `[first_year, last_year]`, clipped to it.
    ///
    /// A constant range yields a single interval spanning the extent. The
    /// final phase always stretches to `last_year`.
    #[must_use]
    pub fn intervals(&self, first_year: u32, last_year: u32) -> Vec<RangeInterval> {
        if last_year < first_year {
            return Vec::new();
        }
        match self {
            Self::Constant(bounds) => vec![RangeInterval {
                first_year,
                last_year,
                bounds: *bounds,
            }],
            Self::Phased(phases) => {
                let final_idx = phases.len().saturating_sub(1);
                phases
                    .iter()
                    .enumerate()
                    .filter_map(|(idx, phase)| {
                        let phase_last = if idx == final_idx {
                            last_year
                        } else {
                            phase.last_year.unwrap_or(last_year)
                        };
                        let start = phase.first_year.max(first_year);
                        let end = phase_last.min(last_year);
                        (start <= end).then_some(RangeInterval {
                            first_year: start,
                            last_year: end,
                            bounds: phase.bounds,
                        })
                    })
                    .collect()
            }
        }
    }

    fn all_bounds(&self) -> Vec<Bounds> {
        match self {
            Self::Constant(bounds) => vec![*bounds],
            Self::Phased(phases) => phases.iter().map(|p| p.bounds).collect(),
        }
    }
}

/// Baseline plus optional range for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricProfile {
    pub baseline: BaselineTrajectory,
    #[serde(default)]
    pub range: Option<ReasonabilityRange>,
}

/// Errors raised when catalog invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("{metric} baseline has {actual} values, expected {expected}")]
    BaselineLength {
        metric: Metric,
        expected: usize,
        actual: usize,
    },
    #[error("{metric} baseline value for year {year} is not finite")]
    NonFiniteBaseline { metric: Metric, year: u32 },
    #[error("{metric} range bounds invalid (low {low}, high {high})")]
    InvalidBounds { metric: Metric, low: f64, high: f64 },
    #[error("{metric} phase table is empty")]
    EmptyPhases { metric: Metric },
    #[error("{metric} phases leave a gap or overlap at year {year}")]
    PhaseDiscontinuity { metric: Metric, year: u32 },
    #[error("{metric} phases stop at year {last}, before year {expected}")]
    PhaseCoverage {
        metric: Metric,
        last: u32,
        expected: u32,
    },
    #[error("year index must contain at least one year")]
    EmptyYearIndex,
}

/// Process-wide reference data for the business model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineCatalog {
    years: YearIndex,
    profiles: [MetricProfile; Metric::COUNT],
}

static REFERENCE: OnceLock<BaselineCatalog> = OnceLock::new();

impl BaselineCatalog {
    /// Build and validate a catalog from explicit profiles (ordered as [`Metric::ALL`]).
    ///
    /// # Errors
    ///
    /// Returns an error if any baseline or range breaks the catalog invariants.
    pub fn from_profiles(
        years: YearIndex,
        profiles: [MetricProfile; Metric::COUNT],
    ) -> Result<Self, CatalogError> {
        let catalog = Self { years, profiles };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Shared reference catalog, built on first use.
    #[must_use]
    pub fn reference() -> &'static Self {
        REFERENCE.get_or_init(Self::reference_data)
    }

    #[must_use]
    pub const fn years(&self) -> YearIndex {
        self.years
    }

    #[must_use]
    pub fn profile(&self, metric: Metric) -> &MetricProfile {
        &self.profiles[metric.index()]
    }

    #[must_use]
    pub fn baseline(&self, metric: Metric) -> &BaselineTrajectory {
        &self.profile(metric).baseline
    }

    #[must_use]
    pub fn range(&self, metric: Metric) -> Option<&ReasonabilityRange> {
        self.profile(metric).range.as_ref()
    }

    /// Look up a baseline by any accepted metric key.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::UnknownMetric`] for keys outside the metric set.
    pub fn baseline_for(&self, key: &str) -> Result<&BaselineTrajectory, ScenarioError> {
        let metric: Metric = key.parse()?;
        Ok(self.baseline(metric))
    }

    /// Look up a range by any accepted metric key.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::UnknownMetric`] for keys outside the metric set.
    pub fn range_for(&self, key: &str) -> Result<Option<&ReasonabilityRange>, ScenarioError> {
        let metric: Metric = key.parse()?;
        Ok(self.range(metric))
    }

    /// Check every baseline and range against the year index.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.years.is_empty() {
            return Err(CatalogError::EmptyYearIndex);
        }
        for metric in Metric::ALL {
            let profile = self.profile(metric);
            validate_baseline(metric, &profile.baseline, self.years)?;
            if let Some(range) = &profile.range {
                validate_range(metric, range, self.years)?;
            }
        }
        Ok(())
    }

    fn reference_data() -> Self {
        let years = YearIndex::new(u32::try_from(YEAR_COUNT).unwrap_or(u32::MAX));
        let profiles = Metric::ALL.map(|metric| MetricProfile {
            baseline: BaselineTrajectory::new(reference_baseline(metric).to_vec()),
            range: reference_range(metric),
        });
        Self { years, profiles }
    }
}

fn validate_baseline(
    metric: Metric,
    baseline: &BaselineTrajectory,
    years: YearIndex,
) -> Result<(), CatalogError> {
    if baseline.len() != years.len() {
        return Err(CatalogError::BaselineLength {
            metric,
            expected: years.len(),
            actual: baseline.len(),
        });
    }
    for (year, value) in years.iter().zip(baseline.values()) {
        if !value.is_finite() {
            return Err(CatalogError::NonFiniteBaseline { metric, year });
        }
    }
    Ok(())
}

fn validate_range(
    metric: Metric,
    range: &ReasonabilityRange,
    years: YearIndex,
) -> Result<(), CatalogError> {
    for bounds in range.all_bounds() {
        if !bounds.low.is_finite() || !bounds.high.is_finite() || bounds.low > bounds.high {
            return Err(CatalogError::InvalidBounds {
                metric,
                low: bounds.low,
                high: bounds.high,
            });
        }
    }
    let ReasonabilityRange::Phased(phases) = range else {
        return Ok(());
    };
    if phases.is_empty() {
        return Err(CatalogError::EmptyPhases { metric });
    }
    let mut expected_start = years.first();
    for (idx, phase) in phases.iter().enumerate() {
        if phase.first_year != expected_start {
            return Err(CatalogError::PhaseDiscontinuity {
                metric,
                year: expected_start,
            });
        }
        match phase.last_year {
            None if idx + 1 < phases.len() => {
                return Err(CatalogError::PhaseDiscontinuity {
                    metric,
                    year: phase.first_year,
                });
            }
            None => return Ok(()),
            Some(last) if last < phase.first_year => {
                return Err(CatalogError::PhaseDiscontinuity {
                    metric,
                    year: phase.first_year,
                });
            }
            Some(last) => expected_start = last + 1,
        }
    }
    let covered = expected_start - 1;
    if covered < years.last() {
        return Err(CatalogError::PhaseCoverage {
            metric,
            last: covered,
            expected: years.last(),
        });
    }
    Ok(())
}

fn reference_baseline(metric: Metric) -> &'static [f64; YEAR_COUNT] {
    match metric {
        Metric::AudienceGrowth => &[
            0.0,
            60_000.0,
            300_000.0,
            600_000.0,
            1_200_000.0,
            1_600_000.0,
            2_000_000.0,
            2_000_000.0,
            2_000_000.0,
            2_000_000.0,
            2_000_000.0,
            2_000_000.0,
            2_000_000.0,
            2_000_000.0,
        ],
        Metric::GameConversion => &[
            0.01, 0.01, 0.01, 0.02, 0.02, 0.03, 0.03, 0.03, 0.03, 0.03, 0.03, 0.03, 0.03, 0.03,
        ],
        Metric::CourseConversion => &[
            0.001, 0.001, 0.0015, 0.002, 0.0025, 0.003, 0.0035, 0.004, 0.0045, 0.005, 0.005,
            0.005, 0.005, 0.005,
        ],
        // Publicity curve plus the fixed events, sponsors and travel block.
        Metric::MarketingSpend => &[
            620_000.0,
            1_570_000.0,
            5_570_000.0,
            15_570_000.0,
            25_570_000.0,
            35_570_000.0,
            35_570_000.0,
            35_570_000.0,
            35_570_000.0,
            35_570_000.0,
            35_570_000.0,
            35_570_000.0,
            35_570_000.0,
            35_570_000.0,
        ],
        Metric::EventYield => &[
            0.0,
            10_000.0,
            94_000.0,
            382_000.0,
            1_340_000.0,
            1_820_000.0,
            2_240_000.0,
            2_240_000.0,
            2_240_000.0,
            2_240_000.0,
            2_240_000.0,
            2_240_000.0,
            2_240_000.0,
            2_240_000.0,
        ],
        Metric::ContentCost => &[
            160_000.0,
            800_000.0,
            2_000_000.0,
            4_000_000.0,
            7_000_000.0,
            7_000_000.0,
            7_000_000.0,
            7_000_000.0,
            7_000_000.0,
            7_000_000.0,
            7_000_000.0,
            7_000_000.0,
            7_000_000.0,
            7_000_000.0,
        ],
        Metric::Staffing => &[
            14.0, 23.0, 39.0, 54.0, 70.0, 70.0, 70.0, 70.0, 70.0, 70.0, 70.0, 70.0, 70.0, 70.0,
        ],
        Metric::ServiceHardwareCoefficient => &[
            3.0, 2.5, 2.0, 2.0, 1.5, 1.5, 1.5, 1.5, 1.5, 1.5, 1.5, 1.5, 1.5, 1.5,
        ],
    }
}

fn reference_range(metric: Metric) -> Option<ReasonabilityRange> {
    match metric {
        Metric::AudienceGrowth => Some(ReasonabilityRange::Phased(smallvec::smallvec![
            PhaseRange::closed(1, 3, Bounds::new(0.0, 500_000.0)),
            PhaseRange::closed(4, 6, Bounds::new(400_000.0, 2_000_000.0)),
            PhaseRange::open(7, Bounds::new(1_500_000.0, 2_500_000.0)),
        ])),
        Metric::GameConversion => Some(ReasonabilityRange::Constant(Bounds::new(0.005, 0.05))),
        Metric::CourseConversion => {
            Some(ReasonabilityRange::Constant(Bounds::new(0.0005, 0.008)))
        }
        Metric::Staffing => Some(ReasonabilityRange::Constant(Bounds::new(10.0, 120.0))),
        Metric::ServiceHardwareCoefficient => {
            Some(ReasonabilityRange::Constant(Bounds::new(1.0, 3.5)))
        }
        Metric::MarketingSpend | Metric::EventYield | Metric::ContentCost => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audience_range() -> ReasonabilityRange {
        BaselineCatalog::reference()
            .range(Metric::AudienceGrowth)
            .cloned()
            .expect("audience growth is phased")
    }

    #[test]
    fn reference_catalog_is_valid() {
        let catalog = BaselineCatalog::reference();
        catalog.validate().unwrap();
        assert_eq!(catalog.years().len(), YEAR_COUNT);
        for metric in Metric::ALL {
            assert_eq!(catalog.baseline(metric).len(), YEAR_COUNT);
        }
    }

    #[test]
    fn unranged_metrics_have_no_range() {
        let catalog = BaselineCatalog::reference();
        assert!(catalog.range(Metric::MarketingSpend).is_none());
        assert!(catalog.range(Metric::EventYield).is_none());
        assert!(catalog.range(Metric::ContentCost).is_none());
        assert!(catalog.range(Metric::Staffing).is_some());
    }

    #[test]
    fn lookup_by_key_rejects_unknown_metrics() {
        let catalog = BaselineCatalog::reference();
        assert!(catalog.baseline_for("staff_scale").is_ok());
        assert_eq!(
            catalog.range_for("revenue_scale").unwrap_err(),
            ScenarioError::UnknownMetric("revenue_scale".into())
        );
    }

    #[test]
    fn phase_boundaries_split_years() {
        let range = audience_range();
        assert_eq!(range.bounds_for(3).unwrap().high, 500_000.0);
        assert_eq!(range.bounds_for(4).unwrap().low, 400_000.0);
        assert_eq!(range.bounds_for(6).unwrap().high, 2_000_000.0);
        assert_eq!(range.bounds_for(7).unwrap().low, 1_500_000.0);
    }

    #[test]
    fn years_past_last_phase_use_last_phase() {
        let range = audience_range();
        assert_eq!(range.bounds_for(40), range.bounds_for(7));
        assert_eq!(range.bounds_for(0), range.bounds_for(1));
    }

    #[test]
    fn intervals_clip_to_extent() {
        let range = audience_range();
        let intervals = range.intervals(1, 14);
        assert_eq!(intervals.len(), 3);
        assert_eq!((intervals[0].first_year, intervals[0].last_year), (1, 3));
        assert_eq!((intervals[1].first_year, intervals[1].last_year), (4, 6));
        assert_eq!((intervals[2].first_year, intervals[2].last_year), (7, 14));

        let short = range.intervals(1, 5);
        assert_eq!(short.len(), 2);
        assert_eq!(short[1].last_year, 5);
    }

    #[test]
    fn closed_final_phase_still_reaches_extent() {
        let range = ReasonabilityRange::Phased(smallvec::smallvec![
            PhaseRange::closed(1, 2, Bounds::new(0.0, 1.0)),
            PhaseRange::closed(3, 4, Bounds::new(1.0, 2.0)),
        ]);
        let intervals = range.intervals(1, 6);
        assert_eq!(intervals.last().unwrap().last_year, 6);
        assert_eq!(range.bounds_for(6).unwrap().low, 1.0);
    }

    #[test]
    fn validation_rejects_short_baseline() {
        let mut profiles = BaselineCatalog::reference().profiles.clone();
        profiles[Metric::Staffing.index()].baseline = BaselineTrajectory::new(vec![1.0; 3]);
        let err = BaselineCatalog::from_profiles(YearIndex::new(14), profiles).unwrap_err();
        assert_eq!(
            err,
            CatalogError::BaselineLength {
                metric: Metric::Staffing,
                expected: 14,
                actual: 3
            }
        );
    }

    #[test]
    fn validation_rejects_phase_gap() {
        let mut profiles = BaselineCatalog::reference().profiles.clone();
        profiles[Metric::AudienceGrowth.index()].range =
            Some(ReasonabilityRange::Phased(smallvec::smallvec![
                PhaseRange::closed(1, 3, Bounds::new(0.0, 1.0)),
                PhaseRange::open(5, Bounds::new(0.0, 1.0)),
            ]));
        let err = BaselineCatalog::from_profiles(YearIndex::new(14), profiles).unwrap_err();
        assert_eq!(
            err,
            CatalogError::PhaseDiscontinuity {
                metric: Metric::AudienceGrowth,
                year: 4
            }
        );
    }

    #[test]
    fn validation_rejects_short_phase_coverage() {
        let mut profiles = BaselineCatalog::reference().profiles.clone();
        profiles[Metric::AudienceGrowth.index()].range =
            Some(ReasonabilityRange::Phased(smallvec::smallvec![
                PhaseRange::closed(1, 3, Bounds::new(0.0, 1.0)),
                PhaseRange::closed(4, 10, Bounds::new(0.0, 1.0)),
            ]));
        let err = BaselineCatalog::from_profiles(YearIndex::new(14), profiles).unwrap_err();
        assert!(matches!(err, CatalogError::PhaseCoverage { last: 10, .. }));
    }

    #[test]
    fn validation_rejects_inverted_bounds() {
        let mut profiles = BaselineCatalog::reference().profiles.clone();
        profiles[Metric::Staffing.index()].range =
            Some(ReasonabilityRange::Constant(Bounds::new(5.0, 1.0)));
        let err = BaselineCatalog::from_profiles(YearIndex::new(14), profiles).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidBounds { .. }));
    }

    #[test]
    fn baseline_at_year_is_one_based() {
        let baseline = BaselineCatalog::reference().baseline(Metric::Staffing);
        assert_eq!(baseline.at_year(1), Some(14.0));
        assert_eq!(baseline.at_year(0), None);
        assert_eq!(baseline.at_year(15), None);
    }
}
