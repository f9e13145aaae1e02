//! Reasonability classification of driver values.
use serde::{Deserialize, Serialize};

use crate::catalog::BaselineCatalog;
use crate::metric::Metric;

/// Outcome of checking a value against a metric's range.
///
/// `Unclassified` means the metric has no range: render no band, and do not
/// read it as out of range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Classification {
    Classified {
        in_range: bool,
        range_low: f64,
        range_high: f64,
    },
    Unclassified,
}

impl Classification {
    #[must_use]
    pub const fn is_out_of_range(&self) -> bool {
        matches!(self, Self::Classified { in_range: false, .. })
    }
}

/// Classify `value` for `metric` in `year`.
#[must_use]
pub fn classify(
    catalog: &BaselineCatalog,
    metric: Metric,
    year: u32,
    value: f64,
) -> Classification {
    catalog
        .range(metric)
        .and_then(|range| range.bounds_for(year))
        .map_or(Classification::Unclassified, |bounds| {
            Classification::Classified {
                in_range: bounds.contains(value),
                range_low: bounds.low,
                range_high: bounds.high,
            }
        })
}

/// Classify an aligned `(year, value)` series.
#[must_use]
pub fn classify_series(
    catalog: &BaselineCatalog,
    metric: Metric,
    years: &[u32],
    values: &[f64],
) -> Vec<Classification> {
    years
        .iter()
        .zip(values)
        .map(|(year, value)| classify(catalog, metric, *year, *value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_range_is_inclusive() {
        let catalog = BaselineCatalog::reference();
        let at_low = classify(catalog, Metric::Staffing, 5, 10.0);
        let at_high = classify(catalog, Metric::Staffing, 5, 120.0);
        let above = classify(catalog, Metric::Staffing, 5, 120.5);
        assert!(matches!(at_low, Classification::Classified { in_range: true, .. }));
        assert!(matches!(at_high, Classification::Classified { in_range: true, .. }));
        assert!(above.is_out_of_range());
    }

    #[test]
    fn unranged_metrics_are_unclassified() {
        let catalog = BaselineCatalog::reference();
        for metric in [
            Metric::MarketingSpend,
            Metric::EventYield,
            Metric::ContentCost,
        ] {
            let result = classify(catalog, metric, 3, 1e12);
            assert_eq!(result, Classification::Unclassified);
            assert!(!result.is_out_of_range());
        }
    }

    #[test]
    fn audience_phase_changes_at_year_four() {
        let catalog = BaselineCatalog::reference();
        // 450k is fine in phase 1, fine in phase 2, too low in phase 3.
        assert!(!classify(catalog, Metric::AudienceGrowth, 3, 450_000.0).is_out_of_range());
        assert!(!classify(catalog, Metric::AudienceGrowth, 4, 450_000.0).is_out_of_range());
        assert!(classify(catalog, Metric::AudienceGrowth, 7, 450_000.0).is_out_of_range());
        // 600k is too high in phase 1.
        assert!(classify(catalog, Metric::AudienceGrowth, 3, 600_000.0).is_out_of_range());
    }

    #[test]
    fn every_year_maps_to_exactly_one_phase() {
        let catalog = BaselineCatalog::reference();
        let Some(crate::catalog::ReasonabilityRange::Phased(phases)) =
            catalog.range(Metric::AudienceGrowth)
        else {
            panic!("audience growth should be phased");
        };
        for year in catalog.years().iter() {
            let hits = phases.iter().filter(|p| p.contains_year(year)).count();
            assert_eq!(hits, 1, "year {year} matched {hits} phases");
        }
    }

    #[test]
    fn reports_bounds_for_the_year() {
        let catalog = BaselineCatalog::reference();
        let Classification::Classified {
            range_low,
            range_high,
            ..
        } = classify(catalog, Metric::AudienceGrowth, 5, 1.0)
        else {
            panic!("expected classification");
        };
        assert_eq!((range_low, range_high), (400_000.0, 2_000_000.0));
    }

    #[test]
    fn series_classification_is_aligned() {
        let catalog = BaselineCatalog::reference();
        let years: Vec<u32> = catalog.years().iter().collect();
        let values = catalog.baseline(Metric::Staffing).values();
        let classes = classify_series(catalog, Metric::Staffing, &years, values);
        assert_eq!(classes.len(), years.len());
        assert!(classes.iter().all(|c| !c.is_out_of_range()));
    }
}
