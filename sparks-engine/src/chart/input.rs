//! Input-driver charts: dotted baseline, solid scaled series, reasonability bands.
use super::{BandSpec, ChartId, ChartSpec, LineDash, SeriesSpec, Tone};
use crate::catalog::{BaselineCatalog, ReasonabilityRange};
use crate::classifier::{Classification, classify_series};
use crate::constants::{BAND_HALF_WIDTH, BAND_OPACITY};
use crate::error::ScenarioError;
use crate::inputs::ScaleInputSet;
use crate::metric::Metric;
use crate::projector::{project, scaled_raw};

pub const BASELINE_SERIES: &str = "Baseline (1.00x)";
const BAND_LABEL: &str = "Reasonable range";

/// Legend label of the scaled series.
#[must_use]
pub fn scaled_label(scale: f64) -> String {
    format!("Scaled ({scale:.2}x)")
}

/// Chart for one input metric at the multiplier found in `inputs`.
///
/// # Errors
///
/// Returns [`ScenarioError::MissingScaleFactor`] if `inputs` lacks `metric`.
pub fn build_input_chart(
    catalog: &BaselineCatalog,
    metric: Metric,
    inputs: &ScaleInputSet,
) -> Result<ChartSpec, ScenarioError> {
    let unit = metric.unit_factor();
    let projected = project(catalog, metric, inputs, unit)?;
    let raw = scaled_raw(catalog, metric, inputs)?;
    let x: Vec<f64> = projected.years.iter().copied().map(f64::from).collect();

    let tones: Vec<Tone> = classify_series(catalog, metric, &projected.years, &raw)
        .into_iter()
        .filter_map(|c| match c {
            Classification::Classified { in_range, .. } => {
                Some(if in_range { Tone::Green } else { Tone::Red })
            }
            Classification::Unclassified => None,
        })
        .collect();

    let mut spec = ChartSpec::new(ChartId::Input(metric), metric.label(), metric.unit_label());
    spec.series.push(
        SeriesSpec::line(BASELINE_SERIES, x.clone(), projected.baseline)
            .dashed(LineDash::Dot)
            .toned(Tone::Baseline),
    );
    spec.series.push(
        SeriesSpec::line(scaled_label(projected.scale), x, projected.scaled)
            .toned(Tone::Scaled)
            .with_point_tones(tones),
    );
    if let Some(range) = catalog.range(metric) {
        let years = catalog.years();
        spec.bands = range_bands(range, years.first(), years.last(), unit);
    }
    Ok(spec)
}

/// One chart per metric, in control order.
///
/// # Errors
///
/// Fails on the first metric missing from `inputs`.
pub fn build_input_charts(
    catalog: &BaselineCatalog,
    inputs: &ScaleInputSet,
) -> Result<Vec<ChartSpec>, ScenarioError> {
    Metric::ALL
        .into_iter()
        .map(|metric| build_input_chart(catalog, metric, inputs))
        .collect()
}

/// Bands for every interval overlapping `[first_year, last_year]`.
///
/// Interval `[a, b]` spans `x ∈ [a - 0.5, b + 0.5]`; y bounds are scaled by `unit`.
#[must_use]
pub fn range_bands(
    range: &ReasonabilityRange,
    first_year: u32,
    last_year: u32,
    unit: f64,
) -> Vec<BandSpec> {
    range
        .intervals(first_year, last_year)
        .into_iter()
        .map(|interval| {
            let bounds = interval.bounds.scaled(unit);
            BandSpec {
                x0: f64::from(interval.first_year) - BAND_HALF_WIDTH,
                x1: f64::from(interval.last_year) + BAND_HALF_WIDTH,
                y0: bounds.low,
                y1: bounds.high,
                tone: Tone::Green,
                opacity: BAND_OPACITY,
                label: Some(BAND_LABEL.to_string()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(metric: Metric, scale: f64) -> ChartSpec {
        let inputs = ScaleInputSet::baseline().with(metric, scale);
        build_input_chart(BaselineCatalog::reference(), metric, &inputs).unwrap()
    }

    #[test]
    fn baseline_is_dotted_and_scaled_is_solid() {
        let spec = chart(Metric::ContentCost, 1.25);
        let baseline = spec.series_named(BASELINE_SERIES).unwrap();
        let scaled = spec.series_named("Scaled (1.25x)").unwrap();
        assert_eq!(baseline.dash, LineDash::Dot);
        assert_eq!(scaled.dash, LineDash::Solid);
        assert_eq!(baseline.x, scaled.x);
    }

    #[test]
    fn values_are_in_display_units() {
        let spec = chart(Metric::AudienceGrowth, 1.0);
        let scaled = &spec.series[1];
        assert!((scaled.y[6] - 2.0).abs() < 1e-12, "2M users shown as 2.0");
        let conversion = chart(Metric::GameConversion, 1.0);
        assert!((conversion.series[1].y[0] - 1.0).abs() < 1e-12, "0.01 shown as 1%");
    }

    #[test]
    fn unranged_metric_has_no_band_or_tones() {
        for metric in [
            Metric::MarketingSpend,
            Metric::EventYield,
            Metric::ContentCost,
        ] {
            let spec = chart(metric, 1.4);
            assert!(spec.bands.is_empty());
            assert!(spec.series[1].point_tones.is_empty());
        }
    }

    #[test]
    fn constant_range_spans_full_extent() {
        let spec = chart(Metric::Staffing, 1.0);
        assert_eq!(spec.bands.len(), 1);
        let band = &spec.bands[0];
        assert_eq!((band.x0, band.x1), (0.5, 14.5));
        assert_eq!((band.y0, band.y1), (10.0, 120.0));
    }

    #[test]
    fn phased_range_has_one_band_per_phase() {
        let spec = chart(Metric::AudienceGrowth, 1.0);
        let edges: Vec<(f64, f64)> = spec.bands.iter().map(|b| (b.x0, b.x1)).collect();
        assert_eq!(edges, vec![(0.5, 3.5), (3.5, 6.5), (6.5, 14.5)]);
        assert!((spec.bands[1].y1 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_points_are_red() {
        // Staffing baseline 70 × 1.5 = 105 stays in [10, 120]; × 2.0 = 140 does not.
        let spec = chart(Metric::Staffing, 2.0);
        let tones = &spec.series[1].point_tones;
        assert_eq!(tones.len(), 14);
        assert_eq!(tones[0], Tone::Green, "14 × 2 = 28 is fine");
        assert_eq!(tones[13], Tone::Red);
    }

    #[test]
    fn builds_a_chart_for_every_metric() {
        let charts =
            build_input_charts(BaselineCatalog::reference(), &ScaleInputSet::baseline()).unwrap();
        assert_eq!(charts.len(), Metric::COUNT);
    }
}
