//! Result views built from a computation response.
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{BandSpec, ChartId, ChartSpec, LineDash, SeriesSpec, ThresholdLine, Tone};
use crate::config::{ChartConfig, SegmentShare};
use crate::constants::{BAND_HALF_WIDTH, BAND_OPACITY, CHART_HEADROOM, FILL_OPACITY};
use crate::result::{ComputationResult, ResultMetric};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultChartKind {
    RevenueVsCost,
    Profit,
    Sustainability,
    SegmentBreakdown,
    Audience,
    Cac,
    Roas,
    Staffing,
    SalaryCost,
    CumulativeProfit,
}

impl ResultChartKind {
    pub const ALL: [Self; 10] = [
        Self::RevenueVsCost,
        Self::Profit,
        Self::Sustainability,
        Self::SegmentBreakdown,
        Self::Audience,
        Self::Cac,
        Self::Roas,
        Self::Staffing,
        Self::SalaryCost,
        Self::CumulativeProfit,
    ];

    /// Result columns the view reads, besides `years`.
    #[must_use]
    pub const fn required(self) -> &'static [ResultMetric] {
        match self {
            Self::RevenueVsCost | Self::SegmentBreakdown => {
                &[ResultMetric::Revenues, ResultMetric::Costs]
            }
            Self::Profit | Self::Sustainability | Self::CumulativeProfit => {
                &[ResultMetric::Profit]
            }
            Self::Audience => &[ResultMetric::Mau],
            Self::Cac => &[ResultMetric::Cac],
            Self::Roas => &[ResultMetric::Roas],
            Self::Staffing | Self::SalaryCost => &[ResultMetric::Staff],
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::RevenueVsCost => "Revenues vs Costs",
            Self::Profit => "Profit",
            Self::Sustainability => "Profit vs Sustainability Threshold",
            Self::SegmentBreakdown => "Revenue & Cost Segments",
            Self::Audience => "MAU Growth",
            Self::Cac => "CAC",
            Self::Roas => "ROAS",
            Self::Staffing => "Staff",
            Self::SalaryCost => "Salary Cost",
            Self::CumulativeProfit => "Cumulative Profit",
        }
    }

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::RevenueVsCost => "revenue-vs-cost",
            Self::Profit => "profit",
            Self::Sustainability => "sustainability",
            Self::SegmentBreakdown => "segment-breakdown",
            Self::Audience => "audience",
            Self::Cac => "cac",
            Self::Roas => "roas",
            Self::Staffing => "staffing",
            Self::SalaryCost => "salary-cost",
            Self::CumulativeProfit => "cumulative-profit",
        }
    }

    const fn y_label(self) -> &'static str {
        match self {
            Self::Audience => "MAU",
            Self::Cac => "€ per paying user",
            Self::Roas => "revenue / spend",
            Self::Staffing => "FTE",
            _ => "€",
        }
    }
}

impl fmt::Display for ResultChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningIssue {
    Missing(ResultMetric),
    Misaligned {
        metric: ResultMetric,
        expected: usize,
        actual: usize,
    },
}

/// A result view that was skipped; the remaining views still render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartWarning {
    pub chart: ResultChartKind,
    pub issue: WarningIssue,
}

impl fmt::Display for ChartWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.issue {
            WarningIssue::Missing(metric) => {
                write!(f, "{} skipped: result has no `{metric}`", self.chart)
            }
            WarningIssue::Misaligned {
                metric,
                expected,
                actual,
            } => write!(
                f,
                "{} skipped: `{metric}` has {actual} values for {expected} years",
                self.chart
            ),
        }
    }
}

impl std::error::Error for ChartWarning {}

/// Charts that built plus warnings for the ones that did not.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultCharts {
    pub charts: Vec<ChartSpec>,
    pub warnings: Vec<ChartWarning>,
}

/// Build a single result view.
///
/// # Errors
///
/// Returns a [`ChartWarning`] when `years` or a required column is missing or
/// a column length differs from `years`.
pub fn build_result_chart(
    kind: ResultChartKind,
    result: &ComputationResult,
    config: &ChartConfig,
) -> Result<ChartSpec, ChartWarning> {
    let years = column(kind, result, ResultMetric::Years, None)?;
    let x = years.to_vec();
    let expected = Some(x.len());
    for metric in kind.required() {
        column(kind, result, *metric, expected)?;
    }
    let mut spec = ChartSpec::new(ChartId::Result(kind), kind.title(), kind.y_label());

    match kind {
        ResultChartKind::RevenueVsCost => {
            let revenues = column(kind, result, ResultMetric::Revenues, expected)?;
            let costs = column(kind, result, ResultMetric::Costs, expected)?;
            spec.series
                .push(SeriesSpec::line("Revenues", x.clone(), revenues.to_vec()).toned(Tone::Green));
            spec.series
                .push(SeriesSpec::line("Costs", x, costs.to_vec()).toned(Tone::Red));
        }
        ResultChartKind::Profit => {
            let profit = column(kind, result, ResultMetric::Profit, expected)?;
            let tones = profit
                .iter()
                .map(|p| if *p >= 0.0 { Tone::Green } else { Tone::Red })
                .collect();
            spec.series
                .push(SeriesSpec::bar("Profit", x, profit.to_vec()).with_point_tones(tones));
        }
        ResultChartKind::Sustainability => {
            let profit = column(kind, result, ResultMetric::Profit, expected)?;
            let threshold = config.sustainability_threshold;
            spec.bands = sustainability_fills(&x, profit, threshold);
            spec.lines.push(ThresholdLine {
                y: threshold,
                tone: Tone::Yellow,
                dash: LineDash::Dash,
                label: format!("Sustainability threshold ({:.1}M€)", threshold / 1e6),
            });
            spec.series
                .push(SeriesSpec::line("Profit", x, profit.to_vec()).toned(Tone::Neutral));
        }
        ResultChartKind::SegmentBreakdown => {
            let revenues = column(kind, result, ResultMetric::Revenues, expected)?;
            let costs = column(kind, result, ResultMetric::Costs, expected)?;
            spec.stacked = true;
            spec.series
                .extend(segment_bars("Revenue", &x, revenues, &config.revenue_split, 1.0));
            spec.series
                .extend(segment_bars("Cost", &x, costs, &config.cost_split, -1.0));
        }
        ResultChartKind::Audience => {
            let mau = column(kind, result, ResultMetric::Mau, expected)?;
            spec.series.push(SeriesSpec::line("MAU", x, mau.to_vec()).toned(Tone::Scaled));
        }
        ResultChartKind::Cac => {
            let cac = column(kind, result, ResultMetric::Cac, expected)?;
            let bands = config.cac;
            if let Some((x0, x1)) = x_extent(&x) {
                spec.bands
                    .push(band(x0, x1, 0.0, bands.green_max, Tone::Green, "Healthy CAC"));
                spec.bands.push(band(
                    x0,
                    x1,
                    bands.green_max,
                    bands.yellow_max,
                    Tone::Yellow,
                    "Watch CAC",
                ));
            }
            let tones = cac
                .iter()
                .map(|v| {
                    if *v <= bands.green_max {
                        Tone::Green
                    } else if *v <= bands.yellow_max {
                        Tone::Yellow
                    } else {
                        Tone::Red
                    }
                })
                .collect();
            spec.series
                .push(SeriesSpec::line("CAC", x, cac.to_vec()).with_point_tones(tones));
        }
        ResultChartKind::Roas => {
            let roas = column(kind, result, ResultMetric::Roas, expected)?;
            let bands = config.roas;
            let series = SeriesSpec::line("ROAS", x.clone(), roas.to_vec());
            let top = roas
                .iter()
                .copied()
                .filter(|v| v.is_finite())
                .fold(bands.green_min, f64::max)
                * CHART_HEADROOM;
            if let Some((x0, x1)) = x_extent(&x) {
                spec.bands.push(band(
                    x0,
                    x1,
                    bands.yellow_min,
                    bands.green_min,
                    Tone::Yellow,
                    "Marginal ROAS",
                ));
                spec.bands
                    .push(band(x0, x1, bands.green_min, top, Tone::Green, "Healthy ROAS"));
            }
            let tones = roas
                .iter()
                .map(|v| {
                    if *v >= bands.green_min {
                        Tone::Green
                    } else if *v >= bands.yellow_min {
                        Tone::Yellow
                    } else {
                        Tone::Red
                    }
                })
                .collect();
            spec.series.push(series.with_point_tones(tones));
        }
        ResultChartKind::Staffing => {
            let staff = column(kind, result, ResultMetric::Staff, expected)?;
            spec.series
                .push(SeriesSpec::bar("Staff", x, staff.to_vec()).toned(Tone::Scaled));
        }
        ResultChartKind::SalaryCost => {
            let staff = column(kind, result, ResultMetric::Staff, expected)?;
            let salaries = staff.iter().map(|s| s * config.salary_per_head).collect();
            spec.series
                .push(SeriesSpec::line("Salary cost", x, salaries).toned(Tone::Red));
        }
        ResultChartKind::CumulativeProfit => {
            let profit = column(kind, result, ResultMetric::Profit, expected)?;
            let running = profit
                .iter()
                .scan(0.0, |acc, p| {
                    *acc += p;
                    Some(*acc)
                })
                .collect();
            spec.series.push(
                SeriesSpec::line("Cumulative Profit", x, running)
                    .toned(Tone::Scaled)
                    .filled(),
            );
        }
    }
    Ok(spec)
}

/// Build every result view, collecting warnings for the skipped ones.
#[must_use]
pub fn build_result_charts(result: &ComputationResult, config: &ChartConfig) -> ResultCharts {
    let mut out = ResultCharts::default();
    for kind in ResultChartKind::ALL {
        match build_result_chart(kind, result, config) {
            Ok(spec) => out.charts.push(spec),
            Err(warning) => {
                log::warn!("{warning}");
                out.warnings.push(warning);
            }
        }
    }
    out
}

/// One fill per year between profit and the threshold: red below, green at or above.
#[must_use]
pub fn sustainability_fills(years: &[f64], profit: &[f64], threshold: f64) -> Vec<BandSpec> {
    years
        .iter()
        .zip(profit)
        .map(|(year, p)| {
            let below = *p < threshold;
            BandSpec {
                x0: year - BAND_HALF_WIDTH,
                x1: year + BAND_HALF_WIDTH,
                y0: p.min(threshold),
                y1: p.max(threshold),
                tone: if below { Tone::Red } else { Tone::Green },
                opacity: FILL_OPACITY,
                label: None,
            }
        })
        .collect()
}

fn segment_bars(
    prefix: &str,
    x: &[f64],
    totals: &[f64],
    shares: &[SegmentShare],
    sign: f64,
) -> Vec<SeriesSpec> {
    shares
        .iter()
        .map(|share| {
            let y = totals.iter().map(|t| sign * t * share.ratio).collect();
            SeriesSpec::bar(format!("{prefix}: {}", share.label), x.to_vec(), y)
        })
        .collect()
}

fn band(x0: f64, x1: f64, y0: f64, y1: f64, tone: Tone, label: &str) -> BandSpec {
    BandSpec {
        x0,
        x1,
        y0,
        y1,
        tone,
        opacity: BAND_OPACITY,
        label: Some(label.to_string()),
    }
}

fn x_extent(years: &[f64]) -> Option<(f64, f64)> {
    let first = years.first()?;
    let last = years.last()?;
    Some((first - BAND_HALF_WIDTH, last + BAND_HALF_WIDTH))
}

fn column<'a>(
    chart: ResultChartKind,
    result: &'a ComputationResult,
    metric: ResultMetric,
    expected: Option<usize>,
) -> Result<&'a [f64], ChartWarning> {
    let values = result.column(metric).ok_or(ChartWarning {
        chart,
        issue: WarningIssue::Missing(metric),
    })?;
    match expected {
        Some(expected) if expected != values.len() => Err(ChartWarning {
            chart,
            issue: WarningIssue::Misaligned {
                metric,
                expected,
                actual: values.len(),
            },
        }),
        _ => Ok(values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_result() -> ComputationResult {
        ComputationResult::default()
            .with_column(ResultMetric::Years, vec![1.0, 2.0, 3.0])
            .with_column(ResultMetric::Revenues, vec![0.0, 10e6, 20e6])
            .with_column(ResultMetric::Costs, vec![5e6, 8e6, 9e6])
            .with_column(ResultMetric::Profit, vec![-5e6, 2e6, 11e6])
            .with_column(ResultMetric::Mau, vec![0.0, 6e4, 3e5])
            .with_column(ResultMetric::Cac, vec![80.0, 150.0, 250.0])
            .with_column(ResultMetric::Roas, vec![0.2, 0.7, 1.4])
            .with_column(ResultMetric::Staff, vec![14.0, 23.0, 39.0])
    }

    #[test]
    fn full_result_builds_every_view() {
        let charts = build_result_charts(&full_result(), &ChartConfig::default());
        assert!(charts.warnings.is_empty(), "{:?}", charts.warnings);
        assert_eq!(charts.charts.len(), ResultChartKind::ALL.len());
    }

    #[test]
    fn sustainability_fill_is_red_below_and_green_above() {
        let result = ComputationResult::default()
            .with_column(ResultMetric::Years, vec![1.0, 2.0])
            .with_column(ResultMetric::Profit, vec![-1e6, 6e6]);
        let spec = build_result_chart(
            ResultChartKind::Sustainability,
            &result,
            &ChartConfig::default(),
        )
        .unwrap();
        assert_eq!(spec.lines[0].y, 5e6);
        assert_eq!(spec.bands.len(), 2);
        assert_eq!(spec.bands[0].tone, Tone::Red);
        assert_eq!((spec.bands[0].x0, spec.bands[0].x1), (0.5, 1.5));
        assert_eq!((spec.bands[0].y0, spec.bands[0].y1), (-1e6, 5e6));
        assert_eq!(spec.bands[1].tone, Tone::Green);
        assert_eq!((spec.bands[1].y0, spec.bands[1].y1), (5e6, 6e6));
    }

    #[test]
    fn profit_at_threshold_counts_as_green() {
        let fills = sustainability_fills(&[1.0], &[5e6], 5e6);
        assert_eq!(fills[0].tone, Tone::Green);
    }

    #[test]
    fn segments_split_totals_by_ratio() {
        let spec = build_result_chart(
            ResultChartKind::SegmentBreakdown,
            &full_result(),
            &ChartConfig::default(),
        )
        .unwrap();
        assert!(spec.stacked);
        assert_eq!(spec.series.len(), 7);
        let game = spec.series_named("Revenue: Game").unwrap();
        assert!((game.y[1] - 6e6).abs() < 1e-6);
        let marketing = spec.series_named("Cost: Marketing").unwrap();
        assert!((marketing.y[0] + 2e6).abs() < 1e-6);
    }

    #[test]
    fn salary_cost_is_staff_times_per_head() {
        let spec = build_result_chart(
            ResultChartKind::SalaryCost,
            &full_result(),
            &ChartConfig::default(),
        )
        .unwrap();
        assert_eq!(spec.series[0].y[0], 14.0 * 95_000.0);
    }

    #[test]
    fn cac_points_follow_bands() {
        let spec =
            build_result_chart(ResultChartKind::Cac, &full_result(), &ChartConfig::default())
                .unwrap();
        assert_eq!(spec.bands.len(), 2);
        assert_eq!(
            spec.series[0].point_tones,
            vec![Tone::Green, Tone::Yellow, Tone::Red]
        );
    }

    #[test]
    fn roas_green_band_reaches_above_the_series() {
        let spec =
            build_result_chart(ResultChartKind::Roas, &full_result(), &ChartConfig::default())
                .unwrap();
        let green = spec.bands.iter().find(|b| b.tone == Tone::Green).unwrap();
        assert_eq!(green.y0, 1.0);
        assert!(green.y1 > 1.4);
        assert_eq!(
            spec.series[0].point_tones,
            vec![Tone::Red, Tone::Yellow, Tone::Green]
        );
    }

    #[test]
    fn cumulative_profit_is_a_running_sum() {
        let spec = build_result_chart(
            ResultChartKind::CumulativeProfit,
            &full_result(),
            &ChartConfig::default(),
        )
        .unwrap();
        assert_eq!(spec.series[0].y, vec![-5e6, -3e6, 8e6]);
        assert!(spec.series[0].fill_to_zero);
    }

    #[test]
    fn each_view_builds_from_its_declared_columns_alone() {
        let full = full_result();
        for kind in ResultChartKind::ALL {
            let pick = |metrics: &[ResultMetric]| {
                metrics.iter().fold(
                    ComputationResult::default()
                        .with_column(ResultMetric::Years, vec![1.0, 2.0, 3.0]),
                    |acc, m| acc.with_column(*m, full.column(*m).unwrap().to_vec()),
                )
            };
            let required = kind.required();
            assert!(
                build_result_chart(kind, &pick(required), &ChartConfig::default()).is_ok(),
                "{kind}"
            );
            let warning =
                build_result_chart(kind, &pick(&required[1..]), &ChartConfig::default())
                    .unwrap_err();
            assert_eq!(warning.issue, WarningIssue::Missing(required[0]), "{kind}");
        }
    }

    #[test]
    fn missing_metric_skips_only_dependent_views() {
        let mut result = full_result();
        result.roas = None;
        let charts = build_result_charts(&result, &ChartConfig::default());
        assert_eq!(
            charts.warnings,
            vec![ChartWarning {
                chart: ResultChartKind::Roas,
                issue: WarningIssue::Missing(ResultMetric::Roas),
            }]
        );
        assert_eq!(charts.charts.len(), ResultChartKind::ALL.len() - 1);
    }

    #[test]
    fn misaligned_column_is_reported() {
        let result = full_result().with_column(ResultMetric::Staff, vec![1.0]);
        let warning = build_result_chart(
            ResultChartKind::Staffing,
            &result,
            &ChartConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            warning.issue,
            WarningIssue::Misaligned {
                metric: ResultMetric::Staff,
                expected: 3,
                actual: 1
            }
        );
        assert!(warning.to_string().contains("staffing skipped"));
    }

    #[test]
    fn missing_years_skips_everything() {
        let mut result = full_result();
        result.years = None;
        let charts = build_result_charts(&result, &ChartConfig::default());
        assert!(charts.charts.is_empty());
        assert_eq!(charts.warnings.len(), ResultChartKind::ALL.len());
    }
}
