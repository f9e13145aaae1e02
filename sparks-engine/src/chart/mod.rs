//! Declarative chart descriptions handed to the rendering collaborator.
//!
//! Nothing here knows about pixels: a [`ChartSpec`] is plain data (series,
//! translucent bands, horizontal lines, titles) that a renderer translates
//! into its own trace and shape model.
use serde::{Deserialize, Serialize};

use crate::metric::Metric;

pub mod input;
pub mod result;

pub use input::{build_input_chart, build_input_charts};
pub use result::{
    ChartWarning, ResultChartKind, ResultCharts, WarningIssue, build_result_chart,
    build_result_charts,
};

/// Identity of a chart slot on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "family", content = "key")]
pub enum ChartId {
    Input(Metric),
    Result(ResultChartKind),
}

impl ChartId {
    /// Stable element id for the chart container.
    #[must_use]
    pub fn dom_id(self) -> String {
        match self {
            Self::Input(metric) => format!("chart-input-{}", metric.name()),
            Self::Result(kind) => format!("chart-result-{}", kind.slug()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDash {
    Solid,
    Dot,
    Dash,
}

/// Semantic colour; the renderer maps it to a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Green,
    Yellow,
    Red,
    Baseline,
    Scaled,
    Neutral,
}

impl Tone {
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Green => "#22c55e",
            Self::Yellow => "#eab308",
            Self::Red => "#ef4444",
            Self::Baseline => "#94a3b8",
            Self::Scaled => "#38bdf8",
            Self::Neutral => "#e2e8f0",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub name: String,
    pub kind: SeriesKind,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub dash: LineDash,
    pub tone: Option<Tone>,
    /// Per-point colours, aligned with `y`, when points carry a classification.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub point_tones: Vec<Tone>,
    /// Shade the area between the series and zero.
    #[serde(default)]
    pub fill_to_zero: bool,
}

impl SeriesSpec {
    #[must_use]
    pub fn line(name: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            kind: SeriesKind::Line,
            x,
            y,
            dash: LineDash::Solid,
            tone: None,
            point_tones: Vec::new(),
            fill_to_zero: false,
        }
    }

    #[must_use]
    pub fn bar(name: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            kind: SeriesKind::Bar,
            ..Self::line(name, x, y)
        }
    }

    #[must_use]
    pub const fn dashed(mut self, dash: LineDash) -> Self {
        self.dash = dash;
        self
    }

    #[must_use]
    pub const fn toned(mut self, tone: Tone) -> Self {
        self.tone = Some(tone);
        self
    }

    #[must_use]
    pub fn with_point_tones(mut self, tones: Vec<Tone>) -> Self {
        self.point_tones = tones;
        self
    }

    #[must_use]
    pub const fn filled(mut self) -> Self {
        self.fill_to_zero = true;
        self
    }
}

/// Translucent rectangle in data coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSpec {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub tone: Tone,
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Horizontal reference line across the whole x-extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdLine {
    pub y: f64,
    pub tone: Tone,
    pub dash: LineDash,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub id: ChartId,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<SeriesSpec>,
    #[serde(default)]
    pub bands: Vec<BandSpec>,
    #[serde(default)]
    pub lines: Vec<ThresholdLine>,
    /// Bars of the same chart stack instead of grouping.
    #[serde(default)]
    pub stacked: bool,
}

impl ChartSpec {
    #[must_use]
    pub fn new(id: ChartId, title: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            x_label: "Year".to_string(),
            y_label: y_label.into(),
            series: Vec::new(),
            bands: Vec::new(),
            lines: Vec::new(),
            stacked: false,
        }
    }

    #[must_use]
    pub fn series_named(&self, name: &str) -> Option<&SeriesSpec> {
        self.series.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_ids_are_distinct_per_family() {
        assert_eq!(
            ChartId::Input(Metric::Staffing).dom_id(),
            "chart-input-staffing"
        );
        assert_eq!(
            ChartId::Result(ResultChartKind::Staffing).dom_id(),
            "chart-result-staffing"
        );
    }
}
