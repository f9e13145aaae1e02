//! Translate [`ChartSpec`] values into Plotly traces and layout.
use serde::Serialize;
use serde_json::{Value, json};
use sparks_engine::{BandSpec, ChartSpec, LineDash, SeriesKind, SeriesSpec, ThresholdLine, Tone};

const PLOT_BG: &str = "rgba(15,23,42,0.8)";
const FONT_COLOR: &str = "#e2e8f0";

/// Plotly `data` and `layout` for one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
}

const fn dash_name(dash: LineDash) -> &'static str {
    match dash {
        LineDash::Solid => "solid",
        LineDash::Dot => "dot",
        LineDash::Dash => "dash",
    }
}

fn marker(series: &SeriesSpec) -> Value {
    if series.point_tones.is_empty() {
        series
            .tone
            .map_or(Value::Null, |tone| json!({ "color": tone.color() }))
    } else {
        let colors: Vec<&str> = series.point_tones.iter().map(|t| t.color()).collect();
        json!({ "color": colors, "size": 8 })
    }
}

fn trace(series: &SeriesSpec) -> Value {
    let mut trace = match series.kind {
        SeriesKind::Line => json!({
            "type": "scatter",
            "mode": "lines+markers",
            "line": {
                "dash": dash_name(series.dash),
                "color": series.tone.map(Tone::color),
            },
        }),
        SeriesKind::Bar => json!({ "type": "bar" }),
    };
    trace["name"] = json!(series.name);
    trace["x"] = json!(series.x);
    trace["y"] = json!(series.y);
    let marker = marker(series);
    if !marker.is_null() {
        trace["marker"] = marker;
    }
    if series.fill_to_zero {
        trace["fill"] = json!("tozeroy");
    }
    trace
}

fn band_shape(band: &BandSpec) -> Value {
    json!({
        "type": "rect",
        "xref": "x",
        "yref": "y",
        "x0": band.x0,
        "x1": band.x1,
        "y0": band.y0,
        "y1": band.y1,
        "fillcolor": band.tone.color(),
        "opacity": band.opacity,
        "line": { "width": 0 },
        "layer": "below",
    })
}

fn line_shape(line: &ThresholdLine) -> Value {
    json!({
        "type": "line",
        "xref": "paper",
        "x0": 0,
        "x1": 1,
        "yref": "y",
        "y0": line.y,
        "y1": line.y,
        "line": { "color": line.tone.color(), "dash": dash_name(line.dash), "width": 2 },
    })
}

fn line_label(line: &ThresholdLine) -> Value {
    json!({
        "xref": "paper",
        "x": 1,
        "y": line.y,
        "text": line.label,
        "showarrow": false,
        "xanchor": "right",
        "yanchor": "bottom",
        "font": { "color": line.tone.color() },
    })
}

/// Build the Plotly figure for `spec`.
#[must_use]
pub fn figure(spec: &ChartSpec) -> Figure {
    let shapes: Vec<Value> = spec
        .bands
        .iter()
        .map(band_shape)
        .chain(spec.lines.iter().map(line_shape))
        .collect();
    let annotations: Vec<Value> = spec.lines.iter().map(line_label).collect();
    Figure {
        data: spec.series.iter().map(trace).collect(),
        layout: json!({
            "title": { "text": spec.title },
            "xaxis": { "title": { "text": spec.x_label }, "dtick": 1 },
            "yaxis": { "title": { "text": spec.y_label } },
            "barmode": if spec.stacked { "relative" } else { "group" },
            "shapes": shapes,
            "annotations": annotations,
            "paper_bgcolor": "rgba(0,0,0,0)",
            "plot_bgcolor": PLOT_BG,
            "font": { "color": FONT_COLOR },
            "legend": { "orientation": "h", "y": -0.2 },
            "margin": { "t": 40, "r": 16, "b": 48, "l": 56 },
        }),
    }
}

#[cfg(target_arch = "wasm32")]
mod ffi {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_namespace = Plotly, js_name = react, catch)]
        pub fn react(
            element_id: &str,
            data: &JsValue,
            layout: &JsValue,
            config: &JsValue,
        ) -> Result<js_sys::Promise, JsValue>;
    }
}

/// Draw (or redraw) `spec` into the element named by its chart id.
///
/// # Errors
/// Returns an error if the figure cannot be converted or Plotly rejects it.
#[cfg(target_arch = "wasm32")]
pub fn render(spec: &ChartSpec) -> Result<(), wasm_bindgen::JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    let fig = figure(spec);
    let data = fig.data.serialize(&serializer)?;
    let layout = fig.layout.serialize(&serializer)?;
    let config = json!({ "responsive": true, "displaylogo": false }).serialize(&serializer)?;
    ffi::react(&spec.id.dom_id(), &data, &layout, &config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparks_engine::{
        BaselineCatalog, ChartConfig, ComputationResult, Metric, ResultChartKind, ResultMetric,
        ScaleInputSet, build_input_chart, build_result_chart,
    };

    #[test]
    fn input_chart_maps_dash_and_bands() {
        let spec = build_input_chart(
            BaselineCatalog::reference(),
            Metric::AudienceGrowth,
            &ScaleInputSet::baseline(),
        )
        .unwrap();
        let fig = figure(&spec);
        assert_eq!(fig.data.len(), 2);
        assert_eq!(fig.data[0]["line"]["dash"], "dot");
        assert_eq!(fig.data[1]["line"]["dash"], "solid");
        assert_eq!(fig.data[1]["marker"]["color"].as_array().unwrap().len(), 14);
        let shapes = fig.layout["shapes"].as_array().unwrap();
        assert_eq!(shapes.len(), 3);
        assert_eq!(shapes[0]["x1"], 3.5);
        assert_eq!(shapes[0]["layer"], "below");
    }

    #[test]
    fn sustainability_chart_gets_threshold_line_and_label() {
        let result = ComputationResult::default()
            .with_column(ResultMetric::Years, vec![1.0, 2.0])
            .with_column(ResultMetric::Profit, vec![-1e6, 6e6]);
        let spec = build_result_chart(
            ResultChartKind::Sustainability,
            &result,
            &ChartConfig::default(),
        )
        .unwrap();
        let fig = figure(&spec);
        let shapes = fig.layout["shapes"].as_array().unwrap();
        assert_eq!(shapes.len(), 3);
        assert_eq!(shapes[0]["fillcolor"], Tone::Red.color());
        assert_eq!(shapes[1]["fillcolor"], Tone::Green.color());
        assert_eq!(shapes[2]["type"], "line");
        assert_eq!(shapes[2]["y0"], 5e6);
        assert_eq!(fig.layout["annotations"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn stacked_charts_use_relative_bars() {
        let result = ComputationResult::default()
            .with_column(ResultMetric::Years, vec![1.0])
            .with_column(ResultMetric::Revenues, vec![10.0])
            .with_column(ResultMetric::Costs, vec![4.0]);
        let spec = build_result_chart(
            ResultChartKind::SegmentBreakdown,
            &result,
            &ChartConfig::default(),
        )
        .unwrap();
        let fig = figure(&spec);
        assert_eq!(fig.layout["barmode"], "relative");
        assert!(fig.data.iter().all(|t| t["type"] == "bar"));
    }

    #[test]
    fn cumulative_profit_fills_to_zero() {
        let result = ComputationResult::default()
            .with_column(ResultMetric::Years, vec![1.0, 2.0])
            .with_column(ResultMetric::Profit, vec![1.0, 2.0]);
        let spec = build_result_chart(
            ResultChartKind::CumulativeProfit,
            &result,
            &ChartConfig::default(),
        )
        .unwrap();
        assert_eq!(figure(&spec).data[0]["fill"], "tozeroy");
    }
}
