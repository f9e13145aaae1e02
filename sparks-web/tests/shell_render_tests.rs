use futures::executor::block_on;
use sparks_engine::{
    BaselineCatalog, ChartConfig, ComputationResponse, ComputationResult, ControlSurface,
    Dashboard, Metric, ReasonabilitySignals, ResultMetric, SignalMarker, StubComputation,
};
use sparks_web::app::{DashboardHandlers, DashboardShell, Notice, NoticeBoard, ShellProps};
use std::rc::Rc;
use yew::LocalServerRenderer;

fn full_result() -> ComputationResult {
    let years: Vec<f64> = (1..=14).map(f64::from).collect();
    let ramp = |scale: f64| (1..=14).map(|y| f64::from(y) * scale).collect::<Vec<_>>();
    ComputationResult::default()
        .with_column(ResultMetric::Years, years)
        .with_column(ResultMetric::Revenues, ramp(2e6))
        .with_column(ResultMetric::Costs, ramp(1.5e6))
        .with_column(ResultMetric::Profit, ramp(0.5e6))
        .with_column(ResultMetric::Mau, ramp(1e5))
        .with_column(ResultMetric::Cac, ramp(3.0))
        .with_column(ResultMetric::Roas, ramp(0.4))
        .with_column(ResultMetric::Staff, ramp(5.0))
}

fn shell_props(response: ComputationResponse, notices: Vec<Notice>) -> ShellProps {
    let board = Dashboard::new(
        BaselineCatalog::reference().clone(),
        ChartConfig::default(),
        StubComputation::returning(response),
    );
    let mut surface = ControlSurface::standard();
    surface.scenario_names = vec!["lean".into()];
    let view = block_on(board.run(&surface)).unwrap();
    ShellProps {
        surface,
        input_charts: Rc::new(view.input_charts),
        result_charts: Rc::new(view.result_charts),
        signals: view.signals,
        notices: NoticeBoard { notices },
        busy: false,
        handlers: DashboardHandlers::noop(),
    }
}

fn render(props: ShellProps) -> String {
    block_on(LocalServerRenderer::<DashboardShell>::with_props(props).render())
}

#[test]
fn shell_renders_controls_inputs_and_results() {
    let html = render(shell_props(ComputationResponse::new(full_result()), Vec::new()));
    for metric in Metric::ALL {
        assert!(html.contains(metric.control_id()));
    }
    assert!(html.contains("id=\"chart-input-content-cost\""), "{html}");
    assert!(html.contains("id=\"chart-result-sustainability\""));
    assert!(html.contains("id=\"chart-result-cumulative-profit\""));
    assert!(!html.contains("Recompute the model to see results."));
    assert!(html.contains(">lean</option>"));
}

#[test]
fn shell_without_results_shows_hint() {
    let mut props = shell_props(ComputationResponse::default(), Vec::new());
    props.result_charts = Rc::new(Vec::new());
    let html = render(props);
    assert!(html.contains("Recompute the model to see results."));
}

#[test]
fn shell_shows_notices_and_signals() {
    let mut signals = ReasonabilitySignals::new();
    signals.insert("roas".into(), vec![SignalMarker::Red; 14]);
    let response = ComputationResponse::new(full_result()).with_signals(signals);
    let html = render(shell_props(
        response,
        vec![Notice::error("Scenario \"ghost\" not found")],
    ));
    assert!(html.contains("toast-error"));
    assert!(html.contains("signal-strip"));
    assert_eq!(html.matches("class=\"signal-dot\"").count(), 14);
}
