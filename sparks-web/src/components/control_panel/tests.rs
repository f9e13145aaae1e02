use super::{ControlPanel, Props};
use futures::executor::block_on;
use sparks_engine::{ControlSurface, Metric};
use yew::Callback;
use yew::LocalServerRenderer;

fn props(surface: ControlSurface, busy: bool) -> Props {
    Props {
        surface,
        on_input: Callback::noop(),
        on_run: Callback::noop(),
        busy,
    }
}

fn render(p: Props) -> String {
    block_on(LocalServerRenderer::<ControlPanel>::with_props(p).render())
}

#[test]
fn renders_a_slider_and_readout_per_metric() {
    let html = render(props(ControlSurface::standard(), false));
    for metric in Metric::ALL {
        assert!(html.contains(&format!("id=\"{}\"", metric.control_id())), "{html}");
        assert!(html.contains(&format!("id=\"{}\"", metric.readout_id())));
    }
    assert!(html.contains("1.00x"));
    assert!(html.contains("Recompute model"));
}

#[test]
fn readout_follows_surface() {
    let mut surface = ControlSurface::standard();
    surface.set_input(Metric::MarketingSpend, "1.35");
    let html = render(props(surface, false));
    assert!(html.contains("1.35x"));
}

#[test]
fn missing_controls_are_not_rendered() {
    let mut surface = ControlSurface::standard();
    surface.remove(Metric::Staffing);
    let html = render(props(surface, false));
    assert!(!html.contains(&format!("id=\"{}\"", Metric::Staffing.control_id())));
}

#[test]
fn busy_panel_shows_progress_label() {
    let html = render(props(ControlSurface::standard(), true));
    assert!(html.contains("Computing..."));
    assert!(html.contains("disabled"));
}
