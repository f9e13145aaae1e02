use super::{Props, ScenarioBar};
use futures::executor::block_on;
use yew::Callback;
use yew::LocalServerRenderer;

fn props(names: &[&str], selected: Option<&str>) -> Props {
    Props {
        name: "lean".into(),
        names: names.iter().map(ToString::to_string).collect(),
        selected: selected.map(ToString::to_string),
        on_name: Callback::noop(),
        on_select: Callback::noop(),
        on_save: Callback::noop(),
        on_load: Callback::noop(),
        on_refresh: Callback::noop(),
    }
}

fn render(p: Props) -> String {
    block_on(LocalServerRenderer::<ScenarioBar>::with_props(p).render())
}

#[test]
fn lists_saved_scenarios() {
    let html = render(props(&["aggressive", "lean"], None));
    assert!(html.contains("id=\"scenario_select\""));
    assert!(html.contains(">aggressive</option>"), "{html}");
    assert!(html.contains(">lean</option>"));
}

#[test]
fn empty_store_shows_only_placeholder() {
    let html = render(props(&[], None));
    assert_eq!(html.matches("<option").count(), 1);
    assert!(html.contains("Saved scenarios"));
}

#[test]
fn exposes_save_and_load_actions() {
    let html = render(props(&["lean"], Some("lean")));
    assert!(html.contains("id=\"save-scenario\""));
    assert!(html.contains("id=\"load-scenario\""));
    assert!(html.contains("id=\"scenario_name\""));
}
