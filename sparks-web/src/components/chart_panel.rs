use sparks_engine::ChartSpec;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct CardProps {
    pub spec: Rc<ChartSpec>,
}

#[cfg(target_arch = "wasm32")]
fn draw(spec: &ChartSpec) {
    if let Err(err) = crate::plotly::render(spec) {
        crate::dom::console_error(&format!(
            "chart {} failed to draw: {}",
            spec.id.dom_id(),
            crate::dom::js_error_message(&err)
        ));
    }
}

#[cfg(not(target_arch = "wasm32"))]
const fn draw(_spec: &ChartSpec) {}

/// A chart container; Plotly draws into it once mounted.
#[function_component(ChartCard)]
pub fn chart_card(p: &CardProps) -> Html {
    use_effect_with(p.spec.clone(), |spec| {
        draw(spec);
        || ()
    });

    html! {
        <figure class="chart-card">
            <figcaption>{ p.spec.title.clone() }</figcaption>
            <div
                id={p.spec.id.dom_id()}
                class="chart"
                data-series={p.spec.series.len().to_string()}
            />
        </figure>
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct GridProps {
    pub heading: AttrValue,
    pub charts: Rc<Vec<ChartSpec>>,
    #[prop_or_default]
    pub empty_text: Option<AttrValue>,
}

#[function_component(ChartGrid)]
pub fn chart_grid(p: &GridProps) -> Html {
    let body = if p.charts.is_empty() {
        p.empty_text
            .clone()
            .map_or_else(Html::default, |text| html! { <p class="chart-empty">{ text }</p> })
    } else {
        p.charts
            .iter()
            .map(|spec| {
                html! { <ChartCard key={spec.id.dom_id()} spec={Rc::new(spec.clone())} /> }
            })
            .collect::<Html>()
    };
    html! {
        <section class="chart-section">
            <h2>{ p.heading.clone() }</h2>
            <div class="chart-grid">{ body }</div>
        </section>
    }
}
