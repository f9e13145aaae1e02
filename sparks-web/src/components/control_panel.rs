use sparks_engine::{ControlSurface, Metric};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub surface: ControlSurface,
    pub on_input: Callback<(Metric, String)>,
    pub on_run: Callback<()>,
    #[prop_or_default]
    pub busy: bool,
}

fn control_row(metric: Metric, value: &str, readout: &str, on_input: &Callback<(Metric, String)>) -> Html {
    let domain = metric.slider();
    let oninput = {
        let cb = on_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
                cb.emit((metric, input.value()));
            }
        })
    };
    html! {
        <div class="control-row" key={metric.control_id()}>
            <label for={metric.control_id()}>{ metric.label() }</label>
            <input
                type="range"
                id={metric.control_id()}
                min={domain.min.to_string()}
                max={domain.max.to_string()}
                step={domain.step.to_string()}
                value={value.to_string()}
                {oninput}
            />
            <span id={metric.readout_id()} class="readout">{ readout.to_string() }</span>
        </div>
    }
}

/// One slider per driver metric plus the run trigger.
#[function_component(ControlPanel)]
pub fn control_panel(p: &Props) -> Html {
    let run = {
        let cb = p.on_run.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let rows = p
        .surface
        .controls()
        .map(|(metric, control)| control_row(metric, &control.value, &control.readout, &p.on_input));
    html! {
        <section class="control-panel" aria-label="Scale factors">
            <h2>{ "Scale factors" }</h2>
            { for rows }
            <button id="run-model" class="btn btn-primary" onclick={run} disabled={p.busy}>
                { if p.busy { "Computing..." } else { "Recompute model" } }
            </button>
        </section>
    }
}

#[cfg(test)]
mod tests;
