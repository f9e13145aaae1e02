use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub name: AttrValue,
    pub names: Vec<String>,
    #[prop_or_default]
    pub selected: Option<String>,
    pub on_name: Callback<String>,
    pub on_select: Callback<String>,
    pub on_save: Callback<()>,
    pub on_load: Callback<()>,
    pub on_refresh: Callback<()>,
}

/// Scenario name entry, the saved-scenario list, and save/load actions.
#[function_component(ScenarioBar)]
pub fn scenario_bar(p: &Props) -> Html {
    let on_name = {
        let cb = p.on_name.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
                cb.emit(input.value());
            }
        })
    };
    let on_select = {
        let cb = p.on_select.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<web_sys::HtmlSelectElement>() {
                cb.emit(select.value());
            }
        })
    };
    let emit = |cb: &Callback<()>| {
        let cb = cb.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let options = p.names.iter().map(|name| {
        let selected = p.selected.as_deref() == Some(name.as_str());
        html! { <option value={name.clone()} {selected}>{ name.clone() }</option> }
    });

    html! {
        <section class="scenario-bar" aria-label="Scenarios">
            <label for="scenario_name">{ "Scenario name" }</label>
            <input
                id="scenario_name"
                type="text"
                placeholder="e.g. lean-launch"
                value={p.name.clone()}
                oninput={on_name}
            />
            <button id="save-scenario" class="btn" onclick={emit(&p.on_save)}>{ "Save" }</button>
            <select id="scenario_select" onchange={on_select}>
                <option value="" selected={p.selected.is_none()}>{ "Saved scenarios" }</option>
                { for options }
            </select>
            <button id="load-scenario" class="btn" onclick={emit(&p.on_load)}>{ "Load" }</button>
            <button id="refresh-scenarios" class="btn btn-ghost" onclick={emit(&p.on_refresh)}>
                { "Refresh" }
            </button>
        </section>
    }
}

#[cfg(test)]
mod tests;
