use sparks_engine::{ChartSpec, ControlSurface, ReasonabilitySignals};
use std::rc::Rc;
use yew::prelude::*;

use super::handlers::DashboardHandlers;
use super::notice::NoticeBoard;
use crate::components::{ChartGrid, ControlPanel, ScenarioBar, SignalStrip, Toasts};

#[derive(Properties, PartialEq, Clone)]
pub struct ShellProps {
    pub surface: ControlSurface,
    pub input_charts: Rc<Vec<ChartSpec>>,
    pub result_charts: Rc<Vec<ChartSpec>>,
    #[prop_or_default]
    pub signals: Option<ReasonabilitySignals>,
    pub notices: NoticeBoard,
    #[prop_or_default]
    pub busy: bool,
    pub handlers: DashboardHandlers,
}

/// Full dashboard layout; stateless so it renders outside the browser.
#[function_component(DashboardShell)]
pub fn dashboard_shell(p: &ShellProps) -> Html {
    let h = &p.handlers;
    html! {
        <main class="sparks-shell">
            <header class="sparks-header">
                <h1>{ "SpArks Financial Simulator" }</h1>
            </header>
            <aside class="sparks-sidebar">
                <ScenarioBar
                    name={AttrValue::from(p.surface.scenario_name.clone())}
                    names={p.surface.scenario_names.clone()}
                    selected={p.surface.selected_scenario.clone()}
                    on_name={h.name_change.clone()}
                    on_select={h.select.clone()}
                    on_save={h.save.clone()}
                    on_load={h.load.clone()}
                    on_refresh={h.refresh.clone()}
                />
                <ControlPanel
                    surface={p.surface.clone()}
                    on_input={h.input.clone()}
                    on_run={h.run.clone()}
                    busy={p.busy}
                />
            </aside>
            <div class="sparks-content">
                <ChartGrid heading="Input drivers" charts={p.input_charts.clone()} />
                <ChartGrid
                    heading="Results"
                    charts={p.result_charts.clone()}
                    empty_text={Some(AttrValue::from("Recompute the model to see results."))}
                />
                <SignalStrip signals={p.signals.clone()} />
            </div>
            <Toasts board={p.notices.clone()} on_dismiss={h.dismiss.clone()} />
        </main>
    }
}
