#[cfg(target_arch = "wasm32")]
use yew::prelude::*;

pub mod handlers;
pub mod notice;
pub mod state;
pub mod view;

pub use handlers::DashboardHandlers;
pub use notice::{Notice, NoticeAction, NoticeBoard, NoticeLevel};
pub use view::{DashboardShell, ShellProps};

#[cfg(target_arch = "wasm32")]
pub type WebSimulator = sparks_engine::Simulator<
    crate::transport::HttpComputation,
    crate::transport::HttpScenarioStore,
>;

#[cfg(target_arch = "wasm32")]
fn build_simulator() -> Result<WebSimulator, sparks_engine::SetupError> {
    let config = crate::config::simulator_config().clone();
    let service = crate::transport::HttpComputation::new(config.endpoints.compute.clone());
    let store = crate::transport::HttpScenarioStore::new(config.endpoints.clone());
    WebSimulator::with_reference(config, service, store)
}

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    let simulator = use_memo((), |()| {
        build_simulator().map(std::rc::Rc::new).map_err(|err| {
            log::error!("simulator setup failed: {err}");
            err.to_string()
        })
    });
    match &*simulator {
        Ok(sim) => html! { <Dashboard sim={sim.clone()} /> },
        Err(message) => html! {
            <main class="sparks-shell">
                <p class="toast toast-error" role="alert">
                    { format!("The simulator could not start: {message}") }
                </p>
            </main>
        },
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Properties)]
struct DashboardProps {
    sim: std::rc::Rc<WebSimulator>,
}

#[cfg(target_arch = "wasm32")]
impl PartialEq for DashboardProps {
    fn eq(&self, other: &Self) -> bool {
        std::rc::Rc::ptr_eq(&self.sim, &other.sim)
    }
}

#[cfg(target_arch = "wasm32")]
#[function_component(Dashboard)]
fn dashboard(p: &DashboardProps) -> Html {
    let app_state = state::use_app_state();
    let handlers = DashboardHandlers::new(&app_state, &p.sim);

    // Populate the saved-scenario list once on mount.
    {
        let refresh = handlers.refresh.clone();
        use_effect_with((), move |()| {
            refresh.emit(());
            || ()
        });
    }

    html! {
        <DashboardShell
            surface={app_state.surface.surface.clone()}
            input_charts={app_state.surface.input_charts.clone()}
            result_charts={(*app_state.result_charts).clone()}
            signals={(*app_state.signals).clone()}
            notices={(*app_state.notices).clone()}
            busy={*app_state.busy}
            {handlers}
        />
    }
}
