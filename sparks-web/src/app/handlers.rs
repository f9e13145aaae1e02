use sparks_engine::Metric;
use yew::prelude::*;

use super::notice::NoticeAction;
use super::state::{AppState, SurfaceAction};

/// Callbacks wired into the dashboard shell.
#[derive(Clone, PartialEq)]
pub struct DashboardHandlers {
    pub input: Callback<(Metric, String)>,
    pub name_change: Callback<String>,
    pub select: Callback<String>,
    pub run: Callback<()>,
    pub save: Callback<()>,
    pub load: Callback<()>,
    pub refresh: Callback<()>,
    pub dismiss: Callback<usize>,
}

impl DashboardHandlers {
    /// Handlers that do nothing; for static renders.
    #[must_use]
    pub fn noop() -> Self {
        Self {
            input: Callback::noop(),
            name_change: Callback::noop(),
            select: Callback::noop(),
            run: Callback::noop(),
            save: Callback::noop(),
            load: Callback::noop(),
            refresh: Callback::noop(),
            dismiss: Callback::noop(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    #[must_use]
    pub fn new(state: &AppState, sim: &std::rc::Rc<super::WebSimulator>) -> Self {
        Self {
            input: build_input(state),
            name_change: build_name_change(state),
            select: build_select(state),
            run: remote::build_run(state, sim),
            save: remote::build_save(state, sim),
            load: remote::build_load(state, sim),
            refresh: remote::build_refresh(state, sim),
            dismiss: build_dismiss(state),
        }
    }
}

/// Slider moves update the readout and the input-driver preview.
pub fn build_input(state: &AppState) -> Callback<(Metric, String)> {
    let surface = state.surface.clone();
    Callback::from(move |(metric, raw): (Metric, String)| {
        surface.dispatch(SurfaceAction::Input(metric, raw));
    })
}

pub fn build_name_change(state: &AppState) -> Callback<String> {
    let surface = state.surface.clone();
    Callback::from(move |name: String| surface.dispatch(SurfaceAction::Name(name)))
}

/// Picking a saved scenario also fills the name field used by load.
pub fn build_select(state: &AppState) -> Callback<String> {
    let surface = state.surface.clone();
    Callback::from(move |name: String| surface.dispatch(SurfaceAction::Select(name)))
}

pub fn build_dismiss(state: &AppState) -> Callback<usize> {
    let notices = state.notices.clone();
    Callback::from(move |idx: usize| notices.dispatch(NoticeAction::Dismiss(idx)))
}

#[cfg(target_arch = "wasm32")]
mod remote {
    use std::rc::Rc;
    use wasm_bindgen_futures::spawn_local;
    use yew::prelude::*;

    use super::super::WebSimulator;
    use super::super::notice::{Notice, NoticeAction};
    use super::super::state::{AppState, SurfaceAction};

    pub fn build_run(state: &AppState, sim: &Rc<WebSimulator>) -> Callback<()> {
        let state = state.clone();
        let sim = Rc::clone(sim);
        Callback::from(move |()| {
            let snapshot = state.surface.surface.clone();
            let state = state.clone();
            let sim = Rc::clone(&sim);
            state.busy.set(true);
            spawn_local(async move {
                match sim.run(&snapshot).await {
                    Ok(view) => {
                        state
                            .surface
                            .dispatch(SurfaceAction::Charts(view.input_charts));
                        state.result_charts.set(Rc::new(view.result_charts));
                        state.signals.set(view.signals);
                        for warning in &view.warnings {
                            state
                                .notices
                                .dispatch(NoticeAction::Push(Notice::from_warning(warning)));
                        }
                    }
                    Err(err) => {
                        state
                            .notices
                            .dispatch(NoticeAction::Push(Notice::from_error(&err)));
                    }
                }
                state.busy.set(false);
            });
        })
    }

    pub fn build_save(state: &AppState, sim: &Rc<WebSimulator>) -> Callback<()> {
        let state = state.clone();
        let sim = Rc::clone(sim);
        Callback::from(move |()| {
            let mut snapshot = state.surface.surface.clone();
            let state = state.clone();
            let sim = Rc::clone(&sim);
            spawn_local(async move {
                let name = snapshot.scenario_name.trim().to_string();
                match sim.save(&name, &snapshot).await {
                    Ok(_) => {
                        state
                            .notices
                            .dispatch(NoticeAction::Push(Notice::info(format!(
                                "Saved scenario \"{name}\""
                            ))));
                        if sim.synchronizer().refresh_names(&mut snapshot).await.is_ok() {
                            state
                                .surface
                                .dispatch(SurfaceAction::Names(snapshot.scenario_names));
                        }
                    }
                    Err(err) => {
                        state
                            .notices
                            .dispatch(NoticeAction::Push(Notice::from_error(&err)));
                    }
                }
            });
        })
    }

    pub fn build_load(state: &AppState, sim: &Rc<WebSimulator>) -> Callback<()> {
        let state = state.clone();
        let sim = Rc::clone(sim);
        Callback::from(move |()| {
            let current = &state.surface.surface;
            let name = current
                .selected_scenario
                .clone()
                .unwrap_or_else(|| current.scenario_name.trim().to_string());
            let state = state.clone();
            let sim = Rc::clone(&sim);
            spawn_local(async move {
                match sim.synchronizer().fetch(&name).await {
                    Ok(stored) => {
                        state.surface.dispatch(SurfaceAction::Loaded {
                            name: name.clone(),
                            stored,
                        });
                        state
                            .notices
                            .dispatch(NoticeAction::Push(Notice::info(format!(
                                "Loaded scenario \"{name}\""
                            ))));
                    }
                    Err(err) => {
                        state
                            .notices
                            .dispatch(NoticeAction::Push(Notice::from_error(&err)));
                    }
                }
            });
        })
    }

    pub fn build_refresh(state: &AppState, sim: &Rc<WebSimulator>) -> Callback<()> {
        let state = state.clone();
        let sim = Rc::clone(sim);
        Callback::from(move |()| {
            let mut snapshot = state.surface.surface.clone();
            let state = state.clone();
            let sim = Rc::clone(&sim);
            spawn_local(async move {
                match sim.synchronizer().refresh_names(&mut snapshot).await {
                    Ok(_) => state
                        .surface
                        .dispatch(SurfaceAction::Names(snapshot.scenario_names)),
                    Err(err) => {
                        state
                            .notices
                            .dispatch(NoticeAction::Push(Notice::from_error(&err)));
                    }
                }
            });
        })
    }
}
