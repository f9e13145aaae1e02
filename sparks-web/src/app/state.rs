use sparks_engine::sync::rehydrate;
use sparks_engine::{
    BaselineCatalog, ChartSpec, ControlSurface, Metric, ReasonabilitySignals, ScaleInputSet,
    StoredScenario, build_input_charts, collect,
};
use std::rc::Rc;
use yew::prelude::*;

use super::notice::NoticeBoard;

pub enum SurfaceAction {
    Input(Metric, String),
    /// Typing a name other than the selected one drops the selection.
    Name(String),
    /// Empty selection clears it; otherwise the name field follows.
    Select(String),
    Names(Vec<String>),
    /// Apply a fetched scenario to the current controls.
    Loaded {
        name: String,
        stored: StoredScenario,
    },
    /// Input charts rebuilt by a completed run.
    Charts(Vec<ChartSpec>),
}

/// Control surface held in a reducer so async completions act on the latest value.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceState {
    pub surface: ControlSurface,
    pub input_charts: Rc<Vec<ChartSpec>>,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            surface: ControlSurface::standard(),
            input_charts: Rc::new(initial_input_charts()),
        }
    }
}

impl SurfaceState {
    /// Rebuild the input charts unless a control holds an unusable value.
    fn refresh_preview(&mut self) {
        if let Some(charts) = preview_for(&self.surface) {
            self.input_charts = Rc::new(charts);
        }
    }
}

impl Reducible for SurfaceState {
    type Action = SurfaceAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        let surface = &mut next.surface;
        match action {
            SurfaceAction::Input(metric, raw) => {
                surface.set_input(metric, raw);
                next.refresh_preview();
            }
            SurfaceAction::Name(name) => {
                if surface.selected_scenario.as_deref() != Some(name.as_str()) {
                    surface.selected_scenario = None;
                }
                surface.scenario_name = name;
            }
            SurfaceAction::Select(name) => {
                if name.is_empty() {
                    surface.selected_scenario = None;
                } else {
                    surface.scenario_name.clone_from(&name);
                    surface.selected_scenario = Some(name);
                }
            }
            SurfaceAction::Names(names) => surface.scenario_names = names,
            SurfaceAction::Loaded { name, stored } => {
                rehydrate(&name, &stored, surface);
                next.refresh_preview();
            }
            SurfaceAction::Charts(charts) => next.input_charts = Rc::new(charts),
        }
        Rc::new(next)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub surface: UseReducerHandle<SurfaceState>,
    pub result_charts: UseStateHandle<Rc<Vec<ChartSpec>>>,
    pub signals: UseStateHandle<Option<ReasonabilitySignals>>,
    pub notices: UseReducerHandle<NoticeBoard>,
    pub busy: UseStateHandle<bool>,
}

#[hook]
pub fn use_app_state() -> AppState {
    AppState {
        surface: use_reducer(SurfaceState::default),
        result_charts: use_state(|| Rc::new(Vec::new())),
        signals: use_state(|| None::<ReasonabilitySignals>),
        notices: use_reducer(NoticeBoard::default),
        busy: use_state(|| false),
    }
}

/// Input charts at the baseline multipliers, shown before the first run.
#[must_use]
pub fn initial_input_charts() -> Vec<ChartSpec> {
    build_input_charts(BaselineCatalog::reference(), &ScaleInputSet::baseline())
        .unwrap_or_default()
}

/// Input charts for `surface`, or `None` while any control holds an unusable
/// value (the previous charts stay on screen).
#[must_use]
fn preview_for(surface: &ControlSurface) -> Option<Vec<ChartSpec>> {
    collect(surface)
        .and_then(|inputs| build_input_charts(BaselineCatalog::reference(), &inputs))
        .ok()
}
