pub mod chart_panel;
pub mod control_panel;
pub mod scenario_bar;
pub mod signal_strip;
pub mod toast;

pub use chart_panel::{ChartCard, ChartGrid};
pub use control_panel::ControlPanel;
pub use scenario_bar::ScenarioBar;
pub use signal_strip::SignalStrip;
pub use toast::Toasts;
