//! Per-year reasonability markers reported by the computation service.
//!
//! Superseded by the per-point tones on the input charts; rendered only when
//! a response carries signals.
use sparks_engine::{ReasonabilitySignals, SignalMarker, Tone};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    #[prop_or_default]
    pub signals: Option<ReasonabilitySignals>,
}

const fn marker_color(marker: SignalMarker) -> &'static str {
    match marker {
        SignalMarker::Green => Tone::Green.color(),
        SignalMarker::Red => Tone::Red.color(),
        SignalMarker::Unknown => Tone::Neutral.color(),
    }
}

#[function_component(SignalStrip)]
pub fn signal_strip(p: &Props) -> Html {
    let Some(signals) = p.signals.as_ref().filter(|s| !s.is_empty()) else {
        return Html::default();
    };
    let rows = signals.iter().map(|(metric, markers)| {
        let dots = markers.iter().enumerate().map(|(idx, marker)| {
            html! {
                <span
                    class="signal-dot"
                    title={format!("{metric} year {}", idx + 1)}
                    style={format!("background:{}", marker_color(*marker))}
                />
            }
        });
        html! {
            <div class="signal-row">
                <span class="signal-label">{ metric.clone() }</span>
                { for dots }
            </div>
        }
    });
    html! {
        <section class="signal-strip" aria-label="Reasonability signals">{ for rows }</section>
    }
}
