use yew::prelude::*;

use crate::app::notice::NoticeBoard;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub board: NoticeBoard,
    pub on_dismiss: Callback<usize>,
}

#[function_component(Toasts)]
pub fn toasts(p: &Props) -> Html {
    if p.board.notices.is_empty() {
        return Html::default();
    }
    let items = p.board.notices.iter().enumerate().map(|(idx, notice)| {
        let dismiss = {
            let cb = p.on_dismiss.clone();
            Callback::from(move |_: MouseEvent| cb.emit(idx))
        };
        html! {
            <li class={notice.level.css_class()} role="status">
                <span>{ notice.text.clone() }</span>
                <button class="toast-close" aria-label="Dismiss" onclick={dismiss}>{ "x" }</button>
            </li>
        }
    });
    html! {
        <ul class="toast-stack" aria-live="polite">{ for items }</ul>
    }
}

#[cfg(test)]
mod tests;
