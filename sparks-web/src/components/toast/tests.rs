use super::{Props, Toasts};
use crate::app::notice::{Notice, NoticeBoard};
use futures::executor::block_on;
use yew::Callback;
use yew::LocalServerRenderer;

fn render(notices: Vec<Notice>) -> String {
    let props = Props {
        board: NoticeBoard { notices },
        on_dismiss: Callback::noop(),
    };
    block_on(LocalServerRenderer::<Toasts>::with_props(props).render())
}

#[test]
fn empty_board_renders_nothing() {
    assert!(!render(Vec::new()).contains("toast-stack"));
}

#[test]
fn notices_render_with_level_classes() {
    let html = render(vec![
        Notice::error("Computation failed (status 500): boom"),
        Notice::info("Saved scenario \"lean\""),
    ]);
    assert!(html.contains("toast-error"), "{html}");
    assert!(html.contains("toast-info"));
    assert!(html.contains("boom"));
}
