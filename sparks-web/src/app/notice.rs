//! User-visible, non-blocking notifications.
use sparks_engine::{ChartWarning, ErrorClass, ScenarioError};
use std::rc::Rc;
use yew::Reducible;

/// Oldest notices are dropped past this many.
pub const MAX_NOTICES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Info => "toast toast-info",
            Self::Warning => "toast toast-warning",
            Self::Error => "toast toast-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }

    /// Remote failures are errors the user can retry; local ones point at the controls.
    #[must_use]
    pub fn from_error(err: &ScenarioError) -> Self {
        match err.class() {
            ErrorClass::Remote => Self::error(err.to_string()),
            ErrorClass::Local => Self::warning(err.to_string()),
        }
    }

    #[must_use]
    pub fn from_warning(warning: &ChartWarning) -> Self {
        Self::warning(warning.to_string())
    }
}

pub enum NoticeAction {
    Push(Notice),
    Dismiss(usize),
}

/// Notice stack fed by run/save/load outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoticeBoard {
    pub notices: Vec<Notice>,
}

impl Reducible for NoticeBoard {
    type Action = NoticeAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut notices = self.notices.clone();
        match action {
            NoticeAction::Push(notice) => {
                notices.push(notice);
                let overflow = notices.len().saturating_sub(MAX_NOTICES);
                notices.drain(..overflow);
            }
            NoticeAction::Dismiss(idx) => {
                if idx < notices.len() {
                    notices.remove(idx);
                }
            }
        }
        Rc::new(Self { notices })
    }
}
