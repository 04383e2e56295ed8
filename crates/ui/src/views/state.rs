use std::sync::Arc;

use dioxus::prelude::*;
use services::{ActionError, CancelHandle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message() -> &'static str {
        "Something went wrong. Please try again."
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

/// Inline replacement for a toast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Notice::Success(text.into())
    }

    /// Cancellation only happens on unmount, so it produces no notice.
    #[must_use]
    pub fn from_action_error(err: &ActionError) -> Option<Self> {
        match err {
            ActionError::Cancelled => None,
            other => Some(Notice::Error(other.to_string())),
        }
    }

    #[must_use]
    pub fn class(&self) -> &'static str {
        match self {
            Notice::Success(_) => "notice notice-success",
            Notice::Error(_) => "notice notice-error",
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(text) | Notice::Error(text) => text,
        }
    }
}

#[component]
pub fn NoticeBanner(notice: Option<Notice>) -> Element {
    match notice {
        Some(notice) => rsx! {
            div { class: notice.class(), role: "status", "{notice.text()}" }
        },
        None => rsx! {},
    }
}

/// Bumped after any action that changes progress so dependent resources reload.
#[derive(Clone, Copy, PartialEq)]
pub struct ProgressEpoch(Signal<u64>);

impl ProgressEpoch {
    #[must_use]
    pub fn new() -> Self {
        Self(Signal::new(0))
    }

    /// Read and subscribe the current scope.
    #[must_use]
    pub fn current(&self) -> u64 {
        *self.0.read()
    }

    pub fn bump(mut self) {
        *self.0.write() += 1;
    }
}

/// Optional epoch captured at render time; a no-op outside the app layout.
#[derive(Clone, Copy)]
pub struct ProgressBump(Option<ProgressEpoch>);

impl ProgressBump {
    pub fn notify(self) {
        if let Some(epoch) = self.0 {
            epoch.bump();
        }
    }
}

pub fn use_progress_bump() -> ProgressBump {
    ProgressBump(try_use_context::<ProgressEpoch>())
}

/// Cancels every token minted from the returned handle when the view unmounts.
pub fn use_cancel_on_unmount() -> Arc<CancelHandle> {
    let handle = use_hook(|| Arc::new(CancelHandle::pair().0));
    let on_drop = Arc::clone(&handle);
    use_drop(move || on_drop.cancel());
    handle
}
