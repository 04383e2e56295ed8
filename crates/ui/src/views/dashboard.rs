use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{
    Notice, NoticeBanner, ViewError, ViewState, use_progress_bump, view_state_from_resource,
};
use crate::vm::{DashboardVm, StepCardVm, map_dashboard};

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let progress = ctx.progress();
    let progress_for_reset = ctx.progress();
    let bump = use_progress_bump();
    let notice = use_signal(|| None::<Notice>);

    let mut resource = use_resource(move || {
        let progress = progress.clone();
        async move {
            let record = progress.load().await.map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(map_dashboard(&record))
        }
    });
    let state = view_state_from_resource(&resource);

    let on_reset = move |_| {
        let progress = progress_for_reset.clone();
        let mut notice = notice;
        let mut resource = resource;
        spawn(async move {
            match progress.reset().await {
                Ok(()) => {
                    notice.set(Some(Notice::success("Progress reset")));
                    resource.restart();
                    bump.notify();
                }
                Err(err) => notice.set(Some(Notice::Error(err.to_string()))),
            }
        });
    };

    rsx! {
        div { class: "page dashboard",
            h2 { "ONDC Onboarding Dashboard" }
            p { class: "page-lead",
                "Complete the four steps below to register your application on the ONDC network."
            }
            NoticeBanner { notice: notice() }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(vm) => rsx! {
                    Overview { vm: vm.clone() }
                    div { class: "step-grid",
                        for step in vm.steps {
                            StepCard { key: "{step.number}", step }
                        }
                    }
                    div { class: "dashboard-actions",
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: on_reset,
                            "Reset Progress"
                        }
                        Link { class: "btn btn-link", to: Route::HowToUse {}, "How to use this tool" }
                    }
                },
                ViewState::Error(_) => rsx! {
                    p { "{ViewError::message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| resource.restart(),
                        "Retry"
                    }
                },
            }
        }
    }
}

#[component]
fn Overview(vm: DashboardVm) -> Element {
    rsx! {
        section { class: "overview",
            div { class: "progress",
                div { class: "progress-bar", style: "width: {vm.percent}%" }
            }
            p { class: "progress-label",
                "{vm.completed} of {vm.total} steps complete ({vm.percent}%)"
            }
            if let Some(subscriber) = vm.subscriber_id.clone() {
                p { class: "subscriber", "Subscriber: {subscriber}" }
            }
            if let Some(session) = vm.session_id.clone() {
                p { class: "session", "Session: {session}" }
            }
            match vm.next.clone() {
                Some(next) => rsx! {
                    Link { class: "btn btn-primary continue", to: next.route.clone(),
                        "Continue: {next.title}"
                    }
                },
                None => rsx! {
                    p { class: "finished", "All steps complete. Your application is subscribed." }
                    Link { class: "btn btn-link", to: Route::Headers {}, "Open Header Tools" }
                },
            }
        }
    }
}

#[component]
fn StepCard(step: StepCardVm) -> Element {
    let status = if step.completed { "Completed" } else { "Pending" };
    rsx! {
        article { class: if step.completed { "step-card done" } else { "step-card" },
            span { class: "step-number", "{step.number}" }
            h3 { "{step.title}" }
            p { "{step.description}" }
            span { class: "step-status", "{status}" }
            Link { class: "step-open", to: step.route.clone(), "Open" }
        }
    }
}
