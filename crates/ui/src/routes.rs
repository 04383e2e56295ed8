use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};
use onboard_core::steps::StepId;

use crate::context::AppContext;
use crate::views::{
    DashboardView, DeploymentView, HeadersView, HowToUseView, KeysView, ProgressEpoch,
    SubscribeView, WhitelistView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", DashboardView)] Dashboard {},
        #[route("/how-to-use", HowToUseView)] HowToUse {},
        #[route("/whitelist", WhitelistView)] Whitelist {},
        #[route("/keys", KeysView)] Keys {},
        #[route("/deployment", DeploymentView)] Deployment {},
        #[route("/subscribe", SubscribeView)] Subscribe {},
        #[route("/headers", HeadersView)] Headers {},
}

/// Route of the view that completes `step`.
#[must_use]
pub fn route_for_step(step: StepId) -> Route {
    match step {
        StepId::Whitelist => Route::Whitelist {},
        StepId::Keys => Route::Keys {},
        StepId::Deployment => Route::Deployment {},
        StepId::Subscription => Route::Subscribe {},
    }
}

#[component]
fn Layout() -> Element {
    use_context_provider(ProgressEpoch::new);
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let epoch = use_context::<ProgressEpoch>();
    let progress = ctx.progress();

    let done = use_resource(move || {
        let progress = progress.clone();
        let _tick = epoch.current();
        async move {
            progress
                .load()
                .await
                .map(|record| StepId::ALL.map(|step| step.is_completed(&record)))
                .unwrap_or_default()
        }
    });
    let done = done.cloned().unwrap_or_default();

    rsx! {
        nav { class: "sidebar",
            h1 { "ONDC Onboarding" }
            ul {
                li { Link { to: Route::Dashboard {}, "Dashboard" } }
                li { Link { to: Route::HowToUse {}, "How to Use" } }
                for (step, completed) in StepId::ALL.into_iter().zip(done) {
                    li { class: if completed { "step-link done" } else { "step-link" },
                        Link { to: route_for_step(step),
                            span { class: "step-number", "{step.number()}" }
                            "{step.title()}"
                        }
                    }
                }
                li { Link { to: Route::Headers {}, "Header Tools" } }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_routes_match_step_paths() {
        for step in StepId::ALL {
            assert_eq!(route_for_step(step).to_string(), step.path());
        }
    }
}
