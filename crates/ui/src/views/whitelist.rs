use dioxus::prelude::*;
use dioxus_router::Link;
use tracing::debug;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{
    Notice, NoticeBanner, ViewError, ViewState, use_cancel_on_unmount, use_progress_bump,
    view_state_from_resource,
};

#[derive(Clone, Debug, PartialEq, Eq)]
struct WhitelistStatus {
    verified: bool,
    subscriber_id: Option<String>,
    session_id: Option<String>,
}

#[component]
pub fn WhitelistView() -> Element {
    let ctx = use_context::<AppContext>();
    let progress = ctx.progress();
    let whitelist = ctx.whitelist();
    let cancel = use_cancel_on_unmount();
    let bump = use_progress_bump();

    let mut subscriber_input = use_signal(String::new);
    let pending = use_signal(|| false);
    let notice = use_signal(|| None::<Notice>);

    let mut resource = use_resource(move || {
        let progress = progress.clone();
        async move {
            let record = progress.load().await.map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(WhitelistStatus {
                verified: record.whitelist_verified(),
                subscriber_id: record.subscriber_id().map(ToString::to_string),
                session_id: record.session_id().map(ToString::to_string),
            })
        }
    });
    let state = view_state_from_resource(&resource);

    let on_verify = {
        let whitelist = whitelist.clone();
        let cancel = cancel.clone();
        move |_| {
            let whitelist = whitelist.clone();
            let token = cancel.token();
            let subscriber = subscriber_input();
            let mut pending = pending;
            let mut notice = notice;
            let mut resource = resource;
            spawn(async move {
                pending.set(true);
                notice.set(None);
                match whitelist.verify(&subscriber, &token).await {
                    Ok(outcome) => {
                        notice.set(Some(Notice::success(format!(
                            "Subscriber ID {} is whitelisted",
                            outcome.subscriber_id
                        ))));
                        resource.restart();
                        bump.notify();
                    }
                    Err(err) => {
                        debug!(error = %err, "whitelist verification failed");
                        notice.set(Notice::from_action_error(&err));
                    }
                }
                pending.set(false);
            });
        }
    };

    let on_unverify = move |_| {
        let whitelist = whitelist.clone();
        let mut notice = notice;
        let mut resource = resource;
        spawn(async move {
            match whitelist.unverify().await {
                Ok(()) => {
                    resource.restart();
                    bump.notify();
                }
                Err(err) => notice.set(Notice::from_action_error(&err)),
            }
        });
    };

    let busy = pending();

    rsx! {
        div { class: "page whitelist",
            h2 { "Verify Whitelisting Status" }
            p { class: "page-lead",
                "Check that your subscriber ID has been approved and whitelisted on the ONDC network."
            }
            NoticeBanner { notice: notice() }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(status) => if status.verified {
                    rsx! {
                        section { class: "status-card done",
                            h3 { "Whitelisted" }
                            if let Some(subscriber) = status.subscriber_id.clone() {
                                p { "Subscriber ID: {subscriber}" }
                            }
                            if let Some(session) = status.session_id.clone() {
                                p { class: "session", "Session ID: {session}" }
                            }
                            div { class: "actions",
                                Link { class: "btn btn-primary", to: Route::Keys {}, "Continue to Key Generation" }
                                button {
                                    class: "btn btn-secondary",
                                    r#type: "button",
                                    onclick: on_unverify,
                                    "Verify a different ID"
                                }
                            }
                        }
                    }
                } else {
                    rsx! {
                        div { class: "form",
                            label { r#for: "subscriber-id", "Subscriber ID" }
                            input {
                                id: "subscriber-id",
                                r#type: "text",
                                placeholder: "e.g. buyer-app.ondc.org",
                                value: "{subscriber_input}",
                                disabled: busy,
                                oninput: move |evt| subscriber_input.set(evt.value()),
                            }
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                disabled: busy,
                                onclick: on_verify,
                                if busy { "Verifying..." } else { "Verify Whitelisting Status" }
                            }
                        }
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
