use std::path::Path;

use dioxus::prelude::*;
use dioxus_router::Link;
use onboard_core::model::KeySet;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{
    Notice, NoticeBanner, ViewError, ViewState, use_cancel_on_unmount, use_progress_bump,
    view_state_from_resource,
};
use crate::vm::{KeyRowVm, map_key_rows};

#[derive(Clone, PartialEq)]
struct KeysData {
    keys: Option<KeySet>,
    session_id: Option<String>,
}

#[component]
pub fn KeysView() -> Element {
    let ctx = use_context::<AppContext>();
    let progress = ctx.progress();
    let key_service = ctx.keys();
    let export_service = key_service.clone();
    let cancel = use_cancel_on_unmount();
    let bump = use_progress_bump();

    let pending = use_signal(|| false);
    let notice = use_signal(|| None::<Notice>);
    let exporting = use_signal(|| false);
    let mut reveal = use_signal(|| false);

    let mut resource = use_resource(move || {
        let progress = progress.clone();
        async move {
            let record = progress.load().await.map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(KeysData {
                keys: record.keys().cloned(),
                session_id: record.session_id().map(ToString::to_string),
            })
        }
    });
    let state = view_state_from_resource(&resource);

    let on_generate = move |_| {
        let key_service = key_service.clone();
        let token = cancel.token();
        let mut pending = pending;
        let mut notice = notice;
        let mut resource = resource;
        spawn(async move {
            pending.set(true);
            notice.set(None);
            match key_service.generate(&token).await {
                Ok(_) => {
                    notice.set(Some(Notice::success("Key pairs generated")));
                    resource.restart();
                    bump.notify();
                }
                Err(err) => notice.set(Notice::from_action_error(&err)),
            }
            pending.set(false);
        });
    };

    let on_export = move |_| {
        let export_service = export_service.clone();
        let mut exporting = exporting;
        let mut notice = notice;
        spawn(async move {
            exporting.set(true);
            notice.set(None);
            match export_service.write_config(Path::new(".")).await {
                Ok(path) => notice.set(Some(Notice::success(format!(
                    "Configuration saved to {}",
                    path.display()
                )))),
                Err(err) => notice.set(Notice::from_action_error(&err)),
            }
            exporting.set(false);
        });
    };

    let busy = pending();
    let revealed = reveal();

    rsx! {
        div { class: "page keys",
            h2 { "Generate Cryptographic Keys" }
            p { class: "page-lead",
                "Create Ed25519 signing and X25519 encryption key pairs for your ONDC integration."
            }
            NoticeBanner { notice: notice() }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    if data.session_id.is_none() {
                        p { class: "hint",
                            "Whitelist verification is not complete, so new keys will not be tied to a session. "
                            Link { to: Route::Whitelist {}, "Verify whitelisting" }
                        }
                    }
                    div { class: "actions",
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            disabled: busy,
                            onclick: on_generate,
                            if busy {
                                "Generating..."
                            } else if data.keys.is_some() {
                                "Regenerate Keys"
                            } else {
                                "Generate Keys"
                            }
                        }
                    }
                    match data.keys.clone() {
                        Some(keys) => rsx! {
                            section { class: "key-list",
                                label { class: "toggle",
                                    input {
                                        r#type: "checkbox",
                                        checked: revealed,
                                        onchange: move |evt| reveal.set(evt.checked()),
                                    }
                                    "Show private keys"
                                }
                                for row in map_key_rows(&keys, revealed) {
                                    KeyRow { key: "{row.env_name}", row }
                                }
                                if let Some(session) = keys.session_id.as_ref() {
                                    p { class: "session", "Session ID: {session}" }
                                }
                                button {
                                    class: "btn btn-secondary",
                                    r#type: "button",
                                    disabled: busy || exporting(),
                                    onclick: on_export,
                                    "Export Configuration"
                                }
                                Link { class: "btn btn-primary", to: Route::Deployment {}, "Continue to Deployment" }
                            }
                        },
                        None => rsx! {
                            p { class: "empty", "No keys generated yet." }
                        },
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
fn KeyRow(row: KeyRowVm) -> Element {
    rsx! {
        div { class: if row.is_private { "key-row private" } else { "key-row" },
            span { class: "key-label", "{row.label}" }
            code { class: "key-env", "{row.env_name}" }
            pre { class: "key-value", "{row.value}" }
        }
    }
}
