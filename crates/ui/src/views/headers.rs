use dioxus::prelude::*;
use services::{CreatedHeader, HeaderRequest, VerifyRequest};

use crate::context::AppContext;
use crate::views::{Notice, NoticeBanner, use_cancel_on_unmount};
use crate::vm::VerificationVm;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HeaderTab {
    Create,
    Verify,
}

#[component]
pub fn HeadersView() -> Element {
    let ctx = use_context::<AppContext>();
    let headers = ctx.headers();
    let headers_for_verify = ctx.headers();
    let progress = ctx.progress();
    let cancel = use_cancel_on_unmount();
    let cancel_for_verify = cancel.clone();

    let mut tab = use_signal(|| HeaderTab::Create);
    let mut request = use_signal(HeaderRequest::default);
    let created = use_signal(|| None::<CreatedHeader>);
    let creating = use_signal(|| false);

    let mut verify = use_signal(VerifyRequest::default);
    let verification = use_signal(|| None::<VerificationVm>);
    let verifying = use_signal(|| false);
    let notice = use_signal(|| None::<Notice>);

    let on_create = move |_| {
        let headers = headers.clone();
        let token = cancel.token();
        let snapshot = request();
        let mut created = created;
        let mut creating = creating;
        let mut notice = notice;
        spawn(async move {
            creating.set(true);
            notice.set(None);
            match headers.create(&snapshot, &token).await {
                Ok(result) => {
                    notice.set(Some(Notice::success("Authorization header created")));
                    created.set(Some(result));
                }
                Err(err) => notice.set(Notice::from_action_error(&err)),
            }
            creating.set(false);
        });
    };

    let on_verify = move |_| {
        let headers = headers_for_verify.clone();
        let token = cancel_for_verify.token();
        let snapshot = verify();
        let mut verification = verification;
        let mut verifying = verifying;
        let mut notice = notice;
        spawn(async move {
            verifying.set(true);
            notice.set(None);
            match headers.verify(&snapshot, &token).await {
                Ok(report) => verification.set(Some(VerificationVm::from(&report))),
                Err(err) => notice.set(Notice::from_action_error(&err)),
            }
            verifying.set(false);
        });
    };

    // Copies the created header and body across, filling the public key from
    // stored keys when the field is still empty.
    let on_transfer = move |_| {
        let Some(result) = created() else {
            return;
        };
        {
            let mut draft = verify.write();
            draft.header = result.header.to_string();
            draft.body = result.body.to_string();
        }
        tab.set(HeaderTab::Verify);
        let progress = progress.clone();
        let mut verify = verify;
        spawn(async move {
            if !verify.peek().public_key.trim().is_empty() {
                return;
            }
            let stored_key = progress
                .load()
                .await
                .ok()
                .and_then(|record| record.keys().map(|keys| keys.sign_public_key.clone()));
            if let Some(key) = stored_key {
                verify.write().public_key = key;
            }
        });
    };

    let active = tab();
    let form = request();
    let check = verify();

    rsx! {
        div { class: "page headers",
            h2 { "Authorization Header Tools" }
            p { class: "page-lead",
                "Create and verify the signed Authorization headers ONDC requests carry."
            }
            NoticeBanner { notice: notice() }

            div { class: "tabs",
                button {
                    class: if active == HeaderTab::Create { "tab active" } else { "tab" },
                    r#type: "button",
                    onclick: move |_| tab.set(HeaderTab::Create),
                    "Create Header"
                }
                button {
                    class: if active == HeaderTab::Verify { "tab active" } else { "tab" },
                    r#type: "button",
                    onclick: move |_| tab.set(HeaderTab::Verify),
                    "Verify Header"
                }
            }

            if active == HeaderTab::Create {
                section { class: "panel",
                    label { class: "field",
                        span { "Subscriber ID" }
                        input {
                            r#type: "text",
                            value: "{form.subscriber_id}",
                            oninput: move |evt| request.write().subscriber_id = evt.value(),
                        }
                    }
                    label { class: "field",
                        span { "Unique key ID" }
                        input {
                            r#type: "text",
                            value: "{form.unique_key_id}",
                            oninput: move |evt| request.write().unique_key_id = evt.value(),
                        }
                    }
                    label { class: "field",
                        span { "Request body (JSON)" }
                        textarea {
                            rows: "6",
                            value: "{form.body}",
                            oninput: move |evt| request.write().body = evt.value(),
                        }
                    }
                    label { class: "toggle",
                        input {
                            r#type: "checkbox",
                            checked: form.use_custom_key,
                            onchange: move |evt| request.write().use_custom_key = evt.checked(),
                        }
                        "Use a custom private key"
                    }
                    if form.use_custom_key {
                        label { class: "field",
                            span { "Signing private key" }
                            textarea {
                                rows: "2",
                                value: "{form.custom_private_key}",
                                oninput: move |evt| request.write().custom_private_key = evt.value(),
                            }
                        }
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: creating(),
                        onclick: on_create,
                        if creating() { "Creating..." } else { "Create Header" }
                    }
                    if let Some(result) = created() {
                        div { class: "result",
                            h4 { "Authorization header" }
                            pre { class: "code-block", "{result.header}" }
                            h4 { "Signing string" }
                            pre { class: "code-block", "{result.signing_string}" }
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: on_transfer,
                                "Use for verification"
                            }
                        }
                    }
                }
            } else {
                section { class: "panel",
                    label { class: "field",
                        span { "Authorization header" }
                        textarea {
                            rows: "4",
                            value: "{check.header}",
                            oninput: move |evt| verify.write().header = evt.value(),
                        }
                    }
                    label { class: "field",
                        span { "Request body (JSON)" }
                        textarea {
                            rows: "6",
                            value: "{check.body}",
                            oninput: move |evt| verify.write().body = evt.value(),
                        }
                    }
                    label { class: "field",
                        span { "Signing public key" }
                        textarea {
                            rows: "2",
                            value: "{check.public_key}",
                            oninput: move |evt| verify.write().public_key = evt.value(),
                        }
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: verifying(),
                        onclick: on_verify,
                        if verifying() { "Verifying..." } else { "Verify Header" }
                    }
                    if let Some(vm) = verification() {
                        VerificationResult { vm }
                    }
                }
            }
        }
    }
}

#[component]
fn VerificationResult(vm: VerificationVm) -> Element {
    rsx! {
        div { class: if vm.is_valid { "report success" } else { "report failure" },
            h4 { "{vm.headline}" }
            ul {
                for check in vm.checks.iter() {
                    li { class: if check.passed { "check pass" } else { "check fail" },
                        span { class: "check-mark", if check.passed { "PASS" } else { "FAIL" } }
                        " {check.label}"
                    }
                }
            }
            dl {
                dt { "Subscriber" }
                dd { "{vm.subscriber_id}" }
                dt { "Key ID" }
                dd { "{vm.key_id}" }
                dt { "Algorithm" }
                dd { "{vm.algorithm}" }
                dt { "Checked at" }
                dd { "{vm.checked_at}" }
            }
        }
    }
}
