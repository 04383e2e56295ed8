use dioxus::prelude::*;
use dioxus_router::Link;
use onboard_core::subscription::{
    CITY_CODES, NetworkParticipant, ONDC_DOMAINS, OperationType, ParticipantType,
    SubscriptionForm,
};
use services::SubscriptionReceipt;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{Notice, NoticeBanner, use_cancel_on_unmount, use_progress_bump};
use crate::vm::format_datetime;

fn join_codes(codes: &[String]) -> String {
    codes.join(", ")
}

fn split_codes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

#[component]
pub fn SubscribeView() -> Element {
    let ctx = use_context::<AppContext>();
    let subscription = ctx.subscription();
    let cancel = use_cancel_on_unmount();
    let bump = use_progress_bump();

    let mut draft = use_signal(SubscriptionForm::default);
    let receipt = use_signal(|| None::<SubscriptionReceipt>);
    let pending = use_signal(|| false);
    let notice = use_signal(|| None::<Notice>);

    let on_submit = move |_| {
        let subscription = subscription.clone();
        let token = cancel.token();
        let snapshot = draft();
        let mut receipt = receipt;
        let mut pending = pending;
        let mut notice = notice;
        spawn(async move {
            pending.set(true);
            notice.set(None);
            match subscription.submit(&snapshot, &token).await {
                Ok(result) => {
                    notice.set(Some(Notice::success(result.message.clone())));
                    receipt.set(Some(result));
                    bump.notify();
                }
                Err(err) => notice.set(Notice::from_action_error(&err)),
            }
            pending.set(false);
        });
    };

    let busy = pending();
    let current = draft();

    rsx! {
        div { class: "page subscribe",
            h2 { "Subscribe to ONDC" }
            p { class: "page-lead",
                "Register your application with the ONDC registry. Your public keys are attached automatically."
            }
            NoticeBanner { notice: notice() }

            if let Some(result) = receipt() {
                ReceiptView { receipt: result }
            } else {
                form { class: "panel subscribe-form",
                    onsubmit: move |evt| evt.prevent_default(),

                    fieldset {
                        legend { "Operation" }
                        select {
                            value: "{current.operation.ops_no()}",
                            onchange: move |evt| {
                                let parsed = evt.value().parse::<u8>().ok().and_then(OperationType::from_ops_no);
                                if let Some(operation) = parsed {
                                    draft.write().set_operation(operation);
                                }
                            },
                            for operation in OperationType::ALL {
                                option { value: "{operation.ops_no()}", "{operation.label()}" }
                            }
                        }
                    }

                    fieldset {
                        legend { "Business details" }
                        TextField {
                            label: "Legal entity name",
                            value: current.legal_entity_name.clone(),
                            on_input: move |v: String| draft.write().legal_entity_name = v,
                        }
                        TextField {
                            label: "Business address",
                            value: current.business_address.clone(),
                            on_input: move |v: String| draft.write().business_address = v,
                        }
                        TextField {
                            label: "City codes",
                            value: join_codes(&current.city_code),
                            on_input: move |v: String| draft.write().city_code = split_codes(&v),
                        }
                        p { class: "hint",
                            "Known codes: "
                            for (code, city) in CITY_CODES {
                                span { class: "city-code", title: "{city}", "{code} " }
                            }
                        }
                        TextField {
                            label: "GST number",
                            value: current.gst_no.clone(),
                            on_input: move |v: String| draft.write().gst_no = v,
                        }
                        TextField {
                            label: "Name as per PAN",
                            value: current.name_as_per_pan.clone(),
                            on_input: move |v: String| draft.write().name_as_per_pan = v,
                        }
                        TextField {
                            label: "PAN number",
                            value: current.pan_no.clone(),
                            on_input: move |v: String| draft.write().pan_no = v,
                        }
                        TextField {
                            label: "Date of incorporation",
                            value: current.date_of_incorporation.clone(),
                            on_input: move |v: String| draft.write().date_of_incorporation = v,
                        }
                    }

                    fieldset {
                        legend { "Authorised signatory" }
                        TextField {
                            label: "Name",
                            value: current.name_of_authorised_signatory.clone(),
                            on_input: move |v: String| draft.write().name_of_authorised_signatory = v,
                        }
                        TextField {
                            label: "Address",
                            value: current.address_of_authorised_signatory.clone(),
                            on_input: move |v: String| draft.write().address_of_authorised_signatory = v,
                        }
                        TextField {
                            label: "Email",
                            value: current.email_id.clone(),
                            on_input: move |v: String| draft.write().email_id = v,
                        }
                        TextField {
                            label: "Mobile number",
                            value: current.mobile_no.clone(),
                            on_input: move |v: String| draft.write().mobile_no = v,
                        }
                    }

                    fieldset {
                        legend { "Registry" }
                        TextField {
                            label: "Country",
                            value: current.country.clone(),
                            on_input: move |v: String| draft.write().country = v,
                        }
                        TextField {
                            label: "Subscriber ID",
                            value: current.subscriber_id.clone(),
                            on_input: move |v: String| draft.write().subscriber_id = v,
                        }
                        TextField {
                            label: "Callback URL",
                            value: current.callback_url.clone(),
                            on_input: move |v: String| draft.write().callback_url = v,
                        }
                    }

                    fieldset {
                        legend { "Network participants ({current.network_participant.len()})" }
                        for (index, participant) in current.network_participant.iter().cloned().enumerate() {
                            ParticipantRow {
                                key: "{index}",
                                participant,
                                on_domain: move |domain: String| {
                                    if let Some(entry) = draft.write().network_participant.get_mut(index) {
                                        entry.domain = domain;
                                    }
                                },
                                on_remove: move |()| draft.write().remove_participant(index),
                            }
                        }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| draft.write().add_participant(),
                            "Add participant"
                        }
                    }

                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: busy,
                        onclick: on_submit,
                        if busy { "Subscribing..." } else { "Subscribe to ONDC" }
                    }
                }
            }
        }
    }
}

#[component]
fn TextField(label: &'static str, value: String, on_input: EventHandler<String>) -> Element {
    rsx! {
        label { class: "field",
            span { "{label}" }
            input {
                r#type: "text",
                value: "{value}",
                oninput: move |evt| on_input.call(evt.value()),
            }
        }
    }
}

#[component]
fn ParticipantRow(
    participant: NetworkParticipant,
    on_domain: EventHandler<String>,
    on_remove: EventHandler<()>,
) -> Element {
    let kind = match participant.participant_type {
        ParticipantType::BuyerApp => "Buyer",
        ParticipantType::SellerApp => "Seller",
    };
    rsx! {
        div { class: "participant-row",
            span { class: "participant-type", "{kind}" }
            select {
                value: "{participant.domain}",
                onchange: move |evt| on_domain.call(evt.value()),
                for domain in ONDC_DOMAINS {
                    option { value: "{domain}", "{domain}" }
                }
            }
            code { "{participant.subscriber_url}" }
            button {
                class: "btn btn-link",
                r#type: "button",
                onclick: move |_| on_remove.call(()),
                "Remove"
            }
        }
    }
}

#[component]
fn ReceiptView(receipt: SubscriptionReceipt) -> Element {
    let registered = format_datetime(receipt.registered_at);
    let payload = serde_json::to_string_pretty(&receipt.payload).unwrap_or_default();
    rsx! {
        section { class: "panel receipt",
            h3 { "Subscription submitted" }
            dl {
                dt { "Subscription ID" }
                dd { code { "{receipt.subscription_id}" } }
                dt { "Subscriber ID" }
                dd { "{receipt.subscriber_id}" }
                dt { "Status" }
                dd { "{receipt.status}" }
                dt { "Operation" }
                dd { "{receipt.operation}" }
                dt { "Registered at" }
                dd { "{registered}" }
                dt { "Verification" }
                dd { "{receipt.verification_status}" }
            }
            h4 { "Next steps" }
            ol {
                for step in receipt.next_steps.iter() {
                    li { "{step}" }
                }
            }
            details {
                summary { "Submitted payload" }
                pre { class: "code-block", "{payload}" }
            }
            Link { class: "btn btn-primary", to: Route::Headers {}, "Open Header Tools" }
        }
    }
}
