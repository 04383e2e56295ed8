use dioxus::prelude::*;
use dioxus_router::Link;
use onboard_core::steps::StepId;

use crate::routes::{Route, route_for_step};

struct GuideStep {
    step: StepId,
    duration: &'static str,
    details: &'static [&'static str],
    requirements: &'static [&'static str],
}

const GUIDE: [GuideStep; 4] = [
    GuideStep {
        step: StepId::Whitelist,
        duration: "1-2 minutes",
        details: &[
            "Enter your ONDC subscriber ID in the verification form",
            "Check the whitelisting status",
            "Proceed to key generation once verified",
        ],
        requirements: &["Valid ONDC subscriber ID", "ONDC approval and whitelisting"],
    },
    GuideStep {
        step: StepId::Keys,
        duration: "2-3 minutes",
        details: &[
            "Generate Ed25519 signing keys for digital signatures",
            "Create X25519 encryption keys for secure communication",
            "Store keys securely in environment variables",
        ],
        requirements: &["Completed whitelist verification"],
    },
    GuideStep {
        step: StepId::Deployment,
        duration: "10-15 minutes",
        details: &[
            "Configure /health, /ondc-site-verification.html and /on_subscribe",
            "Generate deployment configuration for your language",
            "Test endpoints and verify HTTPS",
        ],
        requirements: &["Server or cloud platform", "Domain name with SSL certificate"],
    },
    GuideStep {
        step: StepId::Subscription,
        duration: "5-10 minutes",
        details: &[
            "Submit business details, GST and PAN information",
            "Configure network participant domains",
            "Wait for ONDC endpoint verification",
        ],
        requirements: &["Generated keys", "Deployed endpoints"],
    },
];

#[component]
pub fn HowToUseView() -> Element {
    rsx! {
        div { class: "page how-to-use",
            h2 { "How to Use" }
            p { class: "page-lead",
                "Work through the steps in order. Each step records its result locally, so you can leave and continue later."
            }
            ol { class: "guide",
                for guide in GUIDE.iter() {
                    li { key: "{guide.step.number()}", class: "guide-step",
                        h3 { "{guide.step.title()}" }
                        p { "{guide.step.description()}" }
                        p { class: "guide-duration", "Estimated time: {guide.duration}" }
                        ul {
                            for detail in guide.details.iter() {
                                li { "{detail}" }
                            }
                        }
                        h4 { "Requirements" }
                        ul {
                            for requirement in guide.requirements.iter() {
                                li { "{requirement}" }
                            }
                        }
                        Link { class: "btn btn-secondary", to: route_for_step(guide.step), "Go to step" }
                    }
                }
            }
            p {
                "After subscribing, use the "
                Link { to: Route::Headers {}, "Header Tools" }
                " to create and verify authorization headers."
            }
        }
    }
}
