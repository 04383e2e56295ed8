use dioxus::prelude::*;
use dioxus_router::Link;
use onboard_core::deployment::{DeploymentBundle, EndpointCheck, EndpointTestReport, Language};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{Notice, NoticeBanner, use_cancel_on_unmount, use_progress_bump};
use crate::vm::format_datetime;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BundleTab {
    Docker,
    Manual,
    Kubernetes,
    Env,
}

impl BundleTab {
    const ALL: [BundleTab; 4] = [
        BundleTab::Docker,
        BundleTab::Manual,
        BundleTab::Kubernetes,
        BundleTab::Env,
    ];

    fn label(self) -> &'static str {
        match self {
            BundleTab::Docker => "Docker Compose",
            BundleTab::Manual => "Manual",
            BundleTab::Kubernetes => "Kubernetes",
            BundleTab::Env => ".env",
        }
    }

    fn content(self, bundle: &DeploymentBundle) -> &str {
        match self {
            BundleTab::Docker => &bundle.docker,
            BundleTab::Manual => &bundle.manual,
            BundleTab::Kubernetes => &bundle.kubernetes,
            BundleTab::Env => &bundle.env,
        }
    }
}

#[component]
pub fn DeploymentView() -> Element {
    let ctx = use_context::<AppContext>();
    let deployment = ctx.deployment();
    let deployment_for_test = ctx.deployment();
    let cancel = use_cancel_on_unmount();
    let cancel_for_test = cancel.clone();
    let bump = use_progress_bump();

    let mut language = use_signal(|| Language::Node);
    let mut tab = use_signal(|| BundleTab::Docker);
    let bundle = use_signal(|| None::<DeploymentBundle>);
    let generating = use_signal(|| false);

    let mut server_url = use_signal(String::new);
    let report = use_signal(|| None::<EndpointTestReport>);
    let testing = use_signal(|| false);
    let notice = use_signal(|| None::<Notice>);

    let on_generate = move |_| {
        let deployment = deployment.clone();
        let token = cancel.token();
        let selected = language();
        let mut bundle = bundle;
        let mut generating = generating;
        let mut notice = notice;
        spawn(async move {
            generating.set(true);
            notice.set(None);
            match deployment.generate_config(selected, &token).await {
                Ok(generated) => {
                    bundle.set(Some(generated));
                    notice.set(Some(Notice::success(format!(
                        "Configuration generated for {}",
                        selected.label()
                    ))));
                }
                Err(err) => notice.set(Notice::from_action_error(&err)),
            }
            generating.set(false);
        });
    };

    let on_test = move |_| {
        let deployment = deployment_for_test.clone();
        let token = cancel_for_test.token();
        let url = server_url();
        let mut report = report;
        let mut testing = testing;
        let mut notice = notice;
        spawn(async move {
            testing.set(true);
            notice.set(None);
            match deployment.test_endpoints(&url, &token).await {
                Ok(result) => {
                    notice.set(Some(if result.overall_success {
                        Notice::success("All endpoint checks passed")
                    } else {
                        Notice::Error(format!(
                            "{} endpoint check(s) failed",
                            result.failed_checks().len()
                        ))
                    }));
                    report.set(Some(result));
                    bump.notify();
                }
                Err(err) => notice.set(Notice::from_action_error(&err)),
            }
            testing.set(false);
        });
    };

    let busy_generate = generating();
    let busy_test = testing();
    let current_tab = tab();

    rsx! {
        div { class: "page deployment",
            h2 { "Deploy ONDC Endpoints" }
            p { class: "page-lead",
                "Generate deployment files for your stack, deploy, then test the required endpoints."
            }
            NoticeBanner { notice: notice() }

            section { class: "panel",
                h3 { "1. Generate configuration" }
                label { r#for: "language", "Language" }
                select {
                    id: "language",
                    value: "{language().value()}",
                    onchange: move |evt| {
                        if let Some(selected) = Language::from_value(&evt.value()) {
                            language.set(selected);
                        }
                    },
                    for lang in Language::ALL {
                        option { value: "{lang.value()}", "{lang.label()}" }
                    }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: busy_generate,
                    onclick: on_generate,
                    if busy_generate { "Generating..." } else { "Generate Configuration" }
                }
                if let Some(generated) = bundle() {
                    div { class: "tabs",
                        for candidate in BundleTab::ALL {
                            button {
                                class: if candidate == current_tab { "tab active" } else { "tab" },
                                r#type: "button",
                                onclick: move |_| tab.set(candidate),
                                "{candidate.label()}"
                            }
                        }
                    }
                    pre { class: "code-block", "{current_tab.content(&generated)}" }
                }
            }

            section { class: "panel",
                h3 { "2. Test endpoints" }
                label { r#for: "server-url", "Server URL" }
                input {
                    id: "server-url",
                    r#type: "url",
                    placeholder: "https://your-domain.com",
                    value: "{server_url}",
                    disabled: busy_test,
                    oninput: move |evt| server_url.set(evt.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: busy_test,
                    onclick: on_test,
                    if busy_test { "Testing..." } else { "Test Endpoints" }
                }
                if let Some(result) = report() {
                    ReportView { report: result }
                }
            }
        }
    }
}

#[component]
fn ReportView(report: EndpointTestReport) -> Element {
    let tested_at = format_datetime(report.timestamp);
    rsx! {
        div { class: if report.overall_success { "report success" } else { "report failure" },
            p { "Tested {report.tested_url} at {tested_at}" }
            ul {
                for check in report.results.iter().cloned() {
                    CheckRow { key: "{check.endpoint}", check }
                }
            }
            if report.overall_success {
                Link { class: "btn btn-primary", to: Route::Subscribe {}, "Continue to Subscription" }
            }
        }
    }
}

#[component]
fn CheckRow(check: EndpointCheck) -> Element {
    let mark = if check.success { "PASS" } else { "FAIL" };
    rsx! {
        li { class: if check.success { "check pass" } else { "check fail" },
            span { class: "check-mark", "{mark}" }
            strong { "{check.name}" }
            code { "{check.endpoint}" }
            span { " {check.status_code} in {check.response_time}: {check.message}" }
        }
    }
}
