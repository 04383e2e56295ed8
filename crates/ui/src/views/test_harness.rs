use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use onboard_core::time::fixed_clock;
use services::{
    AppServices, DeploymentService, FixedOutcomes, HeaderService, KeyService, ProgressService,
    SimulationProfile, SubscriptionService, WhitelistService,
};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::{
    DashboardView, DeploymentView, HeadersView, HowToUseView, KeysView, SubscribeView,
    WhitelistView,
};

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn progress(&self) -> Arc<ProgressService> {
        self.services.progress()
    }

    fn whitelist(&self) -> Arc<WhitelistService> {
        self.services.whitelist()
    }

    fn keys(&self) -> Arc<KeyService> {
        self.services.keys()
    }

    fn deployment(&self) -> Arc<DeploymentService> {
        self.services.deployment()
    }

    fn subscription(&self) -> Arc<SubscriptionService> {
        self.services.subscription()
    }

    fn headers(&self) -> Arc<HeaderService> {
        self.services.headers()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Dashboard,
    HowToUse,
    Whitelist,
    Keys,
    Deployment,
    Subscribe,
    Headers,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::HowToUse => rsx! { HowToUseView {} },
        ViewKind::Whitelist => rsx! { WhitelistView {} },
        ViewKind::Keys => rsx! { KeysView {} },
        ViewKind::Deployment => rsx! { DeploymentView {} },
        ViewKind::Subscribe => rsx! { SubscribeView {} },
        ViewKind::Headers => rsx! { HeadersView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then give pending resources a few chances to resolve.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with_storage(view, Storage::in_memory())
}

pub fn setup_view_harness_with_storage(view: ViewKind, storage: Storage) -> ViewHarness {
    let services = AppServices::from_storage(
        &storage,
        fixed_clock(),
        Arc::new(FixedOutcomes::always_succeed()),
        SimulationProfile::instant(),
    );
    let app = Arc::new(TestApp { services });
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });
    ViewHarness { dom, storage }
}
