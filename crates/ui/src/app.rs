use dioxus::prelude::*;
use dioxus_router::Router;

use crate::routes::Route;

/// Root component: global stylesheet, window title, and the wizard router.
#[component]
pub fn App() -> Element {
    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "ONDC Onboarding" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "The onboarding wizard stopped unexpectedly" }
                        p { "Saved progress is kept. Restart the app to continue." }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
