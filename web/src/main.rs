use dioxus::prelude::*;

use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::{AppNavbar, DashboardShell};
use ui::core::platform;
use ui::views::{Insights, Overview};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebShell)]
    #[route("/")]
    Overview {},
    #[route("/insights")]
    Insights {},
}

const FAVICON: Asset = asset!("/assets/favicon.svg");

/// Served unhashed so the offline worker can precache it.
const BASE_CSS: &str = "/assets/main.css";

const SERVICE_WORKER: &str = "/sw.js";

fn nav_overview(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Overview {},
        "{label}"
    })
}

fn nav_insights(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Insights {},
        "{label}"
    })
}

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    use_hook(|| {
        ui::i18n::init();
        register_nav(NavBuilder {
            overview: nav_overview,
            insights: nav_insights,
        });
        platform::register_service_worker(SERVICE_WORKER);
    });
    use_context_provider(|| Signal::new(ui::i18n::current_language()));

    rsx! {
        document::Link { rel: "icon", href: FAVICON }
        document::Link { rel: "stylesheet", href: BASE_CSS }

        Router::<Route> {}
    }
}

/// Web layout: the shared shell and navbar around the routed view.
#[component]
fn WebShell() -> Element {
    rsx! {
        DashboardShell {
            AppNavbar {}
            Outlet::<Route> {}
        }
    }
}
