use dioxus::logger::tracing::debug;
use dioxus::prelude::*;
use once_cell::sync::OnceCell;

use super::shell::toggle_theme;
use crate::core::theme::Theme;
use crate::i18n;
use crate::t;

const NAVBAR_CSS: Asset = asset!("/assets/styling/navbar.css");
const NAVBAR_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/styling/navbar.css"
));

/// Route links supplied by the launcher, which owns the `Route` enum.
///
/// Each builder receives the localized label and returns a `Link` that
/// already contains it:
///
/// ```ignore
/// register_nav(NavBuilder {
///     overview: |label| rsx!( Link { class: "navbar__link", to: Route::Overview {}, "{label}" } ),
///     insights: |label| rsx!( Link { class: "navbar__link", to: Route::Insights {}, "{label}" } ),
/// });
/// ```
pub struct NavBuilder {
    pub overview: fn(label: &str) -> Element,
    pub insights: fn(label: &str) -> Element,
}

static NAV_BUILDER: OnceCell<NavBuilder> = OnceCell::new();

pub fn register_nav(builder: NavBuilder) {
    let _ = NAV_BUILDER.set(builder);
}

#[component]
pub fn AppNavbar(children: Element) -> Element {
    i18n::init();

    let mut current_lang = use_signal(i18n::current_language);
    let langs = use_signal(i18n::available_languages);
    let show_switcher = langs().len() > 1;
    let lang_code_ctx: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let _lang_marker = lang_code_ctx.as_ref().map(|c| c()).unwrap_or_default();
    let theme = try_use_context::<Signal<Theme>>();

    let on_change = move |evt: dioxus::events::FormEvent| {
        let val = evt.value();
        if i18n::set_language(&val).is_ok() {
            debug!("language -> {val}");
            current_lang.set(val.clone());
            if let Some(mut code) = lang_code_ctx {
                code.set(val);
            }
        }
    };

    let internal_nav = NAV_BUILDER.get().map(|b| {
        let overview = (b.overview)(&t!("nav-overview"));
        let insights = (b.insights)(&t!("nav-insights"));
        rsx! {
            nav { class: "navbar__links",
                {overview}
                {insights}
            }
        }
    });

    let toggle_label = match theme.map(|t| t()) {
        Some(Theme::Dark) => t!("theme-toggle-light"),
        _ => t!("theme-toggle-dark"),
    };
    let toggle_icon = match theme.map(|t| t()) {
        Some(Theme::Dark) => "fa-solid fa-sun",
        _ => "fa-solid fa-moon",
    };

    rsx! {
        document::Link { rel: "stylesheet", href: NAVBAR_CSS }
        if cfg!(all(not(debug_assertions), not(target_arch = "wasm32"))) {
            document::Style { "{NAVBAR_CSS_INLINE}" }
        }

        header {
            id: "navbar",
            class: "navbar",
            div { style: "display:none", "{_lang_marker}" }
            div { class: "navbar__inner",
                div { class: "navbar__brand",
                    span { class: "navbar__brand-link",
                        i { class: "fa-solid fa-chart-line navbar__brand-mark-icon", aria_hidden: "true" }
                        span { class: "navbar__brand-mark", "Pulseboard" }
                    }
                    span { class: "navbar__brand-subtitle", {t!("tagline")} }
                }

                if let Some(nav) = internal_nav {
                    {nav}
                } else {
                    nav { class: "navbar__links", {children} }
                }

                div { class: "navbar__actions",
                    if show_switcher {
                        div { class: "navbar__locale",
                            label {
                                class: "visually-hidden",
                                r#for: "locale-select",
                                {t!("nav-language-label")}
                            }
                            select {
                                id: "locale-select",
                                value: "{current_lang()}",
                                oninput: on_change,
                                for code in langs() {
                                    option { key: "{code}", value: "{code}", "{code}" }
                                }
                            }
                        }
                    }
                    if let Some(theme) = theme {
                        button {
                            id: "theme-toggle",
                            class: "button button--ghost navbar__theme-toggle",
                            title: "{toggle_label}",
                            aria_label: "{toggle_label}",
                            onclick: move |_| toggle_theme(theme),
                            i { class: toggle_icon, aria_hidden: "true" }
                        }
                    }
                }
            }
        }
    }
}
