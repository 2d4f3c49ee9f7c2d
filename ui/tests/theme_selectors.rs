//! Selector lint for the shared theme (`ui/assets/theme/main.css`) and the
//! navbar sheet. A renamed or dropped class otherwise only shows up as an
//! unstyled page at runtime.
//!
//! When a component's markup changes a class, update the lists below.

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/theme/main.css"
));

const NAVBAR_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/styling/navbar.css"
));

const REQUIRED_THEME_SELECTORS: &[&str] = &[
    // Global / layout
    ":root",
    "body {",
    ".app {",
    ".page {",
    ".theme-dark",
    ".visually-hidden",
    // Buttons
    ".button {",
    ".button--primary",
    ".button--ghost",
    // Overview
    ".overview__header",
    ".status-badge--online",
    ".status-badge--degraded",
    ".status-badge--offline",
    ".metric-cards",
    ".metric-card {",
    ".metric-card__value",
    ".tier--good",
    ".tier--warning",
    ".tier--critical",
    // Charts
    ".chart-grid",
    ".chart-card {",
    ".chart-card__body",
    ".chart-card__period",
    ".chart-card__placeholder",
    // Overlays
    ".loading-overlay {",
    ".loading-overlay--fading",
    ".loading-overlay--hidden",
    ".fatal-overlay",
    // Toasts
    ".toast-tray",
    ".toast--success",
    ".toast--info",
    ".toast--error",
    // Insights
    ".benchmark-table",
    ".recommendation {",
    ".priority--high",
    ".priority--medium",
    ".priority--low",
    ".alert-list",
    ".alert__state--resolved",
    // Responsive block
    "@media (max-width: 720px)",
];

const REQUIRED_NAVBAR_SELECTORS: &[&str] = &[
    ".navbar {",
    ".navbar__inner",
    ".navbar__links",
    ".navbar__link",
    ".navbar__actions",
    ".navbar__theme-toggle",
];

fn missing<'a>(css: &str, selectors: &[&'a str]) -> Vec<&'a str> {
    selectors
        .iter()
        .copied()
        .filter(|sel| !css.contains(sel))
        .collect()
}

#[test]
fn theme_contains_required_selectors() {
    let missing = missing(THEME_CSS, REQUIRED_THEME_SELECTORS);
    assert!(
        missing.is_empty(),
        "Missing {} selector(s) in main.css:\n{}",
        missing.len(),
        missing.join("\n")
    );
}

#[test]
fn navbar_contains_required_selectors() {
    let missing = missing(NAVBAR_CSS, REQUIRED_NAVBAR_SELECTORS);
    assert!(missing.is_empty(), "Missing in navbar.css: {missing:?}");
}

#[test]
fn dark_theme_overrides_every_surface_token() {
    let dark = THEME_CSS
        .split(".theme-dark {")
        .nth(1)
        .and_then(|rest| rest.split('}').next())
        .expect("dark theme block");
    for token in ["--color-bg", "--color-surface", "--color-text", "--color-border"] {
        assert!(dark.contains(token), "dark theme does not override {token}");
    }
}

#[test]
fn theme_not_trivially_empty() {
    let non_ws_len = THEME_CSS.chars().filter(|c| !c.is_whitespace()).count();
    assert!(
        non_ws_len > 4_000,
        "theme appears unexpectedly small ({non_ws_len} non-whitespace chars)"
    );
}
