//! The worker loader must forward every lifecycle event and surface worker
//! failures.

const SW_JS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/public/sw.js"));

#[test]
fn loader_forwards_lifecycle_events() {
    for (event, handoff) in [
        ("'install'", "install()"),
        ("'activate'", "activate()"),
        ("'fetch'", "handle_fetch(event.request)"),
    ] {
        assert!(SW_JS.contains(&format!("addEventListener({event}")), "{event} listener missing");
        assert!(SW_JS.contains(handoff), "{handoff} not called");
    }
}

#[test]
fn loader_reports_worker_failures() {
    for event in ["'error'", "'unhandledrejection'"] {
        assert!(SW_JS.contains(&format!("addEventListener({event}")), "{event} listener missing");
    }
    assert!(SW_JS.contains("report_error(message)"));
    assert!(SW_JS.contains("console.error(message)"));
}
