use dioxus::prelude::*;

use crate::components::shell::DashboardContext;
use crate::core::format::format_value;
use crate::core::metric::Metric;
use crate::data::{Alert, AlertKind, Benchmark, Priority, Recommendation};
use crate::t;

use super::overview::{metric_label, FatalOverlay};

#[component]
pub fn Insights() -> Element {
    let context = use_context::<DashboardContext>();
    let _lang = try_use_context::<Signal<String>>().map(|s| s());

    let data = match context.data {
        Ok(data) => data,
        Err(reason) => {
            return rsx! {
                FatalOverlay { message: t!("fatal-data", reason = reason) }
            }
        }
    };

    let mut recommendations = data.recommendations.clone();
    recommendations.sort_by_key(|rec| rec.priority);

    rsx! {
        section { class: "page page-insights",
            h1 { {t!("insights-title")} }

            section { class: "insights__panel",
                h2 { {t!("benchmarks-title")} }
                table { class: "benchmark-table",
                    thead {
                        tr {
                            th { {t!("benchmark-metric")} }
                            th { {t!("benchmark-you")} }
                            th { {t!("benchmark-industry")} }
                            th { {t!("benchmark-top")} }
                            th { {t!("benchmark-standing")} }
                        }
                    }
                    tbody {
                        for (metric, benchmark) in data.benchmarks.iter() {
                            BenchmarkRow { key: "{metric:?}", metric: *metric, benchmark: *benchmark }
                        }
                    }
                }
            }

            section { class: "insights__panel",
                h2 { {t!("recommendations-title")} }
                div { class: "recommendations",
                    for rec in recommendations {
                        RecommendationCard { key: "{rec.id}", rec }
                    }
                }
            }

            section { class: "insights__panel",
                h2 { {t!("alerts-title")} }
                ul { class: "alert-list",
                    for alert in data.alerts.iter().cloned() {
                        AlertItem { key: "{alert.id}", alert }
                    }
                }
            }
        }
    }
}

#[component]
fn BenchmarkRow(metric: Metric, benchmark: Benchmark) -> Element {
    let standing = match (benchmark.percentile, benchmark.potential_recovery) {
        (Some(percentile), _) => t!("benchmark-percentile", value = percentile.to_string()),
        (None, Some(recovery)) => {
            t!("benchmark-recovery", value = format_value(metric, recovery))
        }
        (None, None) => "—".to_string(),
    };
    let supplier_tier = metric
        .tier(benchmark.supplier)
        .map(|tier| tier.css_class())
        .unwrap_or_default();

    rsx! {
        tr {
            th { scope: "row", {metric_label(metric)} }
            td { class: "{supplier_tier}", {format_value(metric, benchmark.supplier)} }
            td { {format_value(metric, benchmark.industry_average)} }
            td { {format_value(metric, benchmark.top_performers)} }
            td { "{standing}" }
        }
    }
}

#[component]
fn RecommendationCard(rec: Recommendation) -> Element {
    let (priority_class, priority_label) = match rec.priority {
        Priority::High => ("priority priority--high", t!("priority-high")),
        Priority::Medium => ("priority priority--medium", t!("priority-medium")),
        Priority::Low => ("priority priority--low", t!("priority-low")),
    };

    rsx! {
        article { class: "recommendation",
            header { class: "recommendation__header",
                span { class: priority_class, "{priority_label}" }
                h3 { "{rec.title}" }
            }
            p { "{rec.description}" }
            dl { class: "recommendation__facts",
                dt { {t!("rec-impact")} }
                dd { "{rec.impact}" }
                dt { {t!("rec-effort")} }
                dd { "{rec.effort}" }
            }
            if !rec.actions.is_empty() {
                div { class: "recommendation__actions",
                    for action in rec.actions.iter() {
                        a {
                            key: "{action.url}",
                            class: "button button--ghost",
                            href: "{action.url}",
                            "{action.label}"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn AlertItem(alert: Alert) -> Element {
    let (class, icon) = match alert.kind {
        AlertKind::Error => ("alert alert--error", "fa-solid fa-circle-xmark"),
        AlertKind::Warning => ("alert alert--warning", "fa-solid fa-triangle-exclamation"),
        AlertKind::Info => ("alert alert--info", "fa-solid fa-circle-info"),
    };
    let state = if alert.resolved {
        t!("alert-resolved")
    } else {
        t!("alert-open")
    };

    rsx! {
        li { class: class,
            i { class: icon, aria_hidden: "true" }
            div { class: "alert__body",
                p { class: "alert__message", "{alert.message}" }
                p { class: "alert__meta",
                    time { datetime: "{alert.timestamp}", {alert.timestamp_label()} }
                    " · "
                    span { class: if alert.resolved { "alert__state alert__state--resolved" } else { "alert__state" }, "{state}" }
                }
            }
        }
    }
}
