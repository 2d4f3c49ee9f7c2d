use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use dioxus::logger::tracing::{error, warn};
use dioxus::prelude::*;

use crate::charts::{platform_backend, BuildReport, ChartController, PlatformBackend, Slot};
use crate::components::shell::{export_csv_action, export_pdf_action, DashboardContext};
use crate::components::Notifications;
use crate::core::{
    config::DashboardConfig,
    format::format_value,
    metric::{Metric, Period, Tier},
    platform::{self, EventSource},
    theme::Theme,
    timing::{sleep_ms, Debouncer},
};
use crate::data::DashboardData;
use crate::t;

type SharedController = Rc<RefCell<ChartController<PlatformBackend>>>;

const CARD_METRICS: [Metric; 4] = [
    Metric::Uptime,
    Metric::ErrorRate,
    Metric::LostRevenue,
    Metric::ResponseTime,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlay {
    Visible,
    Fading,
    Hidden,
}

#[component]
pub fn Overview() -> Element {
    let context = use_context::<DashboardContext>();
    let _lang = try_use_context::<Signal<String>>().map(|s| s());

    let data = match context.data.clone() {
        Ok(data) => data,
        Err(reason) => {
            return rsx! {
                FatalOverlay { message: t!("fatal-data", reason = reason) }
            }
        }
    };
    if !platform::charting_library_loaded() {
        error!("Chart.js is not loaded; charts can't be drawn");
        return rsx! {
            FatalOverlay { message: t!("fatal-chart-library") }
        };
    }

    rsx! {
        OverviewPage { data: DataHandle(data), config: context.config }
    }
}

/// Pointer-equality wrapper so the data table can be a component prop.
#[derive(Clone)]
struct DataHandle(Rc<DashboardData>);

impl PartialEq for DataHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[component]
fn OverviewPage(data: DataHandle, config: &'static DashboardConfig) -> Element {
    let data = data.0;
    let theme = use_context::<Signal<Theme>>();
    let notifications = use_context::<Notifications>();

    let controller: SharedController = use_hook({
        let data = data.clone();
        move || {
            Rc::new(RefCell::new(ChartController::new(
                platform_backend(),
                data,
                config,
                *theme.peek(),
            )))
        }
    });
    let mut failures = use_signal(BTreeMap::<Slot, String>::new);
    let mut overlay = use_signal(|| Overlay::Visible);
    let periods = use_signal(|| {
        Slot::ALL
            .into_iter()
            .filter(|slot| slot.has_period_selector())
            .map(|slot| (slot, config.default_period))
            .collect::<BTreeMap<_, _>>()
    });

    let resize_watch = use_hook(|| Rc::new(RefCell::new(None::<platform::ResizeWatch>)));

    // First build and theme rebuilds. Runs after the canvases are mounted.
    {
        let controller = controller.clone();
        let resize_watch = resize_watch.clone();
        let container_debouncer = Debouncer::new();
        use_effect(move || {
            let theme = theme();
            let report: BuildReport = {
                let mut charts = controller.borrow_mut();
                if charts.theme() != theme {
                    charts.rebuild_all(theme)
                } else if charts.live_slots().is_empty() {
                    charts.build_all()
                } else {
                    return;
                }
            };
            if resize_watch.borrow().is_none() {
                let controller = controller.clone();
                let debouncer = container_debouncer.clone();
                *resize_watch.borrow_mut() = platform::observe_resize(".chart-card__body", move || {
                    let controller = controller.clone();
                    debouncer.schedule(config.observer_debounce_ms, move || {
                        controller.borrow_mut().resize_all();
                    });
                });
            }
            failures.set(
                report
                    .failed
                    .iter()
                    .map(|(slot, err)| (*slot, err.to_string()))
                    .collect(),
            );
            if *overlay.peek() == Overlay::Visible {
                spawn(async move {
                    sleep_ms(config.overlay_fade_delay_ms).await;
                    overlay.set(Overlay::Fading);
                    sleep_ms(config.overlay_fade_ms).await;
                    overlay.set(Overlay::Hidden);
                });
            }
        });
    }

    // Window resize / rotation (debounced) and page visibility.
    use_hook({
        let controller = controller.clone();
        move || {
            let debouncer = Debouncer::new();
            let relayout = {
                let controller = controller.clone();
                move |_: platform::DomEvent| {
                    let controller = controller.clone();
                    debouncer.schedule(config.resize_debounce_ms, move || {
                        controller.borrow_mut().resize_all();
                    });
                }
            };
            let visibility = move |_: platform::DomEvent| {
                controller.borrow_mut().on_visibility(platform::page_hidden());
            };
            Rc::new(
                [
                    platform::listen(EventSource::Window, "resize", relayout.clone()),
                    platform::listen(EventSource::Window, "orientationchange", relayout),
                    platform::listen(EventSource::Document, "visibilitychange", visibility),
                ]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>(),
            )
        }
    });

    {
        let controller = controller.clone();
        use_drop(move || controller.borrow_mut().dispose_all());
    }

    let on_period = {
        let controller = controller.clone();
        move |slot: Slot, raw: String| {
            let mut periods = periods;
            match raw.parse::<Period>() {
                Ok(period) => match controller.borrow_mut().rebind(slot, period) {
                    Ok(()) => {
                        periods.write().insert(slot, period);
                    }
                    Err(err) => warn!("{err}"),
                },
                Err(err) => warn!("{err}"),
            }
        }
    };

    let supplier = &data.supplier;
    let status_label = match supplier.status {
        crate::data::SupplierStatus::Online => t!("status-online"),
        crate::data::SupplierStatus::Degraded => t!("status-degraded"),
        crate::data::SupplierStatus::Offline => t!("status-offline"),
    };
    let overlay_class = match overlay() {
        Overlay::Visible => "loading-overlay",
        Overlay::Fading => "loading-overlay loading-overlay--fading",
        Overlay::Hidden => "loading-overlay loading-overlay--hidden",
    };
    let badge_class = format!("status-badge {}", supplier.status.css_class());
    let export_data = data.clone();

    rsx! {
        section { class: "page page-overview",
            div { id: "loading-overlay", class: overlay_class, aria_hidden: overlay() == Overlay::Hidden,
                div { class: "loading-overlay__spinner" }
                p { {t!("loading")} }
            }

            header { class: "overview__header",
                div { class: "overview__supplier",
                    h1 { "{supplier.name}" }
                    p { class: "overview__meta",
                        {t!("supplier-id", id = supplier.id.clone())}
                        " · "
                        {t!("supplier-updated", when = supplier.last_updated.clone())}
                    }
                }
                span { class: "{badge_class}", "{status_label}" }
                div { class: "overview__actions",
                    button {
                        class: "button button--primary",
                        onclick: move |_| export_csv_action(Some(export_data.as_ref()), notifications),
                        i { class: "fa-solid fa-file-csv", aria_hidden: "true" }
                        " "
                        {t!("export-csv")}
                    }
                    button {
                        class: "button button--ghost",
                        onclick: move |_| export_pdf_action(notifications),
                        i { class: "fa-solid fa-file-pdf", aria_hidden: "true" }
                        " "
                        {t!("export-pdf")}
                    }
                }
            }

            div { class: "metric-cards",
                for metric in CARD_METRICS {
                    MetricCard {
                        key: "{metric:?}",
                        metric,
                        value: data.headline(metric, "30d"),
                        goal: data.goal(metric),
                    }
                }
            }

            div { class: "chart-grid",
                for slot in Slot::ALL {
                    ChartCard {
                        key: "{slot}",
                        slot,
                        period: periods().get(&slot).copied(),
                        failure: failures().get(&slot).cloned(),
                        on_period: {
                            let on_period = on_period.clone();
                            move |raw: String| on_period(slot, raw)
                        },
                    }
                }
            }
        }
    }
}

pub(crate) fn metric_label(metric: Metric) -> String {
    match metric {
        Metric::Uptime => t!("card-uptime"),
        Metric::ErrorRate => t!("card-error-rate"),
        Metric::LostRevenue => t!("card-lost-revenue"),
        Metric::ResponseTime => t!("card-response-time"),
        Metric::Revenue => t!("metric-revenue"),
        Metric::Visits => t!("metric-visits"),
        Metric::Conversion => t!("metric-conversion"),
        Metric::Tickets => t!("metric-tickets"),
    }
}

fn tier_label(tier: Tier) -> String {
    match tier {
        Tier::Good => t!("tier-good"),
        Tier::Warning => t!("tier-warning"),
        Tier::Critical => t!("tier-critical"),
    }
}

#[component]
fn MetricCard(metric: Metric, value: Option<f64>, goal: Option<f64>) -> Element {
    let tier = value.and_then(|v| metric.tier(v));
    let class = match tier {
        Some(tier) => format!("metric-card {}", tier.css_class()),
        None => "metric-card".to_string(),
    };
    let shown = value.map_or_else(|| "—".to_string(), |v| format_value(metric, v));

    rsx! {
        article { class: "{class}",
            h3 { class: "metric-card__label", {metric_label(metric)} }
            p { class: "metric-card__value", "{shown}" }
            p { class: "metric-card__window", {t!("card-window-30d")} }
            if let Some(tier) = tier {
                span { class: "metric-card__tier", {tier_label(tier)} }
            }
            if let Some(goal) = goal {
                p { class: "metric-card__goal",
                    {t!("card-goal", goal = format_value(metric, goal))}
                }
            }
        }
    }
}

fn chart_title(slot: Slot) -> String {
    match slot {
        Slot::RevenueTravel => t!("chart-revenue-travel"),
        Slot::SourceMarkets => t!("chart-source-markets"),
        Slot::RevenuePurchase => t!("chart-revenue-purchase"),
        Slot::VisitorsConversion => t!("chart-visitors-cr"),
        Slot::Uptime => t!("chart-uptime"),
        Slot::Errors => t!("chart-errors"),
        Slot::LostRevenue => t!("chart-lost-revenue"),
    }
}

fn period_label(period: Period) -> String {
    match period {
        Period::Week => t!("period-7"),
        Period::Month => t!("period-30"),
        Period::Quarter => t!("period-90"),
    }
}

#[component]
fn ChartCard(
    slot: Slot,
    period: Option<Period>,
    failure: Option<String>,
    on_period: EventHandler<String>,
) -> Element {
    rsx! {
        article { class: "chart-card chart-card--{slot}",
            header { class: "chart-card__header",
                h3 { class: "chart-card__title", {chart_title(slot)} }
                if let (Some(select_id), Some(current)) = (slot.period_selector_id(), period) {
                    label { class: "visually-hidden", r#for: select_id, {t!("period-label")} }
                    select {
                        id: select_id,
                        class: "chart-card__period",
                        value: current.key(),
                        onchange: move |evt: FormEvent| on_period.call(evt.value()),
                        for choice in Period::ALL {
                            option { key: "{choice:?}", value: choice.key(), {period_label(choice)} }
                        }
                    }
                }
            }
            div { class: "chart-card__body",
                canvas { id: slot.canvas_id() }
                if let Some(reason) = failure {
                    div { class: "chart-card__placeholder", role: "alert",
                        i { class: "fa-solid fa-triangle-exclamation", aria_hidden: "true" }
                        p { {t!("chart-unavailable", reason = reason)} }
                    }
                }
            }
        }
    }
}

#[component]
pub fn FatalOverlay(message: String) -> Element {
    rsx! {
        div { class: "fatal-overlay", role: "alert",
            div { class: "fatal-overlay__panel",
                i { class: "fa-solid fa-circle-exclamation fatal-overlay__icon", aria_hidden: "true" }
                h2 { {t!("fatal-title")} }
                p { "{message}" }
                button {
                    class: "button button--primary",
                    onclick: move |_| platform::reload_page(),
                    {t!("reload")}
                }
            }
        }
    }
}
