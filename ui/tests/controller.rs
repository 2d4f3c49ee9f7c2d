//! Chart controller behavior against the headless backend: rebinding keeps
//! configuration, missing canvases are skipped, failures stay in their slot.

use std::rc::Rc;

use ui::charts::{
    ChartBackend, ChartController, ChartSpec, HeadlessBackend, HeadlessInstance, RenderStyle,
    Slot, SlotState,
};
use ui::core::{
    config::DashboardConfig,
    error::ChartError,
    metric::{Metric, Period},
    theme::Theme,
};
use ui::data::DashboardData;

fn data() -> Rc<DashboardData> {
    Rc::new(DashboardData::load(Some(42)).expect("embedded data decodes"))
}

fn controller_with<B: ChartBackend>(backend: B) -> ChartController<B> {
    ChartController::new(backend, data(), &DashboardConfig::default(), Theme::Light)
}

fn full_page() -> HeadlessBackend {
    HeadlessBackend::with_canvases(Slot::ALL.iter().map(|slot| slot.canvas_id()))
}

#[test]
fn rebind_changes_only_labels_and_values() {
    let mut charts = controller_with(full_page());
    charts.build_slot(Slot::Uptime).unwrap();

    let before = charts.backend().chart_on("uptime-chart").unwrap().clone();
    charts.rebind(Slot::Uptime, Period::Month).unwrap();
    let after = charts.backend().chart_on("uptime-chart").unwrap();

    assert_eq!(before.spec.shape(), after.spec.shape());
    assert_eq!(before.config["options"], after.config["options"]);
    assert_eq!(before.config["type"], after.config["type"]);
    for (old, new) in before.config["data"]["datasets"]
        .as_array()
        .unwrap()
        .iter()
        .zip(after.config["data"]["datasets"].as_array().unwrap())
    {
        assert_eq!(old["label"], new["label"]);
        assert_eq!(old["borderColor"], new["borderColor"]);
        assert_eq!(old["borderDash"], new["borderDash"]);
    }

    let month = data().series(Metric::Uptime, Period::Month).unwrap().len();
    assert_eq!(before.spec.labels.len(), 7);
    assert_eq!(after.spec.labels.len(), month);
    assert!(after.spec.datasets.iter().all(|d| d.values.len() == month));
}

#[test]
fn last_rebind_wins() {
    let mut charts = controller_with(full_page());
    charts.build_slot(Slot::LostRevenue).unwrap();
    for period in [Period::Month, Period::Quarter, Period::Week] {
        charts.rebind(Slot::LostRevenue, period).unwrap();
    }
    assert_eq!(charts.period(Slot::LostRevenue), Period::Week);
    let chart = charts.backend().chart_on("lost-revenue-chart").unwrap();
    assert_eq!(chart.updates, 3);
    assert_eq!(chart.spec.labels.len(), 7);
    assert_eq!(charts.state(Slot::LostRevenue), SlotState::Live);
}

#[test]
fn missing_canvas_registers_nothing() {
    let mut backend = full_page();
    backend.remove_canvas("errors-chart");
    let mut charts = controller_with(backend);

    let err = charts.build_slot(Slot::Errors).unwrap_err();
    assert!(matches!(err, ChartError::MissingCanvas { slot: Slot::Errors, .. }));
    assert_eq!(charts.state(Slot::Errors), SlotState::Absent);
    assert_eq!(charts.backend().live_count(), 0);
    assert!(charts.live_slots().is_empty());

    let report = charts.build_all();
    assert_eq!(report.skipped, vec![Slot::Errors]);
    assert!(report.failed.is_empty());
    assert_eq!(charts.backend().live_count(), Slot::ALL.len() - 1);
}

#[test]
fn canvas_removed_under_live_chart_disposes_it() {
    let mut charts = controller_with(full_page());
    charts.build_slot(Slot::Uptime).unwrap();
    charts.backend_mut().remove_canvas("uptime-chart");

    assert!(charts.build_slot(Slot::Uptime).is_err());
    assert_eq!(charts.backend().live_on("uptime-chart"), 0);
    assert_eq!(charts.state(Slot::Uptime), SlotState::Disposed);
    assert_eq!(
        charts.rebind(Slot::Uptime, Period::Month),
        Err(ChartError::NoInstance(Slot::Uptime))
    );
}

/// Headless backend that refuses to draw on one canvas.
struct FailingOn {
    inner: HeadlessBackend,
    canvas_id: &'static str,
}

impl ChartBackend for FailingOn {
    type Instance = HeadlessInstance;

    fn has_canvas(&self, canvas_id: &str) -> bool {
        self.inner.has_canvas(canvas_id)
    }

    fn create(
        &mut self,
        canvas_id: &str,
        spec: &ChartSpec,
        style: RenderStyle,
    ) -> Result<HeadlessInstance, String> {
        if canvas_id == self.canvas_id {
            return Err("context lost".into());
        }
        self.inner.create(canvas_id, spec, style)
    }

    fn update(&mut self, instance: &mut HeadlessInstance, spec: &ChartSpec) -> Result<(), String> {
        self.inner.update(instance, spec)
    }

    fn resize(&mut self, instance: &mut HeadlessInstance) {
        self.inner.resize(instance)
    }

    fn set_animation(&mut self, instance: &mut HeadlessInstance, duration_ms: u32) {
        self.inner.set_animation(instance, duration_ms)
    }

    fn destroy(&mut self, instance: HeadlessInstance) {
        self.inner.destroy(instance)
    }
}

#[test]
fn one_failing_chart_does_not_stop_the_rest() {
    let mut charts = controller_with(FailingOn {
        inner: full_page(),
        canvas_id: "source-markets-chart",
    });

    let report = charts.build_all();
    assert_eq!(report.built.len(), Slot::ALL.len() - 1);
    assert!(report.skipped.is_empty());
    assert!(matches!(
        report.error_for(Slot::SourceMarkets),
        Some(ChartError::Backend { slot: Slot::SourceMarkets, reason }) if reason == "context lost"
    ));
    assert_eq!(charts.state(Slot::SourceMarkets), SlotState::Absent);
    assert!(charts.spec(Slot::SourceMarkets).is_none());
    assert_eq!(charts.backend().inner.live_count(), Slot::ALL.len() - 1);
}

#[test]
fn resize_touches_only_live_charts() {
    let mut backend = full_page();
    backend.remove_canvas("visitors-cr-chart");
    let mut charts = controller_with(backend);
    charts.build_all();

    assert_eq!(charts.resize_all(), Slot::ALL.len() - 1);
    assert_eq!(charts.backend().chart_on("uptime-chart").unwrap().resizes, 1);
    assert_eq!(
        charts.resize(Slot::VisitorsConversion),
        Err(ChartError::NoInstance(Slot::VisitorsConversion))
    );
}

#[test]
fn uptime_week_overlays_constant_benchmark() {
    let mut charts = controller_with(full_page());
    charts.build_slot(Slot::Uptime).unwrap();

    let chart = charts.backend().chart_on("uptime-chart").unwrap();
    let datasets = chart.config["data"]["datasets"].as_array().unwrap();
    assert_eq!(datasets.len(), 2);
    let primary: Vec<f64> = datasets[0]["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_f64())
        .collect();
    assert_eq!(primary, vec![98.2, 97.8, 99.1, 96.5, 97.2, 98.9, 96.2]);
    let benchmark: Vec<f64> = datasets[1]["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_f64())
        .collect();
    assert_eq!(benchmark, vec![95.3; 7]);
}

#[test]
fn hidden_page_stops_animations_without_relayout() {
    let mut charts = controller_with(full_page());
    charts.build_all();

    charts.on_visibility(true);
    for slot in Slot::ALL {
        let chart = charts.backend().chart_on(slot.canvas_id()).unwrap();
        assert_eq!(chart.animation_ms, 0, "{slot}");
        assert_eq!(chart.resizes, 0, "{slot}");
    }
}

#[test]
fn visible_page_restores_animations_and_relayouts() {
    let mut backend = full_page();
    backend.remove_canvas("errors-chart");
    let mut charts = controller_with(backend);
    charts.build_all();

    charts.on_visibility(true);
    charts.on_visibility(false);

    for slot in charts.live_slots() {
        let chart = charts.backend().chart_on(slot.canvas_id()).unwrap();
        assert_eq!(chart.animation_ms, 400, "{slot}");
        assert_eq!(chart.resizes, 1, "{slot}");
    }
    assert_eq!(charts.live_slots().len(), Slot::ALL.len() - 1);
    assert!(charts.backend().chart_on("errors-chart").is_none());
}
