use std::collections::{BTreeMap, BTreeSet};

use dioxus::logger::tracing::debug;
use serde_json::Value;

use super::chartjs;
use super::spec::ChartSpec;
use crate::core::theme::Theme;

/// Rendering parameters that aren't part of the chart's own spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStyle {
    pub theme: Theme,
    pub animation_ms: u32,
}

/// A rendering library the controller drives. Errors are plain reasons; the
/// controller attaches the slot.
pub trait ChartBackend {
    type Instance;

    fn has_canvas(&self, canvas_id: &str) -> bool;

    fn create(
        &mut self,
        canvas_id: &str,
        spec: &ChartSpec,
        style: RenderStyle,
    ) -> Result<Self::Instance, String>;

    /// Swap labels and values in place and redraw.
    fn update(&mut self, instance: &mut Self::Instance, spec: &ChartSpec) -> Result<(), String>;

    fn resize(&mut self, instance: &mut Self::Instance);

    fn set_animation(&mut self, instance: &mut Self::Instance, duration_ms: u32);

    fn destroy(&mut self, instance: Self::Instance);
}

/// Handle to a chart held by [`HeadlessBackend`].
#[derive(Debug, PartialEq, Eq)]
pub struct HeadlessInstance(u64);

/// What the headless backend knows about one rendered chart.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessChart {
    pub canvas_id: String,
    pub spec: ChartSpec,
    pub config: Value,
    pub theme: Theme,
    pub animation_ms: u32,
    pub updates: u32,
    pub resizes: u32,
}

/// In-memory backend for native builds and tests. Keeps the Chart.js config
/// each chart would have been created with.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    canvases: BTreeSet<String>,
    charts: BTreeMap<u64, HeadlessChart>,
    next_id: u64,
    destroyed: u32,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvases<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut backend = Self::new();
        for id in ids {
            backend.add_canvas(id);
        }
        backend
    }

    pub fn add_canvas(&mut self, canvas_id: &str) {
        self.canvases.insert(canvas_id.to_string());
    }

    pub fn remove_canvas(&mut self, canvas_id: &str) {
        self.canvases.remove(canvas_id);
    }

    /// Charts currently alive, across all canvases.
    pub fn live_count(&self) -> usize {
        self.charts.len()
    }

    pub fn live_on(&self, canvas_id: &str) -> usize {
        self.charts
            .values()
            .filter(|chart| chart.canvas_id == canvas_id)
            .count()
    }

    pub fn chart_on(&self, canvas_id: &str) -> Option<&HeadlessChart> {
        self.charts.values().find(|chart| chart.canvas_id == canvas_id)
    }

    pub fn destroyed(&self) -> u32 {
        self.destroyed
    }

    fn chart_mut(&mut self, instance: &HeadlessInstance) -> Option<&mut HeadlessChart> {
        self.charts.get_mut(&instance.0)
    }
}

impl ChartBackend for HeadlessBackend {
    type Instance = HeadlessInstance;

    fn has_canvas(&self, canvas_id: &str) -> bool {
        self.canvases.contains(canvas_id)
    }

    fn create(
        &mut self,
        canvas_id: &str,
        spec: &ChartSpec,
        style: RenderStyle,
    ) -> Result<HeadlessInstance, String> {
        if !self.has_canvas(canvas_id) {
            return Err(format!("no canvas `{canvas_id}`"));
        }
        spec.validate()?;
        if self.live_on(canvas_id) > 0 {
            return Err(format!("canvas `{canvas_id}` is already in use"));
        }

        let id = self.next_id;
        self.next_id += 1;
        self.charts.insert(
            id,
            HeadlessChart {
                canvas_id: canvas_id.to_string(),
                spec: spec.clone(),
                config: chartjs::config(spec, style.theme, style.animation_ms),
                theme: style.theme,
                animation_ms: style.animation_ms,
                updates: 0,
                resizes: 0,
            },
        );
        debug!("headless chart #{id} created on `{canvas_id}`");
        Ok(HeadlessInstance(id))
    }

    fn update(&mut self, instance: &mut HeadlessInstance, spec: &ChartSpec) -> Result<(), String> {
        spec.validate()?;
        let chart = self
            .chart_mut(instance)
            .ok_or_else(|| format!("chart #{} was destroyed", instance.0))?;
        chart.config["data"] = chartjs::data(spec, chart.theme);
        chart.spec = spec.clone();
        chart.updates += 1;
        Ok(())
    }

    fn resize(&mut self, instance: &mut HeadlessInstance) {
        if let Some(chart) = self.chart_mut(instance) {
            chart.resizes += 1;
        }
    }

    fn set_animation(&mut self, instance: &mut HeadlessInstance, duration_ms: u32) {
        if let Some(chart) = self.chart_mut(instance) {
            chart.animation_ms = duration_ms;
            chart.config["options"]["animation"]["duration"] = duration_ms.into();
        }
    }

    fn destroy(&mut self, instance: HeadlessInstance) {
        if self.charts.remove(&instance.0).is_some() {
            self.destroyed += 1;
        }
    }
}
