use std::collections::BTreeMap;
use std::rc::Rc;

use dioxus::logger::tracing::{debug, error, info, warn};

use super::backend::{ChartBackend, RenderStyle};
use super::lifecycle::SlotState;
use super::spec::ChartSpec;
use super::{table, Slot};
use crate::core::{config::DashboardConfig, error::ChartError, metric::Period, theme::Theme};
use crate::data::DashboardData;

/// Outcome of building every slot.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BuildReport {
    pub built: Vec<Slot>,
    /// Slots whose canvas isn't on the page.
    pub skipped: Vec<Slot>,
    pub failed: Vec<(Slot, ChartError)>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }

    pub fn error_for(&self, slot: Slot) -> Option<&ChartError> {
        self.failed
            .iter()
            .find(|(failed, _)| *failed == slot)
            .map(|(_, err)| err)
    }
}

struct SlotEntry<I> {
    state: SlotState,
    period: Period,
    spec: Option<ChartSpec>,
    instance: Option<I>,
}

impl<I> SlotEntry<I> {
    fn new(period: Period) -> Self {
        Self {
            state: SlotState::Absent,
            period,
            spec: None,
            instance: None,
        }
    }

    fn advance(&mut self, slot: Slot, next: SlotState) -> Result<(), ChartError> {
        self.state = self.state.transition(slot, next)?;
        debug!("chart `{slot}` -> {next:?}");
        Ok(())
    }
}

/// Owns every chart on the overview page. At most one instance per slot.
pub struct ChartController<B: ChartBackend> {
    backend: B,
    data: Rc<DashboardData>,
    theme: Theme,
    animation_ms: u32,
    animations_on: bool,
    default_period: Period,
    slots: BTreeMap<Slot, SlotEntry<B::Instance>>,
}

impl<B: ChartBackend> ChartController<B> {
    pub fn new(backend: B, data: Rc<DashboardData>, config: &DashboardConfig, theme: Theme) -> Self {
        Self {
            backend,
            data,
            theme,
            animation_ms: config.animation_ms,
            animations_on: true,
            default_period: config.default_period,
            slots: BTreeMap::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn state(&self, slot: Slot) -> SlotState {
        self.slots.get(&slot).map_or(SlotState::Absent, |e| e.state)
    }

    /// Period the slot shows, or the configured default before any selection.
    pub fn period(&self, slot: Slot) -> Period {
        self.slots.get(&slot).map_or(self.default_period, |e| e.period)
    }

    pub fn spec(&self, slot: Slot) -> Option<&ChartSpec> {
        self.slots.get(&slot).and_then(|e| e.spec.as_ref())
    }

    pub fn live_slots(&self) -> Vec<Slot> {
        self.slots
            .iter()
            .filter(|(_, entry)| entry.state.is_live())
            .map(|(slot, _)| *slot)
            .collect()
    }

    fn style(&self) -> RenderStyle {
        RenderStyle {
            theme: self.theme,
            animation_ms: if self.animations_on { self.animation_ms } else { 0 },
        }
    }

    /// Render `spec` into the slot's canvas, disposing whatever was there.
    pub fn build(&mut self, slot: Slot, spec: ChartSpec) -> Result<(), ChartError> {
        let canvas_id = slot.canvas_id();
        if !self.backend.has_canvas(canvas_id) {
            warn!("canvas `{canvas_id}` not found; skipping chart `{slot}`");
            // The canvas went away under a live chart.
            self.dispose(slot);
            return Err(ChartError::MissingCanvas { slot, canvas_id });
        }

        self.dispose(slot);
        let style = self.style();
        let default_period = self.default_period;
        let entry = self
            .slots
            .entry(slot)
            .or_insert_with(|| SlotEntry::new(default_period));
        entry.advance(slot, SlotState::Building)?;

        match self.backend.create(canvas_id, &spec, style) {
            Ok(instance) => {
                entry.instance = Some(instance);
                entry.spec = Some(spec);
                entry.advance(slot, SlotState::Live)
            }
            Err(reason) => {
                error!("chart `{slot}` failed to build: {reason}");
                entry.spec = None;
                entry.advance(slot, SlotState::Absent)?;
                Err(ChartError::Backend { slot, reason })
            }
        }
    }

    /// Build `slot` from the configuration table for its current period.
    pub fn build_slot(&mut self, slot: Slot) -> Result<(), ChartError> {
        let spec = table::spec_for(slot, self.period(slot), &self.data)?;
        self.build(slot, spec)
    }

    /// Build every slot. One failure never stops the rest.
    pub fn build_all(&mut self) -> BuildReport {
        let mut report = BuildReport::default();
        for slot in Slot::ALL {
            match self.build_slot(slot) {
                Ok(()) => report.built.push(slot),
                Err(ChartError::MissingCanvas { .. }) => report.skipped.push(slot),
                Err(err) => report.failed.push((slot, err)),
            }
        }
        info!(
            "charts built: {} ok, {} skipped, {} failed",
            report.built.len(),
            report.skipped.len(),
            report.failed.len()
        );
        report
    }

    /// Swap the slot's data for the `period` window without rebuilding.
    pub fn rebind(&mut self, slot: Slot, period: Period) -> Result<(), ChartError> {
        let Some(entry) = self.slots.get_mut(&slot) else {
            warn!("can't rebind chart `{slot}`: not built");
            return Err(ChartError::NoInstance(slot));
        };
        let (Some(instance), Some(spec)) = (entry.instance.as_mut(), entry.spec.as_mut()) else {
            warn!("can't rebind chart `{slot}`: no live instance");
            return Err(ChartError::NoInstance(slot));
        };
        let (labels, primaries) = table::series_for(slot, period, &self.data)?;

        entry.state = entry.state.transition(slot, SlotState::Updating)?;
        let previous = spec.clone();
        spec.bind(labels, primaries);
        let result = self.backend.update(instance, spec);
        if result.is_err() {
            *spec = previous;
        } else {
            entry.period = period;
        }
        entry.advance(slot, SlotState::Live)?;
        result.map_err(|reason| {
            error!("chart `{slot}` failed to update: {reason}");
            ChartError::Backend { slot, reason }
        })
    }

    pub fn resize(&mut self, slot: Slot) -> Result<(), ChartError> {
        let instance = self
            .slots
            .get_mut(&slot)
            .and_then(|entry| entry.instance.as_mut())
            .ok_or(ChartError::NoInstance(slot))?;
        self.backend.resize(instance);
        Ok(())
    }

    /// Resize every live chart, returning how many were touched.
    pub fn resize_all(&mut self) -> usize {
        let mut count = 0;
        for entry in self.slots.values_mut() {
            if let Some(instance) = entry.instance.as_mut() {
                self.backend.resize(instance);
                count += 1;
            }
        }
        count
    }

    /// Off while the page is hidden, back to the configured duration after.
    pub fn set_animations(&mut self, enabled: bool) {
        self.animations_on = enabled;
        let duration = self.style().animation_ms;
        for entry in self.slots.values_mut() {
            if let Some(instance) = entry.instance.as_mut() {
                self.backend.set_animation(instance, duration);
            }
        }
    }

    /// Page visibility changed. Hidden pages stop animating; on return the
    /// animations come back and every live chart is laid out again.
    pub fn on_visibility(&mut self, hidden: bool) {
        if hidden {
            self.set_animations(false);
        } else {
            self.set_animations(true);
            self.resize_all();
        }
    }

    /// Tear down and rebuild every chart with `theme`'s colors.
    pub fn rebuild_all(&mut self, theme: Theme) -> BuildReport {
        info!("rebuilding charts for {theme} theme");
        self.theme = theme;
        self.build_all()
    }

    pub fn dispose(&mut self, slot: Slot) {
        let Some(entry) = self.slots.get_mut(&slot) else {
            return;
        };
        if let Some(instance) = entry.instance.take() {
            self.backend.destroy(instance);
            if let Err(err) = entry.advance(slot, SlotState::Disposed) {
                warn!("{err}");
            }
        }
        entry.spec = None;
    }

    pub fn dispose_all(&mut self) {
        let slots: Vec<Slot> = self.slots.keys().copied().collect();
        for slot in slots {
            self.dispose(slot);
        }
    }
}

impl<B: ChartBackend> Drop for ChartController<B> {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::HeadlessBackend;
    use crate::data::tests::seeded;

    fn controller() -> ChartController<HeadlessBackend> {
        let backend = HeadlessBackend::with_canvases(Slot::ALL.iter().map(|s| s.canvas_id()));
        ChartController::new(
            backend,
            Rc::new(seeded()),
            &DashboardConfig::default(),
            Theme::Light,
        )
    }

    #[test]
    fn build_all_goes_live() {
        let mut charts = controller();
        let report = charts.build_all();
        assert!(report.is_clean(), "{report:?}");
        assert_eq!(report.built.len(), Slot::ALL.len());
        assert_eq!(charts.backend().live_count(), Slot::ALL.len());
        assert!(Slot::ALL.iter().all(|s| charts.state(*s) == SlotState::Live));
    }

    #[test]
    fn rebuilding_a_slot_never_leaves_two_instances() {
        let mut charts = controller();
        charts.build_slot(Slot::Uptime).unwrap();
        charts.build_slot(Slot::Uptime).unwrap();
        assert_eq!(charts.backend().live_on("uptime-chart"), 1);
        assert_eq!(charts.backend().destroyed(), 1);
    }

    #[test]
    fn rebind_switches_period_in_place() {
        let mut charts = controller();
        charts.build_slot(Slot::Errors).unwrap();
        charts.rebind(Slot::Errors, Period::Quarter).unwrap();
        assert_eq!(charts.period(Slot::Errors), Period::Quarter);
        let chart = charts.backend().chart_on("errors-chart").unwrap();
        assert_eq!(chart.updates, 1);
        assert_eq!(chart.spec.labels.len(), 90);
        assert_eq!(charts.backend().destroyed(), 0);
    }

    #[test]
    fn rebind_without_instance_fails() {
        let mut charts = controller();
        assert_eq!(
            charts.rebind(Slot::Uptime, Period::Month),
            Err(ChartError::NoInstance(Slot::Uptime))
        );
    }

    #[test]
    fn hidden_page_turns_animation_off() {
        let mut charts = controller();
        charts.build_slot(Slot::Uptime).unwrap();
        charts.set_animations(false);
        assert_eq!(charts.backend().chart_on("uptime-chart").unwrap().animation_ms, 0);
        charts.set_animations(true);
        assert_eq!(charts.backend().chart_on("uptime-chart").unwrap().animation_ms, 400);
    }

    #[test]
    fn theme_change_rebuilds_everything() {
        let mut charts = controller();
        charts.build_all();
        let report = charts.rebuild_all(Theme::Dark);
        assert_eq!(report.built.len(), Slot::ALL.len());
        assert_eq!(charts.backend().destroyed() as usize, Slot::ALL.len());
        assert_eq!(charts.backend().live_count(), Slot::ALL.len());
        assert_eq!(
            charts.backend().chart_on("uptime-chart").unwrap().theme,
            Theme::Dark
        );
    }

    #[test]
    fn dispose_all_clears_backend() {
        let mut charts = controller();
        charts.build_all();
        charts.dispose_all();
        assert_eq!(charts.backend().live_count(), 0);
        assert_eq!(charts.state(Slot::Uptime), SlotState::Disposed);
        assert!(charts.live_slots().is_empty());
    }
}
