//! Chart presentation: declarative specs, the slot configuration table, the
//! render backends and the controller that keeps one live instance per slot.

use std::fmt;
use std::str::FromStr;

use crate::core::error::ChartError;

mod backend;
pub mod chartjs;
mod controller;
mod lifecycle;
mod spec;
pub mod table;
#[cfg(target_arch = "wasm32")]
mod web;

pub use backend::{ChartBackend, HeadlessBackend, HeadlessChart, HeadlessInstance, RenderStyle};
pub use controller::{BuildReport, ChartController};
pub use lifecycle::SlotState;
pub use spec::{
    AxisId, AxisPosition, AxisSpec, ChartKind, ChartSpec, DatasetRole, DatasetSpec, GridStyle,
    IndexAxis, SeriesColor,
};
#[cfg(target_arch = "wasm32")]
pub use web::ChartJsBackend;

/// Backend used by the running app on this target.
#[cfg(target_arch = "wasm32")]
pub type PlatformBackend = ChartJsBackend;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformBackend = HeadlessBackend;

#[cfg(target_arch = "wasm32")]
pub fn platform_backend() -> PlatformBackend {
    ChartJsBackend::new()
}

/// Off the web every slot the overview renders counts as present.
#[cfg(not(target_arch = "wasm32"))]
pub fn platform_backend() -> PlatformBackend {
    HeadlessBackend::with_canvases(Slot::ALL.iter().map(|slot| slot.canvas_id()))
}


/// A named chart position in the layout, bound to one canvas element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    RevenueTravel,
    SourceMarkets,
    RevenuePurchase,
    VisitorsConversion,
    Uptime,
    Errors,
    LostRevenue,
}

impl Slot {
    pub const ALL: [Slot; 7] = [
        Slot::RevenueTravel,
        Slot::SourceMarkets,
        Slot::RevenuePurchase,
        Slot::VisitorsConversion,
        Slot::Uptime,
        Slot::Errors,
        Slot::LostRevenue,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Slot::RevenueTravel => "revenue-travel",
            Slot::SourceMarkets => "source-markets",
            Slot::RevenuePurchase => "revenue-purchase",
            Slot::VisitorsConversion => "visitors-cr",
            Slot::Uptime => "uptime",
            Slot::Errors => "errors",
            Slot::LostRevenue => "lost-revenue",
        }
    }

    pub fn canvas_id(self) -> &'static str {
        match self {
            Slot::RevenueTravel => "revenue-travel-chart",
            Slot::SourceMarkets => "source-markets-chart",
            Slot::RevenuePurchase => "revenue-purchase-chart",
            Slot::VisitorsConversion => "visitors-cr-chart",
            Slot::Uptime => "uptime-chart",
            Slot::Errors => "errors-chart",
            Slot::LostRevenue => "lost-revenue-chart",
        }
    }

    /// Id of the period `<select>` for charts that offer one.
    pub fn period_selector_id(self) -> Option<&'static str> {
        match self {
            Slot::Uptime => Some("uptime-period"),
            Slot::Errors => Some("errors-period"),
            Slot::LostRevenue => Some("lost-revenue-period"),
            _ => None,
        }
    }

    pub fn has_period_selector(self) -> bool {
        self.period_selector_id().is_some()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Slot {
    type Err = ChartError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Slot::ALL
            .into_iter()
            .find(|slot| slot.key() == raw)
            .ok_or_else(|| ChartError::UnknownSlot(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for slot in Slot::ALL {
            assert_eq!(slot.key().parse::<Slot>(), Ok(slot));
            assert!(slot.canvas_id().starts_with(slot.key()));
        }
        assert_eq!(
            "pie".parse::<Slot>(),
            Err(ChartError::UnknownSlot("pie".into()))
        );
    }

    #[test]
    fn canvas_ids_are_unique() {
        let mut ids: Vec<_> = Slot::ALL.iter().map(|s| s.canvas_id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), Slot::ALL.len());
    }
}
