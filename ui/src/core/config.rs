//! Runtime configuration for the dashboard.
//!
//! Defaults live in code; `assets/data/config.json` is embedded at compile
//! time and may override any subset of fields. A malformed file is logged and
//! ignored so the page still renders with defaults.

use dioxus::logger::tracing::warn;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::metric::Period;

const EMBEDDED_CONFIG: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/data/config.json"
));

static CONFIG: Lazy<DashboardConfig> = Lazy::new(|| DashboardConfig::from_json(EMBEDDED_CONFIG));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Quiet period before a burst of resize events triggers a relayout.
    pub resize_debounce_ms: u32,
    /// Quiet period for size changes of the chart containers themselves.
    pub observer_debounce_ms: u32,
    /// Delay after the charts are built before the loading overlay fades.
    pub overlay_fade_delay_ms: u32,
    /// Length of the overlay fade-out transition.
    pub overlay_fade_ms: u32,
    /// How long a toast notification stays on screen.
    pub notification_ms: u32,
    /// Chart animation duration while the page is visible.
    pub animation_ms: u32,
    /// Window used for period-selectable charts on first render.
    pub default_period: Period,
    /// `localStorage` key holding the active theme.
    pub theme_storage_key: String,
    /// Seed for the synthetic series; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            resize_debounce_ms: 250,
            observer_debounce_ms: 100,
            overlay_fade_delay_ms: 500,
            overlay_fade_ms: 300,
            notification_ms: 3000,
            animation_ms: 400,
            default_period: Period::Week,
            theme_storage_key: "pulseboard-theme".to_string(),
            seed: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(config) => config,
            Err(err) => {
                warn!("ignoring malformed dashboard config ({err}); using defaults");
                Self::default()
            }
        }
    }

    /// Process-wide configuration parsed from the embedded file.
    pub fn current() -> &'static DashboardConfig {
        &CONFIG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let config = DashboardConfig::from_json(r#"{ "resizeDebounceMs": 100, "seed": 9 }"#);
        assert_eq!(config.resize_debounce_ms, 100);
        assert_eq!(config.observer_debounce_ms, 100);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.default_period, Period::Week);
        assert_eq!(config.theme_storage_key, "pulseboard-theme");
    }

    #[test]
    fn malformed_config_falls_back() {
        assert_eq!(DashboardConfig::from_json("{ nope"), DashboardConfig::default());
    }

    #[test]
    fn period_is_read_as_selector_value() {
        let config = DashboardConfig::from_json(r#"{ "defaultPeriod": "30" }"#);
        assert_eq!(config.default_period, Period::Month);
    }

    #[test]
    fn embedded_config_parses() {
        let parsed: Result<DashboardConfig, _> = serde_json::from_str(EMBEDDED_CONFIG);
        assert!(parsed.is_ok(), "{parsed:?}");
    }
}
