//! Error types shared across the dashboard.
//!
//! Each unit owns its failures: chart construction problems never abort the
//! page, data problems surface once at startup, export and storage problems are
//! reported to the user through a notification.

use thiserror::Error;

use crate::charts::{Slot, SlotState};
use crate::core::metric::Period;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("canvas `{canvas_id}` for chart `{slot}` not found")]
    MissingCanvas { slot: Slot, canvas_id: &'static str },

    #[error("chart `{0}` has no live instance")]
    NoInstance(Slot),

    #[error("chart `{slot}` failed to render: {reason}")]
    Backend { slot: Slot, reason: String },

    #[error("chart `{slot}` cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        slot: Slot,
        from: SlotState,
        to: SlotState,
    },

    #[error("unknown chart slot `{0}`")]
    UnknownSlot(String),

    #[error("unsupported period `{0}`")]
    UnknownPeriod(String),

    #[error("chart `{slot}` has no data for the {period} window")]
    MissingSeries { slot: Slot, period: Period },
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("couldn't decode dashboard data: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid date `{0}`")]
    Date(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,

    #[error("download failed: {0}")]
    Download(String),

    #[error("export isn't supported on this platform")]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("local storage unavailable")]
    Unavailable,

    #[error("couldn't write `{key}`: {reason}")]
    Write { key: String, reason: String },
}
