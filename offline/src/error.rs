use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OfflineError {
    #[error("invalid manifest url `{url}`: {reason}")]
    BadUrl { url: String, reason: String },

    #[error("precaching `{url}` failed: {reason}")]
    Precache { url: String, reason: String },

    #[error("precaching `{url}` returned status {status}")]
    BadStatus { url: String, status: u16 },

    #[error("cache storage: {0}")]
    Storage(String),

    #[error("network: {0}")]
    Network(String),

    #[error("worker cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        from: crate::WorkerState,
        to: crate::WorkerState,
    },
}
