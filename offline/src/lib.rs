//! Offline cache worker for Pulseboard.
//!
//! The policy (precache on install, prune on activate, cache-first fetch with
//! a synthetic 503 fallback) is written against the [`CacheStorage`] and
//! [`Network`] traits. On `wasm32` the crate also builds the service worker
//! entry points over the browser Cache API.

mod error;
pub mod manifest;
mod worker;
#[cfg(target_arch = "wasm32")]
mod web;

pub use error::OfflineError;
pub use manifest::{CacheManifest, CACHE_NAME};
pub use worker::{
    CacheStorage, CacheWorker, FetchOutcome, HttpResponse, Network, Request, RequestInfo,
    WorkerState, OFFLINE_BODY, OFFLINE_STATUS, OFFLINE_STATUS_TEXT,
};
