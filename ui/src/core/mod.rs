pub mod config;
pub mod error;
pub mod format;
pub mod metric;
pub mod platform;
pub mod series;
pub mod shortcuts;
pub mod storage;
pub mod theme;
pub mod timing;
