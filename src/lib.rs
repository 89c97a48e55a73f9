//! Core of the Taskdash productivity dashboard: an in-memory task store,
//! per-task derived metrics (ROI, time value, grade) and collection-wide
//! statistics, plus the CLI and TUI that render them.

pub mod clock;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod derive;
pub mod error;
pub mod ids;
pub mod ingest;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod store;
pub mod tui;
