//! Domain types and pure logic for the vitals monitoring pipeline.
//!
//! Nothing in this crate performs I/O. The feed, store, and HTTP crates
//! build on these types:
//!
//! - [`metric::MetricKind`] and [`snapshot::Snapshot`] describe what the
//!   live feed delivers.
//! - [`thresholds`] classifies a reading as a warning.
//! - [`tracker`] detects value changes against session-owned state.
//! - [`warning::WarningRecord`] is the persisted warning entity.
//! - [`pagination`] slices the warning log into pages.

pub mod error;
pub mod metric;
pub mod metric_names;
pub mod pagination;
pub mod snapshot;
pub mod thresholds;
pub mod tracker;
pub mod types;
pub mod warning;
