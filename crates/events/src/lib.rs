//! Warning persistence and live event fan-out.
//!
//! - [`EventBus`] - in-process publish/subscribe hub for [`MonitorEvent`]s,
//!   backed by `tokio::sync::broadcast`.
//! - [`WarningLogStore`] - the persistent warning log collaborator, with
//!   PostgreSQL and in-memory implementations.
//! - [`WarningRecorder`] - turns breaching readings into warning records
//!   and dispatches fire-and-forget writes.
//! - [`EventLogReader`] - loads the warning log newest-first and pages it.

pub mod bus;
pub mod reader;
pub mod recorder;
pub mod store;

pub use bus::{EventBus, MonitorEvent};
pub use reader::{EventLog, EventLogPage, EventLogReader};
pub use recorder::{WarningPolicy, WarningRecorder};
pub use store::{InMemoryWarningLogStore, PgWarningLogStore, StoreError, WarningLogStore};
