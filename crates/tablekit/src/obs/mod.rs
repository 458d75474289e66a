//! Observability: ephemeral in-memory counters for pipeline activity.
//!
//! Core logic reports through `Event` values only; nothing here touches
//! executors or caches directly.

pub(crate) mod metrics;

pub use metrics::{Event, EventState, report, reset};
