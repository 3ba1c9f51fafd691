//! Observability: form lifecycle events, counters and sink abstractions.
//!
//! Form nodes never touch counters or `tracing` directly; every signal
//! flows through `FormEvent` and the active `EventSink`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EntityCounters, EventOps, EventReport};
pub use sink::{EventSink, FormEvent, event_report, event_reset, with_event_sink};
