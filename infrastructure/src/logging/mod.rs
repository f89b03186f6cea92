//! Logging infrastructure for domain events.
//!
//! - [`JsonlEventLog`]: append-only activity log, one JSON record per line
//! - [`TracingEventPublisher`]: forwards events to `tracing` for diagnostics
//!
//! Both implement the [`EventPublisher`](governance_application::EventPublisher)
//! port and are usually combined with a `FanoutPublisher`.

mod jsonl_event_log;
mod tracing_publisher;

pub use jsonl_event_log::JsonlEventLog;
pub use tracing_publisher::TracingEventPublisher;
