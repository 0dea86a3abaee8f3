//! Event sink system for observability.
//!
//! Sinks receive [`WorkflowEvent`](crate::core::WorkflowEvent)s from the
//! pipeline engine. Sinks are injected per engine; there is no global sink.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
