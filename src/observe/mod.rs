//! Observability collaborator: structured, fire-and-forget event recording.

pub mod recorder;

pub use recorder::{Event, EventRecorder, MemoryRecorder, Severity, TracingRecorder};
