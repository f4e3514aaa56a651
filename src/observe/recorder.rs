//! # Event Recording
//!
//! Port for structured audit/diagnostic events and its adapters.
//!
//! - [`Event`]: message, category, structured context, severity, optional error text
//! - [`EventRecorder`]: fire-and-forget sink (returns `()`, never fails the caller)
//! - [`TracingRecorder`]: forwards events to `tracing`
//! - [`MemoryRecorder`]: keeps events in memory for assertions
//!
//! # Example
//! ```
//! use serde_json::json;
//! use ticket_desk::observe::{Event, EventRecorder, MemoryRecorder, Severity};
//!
//! let recorder = MemoryRecorder::default();
//! recorder.record(
//!     Event::new(Severity::Info, "ticket", "Fetched ticket list")
//!         .with_context(json!({ "count": 3 })),
//! );
//!
//! assert_eq!(recorder.events()[0].category, "ticket");
//! ```

use std::fmt;
use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;

/// Severity of an [`Event`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

/// A single structured event.
///
/// The context must never carry raw session tokens or the signing secret;
/// use [`token_excerpt`](crate::auth::token::token_excerpt) and
/// [`AuthConfig::fingerprint`](crate::config::auth::AuthConfig::fingerprint).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Event {
    pub message: String,
    pub category: &'static str,
    pub context: Value,
    pub severity: Severity,
    pub error: Option<String>,
}

impl Event {
    pub fn new(severity: Severity, category: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category,
            context: Value::Null,
            severity,
            error: None,
        }
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }

    /// Attaches the display text of `err` (including its source chain when
    /// formatted with `{:#}` by `anyhow`).
    pub fn with_error(mut self, err: &dyn fmt::Display) -> Self {
        self.error = Some(format!("{err:#}"));
        self
    }
}

/// Sink for structured events.
///
/// Implementations must return promptly and swallow their own failures.
pub trait EventRecorder: Send + Sync {
    fn record(&self, event: Event);
}

/// Forwards events to the `tracing` subscriber installed by the binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingRecorder;

impl EventRecorder for TracingRecorder {
    fn record(&self, event: Event) {
        let Event {
            message,
            category,
            context,
            severity,
            error,
        } = event;
        let error = error.unwrap_or_default();

        match severity {
            Severity::Debug => {
                tracing::debug!(category, %context, error = %error, "{message}")
            }
            Severity::Info => {
                tracing::info!(category, %context, error = %error, "{message}")
            }
            Severity::Warning => {
                tracing::warn!(category, %context, error = %error, "{message}")
            }
            Severity::Error => {
                tracing::error!(category, %context, error = %error, "{message}")
            }
        }
    }
}

/// Keeps every recorded event in memory.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    events: Mutex<Vec<Event>>,
}

impl MemoryRecorder {
    /// Returns a snapshot of recorded events in recording order.
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Returns events recorded under `category`.
    pub fn in_category(&self, category: &str) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| e.category == category)
            .collect()
    }
}

impl EventRecorder for MemoryRecorder {
    fn record(&self, event: Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
