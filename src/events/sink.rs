//! Event sink implementations.

use super::{AnalyticsEvent, EventName, EventSink};
use chrono::Utc;
use std::sync::{Mutex, PoisonError};

/// Log target used for every analytics event.
pub const ANALYTICS_TARGET: &str = "boostly::analytics";

fn log_event(event: EventName, payload: &serde_json::Value) {
    tracing::info!(target: ANALYTICS_TARGET, event = event.as_str(), payload = %payload, "analytics event");
}

/// Sink that only writes events to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn record(&self, event: EventName, payload: serde_json::Value) {
        log_event(event, &payload);
    }
}

/// In-memory event buffer that also logs every event.
///
/// Events are kept in recording order, each stamped with the wall-clock
/// time in Unix milliseconds.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl MemoryEventSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded events with the given name, in order.
    #[must_use]
    pub fn events_named(&self, event: EventName) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.event == event.as_str())
            .cloned()
            .collect()
    }

    /// Number of events recorded with the given name.
    #[must_use]
    pub fn count(&self, event: EventName) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.event == event.as_str())
            .count()
    }

    /// Number of events recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if no event was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all recorded events.
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl EventSink for MemoryEventSink {
    fn record(&self, event: EventName, payload: serde_json::Value) {
        log_event(event, &payload);
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(AnalyticsEvent {
                event: event.as_str().to_string(),
                payload,
                ts: Utc::now().timestamp_millis(),
            });
    }
}
