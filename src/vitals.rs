//! Core Web Vitals reporting.

use crate::events::{EventName, EventSink};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A performance timeline entry, times in milliseconds since navigation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceEntry {
    /// When the entry started.
    pub start_time: f64,
    /// When input processing began (first-input entries only).
    #[serde(default)]
    pub processing_start: f64,
}

impl PerformanceEntry {
    /// Entry with only a start time.
    #[must_use]
    pub const fn at(start_time: f64) -> Self {
        Self {
            start_time,
            processing_start: start_time,
        }
    }

    /// First-input entry.
    #[must_use]
    pub const fn input(start_time: f64, processing_start: f64) -> Self {
        Self {
            start_time,
            processing_start,
        }
    }
}

/// Reports Largest Contentful Paint and First Input Delay.
#[derive(Debug)]
pub struct WebVitals<E> {
    sink: E,
}

impl<E: EventSink> WebVitals<E> {
    /// Create the reporter.
    pub const fn new(sink: E) -> Self {
        Self { sink }
    }

    /// A batch of largest-contentful-paint entries arrived; the latest one
    /// is the current LCP. Returns the reported value.
    pub fn report_lcp(&self, entries: &[PerformanceEntry]) -> Option<f64> {
        let last = entries.last()?;
        self.sink
            .record(EventName::WebVitalLcp, json!({ "value": last.start_time }));
        Some(last.start_time)
    }

    /// A batch of first-input entries arrived; each is reported as its
    /// processing delay. Returns the reported values.
    pub fn report_fid(&self, entries: &[PerformanceEntry]) -> Vec<f64> {
        entries
            .iter()
            .map(|entry| {
                let delay = entry.processing_start - entry.start_time;
                self.sink
                    .record(EventName::WebVitalFid, json!({ "value": delay }));
                delay
            })
            .collect()
    }
}
