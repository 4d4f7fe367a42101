//! Analytics Events
//!
//! Every user-visible interaction on the page emits a named event with a
//! small JSON payload. Sinks are fire-and-forget: nothing in the crate reads
//! an event back to make a decision.
//!
//! ```rust
//! use boostly::events::{EventName, EventSink, MemoryEventSink};
//! use serde_json::json;
//!
//! let sink = MemoryEventSink::new();
//! sink.record(EventName::ThemeChanged, json!({ "theme": "dark" }));
//!
//! assert_eq!(sink.events()[0].event, "theme_changed");
//! ```

mod sink;

pub use sink::{LogEventSink, MemoryEventSink};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of analytics events emitted by the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventName {
    /// `{field}`
    SignupValidationFailed,
    /// `{email, plan, variant}`
    SignupAttempt,
    /// `{email}`
    SignupSuccess,
    /// `{variant}`
    CtaClicked,
    /// `{plan}`
    PlanSelected,
    /// `{theme}`
    ThemeChanged,
    /// `{visitors, currentRate, revenue, additionalRev}`
    RoiCalculated,
    /// `{question}`
    FaqOpened,
    /// `{scroll_percent}`
    StickyCtaShown,
    /// No payload
    StickyCtaClosed,
    /// No payload
    ExitIntentShown,
    /// No payload
    ExitIntentClosed,
    /// No payload
    ChatOpened,
    /// No payload
    ChatClosed,
    /// `{message}`
    ChatMessageSent,
    /// No payload
    CookiesAcceptedAll,
    /// No payload
    CookiesDeclinedAll,
    /// No payload
    CookiesCustomizeOpened,
    /// `{analytics, marketing}`
    CookiesPreferencesSaved,
    /// `{value}`
    WebVitalLcp,
    /// `{value}`
    WebVitalFid,
    /// `{test, variant}`
    AbTestAssigned,
    /// `{step}`
    FunnelStep,
}

impl EventName {
    /// Wire name of the event.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SignupValidationFailed => "signup_validation_failed",
            Self::SignupAttempt => "signup_attempt",
            Self::SignupSuccess => "signup_success",
            Self::CtaClicked => "cta_clicked",
            Self::PlanSelected => "plan_selected",
            Self::ThemeChanged => "theme_changed",
            Self::RoiCalculated => "roi_calculated",
            Self::FaqOpened => "faq_opened",
            Self::StickyCtaShown => "sticky_cta_shown",
            Self::StickyCtaClosed => "sticky_cta_closed",
            Self::ExitIntentShown => "exit_intent_shown",
            Self::ExitIntentClosed => "exit_intent_closed",
            Self::ChatOpened => "chat_opened",
            Self::ChatClosed => "chat_closed",
            Self::ChatMessageSent => "chat_message_sent",
            Self::CookiesAcceptedAll => "cookies_accepted_all",
            Self::CookiesDeclinedAll => "cookies_declined_all",
            Self::CookiesCustomizeOpened => "cookies_customize_opened",
            Self::CookiesPreferencesSaved => "cookies_preferences_saved",
            Self::WebVitalLcp => "web_vital_lcp",
            Self::WebVitalFid => "web_vital_fid",
            Self::AbTestAssigned => "ab_test_assigned",
            Self::FunnelStep => "funnel_step",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded analytics event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// Wire name, e.g. `ab_test_assigned`.
    pub event: String,
    /// JSON payload, `null` for events without one.
    pub payload: serde_json::Value,
    /// Unix milliseconds at recording time.
    pub ts: i64,
}

/// Destination for analytics events.
///
/// Recording never fails and never blocks; a sink that cannot deliver
/// simply drops the event.
pub trait EventSink {
    /// Record an event with its payload.
    fn record(&self, event: EventName, payload: serde_json::Value);

    /// Record an event that carries no payload.
    fn record_bare(&self, event: EventName) {
        self.record(event, serde_json::Value::Null);
    }
}

impl<E: EventSink + ?Sized> EventSink for &E {
    fn record(&self, event: EventName, payload: serde_json::Value) {
        (**self).record(event, payload);
    }
}

impl<E: EventSink + ?Sized> EventSink for std::sync::Arc<E> {
    fn record(&self, event: EventName, payload: serde_json::Value) {
        (**self).record(event, payload);
    }
}
