//! Engagement widgets: conversion funnel, sticky CTA, exit-intent popup,
//! FAQ accordion and CTA/plan click tracking.
//!
//! Each widget owns its own small piece of session state and reports to the
//! event sink; none of them persist anything.

use crate::events::{EventName, EventSink};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;

/// Milestones of the conversion funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStep {
    /// Page loaded.
    PageView,
    /// Hero call-to-action clicked.
    HeroCtaClick,
    /// Pricing section scrolled into view.
    PricingView,
    /// First focus inside the signup form.
    FormStart,
    /// Signup form submitted.
    FormSubmit,
}

impl FunnelStep {
    /// Step name as reported.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PageView => "page_view",
            Self::HeroCtaClick => "hero_cta_click",
            Self::PricingView => "pricing_view",
            Self::FormStart => "form_start",
            Self::FormSubmit => "form_submit",
        }
    }
}

/// Records each funnel step at most once per session.
#[derive(Debug)]
pub struct FunnelTracker<E> {
    sink: E,
    reached: HashSet<FunnelStep>,
}

impl<E: EventSink> FunnelTracker<E> {
    /// Start a session with no steps reached.
    pub fn new(sink: E) -> Self {
        Self {
            sink,
            reached: HashSet::new(),
        }
    }

    /// Mark a step reached. Returns `true` the first time only.
    pub fn reach(&mut self, step: FunnelStep) -> bool {
        if !self.reached.insert(step) {
            return false;
        }
        self.sink
            .record(EventName::FunnelStep, json!({ "step": step.as_str() }));
        true
    }

    /// Whether a step has been reached.
    #[must_use]
    pub fn has_reached(&self, step: FunnelStep) -> bool {
        self.reached.contains(&step)
    }
}

/// Scroll depth in percent, `0` when the page does not scroll.
#[must_use]
pub fn scroll_percent(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let scrollable = scroll_height - viewport_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    scroll_y / scrollable * 100.0
}

/// Bottom CTA bar revealed once the visitor is past a scroll depth.
#[derive(Debug)]
pub struct StickyCta<E> {
    sink: E,
    threshold: f64,
    shown: bool,
    visible: bool,
}

impl<E: EventSink> StickyCta<E> {
    /// Create the bar, revealed past `threshold` percent.
    pub const fn new(sink: E, threshold: f64) -> Self {
        Self {
            sink,
            threshold,
            shown: false,
            visible: false,
        }
    }

    /// Feed a scroll position. Returns `true` when this call revealed the bar.
    pub fn on_scroll(&mut self, scroll_y: f64, scroll_height: f64, viewport_height: f64) -> bool {
        if self.shown {
            return false;
        }
        let percent = scroll_percent(scroll_y, scroll_height, viewport_height);
        if percent <= self.threshold {
            return false;
        }
        self.shown = true;
        self.visible = true;
        self.sink
            .record(EventName::StickyCtaShown, json!({ "scroll_percent": percent }));
        true
    }

    /// Dismiss the bar. It does not come back this session.
    pub fn close(&mut self) {
        self.visible = false;
        self.sink.record_bare(EventName::StickyCtaClosed);
    }

    /// Whether the bar is on screen.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Popup shown when the pointer leaves through the top of the window.
#[derive(Debug)]
pub struct ExitIntent<E> {
    sink: E,
    shown: bool,
    visible: bool,
}

impl<E: EventSink> ExitIntent<E> {
    /// Create the popup, hidden.
    pub const fn new(sink: E) -> Self {
        Self {
            sink,
            shown: false,
            visible: false,
        }
    }

    /// Pointer left the document at vertical position `client_y`.
    ///
    /// Returns `true` when this call showed the popup.
    pub fn on_mouse_leave(&mut self, client_y: f64) -> bool {
        if client_y > 0.0 || self.shown {
            return false;
        }
        self.shown = true;
        self.visible = true;
        self.sink.record_bare(EventName::ExitIntentShown);
        true
    }

    /// Close button or backdrop click.
    pub fn close(&mut self) {
        self.visible = false;
        self.sink.record_bare(EventName::ExitIntentClosed);
    }

    /// Escape key: closes only an open popup. Returns `true` if it closed.
    pub fn on_escape(&mut self) -> bool {
        if !self.visible {
            return false;
        }
        self.close();
        true
    }

    /// Whether the popup is on screen.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }
}

/// FAQ list where at most one answer is open.
#[derive(Debug)]
pub struct FaqAccordion<E> {
    sink: E,
    questions: Vec<String>,
    open: Option<usize>,
}

impl<E: EventSink> FaqAccordion<E> {
    /// Create the accordion with every answer collapsed.
    pub fn new(sink: E, questions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            sink,
            questions: questions.into_iter().map(Into::into).collect(),
            open: None,
        }
    }

    /// Click question `index`.
    ///
    /// Opens it (closing any other) unless it was already open, in which
    /// case everything collapses. Out-of-range clicks are ignored. Returns
    /// the open question afterwards.
    pub fn click(&mut self, index: usize) -> Option<usize> {
        let Some(question) = self.questions.get(index) else {
            return self.open;
        };
        if self.open == Some(index) {
            self.open = None;
        } else {
            self.open = Some(index);
            self.sink
                .record(EventName::FaqOpened, json!({ "question": question }));
        }
        self.open
    }

    /// Index of the open question.
    #[must_use]
    pub const fn open(&self) -> Option<usize> {
        self.open
    }
}

/// Tracks CTA and pricing-plan clicks.
#[derive(Debug)]
pub struct CtaTracker<E> {
    sink: E,
    active: Option<String>,
}

impl<E: EventSink> CtaTracker<E> {
    /// Create with no active variant.
    pub const fn new(sink: E) -> Self {
        Self { sink, active: None }
    }

    /// A CTA tagged with `variant` was clicked; it becomes the active one.
    pub fn click(&mut self, variant: &str) {
        self.active = Some(variant.to_string());
        self.sink
            .record(EventName::CtaClicked, json!({ "variant": variant }));
    }

    /// The most recently clicked CTA variant.
    #[must_use]
    pub fn active_variant(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// A pricing plan button was clicked.
    pub fn select_plan(&self, plan: &str) {
        self.sink
            .record(EventName::PlanSelected, json!({ "plan": plan }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemoryEventSink;

    #[test]
    fn test_funnel_steps_fire_once() {
        let sink = MemoryEventSink::new();
        let mut funnel = FunnelTracker::new(&sink);

        assert!(funnel.reach(FunnelStep::PageView));
        assert!(funnel.reach(FunnelStep::FormStart));
        assert!(!funnel.reach(FunnelStep::FormStart));
        assert!(funnel.has_reached(FunnelStep::PageView));
        assert!(!funnel.has_reached(FunnelStep::PricingView));

        let steps: Vec<_> = sink
            .events()
            .into_iter()
            .map(|e| e.payload["step"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(steps, ["page_view", "form_start"]);
    }

    #[test]
    fn test_scroll_percent() {
        assert!((scroll_percent(500.0, 2000.0, 1000.0) - 50.0).abs() < 1e-9);
        assert!(scroll_percent(0.0, 800.0, 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sticky_cta_shows_once_past_half() {
        let sink = MemoryEventSink::new();
        let mut cta = StickyCta::new(&sink, 50.0);

        // exactly 50% is not past the threshold
        assert!(!cta.on_scroll(500.0, 2000.0, 1000.0));
        assert!(cta.on_scroll(600.0, 2000.0, 1000.0));
        assert!(cta.is_visible());
        assert!(!cta.on_scroll(900.0, 2000.0, 1000.0));

        cta.close();
        assert!(!cta.is_visible());
        assert!(!cta.on_scroll(1000.0, 2000.0, 1000.0));

        assert_eq!(sink.count(EventName::StickyCtaShown), 1);
        let percent = sink.events()[0].payload["scroll_percent"].as_f64().unwrap();
        assert!((percent - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_exit_intent() {
        let sink = MemoryEventSink::new();
        let mut popup = ExitIntent::new(&sink);

        assert!(!popup.on_escape());
        assert!(!popup.on_mouse_leave(120.0));
        assert!(popup.on_mouse_leave(0.0));
        assert!(!popup.on_mouse_leave(-3.0));

        assert!(popup.on_escape());
        assert!(!popup.is_visible());
        assert!(!popup.on_escape());

        let names: Vec<_> = sink.events().into_iter().map(|e| e.event).collect();
        assert_eq!(names, ["exit_intent_shown", "exit_intent_closed"]);
    }

    #[test]
    fn test_faq_single_open() {
        let sink = MemoryEventSink::new();
        let mut faq = FaqAccordion::new(&sink, ["Is there a free trial?", "Can I cancel?"]);

        assert_eq!(faq.click(0), Some(0));
        assert_eq!(faq.click(1), Some(1));
        assert_eq!(faq.click(1), None);
        assert_eq!(faq.click(7), None);

        let questions: Vec<_> = sink
            .events_named(EventName::FaqOpened)
            .into_iter()
            .map(|e| e.payload["question"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(questions, ["Is there a free trial?", "Can I cancel?"]);
    }

    #[test]
    fn test_cta_tracker() {
        let sink = MemoryEventSink::new();
        let mut cta = CtaTracker::new(&sink);

        assert_eq!(cta.active_variant(), None);
        cta.click("hero_primary");
        cta.click("pricing_growth");
        cta.select_plan("growth");

        assert_eq!(cta.active_variant(), Some("pricing_growth"));
        assert_eq!(
            sink.events_named(EventName::PlanSelected)[0].payload,
            json!({ "plan": "growth" })
        );
        assert_eq!(sink.count(EventName::CtaClicked), 2);
    }
}
