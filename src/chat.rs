//! Scripted sales chat.
//!
//! Replies come from a fixed keyword table, delivered after a random
//! "typing" delay. No message ever leaves the page.

use crate::events::{EventName, EventSink};
use crate::scheduler::Scheduler;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::ops::Range;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// What a visitor's message is about, by keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatIntent {
    /// `price`, `cost`, `pricing`
    Pricing,
    /// `demo`, `trial`
    Demo,
    /// `integration`, `setup`
    Integration,
    /// `help`, `support`
    Support,
    /// `hello`, `hi`, `hey`
    Greeting,
    /// Anything else.
    Other,
}

const RULES: &[(ChatIntent, &[&str])] = &[
    (ChatIntent::Pricing, &["price", "cost", "pricing"]),
    (ChatIntent::Demo, &["demo", "trial"]),
    (ChatIntent::Integration, &["integration", "setup"]),
    (ChatIntent::Support, &["help", "support"]),
    (ChatIntent::Greeting, &["hello", "hi", "hey"]),
];

const QUICK_ACTION_KEYWORDS: &[&str] = &["demo", "trial", "price"];

impl ChatIntent {
    /// Classify a message. Matching is case-insensitive substring search;
    /// the first rule that matches wins.
    #[must_use]
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        RULES
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map_or(Self::Other, |(intent, _)| *intent)
    }

    /// Canned reply for this intent.
    #[must_use]
    pub const fn reply(&self) -> &'static str {
        match self {
            Self::Pricing => "Our Growth plan starts at £79/month. You can start a free 14-day trial to see how we can help your specific use case!",
            Self::Demo => "I'd love to show you Boostly in action! You can start a free 14-day trial to explore all features.",
            Self::Integration => "Setup takes less than 5 minutes! We integrate with Segment, HubSpot, Salesforce, and most major tools. What's your current tech stack?",
            Self::Support => "I'm here to help! You can also check our Help Center or I can connect you with our support team. What specific question do you have?",
            Self::Greeting => "Hello! I'm Sarah from Boostly. How can I help you increase your conversion rates today?",
            Self::Other => "Thanks for reaching out! A team member will get back to you within 2 hours. In the meantime, feel free to explore our demo or start a free trial.",
        }
    }
}

/// Whether a message earns the quick-action buttons.
#[must_use]
pub fn wants_quick_actions(text: &str) -> bool {
    let lower = text.to_lowercase();
    QUICK_ACTION_KEYWORDS.iter().any(|w| lower.contains(w))
}

/// Shortcut button offered after sales-y replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    /// Button text.
    pub label: String,
    /// Page opened in a new tab.
    pub target: String,
}

/// The standard quick-action row.
#[must_use]
pub fn quick_actions() -> Vec<QuickAction> {
    [
        ("View Demo", "demo.html"),
        ("See Pricing", "pricing.html"),
        ("Start Trial", "trial-setup.html"),
    ]
    .into_iter()
    .map(|(label, target)| QuickAction {
        label: label.to_string(),
        target: target.to_string(),
    })
    .collect()
}

/// One entry in the chat window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "from", content = "body", rename_all = "snake_case")]
pub enum ChatMessage {
    /// Typed by the visitor.
    User(String),
    /// Scripted reply.
    Bot(String),
    /// Row of shortcut buttons.
    QuickActions(Vec<QuickAction>),
}

#[derive(Debug, Default)]
struct Transcript {
    messages: Vec<ChatMessage>,
    typing: usize,
}

/// Chat window controller.
pub struct ChatWidget<E, T, R> {
    sink: E,
    scheduler: T,
    rng: R,
    reply_delay: Range<Duration>,
    quick_actions_delay: Duration,
    open: bool,
    transcript: Arc<Mutex<Transcript>>,
}

impl<E, T, R> std::fmt::Debug for ChatWidget<E, T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatWidget")
            .field("open", &self.open)
            .field("reply_delay", &self.reply_delay)
            .finish_non_exhaustive()
    }
}

fn lock(transcript: &Mutex<Transcript>) -> MutexGuard<'_, Transcript> {
    transcript.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<E, T, R> ChatWidget<E, T, R>
where
    E: EventSink + Clone + Send + 'static,
    T: Scheduler + Clone + Send + 'static,
    R: RngCore,
{
    /// Create a closed chat window.
    ///
    /// Replies arrive after a delay drawn uniformly from `reply_delay`;
    /// quick actions follow their reply after `quick_actions_delay`.
    pub fn new(
        sink: E,
        scheduler: T,
        rng: R,
        reply_delay: Range<Duration>,
        quick_actions_delay: Duration,
    ) -> Self {
        Self {
            sink,
            scheduler,
            rng,
            reply_delay,
            quick_actions_delay,
            open: false,
            transcript: Arc::default(),
        }
    }

    /// Whether the window is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Chat bubble click: open or close the window.
    ///
    /// Returns the new state. Only opening is recorded.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        if self.open {
            self.sink.record_bare(EventName::ChatOpened);
        }
        self.open
    }

    /// Close button.
    pub fn close(&mut self) {
        self.open = false;
        self.sink.record_bare(EventName::ChatClosed);
    }

    fn draw_delay(&mut self) -> Duration {
        let (start, end) = (self.reply_delay.start, self.reply_delay.end);
        if start >= end {
            return start;
        }
        let lo = u64::try_from(start.as_millis()).unwrap_or(u64::MAX);
        let hi = u64::try_from(end.as_millis()).unwrap_or(u64::MAX);
        if lo >= hi {
            return start;
        }
        Duration::from_millis(self.rng.gen_range(lo..hi))
    }

    /// Send a message.
    ///
    /// Blank input is ignored and returns `None`; otherwise returns the
    /// delay after which the reply will appear.
    pub fn send(&mut self, text: &str) -> Option<Duration> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        {
            let mut transcript = lock(&self.transcript);
            transcript.messages.push(ChatMessage::User(text.to_string()));
            transcript.typing += 1;
        }
        self.sink
            .record(EventName::ChatMessageSent, json!({ "message": text }));

        let delay = self.draw_delay();
        let intent = ChatIntent::classify(text);
        let with_actions = wants_quick_actions(text);
        tracing::debug!(?intent, ?delay, with_actions, "scheduling chat reply");

        let transcript = Arc::clone(&self.transcript);
        let scheduler = self.scheduler.clone();
        let actions_delay = self.quick_actions_delay;
        self.scheduler.schedule(
            delay,
            Box::new(move || {
                {
                    let mut t = lock(&transcript);
                    t.typing = t.typing.saturating_sub(1);
                    t.messages.push(ChatMessage::Bot(intent.reply().to_string()));
                }
                if with_actions {
                    scheduler.schedule(
                        actions_delay,
                        Box::new(move || {
                            lock(&transcript)
                                .messages
                                .push(ChatMessage::QuickActions(quick_actions()));
                        }),
                    );
                }
            }),
        );

        Some(delay)
    }

    /// Whether a reply is pending (typing indicator shown).
    #[must_use]
    pub fn is_typing(&self) -> bool {
        lock(&self.transcript).typing > 0
    }

    /// Everything in the window, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        lock(&self.transcript).messages.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemoryEventSink;
    use crate::scheduler::ManualScheduler;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type Widget = ChatWidget<Arc<MemoryEventSink>, Arc<ManualScheduler>, StdRng>;

    fn widget() -> (Widget, Arc<MemoryEventSink>, Arc<ManualScheduler>) {
        let sink = Arc::new(MemoryEventSink::new());
        let scheduler = Arc::new(ManualScheduler::new());
        let chat = ChatWidget::new(
            Arc::clone(&sink),
            Arc::clone(&scheduler),
            StdRng::seed_from_u64(99),
            Duration::from_secs(1)..Duration::from_secs(3),
            Duration::from_millis(500),
        );
        (chat, sink, scheduler)
    }

    #[test]
    fn test_classify_rule_order() {
        assert_eq!(ChatIntent::classify("What does it COST?"), ChatIntent::Pricing);
        // pricing outranks demo
        assert_eq!(ChatIntent::classify("demo price"), ChatIntent::Pricing);
        assert_eq!(ChatIntent::classify("Can I get a trial"), ChatIntent::Demo);
        assert_eq!(ChatIntent::classify("setup time?"), ChatIntent::Integration);
        assert_eq!(ChatIntent::classify("need support"), ChatIntent::Support);
        assert_eq!(ChatIntent::classify("Hey there"), ChatIntent::Greeting);
        // substring match: "this" contains "hi"
        assert_eq!(ChatIntent::classify("is this good"), ChatIntent::Greeting);
        assert_eq!(ChatIntent::classify("ok"), ChatIntent::Other);
    }

    #[test]
    fn test_quick_action_keywords() {
        assert!(wants_quick_actions("Show me a DEMO"));
        assert!(wants_quick_actions("price?"));
        // "pricing" does not contain "price"
        assert!(!wants_quick_actions("pricing"));
        assert!(!wants_quick_actions("cost"));
    }

    #[test]
    fn test_toggle_and_close_events() {
        let (mut chat, sink, _) = widget();

        assert!(chat.toggle());
        assert!(!chat.toggle());
        chat.close();

        let names: Vec<_> = sink.events().into_iter().map(|e| e.event).collect();
        assert_eq!(names, ["chat_opened", "chat_closed"]);
        assert!(!chat.is_open());
    }

    #[test]
    fn test_blank_message_ignored() {
        let (mut chat, sink, scheduler) = widget();

        assert_eq!(chat.send("   "), None);
        assert!(chat.messages().is_empty());
        assert!(sink.is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_reply_arrives_within_window() {
        let (mut chat, sink, scheduler) = widget();

        let delay = chat.send("  hello  ").unwrap();
        assert!(delay >= Duration::from_secs(1) && delay < Duration::from_secs(3));
        assert!(chat.is_typing());
        assert_eq!(
            sink.events()[0].payload,
            json!({ "message": "hello" })
        );

        scheduler.advance(Duration::from_secs(3));
        assert!(!chat.is_typing());
        assert_eq!(
            chat.messages(),
            [
                ChatMessage::User("hello".to_string()),
                ChatMessage::Bot(ChatIntent::Greeting.reply().to_string()),
            ]
        );
    }

    #[test]
    fn test_quick_actions_follow_reply() {
        let (mut chat, _, scheduler) = widget();

        let delay = chat.send("Can I see a demo?").unwrap();
        scheduler.advance(delay);
        assert_eq!(chat.messages().len(), 2);

        scheduler.advance(Duration::from_millis(500));
        let messages = chat.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2], ChatMessage::QuickActions(quick_actions()));
    }

    #[test]
    fn test_degenerate_delay_range() {
        let sink = Arc::new(MemoryEventSink::new());
        let scheduler = Arc::new(ManualScheduler::new());
        let mut chat = ChatWidget::new(
            sink,
            Arc::clone(&scheduler),
            StdRng::seed_from_u64(1),
            Duration::from_secs(2)..Duration::from_secs(2),
            Duration::ZERO,
        );

        assert_eq!(chat.send("x"), Some(Duration::from_secs(2)));
    }
}
