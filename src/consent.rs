//! Cookie consent.
//!
//! Consent lives in three keys: `cookies-accepted` (`true`, `false` or
//! `custom`) plus one boolean flag per optional cookie category. Visitors
//! who have not decided see a banner after a short delay.

use crate::events::{EventName, EventSink};
use crate::kv::{keys, KvStore};
use crate::scheduler::Scheduler;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// The visitor's cookie decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsentState {
    /// No decision recorded.
    Unset,
    /// Every category accepted.
    AcceptedAll,
    /// Every optional category declined.
    DeclinedAll,
    /// Per-category choice.
    Custom {
        /// Analytics cookies allowed.
        analytics: bool,
        /// Marketing cookies allowed.
        marketing: bool,
    },
}

impl ConsentState {
    /// Whether analytics cookies may be set.
    #[must_use]
    pub const fn allows_analytics(&self) -> bool {
        match self {
            Self::AcceptedAll => true,
            Self::Unset | Self::DeclinedAll => false,
            Self::Custom { analytics, .. } => *analytics,
        }
    }

    /// Whether marketing cookies may be set.
    #[must_use]
    pub const fn allows_marketing(&self) -> bool {
        match self {
            Self::AcceptedAll => true,
            Self::Unset | Self::DeclinedAll => false,
            Self::Custom { marketing, .. } => *marketing,
        }
    }
}

/// Initial checkbox state of the customization panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferenceToggles {
    /// Analytics checkbox.
    pub analytics: bool,
    /// Marketing checkbox.
    pub marketing: bool,
}

#[derive(Debug, Default)]
struct Banner {
    visible: AtomicBool,
    scheduled: AtomicBool,
    shown: AtomicUsize,
}

/// Cookie consent banner and preference storage.
#[derive(Debug)]
pub struct CookieConsent<S, E> {
    store: S,
    sink: E,
    banner: Arc<Banner>,
    details_open: bool,
}

fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

impl<S: KvStore, E: EventSink> CookieConsent<S, E> {
    /// Create the consent component.
    pub fn new(store: S, sink: E) -> Self {
        Self {
            store,
            sink,
            banner: Arc::default(),
            details_open: false,
        }
    }

    /// Current decision as stored.
    ///
    /// An unrecognized `cookies-accepted` value still counts as a decision;
    /// the category flags are read as stored.
    ///
    /// # Errors
    ///
    /// Propagates key-value store failures.
    pub fn state(&self) -> Result<ConsentState> {
        let Some(accepted) = self.decision()? else {
            return Ok(ConsentState::Unset);
        };
        Ok(match accepted.as_str() {
            "true" => ConsentState::AcceptedAll,
            "false" => ConsentState::DeclinedAll,
            _ => ConsentState::Custom {
                analytics: self.store.get(keys::ANALYTICS_COOKIES)?.as_deref() == Some("true"),
                marketing: self.store.get(keys::MARKETING_COOKIES)?.as_deref() == Some("true"),
            },
        })
    }

    fn decision(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(keys::COOKIES_ACCEPTED)?
            .filter(|v| !v.is_empty()))
    }

    /// Arrange for the banner to appear after `delay` if no decision exists.
    ///
    /// Returns `true` if the banner was scheduled. Repeated calls schedule
    /// at most once.
    ///
    /// # Errors
    ///
    /// Propagates key-value store failures.
    pub fn schedule_banner<T: Scheduler>(&self, scheduler: &T, delay: Duration) -> Result<bool> {
        if self.decision()?.is_some() {
            return Ok(false);
        }
        if self.banner.scheduled.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }
        let banner = Arc::clone(&self.banner);
        scheduler.schedule(
            delay,
            Box::new(move || {
                banner.visible.store(true, Ordering::SeqCst);
                banner.shown.fetch_add(1, Ordering::SeqCst);
                tracing::debug!("cookie banner shown");
            }),
        );
        Ok(true)
    }

    /// Whether the banner is on screen.
    #[must_use]
    pub fn banner_visible(&self) -> bool {
        self.banner.visible.load(Ordering::SeqCst)
    }

    /// How many times the banner has been revealed.
    #[must_use]
    pub fn banner_shown_count(&self) -> usize {
        self.banner.shown.load(Ordering::SeqCst)
    }

    /// Whether the customization panel is open.
    #[must_use]
    pub const fn details_open(&self) -> bool {
        self.details_open
    }

    fn persist(&self, accepted: &str, analytics: bool, marketing: bool) -> Result<()> {
        self.store.batch_set(&[
            (keys::COOKIES_ACCEPTED, accepted),
            (keys::ANALYTICS_COOKIES, flag(analytics)),
            (keys::MARKETING_COOKIES, flag(marketing)),
        ])?;
        self.banner.visible.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Accept every cookie category.
    ///
    /// # Errors
    ///
    /// Propagates key-value store failures.
    pub fn accept_all(&self) -> Result<()> {
        self.persist("true", true, true)?;
        self.sink.record_bare(EventName::CookiesAcceptedAll);
        Ok(())
    }

    /// Decline every optional cookie category.
    ///
    /// # Errors
    ///
    /// Propagates key-value store failures.
    pub fn decline_all(&self) -> Result<()> {
        self.persist("false", false, false)?;
        self.sink.record_bare(EventName::CookiesDeclinedAll);
        Ok(())
    }

    /// Show or hide the customization panel; returns the new state.
    pub fn toggle_details(&mut self) -> bool {
        self.details_open = !self.details_open;
        self.sink.record_bare(EventName::CookiesCustomizeOpened);
        self.details_open
    }

    /// Save a per-category choice.
    ///
    /// # Errors
    ///
    /// Propagates key-value store failures.
    pub fn save_preferences(&self, analytics: bool, marketing: bool) -> Result<()> {
        self.persist("custom", analytics, marketing)?;
        self.sink.record(
            EventName::CookiesPreferencesSaved,
            json!({ "analytics": analytics, "marketing": marketing }),
        );
        Ok(())
    }

    /// Checkbox state to show when the panel opens.
    ///
    /// Analytics starts checked unless explicitly declined; marketing starts
    /// unchecked unless explicitly accepted.
    ///
    /// # Errors
    ///
    /// Propagates key-value store failures.
    pub fn preference_defaults(&self) -> Result<PreferenceToggles> {
        Ok(PreferenceToggles {
            analytics: self.store.get(keys::ANALYTICS_COOKIES)?.as_deref() != Some("false"),
            marketing: self.store.get(keys::MARKETING_COOKIES)?.as_deref() == Some("true"),
        })
    }
}
