//! Trial countdown.
//!
//! A trial lasts a fixed number of days from the instant stored under
//! `trialStartDate`. The remaining-days figure is a ceiling, so a trial with
//! any time left on its final day still shows `1`, and it never goes below
//! zero.

use crate::clock::Clock;
use crate::kv::{keys, KvStore};
use crate::Result;
use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Length of the free trial.
pub const TRIAL_DAYS: u32 = 14;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whole days left in a trial of `trial_days` started at `start`, rounded up.
///
/// ```rust
/// use boostly::trial::days_left;
/// use chrono::{Duration, TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
/// assert_eq!(days_left(start, start, 14), 14);
/// assert_eq!(days_left(start, start + Duration::hours(13 * 24 + 12), 14), 1);
/// assert_eq!(days_left(start, start + Duration::days(14), 14), 0);
/// assert_eq!(days_left(start, start + Duration::days(30), 14), 0);
/// ```
#[must_use]
pub fn days_left(start: DateTime<Utc>, now: DateTime<Utc>, trial_days: u32) -> u32 {
    let Some(end) = start.checked_add_signed(Duration::days(i64::from(trial_days))) else {
        return u32::MAX;
    };
    let remaining_ms = (end - now).num_milliseconds();
    if remaining_ms <= 0 {
        return 0;
    }
    let days = remaining_ms.saturating_add(MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Parse a stored trial start.
///
/// Accepts RFC 3339, which covers the `2026-10-19T08:30:00.000Z` form the
/// page writes.
#[must_use]
pub fn parse_start(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Reads the trial start from the store and reports days remaining.
#[derive(Debug)]
pub struct TrialClock<S, C> {
    store: S,
    clock: C,
    trial_days: u32,
}

impl<S: KvStore, C: Clock> TrialClock<S, C> {
    /// Create a clock for the standard 14-day trial.
    pub const fn new(store: S, clock: C) -> Self {
        Self::with_trial_days(store, clock, TRIAL_DAYS)
    }

    /// Create a clock with a custom trial length.
    pub const fn with_trial_days(store: S, clock: C, trial_days: u32) -> Self {
        Self {
            store,
            clock,
            trial_days,
        }
    }

    /// Configured trial length in days.
    #[must_use]
    pub const fn trial_days(&self) -> u32 {
        self.trial_days
    }

    /// The stored trial start, if present and parseable.
    ///
    /// An empty value means no trial. An unparseable value is logged and
    /// treated as absent.
    ///
    /// # Errors
    ///
    /// Propagates key-value store failures.
    pub fn start_date(&self) -> Result<Option<DateTime<Utc>>> {
        let Some(raw) = self.stored_start()? else {
            return Ok(None);
        };
        let parsed = parse_start(&raw);
        if parsed.is_none() {
            tracing::warn!(value = %raw, "ignoring unparseable trial start date");
        }
        Ok(parsed)
    }

    fn stored_start(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(keys::TRIAL_START_DATE)?
            .filter(|v| !v.is_empty()))
    }

    /// Days left in the trial, or `None` when no trial has started.
    ///
    /// # Errors
    ///
    /// Propagates key-value store failures.
    pub fn days_left(&self) -> Result<Option<u32>> {
        Ok(self
            .start_date()?
            .map(|start| days_left(start, self.clock.now(), self.trial_days)))
    }

    /// Whether a trial has started and run out.
    ///
    /// # Errors
    ///
    /// Propagates key-value store failures.
    pub fn is_expired(&self) -> Result<bool> {
        Ok(self.days_left()? == Some(0))
    }

    /// Start the trial now unless a start is already stored.
    ///
    /// Returns the effective start instant. A non-empty existing value is
    /// never overwritten, even if it cannot be parsed; an empty one is.
    ///
    /// # Errors
    ///
    /// Propagates key-value store failures.
    pub fn start(&self) -> Result<Option<DateTime<Utc>>> {
        if self.stored_start()?.is_some() {
            return self.start_date();
        }
        let now = self.clock.now();
        self.store.set(
            keys::TRIAL_START_DATE,
            &now.to_rfc3339_opts(SecondsFormat::Millis, true),
        )?;
        tracing::info!(start = %now, "trial started");
        Ok(Some(now))
    }

    /// Start the trial if the visitor is logged in and has none yet.
    ///
    /// Returns `true` when this call wrote a new start date.
    ///
    /// # Errors
    ///
    /// Propagates key-value store failures.
    pub fn ensure_started(&self) -> Result<bool> {
        let logged_in = self.store.get(keys::USER_LOGGED_IN)?.as_deref() == Some("true");
        if !logged_in || self.stored_start()?.is_some() {
            return Ok(false);
        }
        self.start()?;
        Ok(true)
    }
}
