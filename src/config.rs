//! Landing page configuration.
//!
//! Every tunable the page uses (trial length, simulated delays, ROI model)
//! lives in [`LandingConfig`]. Build it in code with [`LandingConfig::builder`]
//! or load it from JSON; missing JSON fields take their defaults.
//!
//! ```rust
//! use boostly::config::LandingConfig;
//! use std::time::Duration;
//!
//! let config = LandingConfig::builder()
//!     .trial_days(30)
//!     .consent_banner_delay(Duration::from_secs(5))
//!     .build()?;
//! assert_eq!(config.trial_days, 30);
//! # Ok::<(), boostly::Error>(())
//! ```

use crate::trial::TRIAL_DAYS;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::time::Duration;

/// Tunables for the landing page components.
///
/// Delays are (de)serialized as milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingConfig {
    /// Trial length in days.
    pub trial_days: u32,
    /// Delay before the cookie banner appears for undecided visitors.
    #[serde(with = "millis")]
    pub consent_banner_delay: Duration,
    /// Simulated signup round-trip.
    #[serde(with = "millis")]
    pub signup_delay: Duration,
    /// Shortest simulated chat reply delay.
    #[serde(with = "millis")]
    pub chat_reply_min: Duration,
    /// Longest simulated chat reply delay (exclusive).
    #[serde(with = "millis")]
    pub chat_reply_max: Duration,
    /// Gap between a chat reply and its quick-action buttons.
    #[serde(with = "millis")]
    pub quick_actions_delay: Duration,
    /// Conversion-rate multiplier promised by the ROI calculator.
    pub roi_uplift: f64,
    /// Monthly plan price the ROI is measured against.
    pub plan_price: f64,
    /// Scroll depth (percent) that reveals the sticky CTA.
    pub sticky_cta_threshold: f64,
    /// FAQ questions, in page order.
    pub faq_questions: Vec<String>,
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            trial_days: TRIAL_DAYS,
            consent_banner_delay: Duration::from_secs(3),
            signup_delay: Duration::from_millis(1500),
            chat_reply_min: Duration::from_secs(1),
            chat_reply_max: Duration::from_secs(3),
            quick_actions_delay: Duration::from_millis(500),
            roi_uplift: 1.22,
            plan_price: 79.0,
            sticky_cta_threshold: 50.0,
            faq_questions: Vec::new(),
        }
    }
}

impl LandingConfig {
    /// Start from the defaults.
    #[must_use]
    pub fn builder() -> LandingConfigBuilder {
        LandingConfigBuilder::default()
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed JSON and
    /// [`Error::InvalidInput`] when values are inconsistent.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Range the chat reply delay is drawn from.
    #[must_use]
    pub const fn chat_reply_range(&self) -> Range<Duration> {
        self.chat_reply_min..self.chat_reply_max
    }

    /// Check cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.trial_days == 0 {
            return Err(Error::InvalidInput("trial_days must be positive".into()));
        }
        if self.chat_reply_min > self.chat_reply_max {
            return Err(Error::InvalidInput(format!(
                "chat reply delay range is empty: {:?}..{:?}",
                self.chat_reply_min, self.chat_reply_max
            )));
        }
        if !self.roi_uplift.is_finite() || self.roi_uplift < 0.0 {
            return Err(Error::InvalidInput(format!(
                "roi_uplift must be a non-negative number, got {}",
                self.roi_uplift
            )));
        }
        if !self.plan_price.is_finite() || self.plan_price <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "plan_price must be positive, got {}",
                self.plan_price
            )));
        }
        if !(0.0..=100.0).contains(&self.sticky_cta_threshold) {
            return Err(Error::InvalidInput(format!(
                "sticky_cta_threshold must be a percentage, got {}",
                self.sticky_cta_threshold
            )));
        }
        Ok(())
    }
}

/// Builder for [`LandingConfig`].
#[derive(Debug, Default)]
pub struct LandingConfigBuilder {
    config: LandingConfig,
}

impl LandingConfigBuilder {
    /// Set the trial length in days.
    #[must_use]
    pub const fn trial_days(mut self, days: u32) -> Self {
        self.config.trial_days = days;
        self
    }

    /// Set the cookie banner delay.
    #[must_use]
    pub const fn consent_banner_delay(mut self, delay: Duration) -> Self {
        self.config.consent_banner_delay = delay;
        self
    }

    /// Set the simulated signup delay.
    #[must_use]
    pub const fn signup_delay(mut self, delay: Duration) -> Self {
        self.config.signup_delay = delay;
        self
    }

    /// Set the chat reply delay range.
    #[must_use]
    pub const fn chat_reply_delay(mut self, min: Duration, max: Duration) -> Self {
        self.config.chat_reply_min = min;
        self.config.chat_reply_max = max;
        self
    }

    /// Set the quick-actions delay.
    #[must_use]
    pub const fn quick_actions_delay(mut self, delay: Duration) -> Self {
        self.config.quick_actions_delay = delay;
        self
    }

    /// Set the ROI model.
    #[must_use]
    pub fn roi(mut self, uplift: f64, plan_price: f64) -> Self {
        self.config.roi_uplift = uplift;
        self.config.plan_price = plan_price;
        self
    }

    /// Set the sticky CTA scroll threshold in percent.
    #[must_use]
    pub fn sticky_cta_threshold(mut self, percent: f64) -> Self {
        self.config.sticky_cta_threshold = percent;
        self
    }

    /// Set the FAQ questions shown in the accordion.
    #[must_use]
    pub fn faq_questions<I, Q>(mut self, questions: I) -> Self
    where
        I: IntoIterator<Item = Q>,
        Q: Into<String>,
    {
        self.config.faq_questions = questions.into_iter().map(Into::into).collect();
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the values are inconsistent.
    pub fn build(self) -> Result<LandingConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
