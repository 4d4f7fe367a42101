//! Landing page composition root.
//!
//! [`LandingPage`] wires every component to one shared store, event sink,
//! clock and scheduler, and runs the page-load sequence.

use crate::chat::ChatWidget;
use crate::clock::Clock;
use crate::config::LandingConfig;
use crate::consent::CookieConsent;
use crate::engagement::{
    CtaTracker, ExitIntent, FaqAccordion, FunnelStep, FunnelTracker, StickyCta,
};
use crate::events::EventSink;
use crate::experiment::{ExperimentRegistry, VariantAssigner, HERO_CTA_TEXT};
use crate::kv::KvStore;
use crate::roi::RoiCalculator;
use crate::scheduler::Scheduler;
use crate::signup::{SignupFlow, SignupForm, SubmitOutcome};
use crate::theme::{Theme, ThemePreference};
use crate::trial::TrialClock;
use crate::vitals::WebVitals;
use crate::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

/// What the page shows right after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLoad {
    /// Active colour scheme.
    pub theme: Theme,
    /// Hero button copy from the `hero_cta_text` experiment.
    pub hero_cta: Option<String>,
    /// Trial countdown, when a trial exists.
    pub trial_days_left: Option<u32>,
    /// Whether the cookie banner is queued.
    pub consent_banner_scheduled: bool,
}

/// Every interactive component of the landing page.
///
/// `S`, `E` and `T` are cloned into the components, so pass shared handles
/// such as `Arc<MemoryKvStore>`.
pub struct LandingPage<S, E, C, T> {
    config: LandingConfig,
    scheduler: T,
    assigner: VariantAssigner<S, E, StdRng>,
    trial: TrialClock<S, C>,
    theme: ThemePreference<S, E>,
    consent: CookieConsent<S, E>,
    signup: SignupFlow<E, T>,
    chat: ChatWidget<E, T, StdRng>,
    roi: RoiCalculator<E>,
    funnel: FunnelTracker<E>,
    sticky_cta: StickyCta<E>,
    exit_intent: ExitIntent<E>,
    faq: FaqAccordion<E>,
    cta: CtaTracker<E>,
    vitals: WebVitals<E>,
}

impl<S, E, C, T> std::fmt::Debug for LandingPage<S, E, C, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LandingPage")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S, E, C, T> LandingPage<S, E, C, T>
where
    S: KvStore + Clone,
    E: EventSink + Clone + Send + 'static,
    C: Clock,
    T: Scheduler + Clone + Send + 'static,
{
    /// Assemble the page with an entropy-seeded random source.
    pub fn new(
        config: LandingConfig,
        registry: ExperimentRegistry,
        store: S,
        sink: E,
        clock: C,
        scheduler: T,
    ) -> Self {
        Self::with_rng(config, registry, store, sink, clock, scheduler, StdRng::from_entropy())
    }

    /// Assemble the page with a fixed seed, for reproducible runs.
    pub fn with_seed(
        config: LandingConfig,
        registry: ExperimentRegistry,
        store: S,
        sink: E,
        clock: C,
        scheduler: T,
        seed: u64,
    ) -> Self {
        Self::with_rng(
            config,
            registry,
            store,
            sink,
            clock,
            scheduler,
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng(
        config: LandingConfig,
        registry: ExperimentRegistry,
        store: S,
        sink: E,
        clock: C,
        scheduler: T,
        mut rng: StdRng,
    ) -> Self {
        let chat_rng = StdRng::seed_from_u64(rand::Rng::gen(&mut rng));
        Self {
            assigner: VariantAssigner::new(registry, store.clone(), sink.clone(), rng),
            trial: TrialClock::with_trial_days(store.clone(), clock, config.trial_days),
            theme: ThemePreference::new(store.clone(), sink.clone()),
            consent: CookieConsent::new(store, sink.clone()),
            signup: SignupFlow::new(sink.clone(), scheduler.clone(), config.signup_delay),
            chat: ChatWidget::new(
                sink.clone(),
                scheduler.clone(),
                chat_rng,
                config.chat_reply_range(),
                config.quick_actions_delay,
            ),
            roi: RoiCalculator::new(sink.clone(), config.roi_uplift, config.plan_price),
            funnel: FunnelTracker::new(sink.clone()),
            sticky_cta: StickyCta::new(sink.clone(), config.sticky_cta_threshold),
            exit_intent: ExitIntent::new(sink.clone()),
            faq: FaqAccordion::new(sink.clone(), config.faq_questions.clone()),
            cta: CtaTracker::new(sink.clone()),
            vitals: WebVitals::new(sink),
            scheduler,
            config,
        }
    }

    /// Page-load sequence: start a logged-in visitor's trial, read the
    /// theme, queue the cookie banner, bucket the hero CTA and record the
    /// page view.
    ///
    /// # Errors
    ///
    /// Propagates key-value store failures.
    pub fn initialize(&mut self) -> Result<PageLoad> {
        if self.trial.ensure_started()? {
            tracing::info!("started trial for logged-in visitor");
        }
        let theme = self.theme.current()?;
        let consent_banner_scheduled = self
            .consent
            .schedule_banner(&self.scheduler, self.config.consent_banner_delay)?;
        let hero_cta = self.assigner.variant(HERO_CTA_TEXT)?;
        self.funnel.reach(FunnelStep::PageView);
        let trial_days_left = self.trial.days_left()?;

        tracing::debug!(%theme, ?hero_cta, ?trial_days_left, "landing page initialized");
        Ok(PageLoad {
            theme,
            hero_cta,
            trial_days_left,
            consent_banner_scheduled,
        })
    }

    /// Hero or pricing CTA clicked.
    pub fn click_cta(&mut self, variant: &str) {
        self.cta.click(variant);
        if variant == "hero_primary" {
            self.funnel.reach(FunnelStep::HeroCtaClick);
        }
    }

    /// Pricing section scrolled into view.
    pub fn pricing_visible(&mut self) {
        self.funnel.reach(FunnelStep::PricingView);
    }

    /// Focus entered the signup form.
    pub fn form_focused(&mut self) {
        self.funnel.reach(FunnelStep::FormStart);
    }

    /// Submit the signup form, tagged with the active CTA variant.
    pub fn submit_signup(&mut self, form: &SignupForm) -> SubmitOutcome {
        let outcome = self.signup.submit(form, self.cta.active_variant());
        if outcome == SubmitOutcome::Submitted {
            self.funnel.reach(FunnelStep::FormSubmit);
        }
        outcome
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &LandingConfig {
        &self.config
    }

    /// A/B assigner.
    pub fn assigner(&mut self) -> &mut VariantAssigner<S, E, StdRng> {
        &mut self.assigner
    }

    /// Trial countdown.
    #[must_use]
    pub const fn trial(&self) -> &TrialClock<S, C> {
        &self.trial
    }

    /// Theme toggle.
    #[must_use]
    pub const fn theme(&self) -> &ThemePreference<S, E> {
        &self.theme
    }

    /// Cookie consent.
    pub fn consent(&mut self) -> &mut CookieConsent<S, E> {
        &mut self.consent
    }

    /// Signup form.
    #[must_use]
    pub const fn signup(&self) -> &SignupFlow<E, T> {
        &self.signup
    }

    /// Chat window.
    pub fn chat(&mut self) -> &mut ChatWidget<E, T, StdRng> {
        &mut self.chat
    }

    /// ROI calculator.
    #[must_use]
    pub const fn roi(&self) -> &RoiCalculator<E> {
        &self.roi
    }

    /// Conversion funnel.
    pub fn funnel(&mut self) -> &mut FunnelTracker<E> {
        &mut self.funnel
    }

    /// Sticky CTA bar.
    pub fn sticky_cta(&mut self) -> &mut StickyCta<E> {
        &mut self.sticky_cta
    }

    /// Exit-intent popup.
    pub fn exit_intent(&mut self) -> &mut ExitIntent<E> {
        &mut self.exit_intent
    }

    /// FAQ accordion over the configured questions.
    pub fn faq(&mut self) -> &mut FaqAccordion<E> {
        &mut self.faq
    }

    /// CTA click tracking.
    #[must_use]
    pub const fn cta(&self) -> &CtaTracker<E> {
        &self.cta
    }

    /// Web Vitals reporter.
    #[must_use]
    pub const fn vitals(&self) -> &WebVitals<E> {
        &self.vitals
    }
}
