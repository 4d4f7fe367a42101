//! # Boostly: Landing Page Interaction Core
//!
//! Browser-free model of the Boostly marketing page. Everything the page
//! script used to reach through `window` and `localStorage` is injected
//! instead, so each behavior runs and tests without a browser.
//!
//! ## Components
//!
//! - **A/B bucketing**: sticky weighted variant assignment ([`experiment`])
//! - **Trial countdown**: days left in the 14-day trial ([`trial`])
//! - **Consent**: cookie banner and preferences ([`consent`])
//! - **Widgets**: signup form, chat, ROI calculator, funnel, popups
//! - **Collaborators**: key-value store ([`kv`]), analytics sink
//!   ([`events`]), clock ([`clock`]) and timer ([`scheduler`])
//!
//! ## Example Usage
//!
//! ```rust
//! use boostly::config::LandingConfig;
//! use boostly::events::MemoryEventSink;
//! use boostly::experiment::ExperimentRegistry;
//! use boostly::kv::MemoryKvStore;
//! use boostly::scheduler::ManualScheduler;
//! use boostly::{LandingPage, SystemClock};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryKvStore::new());
//! let sink = Arc::new(MemoryEventSink::new());
//! let mut page = LandingPage::new(
//!     LandingConfig::default(),
//!     ExperimentRegistry::landing_defaults(),
//!     Arc::clone(&store),
//!     Arc::clone(&sink),
//!     SystemClock,
//!     Arc::new(ManualScheduler::new()),
//! );
//!
//! let load = page.initialize()?;
//! println!("hero button reads: {:?}", load.hero_cta);
//! # Ok::<(), boostly::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod chat;
pub mod clock;
pub mod config;
pub mod consent;
pub mod engagement;
pub mod error;
pub mod events;
pub mod experiment;
pub mod kv;
pub mod logging;
pub mod page;
pub mod roi;
pub mod scheduler;
pub mod signup;
pub mod theme;
pub mod trial;
pub mod vitals;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use page::{LandingPage, PageLoad};
