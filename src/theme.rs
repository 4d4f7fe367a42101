//! Light/dark theme preference.

use crate::events::{EventName, EventSink};
use crate::kv::{keys, KvStore};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Page colour scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Default scheme.
    #[default]
    Light,
    /// Dark scheme.
    Dark,
}

impl Theme {
    /// Stored name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Parse a stored value; anything but `dark` is light.
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        if value == "dark" {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted theme toggle.
#[derive(Debug)]
pub struct ThemePreference<S, E> {
    store: S,
    sink: E,
}

impl<S: KvStore, E: EventSink> ThemePreference<S, E> {
    /// Create the preference component.
    pub const fn new(store: S, sink: E) -> Self {
        Self { store, sink }
    }

    /// Stored theme, light when unset.
    ///
    /// # Errors
    ///
    /// Propagates key-value store failures.
    pub fn current(&self) -> Result<Theme> {
        Ok(self
            .store
            .get(keys::THEME)?
            .map_or(Theme::Light, |v| Theme::from_stored(&v)))
    }

    /// Flip the theme, persist it and record `theme_changed`.
    ///
    /// # Errors
    ///
    /// Propagates key-value store failures.
    pub fn toggle(&self) -> Result<Theme> {
        let theme = self.current()?.toggled();
        self.store.set(keys::THEME, theme.as_str())?;
        self.sink.record(
            EventName::ThemeChanged,
            serde_json::json!({ "theme": theme.as_str() }),
        );
        Ok(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemoryEventSink;
    use crate::kv::MemoryKvStore;

    #[test]
    fn test_default_is_light() {
        let store = MemoryKvStore::new();
        let sink = MemoryEventSink::new();
        let theme = ThemePreference::new(&store, &sink);

        assert_eq!(theme.current().unwrap(), Theme::Light);
    }

    #[test]
    fn test_unknown_value_is_light() {
        assert_eq!(Theme::from_stored("solarized"), Theme::Light);
        assert_eq!(Theme::from_stored("dark"), Theme::Dark);
    }

    #[test]
    fn test_toggle_persists_and_records() {
        let store = MemoryKvStore::new();
        let sink = MemoryEventSink::new();
        let theme = ThemePreference::new(&store, &sink);

        assert_eq!(theme.toggle().unwrap(), Theme::Dark);
        assert_eq!(store.get("theme").unwrap(), Some("dark".to_string()));
        assert_eq!(theme.toggle().unwrap(), Theme::Light);

        let payloads: Vec<_> = sink
            .events_named(EventName::ThemeChanged)
            .into_iter()
            .map(|e| e.payload)
            .collect();
        assert_eq!(
            payloads,
            [
                serde_json::json!({ "theme": "dark" }),
                serde_json::json!({ "theme": "light" })
            ]
        );
    }
}
