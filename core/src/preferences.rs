//! Typed, observable user preferences.
//!
//! Values are stored as strings, keyed by name, and decoded on read through the [`PreferenceKey`]
//! they were written with. Reads of a key that was never written (or holds a value that no longer
//! decodes) fall back to the key's default.
//!
//! The store lives in memory, it is seeded from the config file at startup.

use std::collections::HashMap;

use log::warn;
use parking_lot::RwLock;
use serde::Deserialize;
use strum::{Display, EnumIter, EnumString};
use tokio::sync::watch;

use crate::{config::Settings, errors::PreferenceError};

/// The appearance mode of the app.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DarkMode {
    /// Follow the system setting
    #[default]
    System,
    Light,
    Dark,
}

/// A value that can be held by the preference store.
pub trait PreferenceValue: Sized + Copy + Send + Sync + 'static {
    fn encode(&self) -> String;
    fn decode(raw: &str) -> Option<Self>;
}

impl PreferenceValue for bool {
    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl PreferenceValue for DarkMode {
    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

/// A named, typed preference with a default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferenceKey<T> {
    pub name: &'static str,
    pub default: T,
}

impl<T> PreferenceKey<T> {
    #[must_use]
    pub const fn new(name: &'static str, default: T) -> Self {
        Self { name, default }
    }
}

pub const DARK_MODE: PreferenceKey<DarkMode> = PreferenceKey::new("darkMode", DarkMode::System);
pub const HAPTIC_FEEDBACK_ENABLED: PreferenceKey<bool> =
    PreferenceKey::new("hapticFeedbackEnabled", true);

type Entry = watch::Sender<Option<String>>;

/// The preference store.
#[derive(Debug, Default)]
pub struct Preferences {
    entries: RwLock<HashMap<&'static str, Entry>>,
}

impl Preferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the preferences from the config file.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let preferences = Self::new();
        preferences.set(&DARK_MODE, settings.appearance.dark_mode);
        preferences.set(&HAPTIC_FEEDBACK_ENABLED, settings.haptics.enabled);
        preferences
    }

    /// Read a preference, falling back to the key's default if it is unset or can't be decoded.
    #[must_use]
    pub fn get<T: PreferenceValue>(&self, key: &PreferenceKey<T>) -> T {
        self.try_get(key).unwrap_or_else(|e| {
            warn!("{e}, using the default");
            key.default
        })
    }

    /// Read a preference.
    ///
    /// # Errors
    ///
    /// Fails if the stored value can't be decoded as a `T`.
    pub fn try_get<T: PreferenceValue>(&self, key: &PreferenceKey<T>) -> Result<T, PreferenceError> {
        let raw = self
            .entries
            .read()
            .get(key.name)
            .and_then(|entry| entry.borrow().clone());

        decode(key, raw)
    }

    /// Write a preference, notifying everyone observing it.
    pub fn set<T: PreferenceValue>(&self, key: &PreferenceKey<T>, value: T) {
        self.set_raw(key.name, value.encode());
    }

    fn set_raw(&self, name: &'static str, raw: String) {
        let mut entries = self.entries.write();
        let entry = entries
            .entry(name)
            .or_insert_with(|| watch::channel(None).0);
        entry.send_if_modified(|current| {
            if current.as_deref() == Some(raw.as_str()) {
                false
            } else {
                *current = Some(raw);
                true
            }
        });
    }

    /// Observe a preference.
    ///
    /// The returned watch sees every change made after this call.
    #[must_use]
    pub fn observe<T: PreferenceValue>(&self, key: &PreferenceKey<T>) -> PreferenceWatch<T> {
        let rx = self
            .entries
            .write()
            .entry(key.name)
            .or_insert_with(|| watch::channel(None).0)
            .subscribe();

        PreferenceWatch { key: *key, rx }
    }
}

fn decode<T: PreferenceValue>(
    key: &PreferenceKey<T>,
    raw: Option<String>,
) -> Result<T, PreferenceError> {
    match raw {
        None => Ok(key.default),
        Some(raw) => T::decode(&raw).ok_or(PreferenceError::UnknownValue {
            key: key.name,
            value: raw,
        }),
    }
}

/// A subscription to one preference.
#[derive(Debug)]
pub struct PreferenceWatch<T> {
    key: PreferenceKey<T>,
    rx: watch::Receiver<Option<String>>,
}

impl<T: PreferenceValue> PreferenceWatch<T> {
    /// The current value of the preference.
    #[must_use]
    pub fn current(&self) -> T {
        decode(&self.key, self.rx.borrow().clone()).unwrap_or(self.key.default)
    }

    /// Wait for the preference to change, returns the new value.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;
        let raw = self.rx.borrow_and_update().clone();
        Some(decode(&self.key, raw).unwrap_or(self.key.default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppearanceSettings, HapticSettings};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[test]
    fn test_unset_preferences_use_defaults() {
        let preferences = Preferences::new();
        assert_eq!(preferences.get(&DARK_MODE), DarkMode::System);
        assert!(preferences.get(&HAPTIC_FEEDBACK_ENABLED));
    }

    #[test]
    fn test_set_then_get() {
        let preferences = Preferences::new();
        preferences.set(&DARK_MODE, DarkMode::Dark);
        preferences.set(&HAPTIC_FEEDBACK_ENABLED, false);

        assert_eq!(preferences.get(&DARK_MODE), DarkMode::Dark);
        assert!(!preferences.get(&HAPTIC_FEEDBACK_ENABLED));
    }

    #[test]
    fn test_undecodable_value_falls_back_to_default() {
        let preferences = Preferences::new();
        preferences.set_raw(DARK_MODE.name, "purple".into());

        assert_eq!(
            preferences.try_get(&DARK_MODE),
            Err(PreferenceError::UnknownValue {
                key: "darkMode",
                value: "purple".into()
            })
        );
        assert_eq!(preferences.get(&DARK_MODE), DarkMode::System);
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            appearance: AppearanceSettings {
                dark_mode: DarkMode::Light,
            },
            haptics: HapticSettings { enabled: false },
            ..Settings::default()
        };
        let preferences = Preferences::from_settings(&settings);

        assert_eq!(preferences.get(&DARK_MODE), DarkMode::Light);
        assert!(!preferences.get(&HAPTIC_FEEDBACK_ENABLED));
    }

    #[rstest]
    #[case("system", DarkMode::System)]
    #[case("LIGHT", DarkMode::Light)]
    #[case("Dark", DarkMode::Dark)]
    fn test_dark_mode_decode(#[case] raw: &str, #[case] expected: DarkMode) {
        assert_eq!(DarkMode::decode(raw), Some(expected));
    }

    #[test]
    fn test_dark_mode_encoding_is_reversible() {
        for mode in DarkMode::iter() {
            assert_eq!(DarkMode::decode(&mode.encode()), Some(mode));
        }
    }

    #[tokio::test]
    async fn test_observe_sees_changes() {
        let preferences = Preferences::new();
        let mut watch = preferences.observe(&HAPTIC_FEEDBACK_ENABLED);
        assert!(watch.current());

        preferences.set(&HAPTIC_FEEDBACK_ENABLED, false);
        assert_eq!(watch.changed().await, Some(false));

        preferences.set(&HAPTIC_FEEDBACK_ENABLED, true);
        assert_eq!(watch.changed().await, Some(true));
        assert!(watch.current());
    }

    #[tokio::test]
    async fn test_observe_ends_when_store_is_dropped() {
        let preferences = Preferences::new();
        let mut watch = preferences.observe(&DARK_MODE);
        drop(preferences);

        assert_eq!(watch.changed().await, None);
    }

    #[tokio::test]
    async fn test_writing_the_same_value_does_not_notify() {
        let preferences = Preferences::new();
        preferences.set(&DARK_MODE, DarkMode::Dark);
        let mut watch = preferences.observe(&DARK_MODE);

        preferences.set(&DARK_MODE, DarkMode::Dark);
        preferences.set(&DARK_MODE, DarkMode::Light);

        assert_eq!(watch.changed().await, Some(DarkMode::Light));
    }
}
