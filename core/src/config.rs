//! Handles the configuration of tunescout.
//!
//! this module is responsible for parsing the Tunescout.toml file, applying environment
//! variable overrides, and applying overrides from cli arguments.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use std::{path::PathBuf, str::FromStr, time::Duration};

use crate::preferences::DarkMode;

pub static DEFAULT_CONFIG: &str = include_str!("../Tunescout.toml");

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Settings for the catalog client
    #[serde(default)]
    pub catalog: CatalogSettings,
    /// Settings for the search session
    #[serde(default)]
    pub search: SearchSettings,
    /// Appearance preferences
    #[serde(default)]
    pub appearance: AppearanceSettings,
    /// Haptic feedback preferences
    #[serde(default)]
    pub haptics: HapticSettings,
    /// What level of logging to use.
    /// Default is "info".
    #[serde(default = "default_log_level")]
    #[serde(deserialize_with = "de_log_level")]
    pub log_level: log::LevelFilter,
}

impl Default for Settings {
    #[inline]
    fn default() -> Self {
        Self {
            catalog: CatalogSettings::default(),
            search: SearchSettings::default(),
            appearance: AppearanceSettings::default(),
            haptics: HapticSettings::default(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from the config file, environment variables, and CLI arguments.
    ///
    /// The config file is located at the path specified by the `--config` flag.
    ///
    /// The environment variables are prefixed with `TUNESCOUT_`, nested keys are separated
    /// by `__` (e.g. `TUNESCOUT_SEARCH__DEBOUNCE_MS=300`).
    ///
    /// # Errors
    ///
    /// This function will return an error if the config file is not found or if the config file is
    /// invalid.
    #[inline]
    pub fn init(config: PathBuf, log_level: Option<log::LevelFilter>) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from(config))
            .add_source(
                Environment::with_prefix("TUNESCOUT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Self = s.try_deserialize()?;

        if let Some(log_level) = log_level {
            settings.log_level = log_level;
        }

        Ok(settings)
    }

    /// Get the (default) path to the config file.
    /// If the config file does not exist at this path, it will be created with the default config.
    ///
    /// See [`crate::get_config_dir`] for more information about where this default path is located.
    ///
    /// # Errors
    ///
    /// This function will return an error if the system config directory (e.g., `~/.config` on linux) could not be found, or if the config file was missing and could not be created.
    #[inline]
    pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
        match crate::get_config_dir() {
            Ok(config_dir) => {
                // if the config directory does not exist, create it
                if !config_dir.exists() {
                    std::fs::create_dir_all(&config_dir)?;
                }
                let config_file = config_dir.join("Tunescout.toml");

                if !config_file.exists() {
                    std::fs::write(&config_file, DEFAULT_CONFIG)?;
                }

                Ok(config_file)
            }
            Err(e) => {
                log::error!("{e}");
                Err(std::io::Error::new(std::io::ErrorKind::NotFound, e))
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct CatalogSettings {
    /// The root of the catalog API, requests go to `{base_url}/search`.
    /// Default is "https://itunes.apple.com".
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// How long a single catalog request may take before it is abandoned, in seconds.
    /// Default is 10.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// The user agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl CatalogSettings {
    #[must_use]
    #[inline]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "https://itunes.apple.com".into()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("tunescout/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for CatalogSettings {
    #[inline]
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct SearchSettings {
    /// How long the query has to stay unchanged before a search is sent, in milliseconds.
    /// Default is 600.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// What kind of media to search for.
    /// One of "music", "movie", "podcast", "musicVideo", "audiobook", "shortFilm", "tvShow",
    /// "software", "ebook", or "all".
    /// Default is "music".
    #[serde(default = "default_media")]
    pub media: String,
    /// How many results to request per search (1 to 200).
    /// Default is 50.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl SearchSettings {
    #[must_use]
    #[inline]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// How long a query has to settle before it is searched for, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 600;

const fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_media() -> String {
    "music".into()
}

const fn default_limit() -> u32 {
    50
}

impl Default for SearchSettings {
    #[inline]
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            media: default_media(),
            limit: default_limit(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AppearanceSettings {
    /// "system", "light", or "dark".
    /// Default is "system".
    #[serde(default)]
    pub dark_mode: DarkMode,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct HapticSettings {
    /// Whether haptic feedback is dispatched at all.
    /// Default is true.
    #[serde(default = "default_haptics_enabled")]
    pub enabled: bool,
}

const fn default_haptics_enabled() -> bool {
    true
}

impl Default for HapticSettings {
    #[inline]
    fn default() -> Self {
        Self {
            enabled: default_haptics_enabled(),
        }
    }
}

fn de_log_level<'de, D>(deserializer: D) -> Result<log::LevelFilter, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(log::LevelFilter::from_str(&s).unwrap_or_else(|_| default_log_level()))
}

const fn default_log_level() -> log::LevelFilter {
    log::LevelFilter::Info
}
