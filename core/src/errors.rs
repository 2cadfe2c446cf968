use thiserror::Error;

/// Errors that can occur with finding the config directory.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Unable to find the config directory for tunescout.")]
    Config,
}

/// Errors that can occur when reading a preference value.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("Unknown value {value:?} for preference {key:?}.")]
    UnknownValue { key: &'static str, value: String },
}
