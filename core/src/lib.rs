use std::{path::PathBuf, time::Duration};

use errors::DirectoryError;

pub mod config;
pub mod errors;
pub mod haptic;
pub mod logger;
pub mod navigation;
pub mod preferences;

/// Get the directory the config file lives in.
///
/// On linux this is `$XDG_CONFIG_HOME/tunescout` (usually `~/.config/tunescout`).
///
/// # Errors
///
/// Fails if the home directory of the current user cannot be determined.
#[inline]
pub fn get_config_dir() -> Result<PathBuf, DirectoryError> {
    directories::ProjectDirs::from("", "", "tunescout")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(DirectoryError::Config)
}

/// Format a duration as `SS.mmm`, used as the uptime column of the logger.
#[must_use]
#[inline]
pub fn format_duration(duration: &Duration) -> String {
    let total_millis = duration.as_millis();
    let seconds = total_millis / 1000;
    let millis = total_millis % 1000;

    format!("{seconds:0>2}.{millis:0>3}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Duration::from_millis(0), "00.000")]
    #[case(Duration::from_millis(5), "00.005")]
    #[case(Duration::from_millis(1_250), "01.250")]
    #[case(Duration::from_secs(125), "125.000")]
    fn test_format_duration(#[case] duration: Duration, #[case] expected: &str) {
        assert_eq!(format_duration(&duration), expected);
    }
}
