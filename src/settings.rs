//! # Settings Module
//! This module defines the settings structure and provides functions to load
//! settings from a TOML file.

use crate::error::{Result, WatchError};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

/// Settings file looked up in the working directory when none is given.
pub const SETTINGS_FILE: &str = "thefarmer.toml";

/// What to do with the first fingerprint seen for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstObservation {
    /// Store it silently; only later changes alert.
    Baseline,
    /// Treat the unset slot as different and alert on startup.
    Alert,
}

/// What to do when the alert sink fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertFailure {
    /// Stop the watcher.
    Fatal,
    /// Log the failure and keep watching.
    Log,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub interval_secs: u64,
    pub max_paths: usize,
    pub log_file: String,
    pub app_name: String,
    pub notification_title: String,
    pub first_observation: FirstObservation,
    pub on_alert_failure: AlertFailure,
    pub desktop_notifications: bool,
}

impl Default for Settings {
    /// Creates a new `Settings` instance with default values.
    fn default() -> Self {
        Settings {
            interval_secs: 60,
            max_paths: 10,
            log_file: "thefarmer.log".to_string(),
            app_name: "Hash Checker".to_string(),
            notification_title: "Hash Mismatch".to_string(),
            first_observation: FirstObservation::Baseline,
            on_alert_failure: AlertFailure::Fatal,
            desktop_notifications: true,
        }
    }
}

impl Settings {
    /// The pause between two poll iterations.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    fn validate(self, path: &Path) -> Result<Self> {
        let invalid = |message: &str| WatchError::Settings {
            path: path.to_path_buf(),
            message: message.to_string(),
        };
        if self.interval_secs == 0 {
            return Err(invalid("interval_secs must be greater than zero"));
        }
        if self.max_paths == 0 {
            return Err(invalid("max_paths must be greater than zero"));
        }
        Ok(self)
    }
}

/// Loads settings from `thefarmer.toml` in the working directory.
/// If the file does not exist, default settings are used.
pub fn load_settings() -> Result<Settings> {
    load_default_location(Path::new(SETTINGS_FILE))
}

fn load_default_location(path: &Path) -> Result<Settings> {
    match fs::read_to_string(path) {
        Ok(contents) => parse_settings(path, &contents),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Settings::default()),
        Err(e) => Err(unreadable(path, e)),
    }
}

/// Loads settings from a file the user named explicitly.
///
/// # Arguments
///
/// * `path` - The TOML file given with `-c`.
///
/// # Returns
///
/// * `Ok(Settings)` - The parsed and validated settings.
/// * `Err(WatchError::Settings)` - The file is missing, unreadable or invalid.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    let contents = fs::read_to_string(path).map_err(|e| unreadable(path, e))?;
    parse_settings(path, &contents)
}

fn parse_settings(path: &Path, contents: &str) -> Result<Settings> {
    toml::from_str::<Settings>(contents)
        .map_err(|e| WatchError::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .validate(path)
}

fn unreadable(path: &Path, err: std::io::Error) -> WatchError {
    WatchError::Settings {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_default_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_default_location(&dir.path().join(SETTINGS_FILE)).unwrap();

        assert_eq!(settings.interval(), Duration::from_secs(60));
        assert_eq!(settings.max_paths, 10);
        assert_eq!(settings.first_observation, FirstObservation::Baseline);
        assert_eq!(settings.on_alert_failure, AlertFailure::Fatal);
        assert!(settings.desktop_notifications);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = load_settings_from(&dir.path().join("farm.toml")).unwrap_err();

        assert!(matches!(err, WatchError::Settings { .. }));
        assert!(err.to_string().contains("farm.toml"));
    }

    #[test]
    fn default_location_is_parsed_when_present() {
        let dir = tempdir().unwrap();
        let file = dir.path().join(SETTINGS_FILE);
        fs::write(&file, "max_paths = 3\n").unwrap();

        assert_eq!(load_default_location(&file).unwrap().max_paths, 3);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("thefarmer.toml");
        fs::write(
            &file,
            "interval_secs = 5\nfirst_observation = \"alert\"\non_alert_failure = \"log\"\n",
        )
        .unwrap();

        let settings = load_settings_from(&file).unwrap();
        assert_eq!(settings.interval_secs, 5);
        assert_eq!(settings.first_observation, FirstObservation::Alert);
        assert_eq!(settings.on_alert_failure, AlertFailure::Log);
        assert_eq!(settings.log_file, "thefarmer.log");
        assert_eq!(settings.app_name, "Hash Checker");
    }

    #[test]
    fn unparsable_file_is_an_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("thefarmer.toml");
        fs::write(&file, "interval_secs = \"soon\"\n").unwrap();

        assert!(matches!(
            load_settings_from(&file),
            Err(WatchError::Settings { .. })
        ));
    }

    #[test]
    fn unknown_key_is_an_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("thefarmer.toml");
        fs::write(&file, "intervall_secs = 5\n").unwrap();

        assert!(load_settings_from(&file).is_err());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("thefarmer.toml");
        fs::write(&file, "interval_secs = 0\n").unwrap();

        let err = load_settings_from(&file).unwrap_err();
        assert!(err.to_string().contains("interval_secs"));
    }
}
