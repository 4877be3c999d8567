//! # Error Module
//! Every failure the watcher can hit. All of them end the process; the binary
//! maps them to exit status 1.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, WatchError>;

#[derive(Error, Debug)]
pub enum WatchError {
    /// Bad or missing command-line arguments.
    #[error("{0}")]
    Usage(String),

    /// More monitored paths than the configured maximum.
    #[error("too many paths specified: {given} (maximum is {max})")]
    ResourceLimit { given: usize, max: usize },

    /// A monitored path could not be opened or read.
    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The digest primitive produced something that is not a fingerprint.
    #[error("digest failure for {}: {message}", path.display())]
    Digest { path: PathBuf, message: String },

    /// The notification subsystem could not show an alert.
    #[error("failed to show notification: {0}")]
    Alert(String),

    /// The interval wait failed.
    #[error("failed to sleep: {0}")]
    Scheduling(String),

    /// The settings file exists but cannot be used.
    #[error("invalid settings in {}: {message}", path.display())]
    Settings { path: PathBuf, message: String },
}
