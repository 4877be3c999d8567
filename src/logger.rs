//! # Logger Module
//! A `log` backend that writes timestamped lines to the watcher's log file.
//! Warnings and errors are mirrored to stderr.

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Appends every enabled record to a log file.
///
/// The file is opened per record, so it may be rotated or deleted while the
/// watcher runs.
pub struct FileLogger {
    path: PathBuf,
    level: LevelFilter,
}

impl FileLogger {
    /// Creates a logger for the given file.
    ///
    /// # Arguments
    ///
    /// * `path` - The log file. It is created on the first write.
    /// * `level` - Records less severe than this are dropped.
    pub fn new(path: impl Into<PathBuf>, level: LevelFilter) -> Self {
        FileLogger {
            path: path.into(),
            level,
        }
    }

    fn append(&self, line: &str) {
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            if let Err(e) = writeln!(file, "{}", line) {
                eprintln!("Couldn't write to log file: {}", e);
            }
        }
    }
}

/// Formats one log line: `[YYYY-MM-DD HH:MM:SS] LEVEL message`.
pub fn format_line(level: Level, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("[{}] {:<5} {}", timestamp, level, message)
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();
        self.append(&format_line(record.level(), &message));
        if record.level() <= Level::Warn {
            eprintln!("{}", message);
        }
    }

    fn flush(&self) {}
}

/// Installs a `FileLogger` writing to `path` as the global logger.
///
/// # Arguments
///
/// * `path` - The log file, usually `Settings::log_file`.
///
/// # Returns
///
/// * `Err(SetLoggerError)` - A global logger was already installed.
pub fn init(path: impl Into<PathBuf>) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(FileLogger::new(path, LevelFilter::Info)))?;
    log::set_max_level(LevelFilter::Info);
    Ok(())
}
