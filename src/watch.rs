//! # Watch Module
//! The poll loop: fingerprint every monitored path, compare against the last
//! value seen, alert on a difference, sleep, repeat.

use crate::error::{Result, WatchError};
use crate::fingerprint::{Fingerprint, poll};
use crate::notification::Alert;
use crate::settings::{AlertFailure, FirstObservation, Settings};
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Last observed fingerprint per monitored path, indexed like the path list.
///
/// A slot is `None` until the path has been polled once. Slots are never
/// added or removed after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchState {
    slots: Vec<Option<Fingerprint>>,
}

impl WatchState {
    /// Number of slots, one per monitored path.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the last fingerprint seen for a path.
    ///
    /// # Arguments
    ///
    /// * `index` - Position of the path in the monitored list.
    ///
    /// # Returns
    ///
    /// * `Some(&Fingerprint)` - The path has been polled at least once.
    /// * `None` - The path has not been polled yet, or `index` is out of range.
    pub fn get(&self, index: usize) -> Option<&Fingerprint> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    fn record(&mut self, index: usize, fingerprint: Fingerprint) {
        self.slots[index] = Some(fingerprint);
    }
}

/// Builds the initial state for `paths`: one unset slot per path, in order.
///
/// # Errors
///
/// * `WatchError::Usage` - `paths` is empty.
/// * `WatchError::ResourceLimit` - more than `max_paths` paths were given.
pub fn initialize(paths: &[PathBuf], max_paths: usize) -> Result<WatchState> {
    if paths.is_empty() {
        return Err(WatchError::Usage("no paths to monitor".to_string()));
    }
    if paths.len() > max_paths {
        return Err(WatchError::ResourceLimit {
            given: paths.len(),
            max: max_paths,
        });
    }
    Ok(WatchState {
        slots: vec![None; paths.len()],
    })
}

/// Waits out the interval between two iterations.
pub trait Sleeper {
    /// Blocks for `interval`.
    ///
    /// # Errors
    ///
    /// * `WatchError::Scheduling` - The wait could not be completed. The watch
    ///   loop stops on this error.
    fn sleep(&mut self, interval: Duration) -> Result<()>;
}

/// Blocks the current thread for the interval.
#[derive(Debug, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, interval: Duration) -> Result<()> {
        std::thread::sleep(interval);
        Ok(())
    }
}

/// The message reported when the content of `path` changed.
pub fn change_message(path: &Path) -> String {
    format!("Hash mismatch for {}!", path.display())
}

/// The poll/compare/alert/sleep cycle over a fixed list of paths.
///
/// `A` receives change messages and `S` waits out the interval between
/// iterations. Both are fixed at construction.
pub struct WatchLoop<A: Alert, S: Sleeper> {
    paths: Vec<PathBuf>,
    state: WatchState,
    interval: Duration,
    first_observation: FirstObservation,
    on_alert_failure: AlertFailure,
    alert: A,
    sleeper: S,
}

impl<A: Alert, S: Sleeper> WatchLoop<A, S> {
    /// Validates `paths` against the settings and sets up an unset state.
    ///
    /// # Arguments
    ///
    /// * `paths` - The files to monitor, in polling order. Duplicates are kept.
    /// * `settings` - Interval, path limit and the first-observation and
    ///   alert-failure policies.
    /// * `alert` - Where change messages go.
    /// * `sleeper` - What waits between iterations.
    ///
    /// # Errors
    ///
    /// * `WatchError::Usage` - `paths` is empty.
    /// * `WatchError::ResourceLimit` - More than `settings.max_paths` paths.
    pub fn new(paths: Vec<PathBuf>, settings: &Settings, alert: A, sleeper: S) -> Result<Self> {
        let state = initialize(&paths, settings.max_paths)?;
        Ok(WatchLoop {
            paths,
            state,
            interval: settings.interval(),
            first_observation: settings.first_observation,
            on_alert_failure: settings.on_alert_failure,
            alert,
            sleeper,
        })
    }

    /// The monitored paths, in polling order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn state(&self) -> &WatchState {
        &self.state
    }

    /// The alert sink, mostly useful to inspect a recording sink in tests.
    pub fn alert(&self) -> &A {
        &self.alert
    }

    /// Runs one iteration over every path, in order, without sleeping.
    ///
    /// Returns the indices of the paths that raised a change event.
    pub fn poll_once(&mut self) -> Result<Vec<usize>> {
        let mut changed = Vec::new();
        for index in 0..self.paths.len() {
            let fingerprint = poll(&self.paths[index])?;
            let is_change = match self.state.get(index) {
                Some(previous) => *previous != fingerprint,
                None => self.first_observation == FirstObservation::Alert,
            };

            if is_change {
                self.report_change(index, &fingerprint)?;
                changed.push(index);
            } else if self.state.get(index).is_none() {
                log::info!(
                    "Baseline for {}: {}",
                    self.paths[index].display(),
                    fingerprint
                );
            }

            if self.state.get(index) != Some(&fingerprint) {
                self.state.record(index, fingerprint);
            }
        }
        Ok(changed)
    }

    fn report_change(&mut self, index: usize, fingerprint: &Fingerprint) -> Result<()> {
        let path = &self.paths[index];
        let message = change_message(path);
        println!("{}", message);
        match self.state.get(index) {
            Some(previous) => log::warn!(
                "Change detected in {}: {} -> {}",
                path.display(),
                previous,
                fingerprint
            ),
            None => log::warn!("First observation of {}: {}", path.display(), fingerprint),
        }

        if let Err(e) = self.alert.alert(&message) {
            match self.on_alert_failure {
                AlertFailure::Fatal => return Err(e),
                AlertFailure::Log => log::error!("{}", e),
            }
        }
        Ok(())
    }

    /// Polls and sleeps forever. Returns only with the first fatal error.
    pub fn run(mut self) -> Result<Infallible> {
        log::info!(
            "Watching {} path(s) every {}s",
            self.paths.len(),
            self.interval.as_secs()
        );
        loop {
            self.poll_once()?;
            self.sleeper.sleep(self.interval)?;
        }
    }
}
