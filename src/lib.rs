//! # The Farmer Library
//! This crate provides the core logic for the hash-checking file watcher.
//! It includes modules for fingerprinting files, the poll loop, settings, logging,
//! and notifications.

pub mod cli;
pub mod error;
pub mod fingerprint;
pub mod logger;
pub mod notification;
pub mod settings;
pub mod watch;
