//! Core error types for fuzzynotifs-core.
//!
//! Uses thiserror for ergonomic error definitions with context.

use std::path::PathBuf;

use chrono::NaiveTime;
use thiserror::Error;

/// Top-level error type for fuzzynotifs-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Schedule allocation errors
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Config persistence errors
    #[error("Config store error: {0}")]
    Store(#[from] StoreError),

    /// Todo list index errors
    #[error("Todo index {index} out of bounds (list has {len} entries)")]
    TodoOutOfBounds { index: usize, len: usize },

    /// Unknown field name in the generic config get/set path
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    /// A value that cannot be parsed for the targeted config field
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while building a schedule.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid day window: day_end ({end}) must be after day_start ({start})")]
    InvalidWindow { start: NaiveTime, end: NaiveTime },

    #[error("Negative cooldown: {ms}ms")]
    NegativeCooldown { ms: i64 },

    #[error(
        "Infeasible schedule: {occurrences} reminders spaced {cooldown_ms}ms apart \
         cannot fit a {window_ms}ms day window"
    )]
    Infeasible {
        occurrences: i64,
        cooldown_ms: i64,
        window_ms: i64,
    },

    #[error(
        "Gave up placing '{title}' after {attempts} proposals; \
         the cooldown is too tight for its time-of-day window"
    )]
    PlacementExhausted { title: String, attempts: u32 },
}

/// Errors raised by the config store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read config from {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },

    #[error("Failed to parse config at {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },

    #[error("Failed to save config to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    #[error("Failed to create config directory {path}: {message}")]
    DirFailed { path: PathBuf, message: String },

    #[error("Could not determine a home directory for config storage")]
    NoHomeDir,
}

/// Result type alias using CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
