use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::entities::sample::Sample;

#[derive(Error, Debug)]
pub enum LogError {
    #[error("failed to open log file {path}: {reason}")]
    Open { path: String, reason: String },
    #[error("failed to write log file {path}: {reason}")]
    Write { path: String, reason: String },
}

/// Local append-only record of every cycle. Failures here are fatal to the process.
pub trait LogSink: Send + Sync {
    /// Append the metrics line for `sample`.
    ///
    /// # Errors
    ///
    /// Returns `LogError` if the log file cannot be opened or written.
    fn record_sample(&self, sample: &Sample) -> Result<(), LogError>;

    /// Append an error line describing a failed sink.
    ///
    /// # Errors
    ///
    /// Returns `LogError` if the log file cannot be opened or written.
    fn record_error(&self, at: DateTime<Utc>, message: &str) -> Result<(), LogError>;
}
