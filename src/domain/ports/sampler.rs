use chrono::Utc;
use thiserror::Error;

use crate::domain::entities::sample::Sample;

#[derive(Error, Debug)]
pub enum SamplerError {
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),
    #[error("failed to collect system metrics: {0}")]
    MetricsUnavailable(String),
}

/// Instantaneous CPU, memory and disk usage of the current host.
pub trait ResourceSampler: Send + Sync {
    /// Current CPU usage percentage.
    ///
    /// # Errors
    ///
    /// Returns `SamplerError` if the OS accounting facility cannot be read.
    fn cpu_usage(&self) -> Result<u8, SamplerError>;

    /// Current memory usage percentage.
    ///
    /// # Errors
    ///
    /// Returns `SamplerError` if the OS accounting facility cannot be read.
    fn memory_usage(&self) -> Result<u8, SamplerError>;

    /// Used capacity of the system volume, `None` when it cannot be determined.
    ///
    /// # Errors
    ///
    /// Returns `SamplerError` only for failures that are not disk-specific.
    fn disk_usage(&self) -> Result<Option<u8>, SamplerError>;

    /// Takes all three readings and stamps them with the current time.
    ///
    /// # Errors
    ///
    /// Propagates the first `SamplerError` from the individual readings.
    fn sample(&self) -> Result<Sample, SamplerError> {
        let cpu = self.cpu_usage()?;
        let memory = self.memory_usage()?;
        let disk = self.disk_usage()?;
        Ok(Sample::new(Utc::now(), cpu, memory, disk))
    }
}
