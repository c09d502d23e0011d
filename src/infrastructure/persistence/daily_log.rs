use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};

use crate::domain::entities::host::HostIdentity;
use crate::domain::entities::sample::{Sample, TIMESTAMP_FORMAT};
use crate::domain::ports::log_sink::{LogError, LogSink};

const DEFAULT_LOG_DIR: &str = ".";

/// Metrics line for `sample`: `<timestamp> | CPU: X% | Memory: Y% | Disk: Z%`.
#[must_use]
pub fn format_sample_line(sample: &Sample) -> String {
    format!(
        "{} | CPU: {}% | Memory: {}% | Disk: {}%",
        sample.local_timestamp(),
        sample.cpu_percent,
        sample.memory_percent,
        sample.disk_value()
    )
}

/// Error line: `<timestamp> | ERROR: <message>`.
#[must_use]
pub fn format_error_line(at: DateTime<Utc>, message: &str) -> String {
    format!(
        "{} | ERROR: {message}",
        at.with_timezone(&Local).format(TIMESTAMP_FORMAT)
    )
}

/// Appends to `<dir>/<host>-<YYYYMMDD>.log`, one file per host per local calendar day.
///
/// The file is opened and closed for every line; no handle outlives a write.
pub struct DailyLogFile {
    dir: PathBuf,
    host: HostIdentity,
}

impl DailyLogFile {
    /// `dir` may start with `~`; an empty string means the working directory.
    #[must_use]
    pub fn new(dir: &str, host: HostIdentity) -> Self {
        let dir = if dir.trim().is_empty() {
            DEFAULT_LOG_DIR
        } else {
            dir
        };
        let expanded = shellexpand::tilde(dir);
        Self {
            dir: PathBuf::from(expanded.as_ref()),
            host,
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file that receives records stamped `at`.
    #[must_use]
    pub fn path_for(&self, at: DateTime<Utc>) -> PathBuf {
        let day = at.with_timezone(&Local).format("%Y%m%d");
        self.dir.join(format!("{}-{day}.log", self.host))
    }

    fn append_line(&self, at: DateTime<Utc>, line: &str) -> Result<(), LogError> {
        let path = self.path_for(at);
        let display = path.display().to_string();

        std::fs::create_dir_all(&self.dir).map_err(|e| LogError::Open {
            path: display.clone(),
            reason: format!("cannot create log directory: {e}"),
        })?;

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LogError::Open {
                path: display.clone(),
                reason: e.to_string(),
            })?;

        writeln!(file, "{line}").map_err(|e| LogError::Write {
            path: display,
            reason: e.to_string(),
        })
    }
}

impl LogSink for DailyLogFile {
    fn record_sample(&self, sample: &Sample) -> Result<(), LogError> {
        self.append_line(sample.timestamp, &format_sample_line(sample))
    }

    fn record_error(&self, at: DateTime<Utc>, message: &str) -> Result<(), LogError> {
        self.append_line(at, &format_error_line(at, message))
    }
}
