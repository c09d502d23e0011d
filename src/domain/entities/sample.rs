use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Integer written in place of a disk reading that could not be obtained.
pub const UNAVAILABLE: i16 = -1;

/// Timestamp layout shared by the log file and the spreadsheet rows.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One cycle's resource reading. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub cpu_percent: u8,
    pub memory_percent: u8,
    /// `None` when the disk table could not be read or parsed this cycle.
    pub disk_percent: Option<u8>,
}

impl Sample {
    #[must_use]
    pub const fn new(
        timestamp: DateTime<Utc>,
        cpu_percent: u8,
        memory_percent: u8,
        disk_percent: Option<u8>,
    ) -> Self {
        Self {
            timestamp,
            cpu_percent,
            memory_percent,
            disk_percent,
        }
    }

    /// Disk reading as reported externally, [`UNAVAILABLE`] standing in for `None`.
    #[must_use]
    pub fn disk_value(&self) -> i16 {
        self.disk_percent.map_or(UNAVAILABLE, i16::from)
    }

    /// Local wall-clock rendering of the sample time.
    #[must_use]
    pub fn local_timestamp(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format(TIMESTAMP_FORMAT)
            .to_string()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn disk_value_uses_sentinel_when_unavailable() {
        let sample = Sample::new(Utc::now(), 10, 20, None);
        assert_eq!(sample.disk_value(), -1);
    }

    #[test]
    fn disk_value_passes_reading_through() {
        let sample = Sample::new(Utc::now(), 10, 20, Some(42));
        assert_eq!(sample.disk_value(), 42);
    }

    #[test]
    fn local_timestamp_has_expected_shape() {
        let sample = Sample::new(Utc::now(), 0, 0, None);
        let ts = sample.local_timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[13..14], ":");
    }

    #[test]
    fn serde_roundtrip() {
        let sample = Sample::new(Utc::now(), 95, 50, None);
        let json = serde_json::to_string(&sample).expect("serialize");
        let back: Sample = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(sample, back);
    }
}
