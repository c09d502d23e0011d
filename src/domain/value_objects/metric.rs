use serde::{Deserialize, Serialize};

use crate::domain::entities::sample::Sample;

/// One of the three resources sampled every cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Cpu,
    Memory,
    Disk,
}

impl Metric {
    /// Evaluation and reporting order.
    pub const ALL: [Self; 3] = [Self::Cpu, Self::Memory, Self::Disk];

    /// Reading for this metric in `sample`, `None` when the value is unavailable.
    #[must_use]
    pub const fn reading(self, sample: &Sample) -> Option<u8> {
        match self {
            Self::Cpu => Some(sample.cpu_percent),
            Self::Memory => Some(sample.memory_percent),
            Self::Disk => sample.disk_percent,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cpu => write!(f, "CPU"),
            Self::Memory => write!(f, "Memory"),
            Self::Disk => write!(f, "Disk"),
        }
    }
}
