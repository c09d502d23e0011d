use serde::{Deserialize, Serialize};

use super::metric::Metric;

/// Maximum acceptable usage per metric. A reading strictly above its maximum alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdSet {
    /// CPU usage percentage above which an alert is raised
    pub cpu_max: u8,
    /// Memory usage percentage above which an alert is raised
    pub memory_max: u8,
    /// Disk usage percentage above which an alert is raised
    pub disk_max: u8,
}

impl ThresholdSet {
    #[must_use]
    pub const fn limit(&self, metric: Metric) -> u8 {
        match metric {
            Metric::Cpu => self.cpu_max,
            Metric::Memory => self.memory_max,
            Metric::Disk => self.disk_max,
        }
    }
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            cpu_max: 80,
            memory_max: 80,
            disk_max: 90,
        }
    }
}
