pub mod metric;
pub mod platform;
pub mod thresholds;

pub use metric::Metric;
pub use platform::Platform;
pub use thresholds::ThresholdSet;
