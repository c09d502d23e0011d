pub mod scheduler;

pub use scheduler::{CycleReport, Scheduler, SinkOutcome};
