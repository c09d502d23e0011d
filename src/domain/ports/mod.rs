pub mod log_sink;
pub mod notifier;
pub mod sampler;
pub mod spreadsheet;

pub use log_sink::{LogError, LogSink};
pub use notifier::{NotificationError, Notifier};
pub use sampler::{ResourceSampler, SamplerError};
pub use spreadsheet::{SpreadsheetError, SpreadsheetSink};
