pub mod alert;
pub mod host;
pub mod sample;

pub use alert::AlertMessage;
pub use host::{HostError, HostIdentity};
pub use sample::Sample;
