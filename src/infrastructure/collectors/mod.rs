pub mod disk_table;
pub mod fixed;
pub mod system_sampler;

pub use fixed::FixedSampler;
pub use system_sampler::SystemSampler;
