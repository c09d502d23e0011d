use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::ports::sampler::{ResourceSampler, SamplerError};

/// Sampler returning injected readings, for driving the scheduler without a real host.
#[derive(Debug, Default)]
pub struct FixedSampler {
    cpu: u8,
    memory: u8,
    disk: Option<u8>,
    samples: AtomicUsize,
}

impl FixedSampler {
    #[must_use]
    pub const fn new(cpu: u8, memory: u8, disk: Option<u8>) -> Self {
        Self {
            cpu,
            memory,
            disk,
            samples: AtomicUsize::new(0),
        }
    }

    /// Number of CPU readings taken so far, i.e. cycles started.
    #[must_use]
    pub fn samples_taken(&self) -> usize {
        self.samples.load(Ordering::SeqCst)
    }
}

impl ResourceSampler for FixedSampler {
    fn cpu_usage(&self) -> Result<u8, SamplerError> {
        self.samples.fetch_add(1, Ordering::SeqCst);
        Ok(self.cpu)
    }

    fn memory_usage(&self) -> Result<u8, SamplerError> {
        Ok(self.memory)
    }

    fn disk_usage(&self) -> Result<Option<u8>, SamplerError> {
        Ok(self.disk)
    }
}
