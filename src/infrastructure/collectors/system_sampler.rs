use std::process::Command;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use sysinfo::{MINIMUM_CPU_UPDATE_INTERVAL, System};

use super::disk_table::parse_disk_usage;
use crate::domain::ports::sampler::{ResourceSampler, SamplerError};
use crate::domain::value_objects::platform::Platform;

const DEFAULT_SYSTEM_DRIVE: &str = "C:";

/// Rounds a `0.0..=100.0` float reading down to a whole percentage.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_percent(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 100.0) as u8
}

/// Returns `used / total` as a whole percentage, or `None` when `total` is zero.
fn ratio_percent(used: u64, total: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let pct = (u128::from(used) * 100 / u128::from(total)).min(100);
    u8::try_from(pct).ok()
}

/// Time still to wait before a CPU refresh, given the time since the previous one.
fn cpu_settle_delay(since_last_refresh: Duration) -> Option<Duration> {
    MINIMUM_CPU_UPDATE_INTERVAL
        .checked_sub(since_last_refresh)
        .filter(|d| !d.is_zero())
}

struct SysState {
    sys: System,
    last_cpu_refresh: Instant,
}

/// Samples the host through `sysinfo` (CPU, memory) and the platform disk utility.
///
/// The platform is fixed at construction. CPU usage is measured over the
/// window since the previous refresh, which the constructor primes. A read
/// that comes sooner than `MINIMUM_CPU_UPDATE_INTERVAL` after it blocks for
/// the remainder, so the first reading is never taken over an empty window.
pub struct SystemSampler {
    platform: Platform,
    system_drive: String,
    state: Mutex<SysState>,
}

impl SystemSampler {
    /// Creates a sampler for the running platform.
    ///
    /// # Errors
    ///
    /// Returns `SamplerError::UnsupportedPlatform` when not on macOS or Windows.
    pub fn new() -> Result<Self, SamplerError> {
        let platform = Platform::detect()?;
        Ok(Self::with_platform(platform))
    }

    fn with_platform(platform: Platform) -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        let system_drive =
            std::env::var("SystemDrive").unwrap_or_else(|_| DEFAULT_SYSTEM_DRIVE.to_string());
        Self {
            platform,
            system_drive,
            state: Mutex::new(SysState {
                sys,
                last_cpu_refresh: Instant::now(),
            }),
        }
    }

    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Runs the disk utility and returns its stdout, or `None` if it could not run.
    fn read_disk_table(&self) -> Option<String> {
        let (program, args) = self.platform.disk_command();
        match Command::new(program).args(args).output() {
            Ok(output) if output.status.success() => {
                Some(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(output) => {
                tracing::warn!(
                    "{program} exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                None
            }
            Err(e) => {
                tracing::warn!("failed to run {program}: {e}");
                None
            }
        }
    }
}

impl ResourceSampler for SystemSampler {
    fn cpu_usage(&self) -> Result<u8, SamplerError> {
        let mut state = self.state.lock().map_err(|e| {
            SamplerError::MetricsUnavailable(format!("system lock poisoned: {e}"))
        })?;
        if let Some(delay) = cpu_settle_delay(state.last_cpu_refresh.elapsed()) {
            std::thread::sleep(delay);
        }
        state.sys.refresh_cpu_usage();
        state.last_cpu_refresh = Instant::now();
        Ok(whole_percent(state.sys.global_cpu_usage()))
    }

    fn memory_usage(&self) -> Result<u8, SamplerError> {
        let mut state = self.state.lock().map_err(|e| {
            SamplerError::MetricsUnavailable(format!("system lock poisoned: {e}"))
        })?;
        state.sys.refresh_memory();
        ratio_percent(state.sys.used_memory(), state.sys.total_memory()).ok_or_else(|| {
            SamplerError::MetricsUnavailable("total memory reported as zero".to_string())
        })
    }

    fn disk_usage(&self) -> Result<Option<u8>, SamplerError> {
        let usage = self
            .read_disk_table()
            .and_then(|raw| parse_disk_usage(self.platform, &raw, &self.system_drive));
        if usage.is_none() {
            tracing::warn!("disk usage unavailable on {}", self.platform);
        }
        Ok(usage)
    }
}
