use serde::{Deserialize, Serialize};

use crate::domain::ports::sampler::SamplerError;

/// Operating system family the sampler knows how to read.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    MacOs,
    Windows,
}

impl Platform {
    /// Detects the platform this binary runs on.
    ///
    /// # Errors
    ///
    /// Returns `SamplerError::UnsupportedPlatform` for anything other than
    /// macOS or Windows.
    pub fn detect() -> Result<Self, SamplerError> {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Maps a `std::env::consts::OS` value to a supported platform.
    ///
    /// # Errors
    ///
    /// Returns `SamplerError::UnsupportedPlatform` for unknown OS names.
    pub fn from_os_name(os: &str) -> Result<Self, SamplerError> {
        match os {
            "macos" => Ok(Self::MacOs),
            "windows" => Ok(Self::Windows),
            other => Err(SamplerError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Program and arguments producing the disk usage table for this platform.
    #[must_use]
    pub const fn disk_command(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::MacOs => ("df", &["-H"]),
            Self::Windows => ("wmic", &["logicaldisk", "get", "size,freespace,caption"]),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MacOs => write!(f, "macos"),
            Self::Windows => write!(f, "windows"),
        }
    }
}
