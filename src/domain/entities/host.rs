use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("unable to resolve hostname: {0}")]
    Unresolvable(String),
    #[error("hostname is empty")]
    Empty,
}

/// Lowercase hostname naming every artifact this process writes.
///
/// Resolved once at startup and stable for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostIdentity(String);

impl HostIdentity {
    /// Builds an identity from a raw hostname, trimming and lowercasing it.
    ///
    /// # Errors
    ///
    /// Returns `HostError::Empty` if nothing is left after trimming.
    pub fn new(raw: &str) -> Result<Self, HostError> {
        let name = raw.trim().to_lowercase();
        if name.is_empty() {
            return Err(HostError::Empty);
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HostIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
