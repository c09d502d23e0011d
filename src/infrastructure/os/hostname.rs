use crate::domain::entities::host::{HostError, HostIdentity};

/// Resolves the identity of the machine this process runs on.
///
/// # Errors
///
/// Returns `HostError` if the OS cannot report a hostname or reports an empty one.
pub fn resolve_host_identity() -> Result<HostIdentity, HostError> {
    let raw = hostname::get().map_err(|e| HostError::Unresolvable(e.to_string()))?;
    HostIdentity::new(&raw.to_string_lossy())
}
