use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::host::HostIdentity;
use crate::domain::entities::sample::Sample;

#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("unable to load credentials: {0}")]
    Credentials(String),
    #[error("unable to obtain access token: {0}")]
    Auth(String),
    #[error("spreadsheet request failed: {0}")]
    Request(String),
    #[error("spreadsheet API returned HTTP {status} during {step}: {body}")]
    Api {
        step: &'static str,
        status: u16,
        body: String,
    },
}

/// Remote tabular mirror of the samples, one tab per host.
#[async_trait]
pub trait SpreadsheetSink: Send + Sync {
    /// Append `sample` as a row on the tab named after `host`, creating the tab if needed.
    ///
    /// # Errors
    ///
    /// Returns `SpreadsheetError` on credential, auth, transport or API failures.
    async fn append_row(&self, host: &HostIdentity, sample: &Sample)
    -> Result<(), SpreadsheetError>;
}
