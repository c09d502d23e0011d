use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("failed to send notification: {0}")]
    SendFailed(String),
    #[error("notification service returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("notification token not set (environment variable {0})")]
    MissingToken(String),
}

/// Push channel for alert text. Delivery is attempted once, no retry.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text` as a single notification.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError` if the token is missing, the request
    /// fails, or the service rejects it.
    async fn notify(&self, text: &str) -> Result<(), NotificationError>;
}
