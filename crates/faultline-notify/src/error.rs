/// Errors raised while building or delivering a notification
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Snapshot data could not be serialized
    #[error("failed to serialize notification: {0}")]
    Serialize(#[from] serde_json::Error),

    /// HTTP transport or connection error
    #[error("notification request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Receiver answered with a non-success status
    #[error("notification rejected ({status}): {message}")]
    Rejected {
        /// HTTP status from the receiver
        status: u16,
        /// Response body from the receiver
        message: String,
    },

    /// A configured header could not be used
    #[error("invalid notifier header `{name}`: {reason}")]
    InvalidHeader {
        /// Header name as configured
        name: String,
        /// Why it was rejected
        reason: String,
    },
}
