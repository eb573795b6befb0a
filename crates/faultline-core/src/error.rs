use http::StatusCode;

use crate::record::TokenFailure;

/// Trait for domain errors that describe themselves to the error boundary
///
/// Implemented by each feature's error type. The boundary converts these
/// into a `RaisedError`, keeping domain errors decoupled from axum.
/// An implementor that does not opt into `is_operational` is treated as an
/// unknown failure and its message never reaches production clients.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Stable machine-readable code (e.g. `USER_NOT_FOUND`)
    ///
    /// When `None`, a code is derived from the status code.
    fn error_code(&self) -> Option<&str> {
        None
    }

    /// Message shown to clients when the error is operational
    fn client_message(&self) -> String {
        self.to_string()
    }

    /// Whether the message is known to be safe for clients
    fn is_operational(&self) -> bool {
        false
    }

    /// Credential verification failure, if this error is one
    fn token_failure(&self) -> Option<TokenFailure> {
        None
    }
}
