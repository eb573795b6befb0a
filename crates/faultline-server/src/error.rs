use axum::response::{IntoResponse, Response};
use faultline_core::RaisedError;
use http::StatusCode;

/// Error type returned by handlers behind the error boundary
///
/// Anything convertible into a [`RaisedError`] converts into `ApiError`, so
/// handlers can use `?` on domain errors implementing
/// [`faultline_core::HttpError`], on `anyhow::Error`, and on token
/// verification errors.
///
/// The response it produces is a placeholder: the boundary middleware picks
/// the raised error out of the response extensions and replaces the response
/// with the formatted one.
#[derive(Debug)]
pub struct ApiError(RaisedError);

impl ApiError {
    /// Error raised on purpose with a client-safe message
    pub fn operational(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self(RaisedError::operational(status, code, message))
    }

    pub const fn raised(&self) -> &RaisedError {
        &self.0
    }

    pub fn into_raised(self) -> RaisedError {
        self.0
    }
}

impl<E> From<E> for ApiError
where
    E: Into<RaisedError>,
{
    fn from(error: E) -> Self {
        Self(error.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(self.0);
        response
    }
}
