//! Diagnostic routes raising each error class through the boundary

use axum::Router;
use axum::extract::Path;
use axum::routing::get;
use faultline_core::{ErrorKind, RaisedError, TokenFailure};
use http::StatusCode;

use crate::error::ApiError;

/// Build the probe router, nested under the configured prefix
pub fn router() -> Router {
    Router::new()
        .route("/operational/{status}", get(operational))
        .route("/unknown", get(unknown))
        .route("/token/{failure}", get(token))
        .route("/panic", get(raise_panic))
}

async fn operational(Path(status): Path<String>) -> ApiError {
    let parsed = status
        .parse::<u16>()
        .ok()
        .and_then(|status| StatusCode::from_u16(status).ok())
        .filter(|status| status.is_client_error() || status.is_server_error());

    match parsed {
        Some(status) => RaisedError::new(
            ErrorKind::Operational,
            format!("Probe raised an operational error with status {}", status.as_u16()),
        )
        .with_status(status.as_u16())
        .into(),
        None => ApiError::operational(
            StatusCode::BAD_REQUEST,
            "INVALID_PROBE_STATUS",
            format!("{status} is not an HTTP error status"),
        ),
    }
}

async fn unknown() -> ApiError {
    anyhow::anyhow!("probe raised an unknown error")
        .context("running diagnostic probe")
        .into()
}

async fn token(Path(failure): Path<String>) -> ApiError {
    let failure = match failure.as_str() {
        "expired" => TokenFailure::Expired,
        "malformed" => TokenFailure::Malformed,
        _ => return ApiError::operational(StatusCode::NOT_FOUND, "NOT_FOUND", "Route not found"),
    };

    RaisedError::token(failure, format!("probe raised a {failure:?} token failure")).into()
}

#[allow(clippy::unused_async)]
async fn raise_panic() {
    panic!("probe raised a panic");
}
