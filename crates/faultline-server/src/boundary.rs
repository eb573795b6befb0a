use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{ConnectInfo, FromRequestParts, OriginalUri, RawPathParams, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use faultline_core::{RaisedError, RequestContext, form_object};
use faultline_responder::{ErrorResponder, ErrorResponse};
use http::request::Parts;
use http::{HeaderMap, StatusCode, header};
use serde_json::Value;
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::ApiError;

/// Responder plus the request capture settings used by the middleware
#[derive(Clone)]
pub struct Boundary {
    responder: Arc<ErrorResponder>,
    max_captured_body_bytes: usize,
}

impl Boundary {
    pub fn new(responder: Arc<ErrorResponder>, max_captured_body_bytes: usize) -> Self {
        Self {
            responder,
            max_captured_body_bytes,
        }
    }

    pub fn responder(&self) -> &ErrorResponder {
        &self.responder
    }

    /// Format a raised error as a JSON response
    pub fn respond(&self, raised: RaisedError, context: &RequestContext) -> Response {
        let ErrorResponse { status, body } = self.responder.handle(raised, context);
        (status, Json(body)).into_response()
    }
}

/// Wrap a router so every error it produces goes through the responder
///
/// Installs the not-found and method-not-allowed fallbacks, catches handler
/// panics, and adds [`error_boundary_middleware`] around all of it.
pub fn with_error_boundary(router: Router, boundary: Boundary) -> Router {
    router
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(axum::middleware::from_fn(move |req, next| {
            let boundary = boundary.clone();
            async move { error_boundary_middleware(boundary, req, next).await }
        }))
}

/// Middleware that answers raised errors with the responder's output
///
/// Captures request metadata before the handler runs. Responses carrying a
/// [`RaisedError`] in their extensions (see [`ApiError`]) are replaced; all
/// other responses pass through untouched.
pub async fn error_boundary_middleware(boundary: Boundary, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();
    let mut context = capture_context(&mut parts).await;

    let body = match capture_body(&parts.headers, body, boundary.max_captured_body_bytes).await {
        Ok((body, captured)) => {
            if let Some(captured) = captured {
                context.body = captured;
            }
            body
        }
        Err(raised) => return boundary.respond(raised, &context),
    };

    let mut response = next.run(Request::from_parts(parts, body)).await;

    match response.extensions_mut().remove::<RaisedError>() {
        Some(raised) => boundary.respond(raised, &context),
        None => response,
    }
}

async fn capture_context(parts: &mut Parts) -> RequestContext {
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map_or_else(|| parts.uri.clone(), |OriginalUri(uri)| uri.clone());

    let mut context = RequestContext::new(parts.method.clone(), uri);
    context.headers = parts.headers.clone();
    context.client_ip = client_ip(parts);

    // Absent when the route declares no parameters
    if let Ok(params) = RawPathParams::from_request_parts(parts, &()).await {
        context.params = params
            .iter()
            .map(|(key, value)| (key.to_owned(), value.to_owned()))
            .collect();
    }

    context
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyFormat {
    Json,
    Form,
}

fn body_format(headers: &HeaderMap) -> Option<BodyFormat> {
    let content_type = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    let essence = content_type.split(';').next()?.trim().to_ascii_lowercase();

    if essence == "application/json" || essence.ends_with("+json") {
        Some(BodyFormat::Json)
    } else if essence == "application/x-www-form-urlencoded" {
        Some(BodyFormat::Form)
    } else {
        None
    }
}

/// Buffer a JSON or form body so it can be attached to notifications
///
/// Only bodies with a declared length within `limit` are buffered; anything
/// else is handed to the handler untouched. The buffered bytes are put back
/// into a fresh body for the handler.
async fn capture_body(headers: &HeaderMap, body: Body, limit: usize) -> Result<(Body, Option<Value>), RaisedError> {
    let Some(format) = body_format(headers) else {
        return Ok((body, None));
    };

    let within_limit = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok())
        .is_some_and(|length| length <= limit);

    if !within_limit {
        return Ok((body, None));
    }

    let bytes = axum::body::to_bytes(body, limit).await.map_err(|e| {
        RaisedError::operational(StatusCode::BAD_REQUEST, "INVALID_BODY", "Request body could not be read")
            .with_stack(e.to_string())
    })?;

    let captured = match format {
        BodyFormat::Json => serde_json::from_slice::<Value>(&bytes).ok(),
        BodyFormat::Form => Some(Value::Object(form_object(&bytes))),
    };

    Ok((Body::from(bytes), captured))
}

/// Client address: first forwarded hop, then `X-Real-IP`, then the peer
fn client_ip(parts: &Parts) -> Option<String> {
    if let Some(forwarded) = parts.headers.get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
        && !first.trim().is_empty()
    {
        return Some(first.trim().to_string());
    }

    if let Some(real_ip) = parts.headers.get("x-real-ip")
        && let Ok(val) = real_ip.to_str()
        && !val.trim().is_empty()
    {
        return Some(val.trim().to_string());
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

async fn route_not_found() -> ApiError {
    ApiError::operational(StatusCode::NOT_FOUND, "NOT_FOUND", "Route not found")
}

async fn method_not_allowed() -> ApiError {
    ApiError::operational(StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED", "Method not allowed")
}

/// Turn a caught panic into an unknown error carrying the panic message
#[allow(clippy::needless_pass_by_value)]
fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else {
        "handler panicked".to_owned()
    };

    ApiError::from(RaisedError::unknown(message).with_name("panic")).into_response()
}
