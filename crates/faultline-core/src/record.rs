use std::error::Error as StdError;

use http::StatusCode;
use serde::{Serialize, Serializer};

use crate::error::HttpError;

/// Code assigned to every error that was not vouched for
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

/// Code assigned to every credential verification failure
pub const INVALID_TOKEN: &str = "INVALID_TOKEN";

const INVALID_TOKEN_MESSAGE: &str = "Invalid token";

/// Why a credential failed verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFailure {
    /// Signature was valid but the token is past its expiry
    Expired,
    /// Token could not be parsed or verified
    Malformed,
}

/// How far an error can be trusted to describe itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised on purpose by business logic with a client-safe message
    Operational,
    /// Credential verification failed
    Token(TokenFailure),
    /// Anything nobody vouched for
    Unknown,
}

impl ErrorKind {
    /// Label used for metrics and logs
    pub const fn label(self) -> &'static str {
        match self {
            Self::Operational => "operational",
            Self::Token(_) => "token",
            Self::Unknown => "unknown",
        }
    }
}

/// Error value as it reaches the boundary
///
/// Every field except `message` may be missing. Use
/// [`ErrorRecord::normalize`] to obtain the canonical form.
#[derive(Debug, Clone)]
pub struct RaisedError {
    /// Trust classification
    pub kind: ErrorKind,
    /// Type label of the original error
    pub name: Option<String>,
    /// Human-readable description
    pub message: String,
    /// Raw HTTP status, invalid values count as unset
    pub status: Option<u16>,
    /// Machine-readable code
    pub code: Option<String>,
    /// Diagnostic trace
    pub stack: Option<String>,
}

impl RaisedError {
    /// Create an error with only a kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            name: None,
            message: message.into(),
            status: None,
            code: None,
            stack: None,
        }
    }

    /// Create an operational error with a status and code
    pub fn operational(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Operational, message)
            .with_status(status.as_u16())
            .with_code(code)
    }

    /// Create an unknown error
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }

    /// Create a credential verification failure
    pub fn token(failure: TokenFailure, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Token(failure), message)
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Describe a domain error through its [`HttpError`] implementation
    pub fn from_http_error<E>(error: &E) -> Self
    where
        E: HttpError + 'static,
    {
        let kind = match error.token_failure() {
            Some(failure) => ErrorKind::Token(failure),
            None if error.is_operational() => ErrorKind::Operational,
            None => ErrorKind::Unknown,
        };

        let name = short_type_name::<E>();
        let stack = render_chain(&name, error);

        Self {
            kind,
            name: Some(name),
            message: error.client_message(),
            status: Some(error.status_code().as_u16()),
            code: error.error_code().map(ToOwned::to_owned),
            stack: Some(stack),
        }
    }
}

impl<E> From<E> for RaisedError
where
    E: HttpError + 'static,
{
    fn from(error: E) -> Self {
        Self::from_http_error(&error)
    }
}

impl From<anyhow::Error> for RaisedError {
    fn from(error: anyhow::Error) -> Self {
        // Debug output carries the cause chain and a backtrace when captured
        let stack = format!("{error:?}");
        Self::unknown(error.to_string())
            .with_name("anyhow::Error")
            .with_stack(stack)
    }
}

impl From<jwt_compact::ValidationError> for RaisedError {
    fn from(error: jwt_compact::ValidationError) -> Self {
        let failure = match error {
            jwt_compact::ValidationError::Expired => TokenFailure::Expired,
            _ => TokenFailure::Malformed,
        };
        Self::token(failure, error.to_string()).with_name("ValidationError")
    }
}

impl From<jwt_compact::ParseError> for RaisedError {
    fn from(error: jwt_compact::ParseError) -> Self {
        Self::token(TokenFailure::Malformed, error.to_string()).with_name("ParseError")
    }
}

/// Canonical error crossing the boundary
///
/// `status` and `code` are always populated. Serializes with the field
/// names clients see in development responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    /// Classification the record was built from
    #[serde(skip)]
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub message: String,
    #[serde(rename = "statusCode", serialize_with = "serialize_status")]
    pub status: StatusCode,
    pub code: String,
    pub is_operational: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorRecord {
    /// Build the canonical record from a raised error
    ///
    /// Token failures are replaced wholesale by [`ErrorRecord::invalid_token`].
    /// Missing or invalid statuses become 500 and missing codes are derived
    /// from the status.
    pub fn normalize(raised: RaisedError) -> Self {
        let is_operational = match raised.kind {
            ErrorKind::Token(failure) => return Self::invalid_token(failure),
            ErrorKind::Operational => true,
            ErrorKind::Unknown => false,
        };

        let status = raised
            .status
            .and_then(|status| StatusCode::from_u16(status).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let code = raised
            .code
            .filter(|code| !code.is_empty())
            .unwrap_or_else(|| default_code(status));

        Self {
            kind: raised.kind,
            name: raised.name,
            message: raised.message,
            status,
            code,
            is_operational,
            stack: raised.stack,
        }
    }

    /// Fixed record every credential failure is rewritten to
    pub fn invalid_token(failure: TokenFailure) -> Self {
        Self {
            kind: ErrorKind::Token(failure),
            name: None,
            message: INVALID_TOKEN_MESSAGE.to_owned(),
            status: StatusCode::UNAUTHORIZED,
            code: INVALID_TOKEN.to_owned(),
            is_operational: true,
            stack: None,
        }
    }
}

/// Derive a code from the status's canonical reason phrase
///
/// `404` becomes `NOT_FOUND`, `500` becomes `INTERNAL_SERVER_ERROR`.
fn default_code(status: StatusCode) -> String {
    status.canonical_reason().map_or_else(
        || format!("HTTP_{}", status.as_u16()),
        |reason| {
            reason
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
                .collect()
        },
    )
}

fn serialize_status<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

fn short_type_name<E: ?Sized>() -> String {
    let full = std::any::type_name::<E>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_owned()
}

/// Render an error and its sources, one per line
fn render_chain(name: &str, error: &(dyn StdError + 'static)) -> String {
    let mut rendered = format!("{name}: {error}");
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str("\n    caused by: ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    enum AccountError {
        #[error("account {0} not found")]
        NotFound(String),
        #[error("storage failure")]
        Storage(#[source] std::io::Error),
        #[error("session expired")]
        SessionExpired,
    }

    impl HttpError for AccountError {
        fn status_code(&self) -> StatusCode {
            match self {
                Self::NotFound(_) => StatusCode::NOT_FOUND,
                Self::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
                Self::SessionExpired => StatusCode::UNAUTHORIZED,
            }
        }

        fn error_code(&self) -> Option<&str> {
            match self {
                Self::NotFound(_) => Some("ACCOUNT_NOT_FOUND"),
                _ => None,
            }
        }

        fn is_operational(&self) -> bool {
            matches!(self, Self::NotFound(_))
        }

        fn token_failure(&self) -> Option<TokenFailure> {
            matches!(self, Self::SessionExpired).then_some(TokenFailure::Expired)
        }
    }

    #[test]
    fn missing_status_defaults_to_500() {
        let record = ErrorRecord::normalize(RaisedError::unknown("boom"));
        assert_eq!(record.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(record.code, INTERNAL_SERVER_ERROR);
        assert!(!record.is_operational);
    }

    #[test]
    fn zero_and_out_of_range_status_count_as_unset() {
        for raw in [0, 42, 1000] {
            let record = ErrorRecord::normalize(RaisedError::unknown("boom").with_status(raw));
            assert_eq!(record.status, StatusCode::INTERNAL_SERVER_ERROR, "status {raw}");
        }
    }

    #[test]
    fn code_derived_from_status_when_absent() {
        let record = ErrorRecord::normalize(RaisedError::new(ErrorKind::Operational, "gone").with_status(404));
        assert_eq!(record.code, "NOT_FOUND");

        let record = ErrorRecord::normalize(RaisedError::new(ErrorKind::Operational, "slow down").with_status(429));
        assert_eq!(record.code, "TOO_MANY_REQUESTS");

        let record = ErrorRecord::normalize(RaisedError::new(ErrorKind::Operational, "odd").with_status(599));
        assert_eq!(record.code, "HTTP_599");
    }

    #[test]
    fn empty_code_is_replaced() {
        let record = ErrorRecord::normalize(RaisedError::unknown("boom").with_code(""));
        assert_eq!(record.code, INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn message_and_stack_survive_normalization() {
        let raised = RaisedError::operational(StatusCode::CONFLICT, "EMAIL_TAKEN", "email already registered")
            .with_stack("trace line");
        let record = ErrorRecord::normalize(raised);
        assert_eq!(record.message, "email already registered");
        assert_eq!(record.stack.as_deref(), Some("trace line"));
        assert_eq!(record.code, "EMAIL_TAKEN");
        assert!(record.is_operational);
    }

    #[test]
    fn token_failures_are_rewritten() {
        for failure in [TokenFailure::Expired, TokenFailure::Malformed] {
            let raised = RaisedError::token(failure, "jwt signature mismatch at offset 12")
                .with_status(403)
                .with_code("SOMETHING_ELSE")
                .with_stack("verifier internals");
            let record = ErrorRecord::normalize(raised);
            assert_eq!(record.status, StatusCode::UNAUTHORIZED);
            assert_eq!(record.code, INVALID_TOKEN);
            assert_eq!(record.message, "Invalid token");
            assert!(record.is_operational);
            assert!(record.stack.is_none());
        }
    }

    #[test]
    fn http_error_operational_variant() {
        let raised = RaisedError::from_http_error(&AccountError::NotFound("42".to_owned()));
        assert_eq!(raised.kind, ErrorKind::Operational);
        assert_eq!(raised.status, Some(404));
        assert_eq!(raised.code.as_deref(), Some("ACCOUNT_NOT_FOUND"));
        assert_eq!(raised.message, "account 42 not found");
        assert_eq!(raised.name.as_deref(), Some("AccountError"));
    }

    #[test]
    fn http_error_stack_includes_sources() {
        let io = std::io::Error::other("disk offline");
        let raised = RaisedError::from_http_error(&AccountError::Storage(io));
        assert_eq!(raised.kind, ErrorKind::Unknown);
        let stack = raised.stack.unwrap();
        assert!(stack.starts_with("AccountError: storage failure"));
        assert!(stack.contains("caused by: disk offline"));
    }

    #[test]
    fn http_error_token_variant() {
        let raised = RaisedError::from_http_error(&AccountError::SessionExpired);
        assert_eq!(raised.kind, ErrorKind::Token(TokenFailure::Expired));
    }

    #[test]
    fn anyhow_errors_are_unknown() {
        let error = anyhow::anyhow!("connection reset").context("loading profile");
        let raised = RaisedError::from(error);
        assert_eq!(raised.kind, ErrorKind::Unknown);
        assert_eq!(raised.message, "loading profile");
        assert!(raised.stack.unwrap().contains("connection reset"));
    }

    #[test]
    fn jwt_expiry_maps_to_expired() {
        let raised = RaisedError::from(jwt_compact::ValidationError::Expired);
        assert_eq!(raised.kind, ErrorKind::Token(TokenFailure::Expired));

        let raised = RaisedError::from(jwt_compact::ValidationError::InvalidSignature);
        assert_eq!(raised.kind, ErrorKind::Token(TokenFailure::Malformed));
    }

    #[test]
    fn serializes_client_field_names() {
        let record = ErrorRecord::normalize(
            RaisedError::operational(StatusCode::BAD_REQUEST, "BAD_INPUT", "name is required").with_name("FormError"),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "FormError",
                "message": "name is required",
                "statusCode": 400,
                "code": "BAD_INPUT",
                "isOperational": true,
            })
        );
    }
}
