use faultline_core::{ErrorRecord, INTERNAL_SERVER_ERROR};
use http::StatusCode;
use serde::Serialize;

/// Message sent in place of every undisclosed error
pub const GENERIC_MESSAGE: &str = "Oops! Something went wrong...";

/// JSON body of an error response
///
/// Always carries `code` and `message`. `error` is only present in
/// development mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorRecord>,
}

impl ResponseBody {
    /// Body disclosing only the code and message
    pub fn disclosed(record: &ErrorRecord) -> Self {
        Self {
            code: record.code.clone(),
            message: record.message.clone(),
            error: None,
        }
    }

    /// Body carrying the full record for debugging
    pub fn with_record(record: &ErrorRecord) -> Self {
        Self {
            error: Some(record.clone()),
            ..Self::disclosed(record)
        }
    }

    /// Fixed body for errors that must not be described
    pub fn generic() -> Self {
        Self {
            code: INTERNAL_SERVER_ERROR.to_owned(),
            message: GENERIC_MESSAGE.to_owned(),
            error: None,
        }
    }
}

/// Status and body produced for one error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub body: ResponseBody,
}
