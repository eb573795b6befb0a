#![allow(clippy::must_use_candidate)]

//! Shared types for the Faultline error boundary
//!
//! Defines the tolerant shape errors arrive in, the canonical record the
//! responder works with, and the request metadata captured alongside them.

mod context;
mod error;
mod mode;
mod record;

pub use context::{RequestContext, form_object};
pub use error::HttpError;
pub use mode::Mode;
pub use record::{ErrorKind, ErrorRecord, INTERNAL_SERVER_ERROR, INVALID_TOKEN, RaisedError, TokenFailure};
