#![allow(clippy::must_use_candidate)]

//! Error classification and response formatting
//!
//! [`ErrorResponder`] turns any error reaching the request boundary into the
//! status and JSON body sent to the client, and decides whether operators
//! hear about it.

mod body;
mod responder;

pub use body::{ErrorResponse, GENERIC_MESSAGE, ResponseBody};
pub use responder::ErrorResponder;
