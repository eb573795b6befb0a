#![allow(clippy::must_use_candidate)]

mod env;
pub mod health;
mod loader;
pub mod notifier;
pub mod probes;
pub mod responder;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use health::*;
pub use notifier::*;
pub use probes::*;
pub use responder::*;
pub use server::*;
pub use telemetry::TelemetryConfig;

/// Top-level Faultline configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Error responder configuration
    #[serde(default)]
    pub responder: ResponderConfig,
    /// Error notification configuration
    #[serde(default)]
    pub notifier: NotifierConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
