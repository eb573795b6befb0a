//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use faultline_config::{
    Config, HealthConfig, NotifierConfig, NotifierSink, ProbesConfig, ResponderConfig, ServerConfig, WebhookConfig,
};
use faultline_core::Mode;
use indexmap::IndexMap;
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder: production mode, notifications disabled
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                    ..ServerConfig::default()
                },
                responder: ResponderConfig::default(),
                notifier: NotifierConfig {
                    enabled: false,
                    ..NotifierConfig::default()
                },
                telemetry: None,
            },
        }
    }

    /// Disclose full error objects
    pub fn development(mut self) -> Self {
        self.config.responder.mode = Mode::Development;
        self
    }

    /// Deliver notifications to a webhook
    pub fn with_webhook(self, url: &str) -> Self {
        self.with_webhook_headers(url, IndexMap::new())
    }

    /// Deliver notifications to a webhook with static headers
    pub fn with_webhook_headers(mut self, url: &str, headers: IndexMap<String, SecretString>) -> Self {
        self.config.notifier.enabled = true;
        self.config.notifier.sink = NotifierSink::Webhook(WebhookConfig {
            url: url.parse().expect("valid URL"),
            timeout: "2s".to_owned(),
            headers,
        });
        self
    }

    /// Enable the diagnostic probe routes under the default prefix
    pub fn with_probes(mut self) -> Self {
        self.config.server.probes = ProbesConfig {
            enabled: true,
            ..ProbesConfig::default()
        };
        self
    }

    /// Replace the statuses that never notify
    pub fn with_quiet_statuses(mut self, statuses: &[u16]) -> Self {
        self.config.responder.quiet_statuses = statuses.to_vec();
        self
    }

    /// Mask the given headers in notifications
    pub fn with_redacted_headers(mut self, headers: &[&str]) -> Self {
        self.config.responder.redacted_headers = headers.iter().map(|h| (*h).to_owned()).collect();
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
