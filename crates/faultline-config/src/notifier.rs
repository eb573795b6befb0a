use std::time::Duration;

use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Error notification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifierConfig {
    /// Whether notifications are sent at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Notifications buffered before new ones are dropped
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Where notifications are delivered
    #[serde(default)]
    pub sink: NotifierSink,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            queue_capacity: default_queue_capacity(),
            sink: NotifierSink::default(),
        }
    }
}

/// Notification delivery target
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotifierSink {
    /// Emit notifications as structured log events
    #[default]
    Log,
    /// POST notifications to an HTTP endpoint
    Webhook(WebhookConfig),
}

/// HTTP endpoint receiving notifications as JSON objects
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookConfig {
    /// Endpoint URL
    pub url: Url,
    /// Request timeout (e.g. "5s", "500ms")
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// Static headers sent with every request
    #[serde(default)]
    pub headers: IndexMap<String, SecretString>,
}

impl WebhookConfig {
    /// Parsed request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is not a valid duration
    pub fn timeout(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.timeout)
            .map_err(|e| anyhow::anyhow!("invalid notifier.sink.timeout '{}': {e}", self.timeout))
    }
}

impl NotifierConfig {
    /// Validate queue size and sink settings
    ///
    /// # Errors
    ///
    /// Returns an error if the queue capacity is zero, the webhook URL is not
    /// HTTP(S), or the webhook timeout does not parse
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.queue_capacity == 0 {
            anyhow::bail!("notifier.queue_capacity must be greater than 0");
        }

        if let NotifierSink::Webhook(ref webhook) = self.sink {
            if !matches!(webhook.url.scheme(), "http" | "https") {
                anyhow::bail!("notifier.sink.url must use http or https, got '{}'", webhook.url.scheme());
            }

            webhook.timeout()?;
        }

        Ok(())
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

const fn default_queue_capacity() -> usize {
    1024
}

fn default_timeout() -> String {
    "5s".to_string()
}
