#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

pub mod dispatcher;
pub mod error;
pub mod notification;
pub mod notifier;
pub mod snapshot;
pub mod webhook;

use std::sync::Arc;

use faultline_config::{NotifierConfig, NotifierSink};
use faultline_telemetry::BoundaryMetrics;

pub use dispatcher::{Dispatch, NotificationDispatcher};
pub use error::NotifyError;
pub use notification::Notification;
pub use notifier::{Notifier, TracingNotifier};
pub use snapshot::{Redaction, RequestSnapshot};
pub use webhook::WebhookNotifier;

/// Build the notifier described by configuration and start its dispatcher
///
/// Returns `None` when notifications are disabled. Must be called from
/// within a Tokio runtime.
pub fn create_dispatcher(
    config: &NotifierConfig,
    metrics: BoundaryMetrics,
) -> anyhow::Result<Option<NotificationDispatcher>> {
    if !config.enabled {
        return Ok(None);
    }

    let notifier: Arc<dyn Notifier> = match &config.sink {
        NotifierSink::Log => Arc::new(TracingNotifier),
        NotifierSink::Webhook(webhook) => Arc::new(WebhookNotifier::new(
            webhook.url.clone(),
            webhook.timeout()?,
            &webhook.headers,
        )?),
    };

    Ok(Some(NotificationDispatcher::spawn(notifier, config.queue_capacity, metrics)))
}
