use std::sync::Arc;

use faultline_telemetry::BoundaryMetrics;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::notification::Notification;
use crate::notifier::Notifier;

/// Hand-off point between the responder and notification delivery
///
/// Implementations must return without waiting for delivery.
pub trait Dispatch: Send + Sync {
    /// Queue a notification for delivery
    fn dispatch(&self, notification: Notification);
}

/// Fire-and-forget dispatcher backed by a background task
///
/// Notifications go through a bounded channel so a slow or failing
/// notifier can never hold up a response. When the queue is full the
/// notification is dropped.
#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::Sender<Notification>,
    metrics: BoundaryMetrics,
}

impl NotificationDispatcher {
    /// Create a dispatcher and spawn its delivery task
    ///
    /// The task runs until every dispatcher handle is dropped.
    pub fn spawn(notifier: Arc<dyn Notifier>, capacity: usize, metrics: BoundaryMetrics) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));

        tokio::spawn(deliver(rx, notifier, metrics.clone()));

        Self { tx, metrics }
    }
}

impl Dispatch for NotificationDispatcher {
    fn dispatch(&self, notification: Notification) {
        match self.tx.try_send(notification) {
            Ok(()) => self.metrics.notification_dispatched(),
            Err(TrySendError::Full(_)) => {
                tracing::warn!("notification queue full, dropping notification");
                self.metrics.notification_dropped("queue_full");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!("notification channel closed, dropping notification");
                self.metrics.notification_dropped("closed");
            }
        }
    }
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher").finish_non_exhaustive()
    }
}

/// Background task that delivers queued notifications one at a time
async fn deliver(mut rx: mpsc::Receiver<Notification>, notifier: Arc<dyn Notifier>, metrics: BoundaryMetrics) {
    while let Some(notification) = rx.recv().await {
        if let Err(e) = notifier.notify(&notification).await {
            tracing::warn!(
                error = %e,
                notifier = notifier.name(),
                error_code = notification.get(crate::notification::ERROR_CODE).unwrap_or_default(),
                "failed to deliver error notification"
            );
            metrics.notification_dropped("delivery_failed");
        }
    }

    tracing::debug!("notification dispatcher shutting down");
}
