use async_trait::async_trait;

use crate::error::NotifyError;
use crate::notification::{self as keys, Notification};

/// Delivery channel for error notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;

    /// Name used in logs
    fn name(&self) -> &str;
}

/// Notifier that writes notifications to the log stream
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let field = |key: &str| notification.get(key).unwrap_or_default();

        tracing::warn!(
            target: "faultline::notification",
            date = field(keys::DATE),
            ip = field(keys::IP),
            method = field(keys::HTTP_METHOD),
            url = field(keys::URL),
            error_code = field(keys::ERROR_CODE),
            error_status = field(keys::ERROR_STATUS),
            headers = field(keys::HEADERS),
            parameters = field(keys::PARAMETERS),
            query = field(keys::QUERY),
            body = field(keys::BODY),
            error_stack = field(keys::ERROR_STACK),
            "error notification"
        );

        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
