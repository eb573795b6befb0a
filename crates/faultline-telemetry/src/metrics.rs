//! Metric names and the counters the error boundary records

use opentelemetry::metrics::Counter;
use opentelemetry::{KeyValue, global};

pub const ERRORS_HANDLED: &str = "faultline.errors.handled";
pub const NOTIFICATIONS_DISPATCHED: &str = "faultline.notifications.dispatched";
pub const NOTIFICATIONS_DROPPED: &str = "faultline.notifications.dropped";

/// Counters for errors answered and notifications forwarded
///
/// Instruments bind to the global meter provider at construction, so build
/// this after [`crate::init`].
#[derive(Clone)]
pub struct BoundaryMetrics {
    errors_handled: Counter<u64>,
    notifications_dispatched: Counter<u64>,
    notifications_dropped: Counter<u64>,
}

impl BoundaryMetrics {
    pub fn new() -> Self {
        let meter = global::meter("faultline");

        Self {
            errors_handled: meter
                .u64_counter(ERRORS_HANDLED)
                .with_description("Errors converted into client responses")
                .build(),
            notifications_dispatched: meter
                .u64_counter(NOTIFICATIONS_DISPATCHED)
                .with_description("Notifications handed to the notifier")
                .build(),
            notifications_dropped: meter
                .u64_counter(NOTIFICATIONS_DROPPED)
                .with_description("Notifications discarded before delivery")
                .build(),
        }
    }

    /// Count an error by classification and response status
    pub fn error_handled(&self, class: &'static str, status: u16) {
        self.errors_handled.add(
            1,
            &[KeyValue::new("class", class), KeyValue::new("status", i64::from(status))],
        );
    }

    pub fn notification_dispatched(&self) {
        self.notifications_dispatched.add(1, &[]);
    }

    /// Count a discarded notification with the reason it was dropped
    pub fn notification_dropped(&self, reason: &'static str) {
        self.notifications_dropped.add(1, &[KeyValue::new("reason", reason)]);
    }
}

impl Default for BoundaryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BoundaryMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundaryMetrics").finish_non_exhaustive()
    }
}
