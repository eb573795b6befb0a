use std::sync::Arc;

use faultline_config::ResponderConfig;
use faultline_core::{ErrorRecord, INTERNAL_SERVER_ERROR, Mode, RaisedError, RequestContext};
use faultline_notify::{Dispatch, Notification, Redaction, RequestSnapshot};
use faultline_telemetry::BoundaryMetrics;
use http::StatusCode;

use crate::body::{ErrorResponse, ResponseBody};

/// Statuses that are expected at high volume: not found, validation, rate limit
const DEFAULT_QUIET_STATUSES: [StatusCode; 3] = [
    StatusCode::NOT_FOUND,
    StatusCode::UNPROCESSABLE_ENTITY,
    StatusCode::TOO_MANY_REQUESTS,
];

const DEFAULT_REDACTED_FIELDS: [&str; 4] = ["password", "oldPassword", "newPassword", "token"];

/// Terminal handler for errors reaching the request boundary
///
/// Holds only immutable settings, so one instance serves every request
/// concurrently. Never fails: every call yields a response, and
/// notification problems are logged and swallowed.
#[derive(Clone)]
pub struct ErrorResponder {
    mode: Mode,
    quiet_statuses: Vec<StatusCode>,
    redaction: Redaction,
    dispatcher: Option<Arc<dyn Dispatch>>,
    metrics: BoundaryMetrics,
}

impl ErrorResponder {
    /// Create a responder with default policies and no notifier
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            quiet_statuses: DEFAULT_QUIET_STATUSES.to_vec(),
            redaction: Redaction::new(DEFAULT_REDACTED_FIELDS, Vec::<String>::new()),
            dispatcher: None,
            metrics: BoundaryMetrics::new(),
        }
    }

    /// Create a responder from configuration
    ///
    /// Quiet statuses that are not valid HTTP statuses are skipped; config
    /// validation rejects them earlier.
    pub fn from_config(config: &ResponderConfig, dispatcher: Option<Arc<dyn Dispatch>>) -> Self {
        Self {
            mode: config.mode,
            quiet_statuses: config
                .quiet_statuses
                .iter()
                .filter_map(|status| StatusCode::from_u16(*status).ok())
                .collect(),
            redaction: Redaction::new(config.redacted_fields.iter().cloned(), &config.redacted_headers),
            dispatcher,
            metrics: BoundaryMetrics::new(),
        }
    }

    /// Forward notifications to the given dispatcher
    #[must_use]
    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn Dispatch>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    #[must_use]
    pub fn with_quiet_statuses(mut self, statuses: impl IntoIterator<Item = StatusCode>) -> Self {
        self.quiet_statuses = statuses.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_redaction(mut self, redaction: Redaction) -> Self {
        self.redaction = redaction;
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: BoundaryMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether an error carrying `status` is forwarded to operators
    pub fn should_notify(&self, status: StatusCode) -> bool {
        !self.quiet_statuses.contains(&status)
    }

    /// Classify an error and produce the client response
    ///
    /// Development mode discloses the full record. Production mode discloses
    /// operational errors as `{code, message}` and answers everything else
    /// with a fixed 500 body, logging the details server-side instead.
    pub fn handle(&self, error: RaisedError, context: &RequestContext) -> ErrorResponse {
        let mut record = ErrorRecord::normalize(error);

        let response = match (self.mode, record.is_operational) {
            (Mode::Development, _) => {
                self.notify(&record, context);
                ErrorResponse {
                    status: record.status,
                    body: ResponseBody::with_record(&record),
                }
            }
            (Mode::Production, true) => {
                self.notify(&record, context);
                ErrorResponse {
                    status: record.status,
                    body: ResponseBody::disclosed(&record),
                }
            }
            (Mode::Production, false) => {
                record.code = INTERNAL_SERVER_ERROR.to_owned();
                self.notify(&record, context);

                tracing::error!(
                    name = record.name.as_deref().unwrap_or("unknown"),
                    status = record.status.as_u16(),
                    method = %context.method,
                    path = context.path(),
                    stack = record.stack.as_deref().unwrap_or_default(),
                    "unhandled error: {}",
                    record.message
                );

                ErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: ResponseBody::generic(),
                }
            }
        };

        self.metrics
            .error_handled(record.kind.label(), response.status.as_u16());

        response
    }

    /// Forward a redacted snapshot unless the status is quiet
    fn notify(&self, record: &ErrorRecord, context: &RequestContext) {
        if !self.should_notify(record.status) {
            return;
        }

        let Some(dispatcher) = &self.dispatcher else {
            return;
        };

        let snapshot = RequestSnapshot::capture(context, &self.redaction);

        match Notification::build(record, record.status, &snapshot) {
            Ok(notification) => dispatcher.dispatch(notification),
            Err(e) => tracing::warn!(error = %e, code = %record.code, "failed to build error notification"),
        }
    }
}

impl std::fmt::Debug for ErrorResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorResponder")
            .field("mode", &self.mode)
            .field("quiet_statuses", &self.quiet_statuses)
            .field("notifies", &self.dispatcher.is_some())
            .finish_non_exhaustive()
    }
}
