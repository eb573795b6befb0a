use faultline_core::Mode;
use serde::Deserialize;

/// How errors are classified, disclosed, and redacted
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponderConfig {
    /// Deployment mode selecting the disclosure policy
    #[serde(default)]
    pub mode: Mode,
    /// Statuses that never trigger a notification
    #[serde(default = "default_quiet_statuses")]
    pub quiet_statuses: Vec<u16>,
    /// Body fields removed before a request is forwarded to the notifier
    #[serde(default = "default_redacted_fields")]
    pub redacted_fields: Vec<String>,
    /// Header names whose values are masked in notifications
    #[serde(default)]
    pub redacted_headers: Vec<String>,
    /// Largest request body buffered for notifications
    #[serde(default = "default_max_captured_body_bytes")]
    pub max_captured_body_bytes: usize,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            quiet_statuses: default_quiet_statuses(),
            redacted_fields: default_redacted_fields(),
            redacted_headers: Vec::new(),
            max_captured_body_bytes: default_max_captured_body_bytes(),
        }
    }
}

impl ResponderConfig {
    /// Validate status ranges and limits
    ///
    /// # Errors
    ///
    /// Returns an error if a quiet status is not an HTTP error status or the
    /// body capture limit is zero
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(status) = self.quiet_statuses.iter().find(|s| !(400..=599).contains(*s)) {
            anyhow::bail!("responder.quiet_statuses contains {status}, expected a status between 400 and 599");
        }

        if self.max_captured_body_bytes == 0 {
            anyhow::bail!("responder.max_captured_body_bytes must be greater than 0");
        }

        Ok(())
    }
}

/// Not found, validation failed, rate limited
fn default_quiet_statuses() -> Vec<u16> {
    vec![404, 422, 429]
}

fn default_redacted_fields() -> Vec<String> {
    ["password", "oldPassword", "newPassword", "token"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

const fn default_max_captured_body_bytes() -> usize {
    64 * 1024
}
