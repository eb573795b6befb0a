use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::NotifyError;
use crate::notification::Notification;
use crate::notifier::Notifier;

/// Notifier that POSTs each notification as a JSON object
#[derive(Clone)]
pub struct WebhookNotifier {
    http: reqwest::Client,
    url: Url,
    headers: HeaderMap,
}

impl WebhookNotifier {
    /// Create a webhook notifier
    ///
    /// # Errors
    ///
    /// Returns an error if a header is invalid or the HTTP client cannot be
    /// built
    pub fn new(url: Url, timeout: Duration, headers: &IndexMap<String, SecretString>) -> Result<Self, NotifyError> {
        let mut header_map = HeaderMap::with_capacity(headers.len());

        for (name, value) in headers {
            let invalid = |reason: String| NotifyError::InvalidHeader {
                name: name.clone(),
                reason,
            };

            let header_name = HeaderName::try_from(name.as_str()).map_err(|e| invalid(e.to_string()))?;
            let mut header_value =
                HeaderValue::from_str(value.expose_secret()).map_err(|e| invalid(e.to_string()))?;
            header_value.set_sensitive(true);

            header_map.insert(header_name, header_value);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NotifyError::Request)?;

        Ok(Self {
            http,
            url,
            headers: header_map,
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(self.url.clone())
            .headers(self.headers.clone())
            .json(notification)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(NotifyError::Rejected { status, message })
        }
    }

    fn name(&self) -> &'static str {
        "webhook"
    }
}

impl std::fmt::Debug for WebhookNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookNotifier")
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}
