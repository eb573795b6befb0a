use faultline_core::RequestContext;
use http::HeaderName;
use serde_json::{Map, Value};

/// Replacement for masked header values
pub const REDACTED: &str = "[REDACTED]";

/// Body fields and headers withheld from notifications
#[derive(Debug, Clone, Default)]
pub struct Redaction {
    fields: Vec<String>,
    headers: Vec<HeaderName>,
}

impl Redaction {
    /// Create a redaction policy
    ///
    /// Header names that are not valid HTTP header names are ignored.
    pub fn new<F, H>(fields: F, headers: H) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        H: IntoIterator,
        H::Item: AsRef<str>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            headers: headers
                .into_iter()
                .filter_map(|name| HeaderName::try_from(name.as_ref().to_ascii_lowercase()).ok())
                .collect(),
        }
    }

    /// Remove sensitive fields from a body at every nesting level
    pub fn redact_body(&self, body: &mut Value) {
        match body {
            Value::Object(object) => {
                object.retain(|key, _| !self.fields.iter().any(|field| field == key));
                for value in object.values_mut() {
                    self.redact_body(value);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.redact_body(item);
                }
            }
            _ => {}
        }
    }

    fn masks_header(&self, name: &HeaderName) -> bool {
        self.headers.contains(name)
    }
}

/// Redacted copy of the request an error was raised for
///
/// Lives only for the duration of one notification.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSnapshot {
    pub method: String,
    /// Path without the query string
    pub path: String,
    /// Client IP, empty when unknown
    pub ip: String,
    pub headers: Map<String, Value>,
    pub params: Map<String, Value>,
    pub query: Map<String, Value>,
    pub body: Value,
}

impl RequestSnapshot {
    /// Copy request metadata, applying the redaction policy
    pub fn capture(context: &RequestContext, redaction: &Redaction) -> Self {
        let mut headers = Map::new();
        for name in context.headers.keys() {
            let value = if redaction.masks_header(name) {
                REDACTED.to_owned()
            } else {
                context
                    .headers
                    .get_all(name)
                    .iter()
                    .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            headers.insert(name.as_str().to_owned(), Value::String(value));
        }

        let mut body = context.body.clone();
        redaction.redact_body(&mut body);

        Self {
            method: context.method.to_string(),
            path: context.path().to_owned(),
            ip: context.client_ip.clone().unwrap_or_default(),
            headers,
            params: context.params_object(),
            query: context.query_object(),
            body,
        }
    }
}
