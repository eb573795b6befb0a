use faultline_core::ErrorRecord;
use http::StatusCode;
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::NotifyError;
use crate::snapshot::RequestSnapshot;

pub const DATE: &str = "Date";
pub const IP: &str = "IP";
pub const HEADERS: &str = "Headers";
pub const PARAMETERS: &str = "Parameters";
pub const QUERY: &str = "Query";
pub const BODY: &str = "Body";
pub const HTTP_METHOD: &str = "HTTP Method";
pub const URL: &str = "URL";
pub const ERROR_CODE: &str = "Error Code";
pub const ERROR_STATUS: &str = "Error Status";
pub const ERROR_STACK: &str = "Error Stack";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Flat description of an error and the request that raised it
///
/// Serializes as a JSON object whose keys keep their insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Notification {
    fields: IndexMap<&'static str, String>,
}

impl Notification {
    /// Build a notification stamped with the current local time
    pub fn build(record: &ErrorRecord, status: StatusCode, snapshot: &RequestSnapshot) -> Result<Self, NotifyError> {
        Self::build_at(record, status, snapshot, &jiff::Zoned::now())
    }

    /// Build a notification stamped with the given time
    pub fn build_at(
        record: &ErrorRecord,
        status: StatusCode,
        snapshot: &RequestSnapshot,
        now: &jiff::Zoned,
    ) -> Result<Self, NotifyError> {
        let fields = IndexMap::from([
            (DATE, now.strftime(DATE_FORMAT).to_string()),
            (IP, snapshot.ip.clone()),
            (HEADERS, serde_json::to_string(&snapshot.headers)?),
            (PARAMETERS, serde_json::to_string(&snapshot.params)?),
            (QUERY, serde_json::to_string(&snapshot.query)?),
            (BODY, serde_json::to_string(&snapshot.body)?),
            (HTTP_METHOD, snapshot.method.clone()),
            (URL, snapshot.path.clone()),
            (ERROR_CODE, record.code.clone()),
            (ERROR_STATUS, status.as_u16().to_string()),
            (ERROR_STACK, record.stack.clone().unwrap_or_default()),
        ]);

        Ok(Self { fields })
    }

    /// Look up a field by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Iterate over fields in order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(key, value)| (*key, value.as_str()))
    }
}
