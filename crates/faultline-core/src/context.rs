use serde_json::{Map, Value};

/// Metadata of the request an error was raised for
///
/// Captured by the boundary before the handler runs so it is still
/// available once the handler has failed.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// HTTP method
    pub method: http::Method,
    /// Original request URI, including the query string
    pub uri: http::Uri,
    /// Request headers
    pub headers: http::HeaderMap,
    /// Route parameters in declaration order
    pub params: Vec<(String, String)>,
    /// Parsed request body, an empty object when nothing was captured
    pub body: Value,
    /// Address of the client, as reported by proxies or the socket
    pub client_ip: Option<String>,
}

impl RequestContext {
    /// Create a context with only a method and URI
    pub fn new(method: http::Method, uri: http::Uri) -> Self {
        Self {
            method,
            uri,
            headers: http::HeaderMap::new(),
            params: Vec::new(),
            body: Value::Object(Map::new()),
            client_ip: None,
        }
    }

    /// Create a minimal context for errors raised outside an HTTP request
    pub fn empty() -> Self {
        Self::new(http::Method::GET, http::Uri::from_static("/"))
    }

    /// Request path without the query string
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Route parameters as a JSON object
    pub fn params_object(&self) -> Map<String, Value> {
        self.params
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect()
    }

    /// Query parameters as a JSON object, see [`form_object`]
    pub fn query_object(&self) -> Map<String, Value> {
        self.uri
            .query()
            .map(|raw| form_object(raw.as_bytes()))
            .unwrap_or_default()
    }
}

/// Decode `application/x-www-form-urlencoded` data into a JSON object
///
/// Repeated keys collect into an array in order of appearance.
pub fn form_object(raw: &[u8]) -> Map<String, Value> {
    let mut object = Map::new();

    for (key, value) in url::form_urlencoded::parse(raw) {
        let value = Value::String(value.into_owned());
        match object.get_mut(key.as_ref()) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                object.insert(key.into_owned(), value);
            }
        }
    }

    object
}
