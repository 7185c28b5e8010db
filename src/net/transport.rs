//! Wire-level request/response types and the transport seam.
//!
//! DESIGN
//! ======
//! Facades describe requests as plain [`ApiRequest`] values; the
//! [`Transport`] trait is the only thing that touches the network. The
//! production implementation is [`ReqwestTransport`]; tests substitute a
//! scripted transport.

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Patch => Self::PATCH,
            Method::Delete => Self::DELETE,
        }
    }
}

/// A file sent as one part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(FilePart),
}

/// How a success response is handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// Decode the body as JSON and return only the payload.
    #[default]
    Json,
    /// Return the whole response (status, headers, raw bytes).
    Blob,
}

/// Per-call pipeline options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestOptions {
    pub mode: ResponseMode,
    /// Skip the user notification and the unauthenticated side effect.
    pub quiet: bool,
}

/// A request relative to the API base URL, without credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub options: RequestOptions,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            options: RequestOptions::default(),
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    /// Append every non-null field of a serializable query struct.
    #[must_use]
    pub fn query_params<T: Serialize>(mut self, params: &T) -> Self {
        let map = match serde_json::to_value(params) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                tracing::warn!(path = %self.path, kind = json_kind(&other), "query params are not a map; ignored");
                return self;
            }
            Err(e) => {
                tracing::warn!(path = %self.path, error = %e, "query params failed to serialize; ignored");
                return self;
            }
        };
        for (key, value) in map {
            match value {
                Value::Null => {}
                Value::String(text) => self.query.push((key, text)),
                other => self.query.push((key, other.to_string())),
            }
        }
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    #[must_use]
    pub fn multipart(mut self, part: FilePart) -> Self {
        self.body = RequestBody::Multipart(part);
        self
    }

    #[must_use]
    pub fn blob(mut self) -> Self {
        self.options.mode = ResponseMode::Blob;
        self
    }

    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.options.quiet = true;
        self
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// What the transport saw come back, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Failure to obtain any response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Issue `request`, attaching `bearer` as the authorization credential
    /// when present.
    async fn execute(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<RawResponse, TransportError>;
}

/// `reqwest`-backed transport with a fixed base URL and timeouts.
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Build a transport from client config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeouts.request())
            .connect_timeout(config.timeouts.connect())
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self { http, base_url: config.effective_base_url() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<RawResponse, TransportError> {
        let mut builder = self.http.request(request.method.into(), self.url(&request.path));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(part) => {
                let mut file = reqwest::multipart::Part::bytes(part.bytes.clone()).file_name(part.file_name.clone());
                if let Some(content_type) = &part.content_type {
                    file = file
                        .mime_str(content_type)
                        .map_err(|e| TransportError::Request(e.to_string()))?;
                }
                builder.multipart(reqwest::multipart::Form::new().part(part.field.clone(), file))
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str().to_owned(), v.to_owned())))
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse { status, headers, body })
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') { format!("{base}{path}") } else { format!("{base}/{path}") }
}
