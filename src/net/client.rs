//! The request pipeline every outbound call goes through.
//!
//! SYSTEM CONTEXT
//! ==============
//! `ApiClient` reads the bearer credential from the shared
//! [`SessionContext`], hands the request to a [`Transport`], and turns the
//! response into either a payload or a classified [`ApiError`]. Failures are
//! reported through the [`Notifier`]; an unauthenticated response also
//! expires the session and forces the console to the login route.

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::{ApiError, ErrorClass, extract_detail};
use super::notify::{Notice, Notifier};
use super::transport::{ApiRequest, RawResponse, ReqwestTransport, ResponseMode, Transport, TransportError};
use crate::config::ClientConfig;
use crate::routing::{LOGIN_PATH, Location};
use crate::state::session::SessionContext;

/// Successful result of [`ApiClient::send`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Blob(BlobResponse),
}

/// Full response kept for binary downloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub bytes: Vec<u8>,
}

impl BlobResponse {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// File name announced by `Content-Disposition`, if any.
    #[must_use]
    pub fn file_name(&self) -> Option<String> {
        self.header("content-disposition").and_then(disposition_file_name)
    }
}

impl From<RawResponse> for BlobResponse {
    fn from(raw: RawResponse) -> Self {
        Self { status: raw.status, headers: raw.headers, bytes: raw.body }
    }
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        let timed_out = matches!(error, TransportError::Timeout);
        Self::Network { message: error.to_string(), timed_out }
    }
}

pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Arc<SessionContext>,
    notifier: Arc<dyn Notifier>,
    location: Arc<Location>,
}

impl ApiClient {
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        session: Arc<SessionContext>,
        notifier: Arc<dyn Notifier>,
        location: Arc<Location>,
    ) -> Self {
        Self { transport, session, notifier, location }
    }

    /// Build a client backed by [`ReqwestTransport`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(
        config: &ClientConfig,
        session: Arc<SessionContext>,
        notifier: Arc<dyn Notifier>,
        location: Arc<Location>,
    ) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), session, notifier, location))
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    #[must_use]
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    #[must_use]
    pub fn location(&self) -> &Arc<Location> {
        &self.location
    }

    /// Dispatch a request and interpret the response.
    ///
    /// # Errors
    ///
    /// Returns a classified [`ApiError`] for transport failures, non-success
    /// statuses and undecodable JSON bodies.
    pub async fn send(&self, request: ApiRequest) -> Result<Payload, ApiError> {
        self.dispatch(&request).await
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<Payload, ApiError> {
        let bearer = self.session.credential();
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            authenticated = bearer.is_some(),
            "dispatching request"
        );

        let response = match self.transport.execute(request, bearer.as_deref()).await {
            Ok(response) => response,
            Err(error) => return Err(self.fail(request, error.into())),
        };

        if !response.is_success() {
            let error = ApiError::Http { status: response.status, detail: extract_detail(&response.body) };
            return Err(self.fail(request, error));
        }

        match request.options.mode {
            ResponseMode::Blob => Ok(Payload::Blob(response.into())),
            ResponseMode::Json => decode_body(&response.body)
                .map(Payload::Json)
                .map_err(|error| self.fail(request, error)),
        }
    }

    /// Send and deserialize the JSON payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error, or a `Decode` error if the payload does not
    /// match `T`. A mismatched payload is logged and notified like any other
    /// failure.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let decoded = match self.dispatch(&request).await? {
            Payload::Json(value) => serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string())),
            Payload::Blob(_) => Err(ApiError::Decode("expected JSON payload, got blob".to_owned())),
        };
        decoded.map_err(|error| self.fail(&request, error))
    }

    /// Send in blob mode and return the full response.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error.
    pub async fn send_blob(&self, request: ApiRequest) -> Result<BlobResponse, ApiError> {
        match self.send(request.blob()).await? {
            Payload::Blob(blob) => Ok(blob),
            Payload::Json(_) => Err(ApiError::Decode("expected blob payload".to_owned())),
        }
    }

    fn fail(&self, request: &ApiRequest, error: ApiError) -> ApiError {
        let class = error.class();
        tracing::warn!(
            method = %request.method,
            path = %request.path,
            status = ?error.status(),
            %class,
            error = %error,
            "request failed"
        );
        if request.options.quiet {
            return error;
        }

        self.notifier.notify(&Notice::new(class, error.user_message()));
        if class == ErrorClass::Unauthenticated {
            self.session.expire();
            self.location.force(LOGIN_PATH);
        }
        error
    }
}

fn decode_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Extract the file name from a `Content-Disposition` header value.
///
/// Handles `filename="a.xlsx"`, bare `filename=a.xlsx`, and prefers an
/// RFC 5987 `filename*=UTF-8''...` value when present (percent escapes are
/// left as-is).
#[must_use]
pub fn disposition_file_name(header: &str) -> Option<String> {
    let mut plain = None;
    for param in header.split(';').map(str::trim) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();
        if key == "filename*" {
            let encoded = value.rsplit_once("''").map_or(value, |(_, rest)| rest);
            if !encoded.is_empty() {
                return Some(encoded.trim_matches('"').to_owned());
            }
        } else if key == "filename" {
            let unquoted = value.trim_matches('"');
            if !unquoted.is_empty() {
                plain = Some(unquoted.to_owned());
            }
        }
    }
    plain
}
