//! Pipeline error taxonomy.
//!
//! Every failure leaving [`super::client::ApiClient`] is an [`ApiError`], and
//! every `ApiError` maps to exactly one [`ErrorClass`]. The class decides the
//! user-visible notification and, for `Unauthenticated`, the session side
//! effect.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

use serde_json::Value;

/// Failure of a request issued through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No response was received (connect failure, timeout, broken body).
    #[error("network error: {message}")]
    Network { message: String, timed_out: bool },

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Http { status: u16, detail: Option<String> },

    /// A success response body could not be decoded.
    #[error("response decode failed: {0}")]
    Decode(String),
}

/// Closed classification of pipeline failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    Unauthenticated,
    Forbidden,
    NotFound,
    Conflict,
    Validation,
    ServerError,
    Connectivity,
}

impl ErrorClass {
    /// Map an HTTP status to its class. Statuses outside the table are
    /// treated as connectivity failures.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthenticated,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            422 => Self::Validation,
            500 => Self::ServerError,
            _ => Self::Connectivity,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Validation => "validation",
            Self::ServerError => "server_error",
            Self::Connectivity => "connectivity",
        }
    }

    /// User-facing message for this class. `Conflict` and `Validation` prefer
    /// the server-supplied detail.
    #[must_use]
    pub fn message(self, detail: Option<&str>) -> String {
        match self {
            Self::Unauthenticated => "session expired, please log in again".to_owned(),
            Self::Forbidden => "insufficient privilege".to_owned(),
            Self::NotFound => "resource not found".to_owned(),
            Self::Conflict => detail.unwrap_or("resource conflict").to_owned(),
            Self::Validation => detail.unwrap_or("invalid parameters").to_owned(),
            Self::ServerError => "server error, retry later".to_owned(),
            Self::Connectivity => "network unreachable".to_owned(),
        }
    }
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ApiError {
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Network { .. } => ErrorClass::Connectivity,
            Self::Http { status, .. } => ErrorClass::from_status(*status),
            Self::Decode(_) => ErrorClass::ServerError,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Http { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        self.class() == ErrorClass::Unauthenticated
    }

    /// Message shown to the user for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.class().message(self.detail())
    }
}

/// Pull the human-readable `detail` out of an error body.
///
/// Accepts `{"detail": "text"}` and the validation shape
/// `{"detail": [{"msg": "..."}, ...]}`; anything else yields `None`.
#[must_use]
pub fn extract_detail(body: &[u8]) -> Option<String> {
    let value = serde_json::from_slice::<Value>(body).ok()?;
    match value.get("detail")? {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Array(items) => {
            let messages = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect::<Vec<_>>();
            if messages.is_empty() { None } else { Some(messages.join("; ")) }
        }
        _ => None,
    }
}
