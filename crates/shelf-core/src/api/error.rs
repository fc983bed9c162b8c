use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Categories of API errors for consistent handling across the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// Connection refused, DNS failure, TLS failure
    Transport,
    /// Request exceeded the configured timeout
    Timeout,
    /// Non-success HTTP status (4xx, 5xx)
    HttpStatus,
    /// Response body did not match the expected shape
    Decode,
    /// Form input rejected before any request
    Validation,
    /// A token needed for the call is not stored
    MissingCredential,
    /// Request parameters out of range (page < 1, limit = 0)
    InvalidRequest,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Transport => write!(f, "transport"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Decode => write!(f, "decode"),
            ApiErrorKind::Validation => write!(f, "validation"),
            ApiErrorKind::MissingCredential => write!(f, "missing_credential"),
            ApiErrorKind::InvalidRequest => write!(f, "invalid_request"),
        }
    }
}

/// Structured error from an API call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display. For HTTP errors this is the
    /// server's `message` when the body carries one.
    pub message: String,
    /// HTTP status, when the server answered
    pub status: Option<u16>,
    /// True when `message` was taken from the response body.
    #[serde(default)]
    pub from_server: bool,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            from_server: false,
        }
    }

    /// Creates an HTTP status error, preferring the JSON `message` field of the body.
    pub fn http_status(status: u16, body: &str) -> Self {
        let server_message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| {
                json.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .filter(|msg| !msg.trim().is_empty());

        Self {
            kind: ApiErrorKind::HttpStatus,
            from_server: server_message.is_some(),
            message: server_message.unwrap_or_else(|| format!("HTTP {status}")),
            status: Some(status),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::InvalidRequest, message)
    }

    pub fn missing_credential(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::MissingCredential, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, message)
    }

    /// Maps a reqwest failure onto the taxonomy.
    pub fn from_reqwest(err: &reqwest::Error, action: &str) -> Self {
        let kind = if err.is_timeout() {
            ApiErrorKind::Timeout
        } else if err.is_decode() {
            ApiErrorKind::Decode
        } else {
            ApiErrorKind::Transport
        };
        Self {
            kind,
            message: format!("Failed to {action}: {err}"),
            status: err.status().map(|s| s.as_u16()),
            from_server: false,
        }
    }

    /// The server's own message if it sent one, else `fallback`.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.from_server {
            &self.message
        } else {
            fallback
        }
    }

    /// True for errors the server answered (as opposed to never reaching it).
    pub fn is_http_status(&self) -> bool {
        self.kind == ApiErrorKind::HttpStatus
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
