use std::fmt;

use serde_json::Value;

/// Errors produced by a single JSON request.
///
/// Variants carry the technical detail (status, parsed body, transport
/// message) for diagnostics. None of it is meant for the end user.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    /// The response content-type is not JSON. The body was never read.
    NonJsonResponse {
        status: u16,
        content_type: Option<String>,
    },
    /// Non-2xx status with a JSON body, kept for logging.
    Http { status: u16, body: Value },
    /// Network-level failure (timeout, DNS, connection refused).
    Transport(String),
    /// A caller-supplied header name or value could not be encoded.
    InvalidHeader(String),
    /// The response claimed to be JSON but did not parse.
    Decode(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::NonJsonResponse {
                status,
                content_type,
            } => write!(
                f,
                "request returned non-JSON response (HTTP {status}, content-type: {})",
                content_type.as_deref().unwrap_or("<none>")
            ),
            RequestError::Http { status, .. } => write!(f, "request failed (HTTP {status})"),
            RequestError::Transport(msg) => write!(f, "transport error: {msg}"),
            RequestError::InvalidHeader(msg) => write!(f, "invalid header: {msg}"),
            RequestError::Decode(msg) => write!(f, "response decode error: {msg}"),
        }
    }
}

impl std::error::Error for RequestError {}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RequestError::Decode(e.to_string())
        } else {
            RequestError::Transport(e.to_string())
        }
    }
}

/// Why a conversation cycle failed.
///
/// Every variant collapses to the same user-facing message; the detail is
/// only ever handed to a diagnostics sink.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatError {
    /// The request itself failed.
    Request(RequestError),
    /// Transport succeeded but the payload had no usable `output`
    /// (including 204 No Content).
    MissingOutput,
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Request(e) => write!(f, "{e}"),
            ChatError::MissingOutput => write!(f, "response missing output"),
        }
    }
}

impl std::error::Error for ChatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChatError::Request(e) => Some(e),
            ChatError::MissingOutput => None,
        }
    }
}

impl From<RequestError> for ChatError {
    fn from(e: RequestError) -> Self {
        ChatError::Request(e)
    }
}
