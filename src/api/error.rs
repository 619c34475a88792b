//! Error types for the Traceforce client.
//!
//! Three families are kept apart so callers can tell them apart:
//! client-side pre-condition failures ([`ValidationError`]), failures of the
//! round trip itself ([`TransportError`]) and explicit rejections by the
//! server ([`ApiError`]). [`ClientError`] wraps them all.

use reqwest::StatusCode;
use thiserror::Error;

/// A pre-condition checked before any request is built.
///
/// Returning one of these guarantees that no network call was made.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// An identifier argument was empty.
    #[error("{field} cannot be empty")]
    EmptyIdentifier {
        /// Name of the offending argument or request field.
        field: &'static str,
    },

    /// An identifier argument was not a canonical hyphenated UUID.
    #[error("invalid UUID format for {field}: {value:?}")]
    MalformedIdentifier {
        field: &'static str,
        value: String,
    },

    /// A non-identifier filter value (e.g. a name) was empty.
    #[error("{field} cannot be empty")]
    EmptyFilter { field: &'static str },

    /// A lifecycle request carried no payload.
    #[error("{operation} request must carry infrastructure metadata")]
    NilRequest { operation: &'static str },

    /// A nested JSON document field was empty.
    #[error("{field} cannot be empty")]
    EmptyNestedDocument { field: &'static str },

    /// A nested JSON document field did not parse.
    #[error("{field} is not valid JSON: {source}")]
    MalformedNestedDocument {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A configured header name or value cannot be sent over HTTP.
    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// The base URL is not an absolute http(s) URL.
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// The round trip failed before a status code was obtained, or while reading
/// the body.
///
/// The request may or may not have reached the server.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The client-wide timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// The caller cancelled the call through its cancellation token.
    #[error("request was cancelled")]
    Canceled,

    /// The connection to the server could not be established.
    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    /// Any other failure reported by the HTTP stack.
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err)
        } else {
            TransportError::Request(err)
        }
    }
}

/// The server answered with a 4xx or 5xx status.
///
/// `body` is the full response payload, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HTTP {status}: {body}")]
pub struct ApiError {
    pub status: u16,
    pub body: String,
}

impl ApiError {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            body: body.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND.as_u16()
    }

    pub fn is_conflict(&self) -> bool {
        self.status == StatusCode::CONFLICT.as_u16()
    }

    /// 4xx: the request itself was rejected.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// 5xx: the server failed.
    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}

/// Errors that can occur when using the Traceforce client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The server reported an error but its body could not be read.
    #[error("failed to read error response body (HTTP {status}): {source}")]
    BodyRead {
        status: u16,
        #[source]
        source: TransportError,
    },

    /// The request payload could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A successful response did not match the expected schema.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl ClientError {
    /// The API error carried by this failure, if the server rejected the call.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.api().is_some_and(ApiError::is_not_found)
    }

    /// True when the failure happened on the wire, so retrying an idempotent
    /// operation (get, list, delete) is safe. Creates must not be blindly
    /// retried. The client never retries on its own.
    pub fn is_retry_safe(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(TransportError::Timeout | TransportError::Connect(_))
        )
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_classes() {
        let not_found = ApiError::new(StatusCode::NOT_FOUND, "not found");
        assert!(not_found.is_not_found());
        assert!(not_found.is_client_error());
        assert!(!not_found.is_server_error());

        let unavailable = ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "");
        assert!(unavailable.is_server_error());
        assert!(!unavailable.is_client_error());

        assert!(ApiError::new(StatusCode::CONFLICT, "exists").is_conflict());
    }

    #[test]
    fn test_api_error_display_keeps_body() {
        let err = ClientError::from(ApiError::new(StatusCode::NOT_FOUND, "not found"));
        assert_eq!(err.to_string(), "HTTP 404: not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_retry_safety() {
        assert!(ClientError::Transport(TransportError::Timeout).is_retry_safe());
        assert!(!ClientError::Transport(TransportError::Canceled).is_retry_safe());
        assert!(!ClientError::from(ApiError::new(StatusCode::BAD_GATEWAY, "")).is_retry_safe());
        assert!(!ClientError::from(ValidationError::EmptyIdentifier { field: "id" }).is_retry_safe());
    }

    #[test]
    fn test_validation_messages() {
        let err = ValidationError::EmptyIdentifier { field: "id" };
        assert_eq!(err.to_string(), "id cannot be empty");

        let err = ValidationError::MalformedIdentifier {
            field: "datalake_id",
            value: "bad".to_string(),
        };
        assert!(err.to_string().contains("invalid UUID format"));
    }
}
