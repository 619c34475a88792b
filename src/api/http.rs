//! HTTP pipeline for Traceforce REST calls
//!
//! [`HttpPipeline`] executes exactly one request per call and hands back the
//! raw response; [`check_response`] classifies it before anything is decoded.

use super::error::{ApiError, ClientError, Result, TransportError};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Client-wide timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(char::is_control, "")
}

/// Request pipeline: one outbound call per [`execute`](Self::execute), no
/// retries, no caching.
#[derive(Debug, Clone)]
pub struct HttpPipeline {
    client: Client,
    headers: HeaderMap,
    cancel: Option<CancellationToken>,
}

impl HttpPipeline {
    /// Create a pipeline that attaches `headers` to every request.
    pub fn new(headers: HeaderMap, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("traceforce-rs/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            client,
            headers,
            cancel: None,
        })
    }

    /// A copy of this pipeline whose calls are aborted once `token` fires.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            client: self.client.clone(),
            headers: self.headers.clone(),
            cancel: Some(token),
        }
    }

    /// The header set sent with every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Send one request.
    ///
    /// When `body` is present it is serialized to JSON and `Content-Type` is
    /// set; otherwise the request carries neither.
    pub async fn execute<B>(&self, method: Method, url: &str, body: Option<&B>) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .headers(self.headers.clone());

        if let Some(body) = body {
            let encoded = serde_json::to_vec(body).map_err(ClientError::Encode)?;
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(encoded);
        }

        let response = race(self.cancel.as_ref(), request.send()).await?;

        Ok(RawResponse {
            status: response.status(),
            response,
            cancel: self.cancel.clone(),
        })
    }
}

/// Await `fut` unless `cancel` fires first.
async fn race<T, F>(cancel: Option<&CancellationToken>, fut: F) -> std::result::Result<T, TransportError>
where
    F: Future<Output = std::result::Result<T, reqwest::Error>>,
{
    match cancel {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(TransportError::Canceled),
            res = fut => res.map_err(TransportError::from),
        },
        None => fut.await.map_err(TransportError::from),
    }
}

/// A response whose body has not been read yet.
#[derive(Debug)]
pub struct RawResponse {
    status: StatusCode,
    response: Response,
    cancel: Option<CancellationToken>,
}

impl RawResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Read the whole body as text.
    pub async fn text(self) -> std::result::Result<String, TransportError> {
        race(self.cancel.as_ref(), self.response.text()).await
    }

    /// Read the whole body and decode it as `T`.
    ///
    /// Only call this on a response that passed [`check_response`].
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let bytes = race(self.cancel.as_ref(), self.response.bytes()).await?;
        serde_json::from_slice(&bytes).map_err(ClientError::Decode)
    }
}

/// Response validator.
///
/// Statuses below 400 pass through untouched. Anything else is drained and
/// returned as an [`ApiError`] carrying the body verbatim, so an error body is
/// never decoded as a success schema.
pub async fn check_response(raw: RawResponse) -> Result<RawResponse> {
    let status = raw.status();
    if status.as_u16() < 400 {
        return Ok(raw);
    }

    let body = raw.text().await.map_err(|source| match source {
        TransportError::Canceled => ClientError::Transport(TransportError::Canceled),
        source => ClientError::BodyRead {
            status: status.as_u16(),
            source,
        },
    })?;

    // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
    tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
    Err(ApiError::new(status, body).into())
}

/// Format a client error for display
/// Security: Maps status classes to short messages instead of echoing raw bodies
pub fn format_api_error(error: &ClientError) -> String {
    match error {
        ClientError::Validation(err) => format!("Invalid input: {}", err),
        ClientError::Transport(TransportError::Timeout) => {
            "Request timed out. Please try again.".to_string()
        }
        ClientError::Transport(TransportError::Canceled) => "Request cancelled.".to_string(),
        ClientError::Transport(_) => {
            "Request failed. Check your network connection and try again.".to_string()
        }
        ClientError::Api(api) => match api.status {
            401 => "Authentication failed. Check your Traceforce API key.".to_string(),
            403 => "Permission denied for this resource.".to_string(),
            404 => "Resource not found.".to_string(),
            409 => "Resource conflict. The resource may already exist or be in use.".to_string(),
            429 => "Rate limit exceeded. Please try again later.".to_string(),
            400..=499 => "Invalid request. Check your parameters.".to_string(),
            _ => "Traceforce service temporarily unavailable. Please try again.".to_string(),
        },
        ClientError::BodyRead { status, .. } => {
            format!("Request failed with HTTP {} and an unreadable response.", status)
        }
        ClientError::Encode(_) | ClientError::Decode(_) => {
            "Unexpected payload. The client may be out of date.".to_string()
        }
        ClientError::Build(_) => "Failed to initialize the HTTP client.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ValidationError;

    #[test]
    fn test_sanitize_short_body_untouched() {
        assert_eq!(sanitize_for_log("not found"), "not found");
    }

    #[test]
    fn test_sanitize_truncates_long_body() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(MAX_LOG_BODY_LENGTH)));
        assert!(sanitized.contains("500 bytes total"));
    }

    #[test]
    fn test_sanitize_respects_char_boundaries() {
        let body = "é".repeat(300);
        // must not panic on a multi-byte boundary
        let _ = sanitize_for_log(&body);
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        assert_eq!(sanitize_for_log("a\nb\tc"), "abc");
    }

    #[test]
    fn test_sanitize_keeps_unicode_text() {
        assert_eq!(
            sanitize_for_log("environnement déjà connecté\r\n"),
            "environnement déjà connecté"
        );
        assert_eq!(sanitize_for_log("接続が見つかりません"), "接続が見つかりません");
    }

    #[test]
    fn test_format_api_error_by_status() {
        let err = ClientError::from(ApiError {
            status: 404,
            body: "{\"detail\":\"secret internals\"}".to_string(),
        });
        let message = format_api_error(&err);
        assert_eq!(message, "Resource not found.");
        assert!(!message.contains("secret"));

        let err = ClientError::from(ApiError {
            status: 503,
            body: String::new(),
        });
        assert!(format_api_error(&err).contains("unavailable"));
    }

    #[test]
    fn test_format_validation_error() {
        let err = ClientError::from(ValidationError::EmptyIdentifier { field: "id" });
        assert_eq!(format_api_error(&err), "Invalid input: id cannot be empty");
    }
}
