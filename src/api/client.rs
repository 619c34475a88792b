//! Traceforce Client
//!
//! Main client for the control-plane API, combining the composed header set,
//! the HTTP pipeline and URL building for every resource collection.

use super::error::{ClientError, Result, ValidationError};
use super::headers;
use super::http::{HttpPipeline, DEFAULT_TIMEOUT};
use crate::models::{Connection, Datalake, HostingEnvironment, SourceApp, SourceAppDatalakeLink};
use crate::resource::{Resource, ResourceClient};
use std::collections::HashMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Production endpoint used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.traceforce.co/api/v1";

/// Optional client settings.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Constant headers added to every request, e.g. edge-proxy bypass
    /// tokens. Snapshotted when the client is built.
    pub extra_headers: HashMap<String, String>,
    /// Client-wide request timeout. Defaults to [`DEFAULT_TIMEOUT`].
    pub timeout: Option<Duration>,
}

impl ClientOptions {
    pub fn with_extra_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Main Traceforce client
///
/// Holds only immutable configuration and a pooled HTTP client; clones are
/// cheap and can be used from many tasks at once.
///
/// ```no_run
/// use traceforce::{Client, ClientOptions};
///
/// # async fn example() -> traceforce::Result<()> {
/// let client = Client::new("my-api-key", None, ClientOptions::default())?;
/// for env in client.hosting_environments().list().await? {
///     println!("{} {}", env.name, env.status);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    http: HttpPipeline,
}

impl Client {
    /// Create a new client.
    ///
    /// `base_url` falls back to [`DEFAULT_BASE_URL`] when `None` or empty.
    pub fn new(api_key: &str, base_url: Option<&str>, options: ClientOptions) -> Result<Self> {
        let base_url = match base_url {
            Some(url) if !url.is_empty() => url,
            _ => DEFAULT_BASE_URL,
        };
        let base_url = normalize_base_url(base_url)?;

        let composed = headers::compose(api_key, &options.extra_headers);
        let header_map = headers::header_map(&composed)?;
        let http = HttpPipeline::new(header_map, options.timeout.unwrap_or(DEFAULT_TIMEOUT))?;

        tracing::debug!(
            "Traceforce client for {} ({} extra headers)",
            base_url,
            composed.len() - 1
        );

        Ok(Self { base_url, http })
    }

    /// A client sharing this one's configuration whose calls are aborted with
    /// `TransportError::Canceled` once `token` is cancelled.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            base_url: self.base_url.clone(),
            http: self.http.with_cancellation(token),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &HttpPipeline {
        &self.http
    }

    // =========================================================================
    // URL helpers
    // =========================================================================

    /// Build a collection URL, e.g. `<base>/datalakes`
    pub(crate) fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection)
    }

    /// Build an item URL. `id` must already be validated.
    pub(crate) fn item_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, collection, id)
    }

    /// Build a collection URL with one url-encoded query parameter
    pub(crate) fn query_url(&self, collection: &str, param: &str, value: &str) -> String {
        format!(
            "{}?{}={}",
            self.collection_url(collection),
            param,
            urlencoding::encode(value)
        )
    }

    // =========================================================================
    // Resource clients
    // =========================================================================

    /// Client for any resource kind.
    pub fn resources<K: Resource>(&self) -> ResourceClient<'_, K> {
        ResourceClient::new(self)
    }

    pub fn hosting_environments(&self) -> ResourceClient<'_, HostingEnvironment> {
        self.resources()
    }

    pub fn datalakes(&self) -> ResourceClient<'_, Datalake> {
        self.resources()
    }

    pub fn source_apps(&self) -> ResourceClient<'_, SourceApp> {
        self.resources()
    }

    pub fn connections(&self) -> ResourceClient<'_, Connection> {
        self.resources()
    }

    pub fn source_app_datalake_links(&self) -> ResourceClient<'_, SourceAppDatalakeLink> {
        self.resources()
    }
}

/// Check that `raw` is an absolute http(s) URL and strip trailing slashes.
fn normalize_base_url(raw: &str) -> Result<String> {
    let invalid = |reason: String| {
        ClientError::from(ValidationError::InvalidBaseUrl {
            url: raw.to_string(),
            reason,
        })
    };

    let parsed = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme {:?}", other))),
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }

    Ok(raw.trim_end_matches('/').to_string())
}
