//! Authenticated Salesforce transport.
//!
//! ## Security
//!
//! - Access tokens are redacted in Debug output
//! - Tokens are skipped in tracing spans

use std::sync::{Arc, Mutex};

use tracing::{instrument, warn};

use crate::client::SfHttpClient;
use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::Request;
use crate::response::{ApiUsage, Response};
use crate::transport::Transport;

/// Salesforce org connection: instance URL, access token, HTTP client.
///
/// Remembers the API usage reported by the last response so the connector
/// can report it at the end of a transaction.
///
/// # Example
///
/// ```rust,ignore
/// use busbar_sf_client::SalesforceClient;
///
/// let client = SalesforceClient::new("https://myorg.my.salesforce.com", token)?;
/// assert_eq!(client.url("/services/data"), "https://myorg.my.salesforce.com/services/data");
/// ```
#[derive(Clone)]
pub struct SalesforceClient {
    http: SfHttpClient,
    instance_url: String,
    access_token: String,
    last_usage: Arc<Mutex<Option<ApiUsage>>>,
}

impl std::fmt::Debug for SalesforceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceClient")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl SalesforceClient {
    /// Create a new client with the given instance URL and access token.
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        Self::with_config(instance_url, access_token, ClientConfig::default())
    }

    /// Create a new client with custom configuration.
    pub fn with_config(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let instance_url = instance_url.into();
        let parsed = url::Url::parse(&instance_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::new(ErrorKind::Config(format!(
                "instance URL must be http(s): {}",
                instance_url
            ))));
        }

        Ok(Self {
            http: SfHttpClient::new(config)?,
            instance_url: instance_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            last_usage: Arc::new(Mutex::new(None)),
        })
    }

    /// Get the access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Build the full URL for a path.
    ///
    /// Absolute URLs pass through; anything else is joined to the
    /// instance URL.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.instance_url, path)
        } else {
            format!("{}/{}", self.instance_url, path)
        }
    }

    fn record_usage(&self, response: &Response) {
        let Some(usage) = response.api_usage() else {
            return;
        };
        match self.last_usage.lock() {
            Ok(mut slot) => *slot = Some(usage),
            Err(_) => warn!("API usage state poisoned; dropping update"),
        }
    }
}

impl Transport for SalesforceClient {
    fn instance_url(&self) -> &str {
        &self.instance_url
    }

    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: Request) -> Result<Response> {
        let url = self.url(&request.path);
        let response = self.http.execute(request, &url, &self.access_token).await?;
        self.record_usage(&response);
        Ok(response)
    }

    fn api_usage(&self) -> Option<ApiUsage> {
        self.last_usage.lock().ok().and_then(|slot| *slot)
    }
}
