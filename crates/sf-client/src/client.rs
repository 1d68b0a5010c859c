//! Thin reqwest wrapper: one request, one buffered response.

use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::Request;
use crate::response::Response;

/// HTTP client for Salesforce APIs.
///
/// Requests are sent exactly once. Non-2xx responses are mapped to errors
/// using the Salesforce error body when one is present.
#[derive(Debug, Clone)]
pub struct SfHttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl SfHttpClient {
    /// Create a new HTTP client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(config.compression)
            .deflate(config.compression)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a new HTTP client with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `request` to the fully-resolved `url`.
    #[instrument(skip(self, request, token), fields(method = %request.method, url = %url))]
    pub async fn execute(&self, request: Request, url: &str, token: &str) -> Result<Response> {
        let mut target = url::Url::parse(url)?;
        if !request.query_params.is_empty() {
            target
                .query_pairs_mut()
                .extend_pairs(request.query_params.iter());
        }

        let mut req = self
            .inner
            .request(request.method.to_reqwest(), target)
            .bearer_auth(token)
            .header("Accept", "application/json");

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        if self.config.trace_requests {
            debug!("Sending request");
        }

        let response = Response::read(req.send().await?).await?;

        if self.config.trace_requests {
            let status = response.status();
            let content_length = response.bytes().len();
            if response.is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        response.error_for_status()
    }
}
