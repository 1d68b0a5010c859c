//! HTTP settings for [`SfHttpClient`](crate::SfHttpClient).

use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport settings. Requests are never retried, so there is nothing
/// about backoff here.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request deadline, body included.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Ask for gzip/deflate bodies.
    pub compression: bool,
    pub user_agent: String,
    /// Emit a `debug!` per request and response.
    pub trace_requests: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            compression: true,
            user_agent: crate::USER_AGENT.to_string(),
            trace_requests: true,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.config.compression = enabled;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn with_request_tracing(mut self, enabled: bool) -> Self {
        self.config.trace_requests = enabled;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
