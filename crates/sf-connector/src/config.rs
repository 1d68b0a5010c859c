//! Connector configuration.

/// Default rows per SObject Collections update call (the API maximum).
pub const DEFAULT_UPDATE_CHUNK_SIZE: usize = 200;

/// Default record type of the record returned by `load`.
pub const DEFAULT_RESULT_RECORD_TYPE: &str = "ConnectorResult";

/// Configuration for a [`Connector`](crate::Connector).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorConfig {
    /// Rows per chunked update call. Clamped to 1..=200.
    pub update_chunk_size: usize,
    /// Record type of the result record `load` returns.
    pub result_record_type: String,
    /// API version applied when a transaction begins, if set.
    pub api_version: Option<String>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            update_chunk_size: DEFAULT_UPDATE_CHUNK_SIZE,
            result_record_type: DEFAULT_RESULT_RECORD_TYPE.to_string(),
            api_version: None,
        }
    }
}

impl ConnectorConfig {
    /// Create a new connector config builder.
    pub fn builder() -> ConnectorConfigBuilder {
        ConnectorConfigBuilder::default()
    }
}

/// Builder for ConnectorConfig.
#[derive(Debug, Default)]
pub struct ConnectorConfigBuilder {
    config: ConnectorConfig,
}

impl ConnectorConfigBuilder {
    /// Set rows per chunked update call.
    pub fn with_update_chunk_size(mut self, size: usize) -> Self {
        self.config.update_chunk_size = size.clamp(1, DEFAULT_UPDATE_CHUNK_SIZE);
        self
    }

    /// Set the result record type.
    pub fn with_result_record_type(mut self, record_type: impl Into<String>) -> Self {
        self.config.result_record_type = record_type.into();
        self
    }

    /// Pin the API version (e.g. "59.0").
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = Some(version.into());
        self
    }

    pub fn build(self) -> ConnectorConfig {
        self.config
    }
}

/// Per-transaction options for [`Connector::begin`](crate::Connector::begin).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeginOptions {
    /// API version for this transaction; overrides the configured one.
    pub api_version: Option<String>,
}

impl BeginOptions {
    pub fn with_api_version(version: impl Into<String>) -> Self {
        Self {
            api_version: Some(version.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConnectorConfig::default();
        assert_eq!(config.update_chunk_size, 200);
        assert_eq!(config.result_record_type, "ConnectorResult");
        assert!(config.api_version.is_none());
    }

    #[test]
    fn test_builder_clamps_chunk_size() {
        let config = ConnectorConfig::builder()
            .with_update_chunk_size(500)
            .with_result_record_type("Result")
            .with_api_version("59.0")
            .build();
        assert_eq!(config.update_chunk_size, 200);
        assert_eq!(config.result_record_type, "Result");
        assert_eq!(config.api_version.as_deref(), Some("59.0"));

        let config = ConnectorConfig::builder().with_update_chunk_size(0).build();
        assert_eq!(config.update_chunk_size, 1);
    }
}
