//! Salesforce REST API client.
//!
//! Wraps any [`Transport`] and exposes the handful of REST endpoints the
//! connector needs: SOQL query with continuation, single-record create and
//! update, update by external id, SObject Collections update, and Composite
//! Graph.

use serde::de::DeserializeOwned;

use busbar_sf_client::{ApiUsage, ClientConfig, Request, SalesforceClient, Transport};

use crate::error::Result;

mod collections;
mod composite;
mod crud;
mod query;

/// Salesforce REST API client.
///
/// # Example
///
/// ```rust,ignore
/// use busbar_sf_rest::SalesforceRestClient;
///
/// let client = SalesforceRestClient::new(
///     "https://myorg.my.salesforce.com",
///     "access_token_here",
/// )?;
///
/// let page = client.query::<serde_json::Value>("SELECT Id FROM Account").await?;
/// let created = client.create("Account", &json!({"Name": "New Account"}), &[]).await?;
/// client.update("Account", &created.id, &json!({"Name": "Updated"}), &[]).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SalesforceRestClient<T = SalesforceClient> {
    transport: T,
    api_version: String,
}

impl SalesforceRestClient<SalesforceClient> {
    /// Create a new REST client with the given instance URL and access token.
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let client = SalesforceClient::new(instance_url, access_token)?;
        Ok(Self::from_transport(client))
    }

    /// Create a new REST client with custom HTTP configuration.
    pub fn with_config(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let client = SalesforceClient::with_config(instance_url, access_token, config)?;
        Ok(Self::from_transport(client))
    }
}

impl<T: Transport> SalesforceRestClient<T> {
    /// Create a REST client over an existing transport.
    pub fn from_transport(transport: T) -> Self {
        Self {
            transport,
            api_version: busbar_sf_client::DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get the instance URL.
    pub fn instance_url(&self) -> &str {
        self.transport.instance_url()
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Set the API version (e.g. "60.0").
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Change the API version in place.
    pub fn set_api_version(&mut self, version: impl Into<String>) {
        self.api_version = version.into();
    }

    /// API usage reported by the most recent response.
    pub fn api_usage(&self) -> Option<ApiUsage> {
        self.transport.api_usage()
    }

    /// Instance-relative REST path.
    ///
    /// `rest_path("sobjects/Account")` -> `/services/data/v60.0/sobjects/Account`
    pub fn rest_path(&self, path: &str) -> String {
        format!(
            "/services/data/v{}/{}",
            self.api_version,
            path.trim_start_matches('/')
        )
    }

    /// Instance-relative path of an sObject type's collection resource.
    pub fn sobject_path(&self, sobject: &str) -> String {
        self.rest_path(&format!("sobjects/{}", sobject))
    }

    async fn send_json<R: DeserializeOwned>(&self, request: Request) -> Result<R> {
        let response = self.transport.execute(request).await?;
        Ok(response.json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let client = SalesforceRestClient::new("https://na1.salesforce.com", "token").unwrap();
        assert_eq!(client.api_version(), "60.0");
        assert_eq!(
            client.sobject_path("Account"),
            "/services/data/v60.0/sobjects/Account"
        );

        let client = client.with_api_version("58.0");
        assert_eq!(
            client.rest_path("/composite/graph"),
            "/services/data/v58.0/composite/graph"
        );
        assert_eq!(client.instance_url(), "https://na1.salesforce.com");
    }
}
