//! # busbar-sf-connector
//!
//! A Salesforce record connector for integration pipelines: locate, select,
//! create and update records through the REST API, with creates batched
//! into rollback-safe Composite Graph calls.
//!
//! ## Security
//!
//! - Access tokens are redacted in Debug output and never traced
//! - Every SOQL identifier is allow-listed and every literal escaped
//! - Error messages are scrubbed of credential-looking text
//!
//! ## Crates
//!
//! - **busbar-sf-client** - HTTP transport, request/response types, SOQL escaping
//! - **busbar-sf-rest** - Query, SObject writes, Collections and Composite Graph
//! - **busbar-sf-connector-core** - locators, actions, batching and the [`Connector`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use busbar_sf_connector::{
//!     BeginOptions, Connector, Mapping, RecordLocator, SalesforceRestClient, StaticSchema,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let rest = SalesforceRestClient::new(instance_url, access_token)?;
//!     let mut connector = Connector::new(rest, StaticSchema::new());
//!
//!     connector.begin(BeginOptions::default());
//!     connector
//!         .load(RecordLocator::new("Lead"), Mapping::new().with("LastName", "Doe"), None)
//!         .await?;
//!
//!     for result in connector.end().await? {
//!         println!("{:?}", result.log);
//!     }
//!     Ok(())
//! }
//! ```

#[cfg(feature = "client")]
pub use busbar_sf_client as client;
#[cfg(feature = "connector")]
pub use busbar_sf_connector_core as connector;
#[cfg(feature = "rest")]
pub use busbar_sf_rest as rest;

#[cfg(feature = "client")]
pub use busbar_sf_client::{ClientConfig, SalesforceClient, Transport};
#[cfg(feature = "connector")]
pub use busbar_sf_connector_core::{
    BeginOptions, Connector, ConnectorConfig, Mapping, OperationResult, RecordKey, RecordLocator,
    SchemaProvider, StaticSchema,
};
#[cfg(feature = "rest")]
pub use busbar_sf_rest::SalesforceRestClient;
