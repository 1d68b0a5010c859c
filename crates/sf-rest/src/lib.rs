//! # sf-rest
//!
//! The Salesforce REST endpoints the connector writes and reads through.
//!
//! ## Features
//!
//! - **SOQL Query** - first page plus cursor-based continuation
//! - **SObject writes** - create, update by id, update by external id
//! - **SObject Collections** - update up to 200 records per call
//! - **Composite Graph** - many independent atomic graphs in one call
//!
//! The client is generic over [`busbar_sf_client::Transport`], so it runs
//! against a real org or any test double.
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_rest::SalesforceRestClient;
//!
//! let client = SalesforceRestClient::new("https://myorg.my.salesforce.com", "token")?;
//! let page = client
//!     .query::<serde_json::Value>("SELECT Id, Name FROM Account LIMIT 10")
//!     .await?;
//! ```

mod client;
mod collections;
mod composite;
mod error;
mod query;
mod sobject;

pub use client::SalesforceRestClient;

pub use collections::{CollectionRequest, CollectionResult};

pub use composite::{
    CompositeGraphRequest, CompositeGraphResponse, CompositeSubrequest, CompositeSubresponse,
    GraphRequest, GraphResponse, GraphResponseBody,
};

pub use error::{Error, ErrorKind, Result};

pub use query::QueryResult;

pub use sobject::{CreateResult, SalesforceError, UpsertResult};
