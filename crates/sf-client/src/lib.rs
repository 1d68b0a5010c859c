//! # sf-client
//!
//! Transport layer for the Salesforce connector.
//!
//! This crate provides the pieces the connector core calls into but does not
//! own:
//! - A [`Transport`] trait: one authenticated request in, one response out
//! - [`SalesforceClient`], the reqwest-backed implementation
//! - Salesforce error-body mapping (non-2xx responses become errors)
//! - API usage parsing from the `Sforce-Limit-Info` header
//! - SOQL identifier validation and literal escaping ([`security::soql`])
//!
//! There are no retries and no token refresh: a failed request is reported
//! once and the caller decides what to do with it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Connector core                           │
//! │  (sf-connector: actions, batch executor, query compiler)    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                SalesforceRestClient<T>                      │
//! │  (sf-rest: typed REST endpoints over any Transport)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │           Transport  ◄──  SalesforceClient                  │
//! │  - Resolves paths against the instance URL                  │
//! │  - Adds the bearer token                                    │
//! │  - Maps Salesforce error bodies to errors                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_client::{Request, SalesforceClient, Transport};
//!
//! let client = SalesforceClient::new("https://myorg.my.salesforce.com", "token")?;
//! let response = client
//!     .execute(Request::get("/services/data/v60.0/limits"))
//!     .await?;
//! let limits: serde_json::Value = response.json()?;
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
mod salesforce_client;
pub mod security;
mod transport;

pub use client::SfHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use request::{Request, RequestMethod};
pub use response::{ApiUsage, Response};
pub use salesforce_client::SalesforceClient;
pub use transport::Transport;

/// Default Salesforce API version targeted by the connector.
pub const DEFAULT_API_VERSION: &str = "60.0";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("busbar-sf-connector/", env!("CARGO_PKG_VERSION"));
