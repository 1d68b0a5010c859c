//! # sf-connector
//!
//! The record-operation core of the Salesforce connector: it turns a
//! pipeline's "locate, select, create, update" requests into REST calls.
//!
//! ## Features
//!
//! - **SOQL compilation** - filter trees, ordering and row limits rendered
//!   with identifier allow-listing and literal escaping
//! - **Record locators** - ids, id lists, upsert keys or a filter, with
//!   policies for zero and many matches
//! - **Batched writes** - creates queue into Composite Graph requests and
//!   return deferred keys that resolve when the batch is sent
//! - **Transactions** - [`Connector`] sequences begin, extract, load, flush
//!   and end
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_connector_core::{
//!     BeginOptions, Connector, Mapping, Operator, QueryExpression, RecordLocator, StaticSchema,
//! };
//! use busbar_sf_rest::SalesforceRestClient;
//!
//! let rest = SalesforceRestClient::new(instance_url, access_token)?;
//! let mut connector = Connector::new(rest, StaticSchema::new());
//! connector.begin(BeginOptions::default());
//!
//! let account = connector
//!     .load(RecordLocator::new("Account"), Mapping::new().with("Name", "Acme"), None)
//!     .await?;
//!
//! // `account.key` is deferred; a later fragment in the same graph can
//! // point at it with `account.key.wire_value()`.
//! let contact = connector
//!     .load(
//!         RecordLocator::new("Contact"),
//!         Mapping::new()
//!             .with("LastName", "Doe")
//!             .with("AccountId", account.key.wire_value()),
//!         None,
//!     )
//!     .await?;
//!
//! for result in connector.end().await? {
//!     println!("{:?}", result.log);
//! }
//! ```

pub mod action;
mod batch;
mod config;
mod connector;
mod error;
mod locator;
mod mapping;
pub mod query;
mod record;
mod resolve;
mod result;
mod schema;

pub use action::{Action, BatchAction, Create, LoadAction, Select, Update};
pub use batch::{Batch, Fragment, Graph, DEFAULT_GRAPH_ID};
pub use config::{
    BeginOptions, ConnectorConfig, ConnectorConfigBuilder, DEFAULT_RESULT_RECORD_TYPE,
    DEFAULT_UPDATE_CHUNK_SIZE,
};
pub use connector::Connector;
pub use error::{Error, ErrorKind, Result};
pub use locator::{
    ManyResultsPolicy, NoResultPolicy, OperationType, RecordLocator, UpdateTarget, UpsertKey,
};
pub use mapping::{Mapping, MappingItem};
pub use query::{compile, Literal, Operator, OrderBy, QueryExpression, SoqlQuery};
pub use record::{DeferredRecord, Record, RecordId, RecordKey, Recordset};
pub use resolve::resolve_update_target;
pub use result::{LoadResponse, OperationResult};
pub use schema::{PropertyInfo, SchemaProvider, StaticSchema};
