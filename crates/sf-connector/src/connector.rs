//! Transaction orchestration.
//!
//! A [`Connector`] owns the pending [`Batch`] of one transaction. Creates
//! are queued; everything that needs the server's current state (selects,
//! lookups, updates) flushes the queue first, so it never reads around a
//! pending write.

use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use busbar_sf_client::{SalesforceClient, Transport, DEFAULT_API_VERSION};
use busbar_sf_rest::SalesforceRestClient;

use crate::action::{Action, BatchAction, Create, LoadAction, Select, Update};
use crate::batch::Batch;
use crate::config::{BeginOptions, ConnectorConfig};
use crate::error::{Error, ErrorKind, Result};
use crate::locator::{OperationType, RecordLocator};
use crate::mapping::Mapping;
use crate::record::{Record, RecordKey, Recordset};
use crate::resolve::resolve_update_target;
use crate::result::{LoadResponse, OperationResult};
use crate::schema::{SchemaProvider, StaticSchema};

/// API usage share above which `end` warns.
const API_USAGE_WARN_PERCENT: f64 = 80.0;

/// Runs extract and load operations for one transaction at a time.
///
/// # Example
///
/// ```rust,ignore
/// use busbar_sf_connector_core::{BeginOptions, Connector, Mapping, RecordLocator, StaticSchema};
/// use busbar_sf_rest::SalesforceRestClient;
///
/// let rest = SalesforceRestClient::new("https://myorg.my.salesforce.com", token)?;
/// let mut connector = Connector::new(rest, StaticSchema::new());
///
/// connector.begin(BeginOptions::default());
/// let lead = connector
///     .load(RecordLocator::new("Lead"), Mapping::new().with("LastName", "Doe"), None)
///     .await?;
/// let results = connector.end().await?;
/// ```
#[derive(Debug)]
pub struct Connector<T = SalesforceClient, S = StaticSchema> {
    rest: SalesforceRestClient<T>,
    schema: S,
    config: ConnectorConfig,
    batch: Batch,
    deferred_results: Vec<OperationResult>,
    log: Vec<String>,
}

impl<T: Transport, S: SchemaProvider> Connector<T, S> {
    pub fn new(rest: SalesforceRestClient<T>, schema: S) -> Self {
        Self::with_config(rest, schema, ConnectorConfig::default())
    }

    pub fn with_config(rest: SalesforceRestClient<T>, schema: S, config: ConnectorConfig) -> Self {
        Self {
            rest,
            schema,
            config,
            batch: Batch::new(),
            deferred_results: Vec::new(),
            log: Vec::new(),
        }
    }

    pub fn rest(&self) -> &SalesforceRestClient<T> {
        &self.rest
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Writes queued for the next flush.
    pub fn pending(&self) -> &Batch {
        &self.batch
    }

    /// Results of every flush since `begin`.
    pub fn deferred_results(&self) -> &[OperationResult] {
        &self.deferred_results
    }

    /// Operation log of the current transaction.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn take_log(&mut self) -> Vec<String> {
        std::mem::take(&mut self.log)
    }

    /// Start a transaction: reset all per-transaction state and pick the
    /// API version.
    pub fn begin(&mut self, options: BeginOptions) {
        let api_version = options
            .api_version
            .or_else(|| self.config.api_version.clone())
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        info!(%api_version, "transaction started");
        self.rest.set_api_version(api_version);
        self.batch = Batch::new();
        self.deferred_results.clear();
        self.log.clear();
    }

    /// Send the queued writes and return their results.
    ///
    /// The results are also kept for [`end`](Self::end).
    #[instrument(skip_all, fields(fragments = self.batch.len()))]
    pub async fn flush(&mut self) -> Result<&[OperationResult]> {
        let start = self.deferred_results.len();
        if self.batch.is_empty() {
            return Ok(&self.deferred_results[start..]);
        }

        let action = BatchAction::new(self.batch.take())
            .with_result_record_type(self.config.result_record_type.clone());
        let results = action.execute(&self.rest).await?;

        let failed = results.iter().filter(|r| !r.successful).count();
        info!(results = results.len(), failed, "batch flushed");

        self.deferred_results.extend(results);
        Ok(&self.deferred_results[start..])
    }

    /// Finish the transaction: flush, report API usage, and hand back every
    /// deferred result.
    #[instrument(skip_all)]
    pub async fn end(&mut self) -> Result<Vec<OperationResult>> {
        self.flush().await?;

        if let Some(usage) = self.rest.api_usage() {
            info!(used = usage.used, limit = usage.limit, "API usage");
            if usage.is_above_threshold(API_USAGE_WARN_PERCENT) {
                warn!(
                    used = usage.used,
                    limit = usage.limit,
                    "API usage above {}%",
                    API_USAGE_WARN_PERCENT
                );
            }
        }

        info!(results = self.deferred_results.len(), "transaction ended");
        Ok(std::mem::take(&mut self.deferred_results))
    }

    /// Read records. Pending writes are flushed first.
    #[instrument(skip_all, fields(sobject = %locator.record_type))]
    pub async fn extract(
        &mut self,
        mut locator: RecordLocator,
        mapping: &Mapping,
        scope: Option<&RecordKey>,
    ) -> Result<Recordset> {
        locator.infer_upsert_key(&self.schema);
        let record_type = locator.record_type.clone();
        let select = Select::new(locator, mapping, scope.cloned());

        self.flush().await?;
        let result = select.execute(&self.rest).await?;
        self.log.extend(result.log);

        let id = result
            .loaded_key
            .map(|key| key.wire_value())
            .unwrap_or_default();
        self.log.push(format!("Selected {} {}", record_type, id));

        Ok(result.extracted.unwrap_or_default())
    }

    /// Write or select one record.
    ///
    /// Creates are queued and answered with a deferred key. Updates resolve
    /// their locator, fall back to a create when the lookup asks for one,
    /// and run immediately. Selects project `Id` only.
    #[instrument(skip_all, fields(sobject = %locator.record_type, operation = ?locator.operation))]
    pub async fn load(
        &mut self,
        mut locator: RecordLocator,
        mapping: Mapping,
        scope: Option<&RecordKey>,
    ) -> Result<LoadResponse> {
        locator.infer_upsert_key(&self.schema);
        let mapping = mapping.normalize(&self.schema);
        let record_type = locator.record_type.clone();
        let mut log = Vec::new();

        let operation = locator.operation;
        let action = match operation {
            OperationType::Create => LoadAction::Create(Create::new(locator, &mapping)),
            OperationType::Select => {
                LoadAction::Select(Select::new(locator, &Mapping::ids_only(), scope.cloned()))
            }
            OperationType::Update => {
                self.flush().await?;
                let fallback = locator.clone();
                match resolve_update_target(&self.rest, locator, scope, &mut log).await {
                    Ok(resolved) => LoadAction::Update(
                        Update::new(resolved, &mapping)
                            .with_chunk_size(self.config.update_chunk_size),
                    ),
                    Err(e) if e.is_record_not_found() => {
                        info!("no record to update, creating instead");
                        LoadAction::Create(Create::new(fallback, &mapping))
                    }
                    Err(e) => {
                        self.log.extend(log);
                        return Err(e);
                    }
                }
            }
        };

        let result = if action.is_batchable() {
            action.append_to_batch(&mut self.batch, &self.rest)?
        } else {
            self.flush().await?;
            action
                .execute(&self.rest)
                .await
                .map_err(invalid_query_as_invalid_operation)?
        };
        log.extend(result.log.iter().cloned());
        self.log.extend(log.iter().cloned());

        let key = result
            .loaded_key
            .unwrap_or_else(|| RecordKey::unassigned(record_type));
        let recordset = std::iter::once(self.result_record(&key)).collect();

        Ok(LoadResponse {
            key,
            recordset,
            log,
        })
    }

    /// `<ResultType>:Id` and `<ResultType>:Url` for a loaded key.
    fn result_record(&self, key: &RecordKey) -> Record {
        let url = key
            .resolved_id()
            .map(|id| format!("{}/{}", self.rest.instance_url(), id))
            .unwrap_or_default();

        let mut data = Map::new();
        data.insert(
            format!("{}:Id", self.config.result_record_type),
            Value::String(key.wire_value()),
        );
        data.insert(
            format!("{}:Url", self.config.result_record_type),
            Value::String(url),
        );
        Record::new(key.clone(), data)
    }
}

/// A rejected filter on an immediate load means the operation itself is
/// malformed.
fn invalid_query_as_invalid_operation(err: Error) -> Error {
    match err.kind {
        ErrorKind::InvalidQuery(message) => Error::invalid_operation(message),
        kind => Error {
            kind,
            source: err.source,
        },
    }
}
