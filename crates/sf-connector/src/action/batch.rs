use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use busbar_sf_client::{RequestMethod, Transport};
use busbar_sf_rest::{CompositeSubresponse, SalesforceError, SalesforceRestClient};

use super::Action;
use crate::batch::{Batch, Fragment};
use crate::config::DEFAULT_RESULT_RECORD_TYPE;
use crate::error::{Error, Result};
use crate::record::{DeferredRecord, RecordKey};
use crate::result::OperationResult;

/// Sends every queued write in one composite-graph call.
///
/// Each graph commits or rolls back on its own. Results come back in the
/// server's (graph, sub-response) order, one per sub-response, and are
/// matched to their fragment by reference id only.
#[derive(Debug)]
pub struct BatchAction {
    batch: Batch,
    result_record_type: String,
}

impl BatchAction {
    pub fn new(batch: Batch) -> Self {
        Self {
            batch,
            result_record_type: DEFAULT_RESULT_RECORD_TYPE.to_string(),
        }
    }

    /// Record type used for the `<Type>:Id` / `<Type>:Url` result fields.
    pub fn with_result_record_type(mut self, record_type: impl Into<String>) -> Self {
        self.result_record_type = record_type.into();
        self
    }

    fn demultiplex(&self, response: CompositeSubresponse, instance_url: &str) -> Result<OperationResult> {
        let fragment = self.batch.fragment(&response.reference_id).ok_or_else(|| {
            Error::aborted(format!(
                "Unexpected response from Salesforce API. Reference unknown: {}",
                response.reference_id
            ))
        })?;
        let resolves = RecordKey::deferred(&response.reference_id, &fragment.record_type);

        if response.is_accepted() {
            self.accepted(fragment, &response, resolves, instance_url)
        } else {
            Ok(self.rejected(fragment, &response, resolves))
        }
    }

    fn accepted(
        &self,
        fragment: &Fragment,
        response: &CompositeSubresponse,
        resolves: RecordKey,
        instance_url: &str,
    ) -> Result<OperationResult> {
        let id = response
            .body
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::aborted(format!(
                    "Unexpected response from Salesforce API. No id for {}",
                    response.reference_id
                ))
            })?;
        let url = format!("{}/{}", instance_url, id);
        let key = RecordKey::resolved(id, &fragment.record_type);

        let mut result = OperationResult::new().with_loaded_key(key.clone());
        result.returned_record = Some(DeferredRecord {
            key,
            data: self.result_fields(id, &url),
            resolves,
        });
        if fragment.method == RequestMethod::Post {
            result.log(format!("Created {} {}", fragment.record_type, url));
        } else {
            result.log(format!("{} successful.{}", fragment.description, url));
        }
        Ok(result)
    }

    fn rejected(
        &self,
        fragment: &Fragment,
        response: &CompositeSubresponse,
        resolves: RecordKey,
    ) -> OperationResult {
        warn!(
            reference_id = %response.reference_id,
            status = response.http_status_code,
            "sub-request rejected"
        );

        let mut result = OperationResult::new();
        result.fail();
        result.log(format!("{} failed", fragment.description));
        result.returned_record = Some(DeferredRecord {
            key: RecordKey::unassigned(&fragment.record_type),
            data: self.result_fields("", ""),
            resolves,
        });

        match &response.body {
            // Graph-wide failure rather than a per-record error list.
            Value::Object(body) => {
                if let Some(errors) = body.get("errors") {
                    result.log(errors.to_string());
                }
            }
            Value::Array(errors) => {
                for error in errors {
                    match serde_json::from_value::<SalesforceError>(error.clone()) {
                        Ok(error) => result.log(error.to_string()),
                        Err(_) => result.log(error.to_string()),
                    }
                }
            }
            _ => {}
        }

        result
    }

    fn result_fields(&self, id: &str, url: &str) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert(
            format!("{}:Id", self.result_record_type),
            Value::String(id.to_string()),
        );
        data.insert(
            format!("{}:Url", self.result_record_type),
            Value::String(url.to_string()),
        );
        data
    }
}

impl Action for BatchAction {
    type Output = Vec<OperationResult>;

    fn name(&self) -> &'static str {
        "Batch"
    }

    #[instrument(skip_all, fields(fragments = self.batch.len()))]
    async fn execute<T: Transport>(
        &self,
        rest: &SalesforceRestClient<T>,
    ) -> Result<Vec<OperationResult>> {
        if self.batch.is_empty() {
            return Ok(Vec::new());
        }

        let response = rest.composite_graph(&self.batch.to_request()).await?;
        let graphs = response
            .graphs
            .ok_or_else(|| Error::aborted("Unexpected response from Salesforce API"))?;

        let instance_url = rest.instance_url();
        let mut results = Vec::with_capacity(self.batch.len());
        for graph in graphs {
            debug!(graph_id = %graph.graph_id, successful = graph.is_successful, "graph response");
            for response in graph.graph_response.responses {
                results.push(self.demultiplex(response, instance_url)?);
            }
        }

        Ok(results)
    }
}
