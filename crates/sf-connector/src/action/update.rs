use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use busbar_sf_client::Transport;
use busbar_sf_rest::{CollectionRequest, SalesforceRestClient};

use super::headers::write_headers;
use super::Action;
use crate::config::DEFAULT_UPDATE_CHUNK_SIZE;
use crate::error::{Error, Result};
use crate::locator::{RecordLocator, UpdateTarget, UpsertKey};
use crate::mapping::Mapping;
use crate::record::RecordKey;
use crate::result::OperationResult;

/// Update records the locator already pins down.
///
/// Run locator resolution first; a locator that still needs a lookup is
/// rejected.
#[derive(Debug, Clone)]
pub struct Update {
    locator: RecordLocator,
    body: Map<String, Value>,
    chunk_size: usize,
}

impl Update {
    pub fn new(locator: RecordLocator, mapping: &Mapping) -> Self {
        Self {
            body: mapping.to_body(locator.no_blank_fields_on_update),
            locator,
            chunk_size: DEFAULT_UPDATE_CHUNK_SIZE,
        }
    }

    /// Rows per SObject Collections call.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.clamp(1, DEFAULT_UPDATE_CHUNK_SIZE);
        self
    }

    async fn update_many<T: Transport>(
        &self,
        rest: &SalesforceRestClient<T>,
        ids: &[String],
        headers: &[(String, String)],
    ) -> Result<OperationResult> {
        let record_type = &self.locator.record_type;
        let first = ids
            .first()
            .ok_or_else(|| Error::invalid_operation("Missing data to update record"))?;
        let mut result = OperationResult::new();

        for chunk in ids.chunks(self.chunk_size) {
            let request = CollectionRequest::update(record_type, chunk, &self.body);
            debug!(rows = chunk.len(), "updating chunk");

            let outcomes = rest.update_collection(&request, headers).await?;
            for outcome in outcomes.iter().filter(|o| !o.success) {
                result.fail();
                for error in &outcome.errors {
                    warn!(id = ?outcome.id, %error, "record update rejected");
                    result.log(error.to_string());
                }
            }
        }

        let others = ids.len() - 1;
        let mut message = format!("Updated {} {}", record_type, first);
        if others > 0 {
            message.push_str(&format!(
                " and {} other record{}",
                others,
                if others > 1 { "s" } else { "" }
            ));
        }
        result.log(message);

        Ok(result.with_loaded_key(RecordKey::resolved(first, record_type)))
    }

    async fn update_one<T: Transport>(
        &self,
        rest: &SalesforceRestClient<T>,
        id: &str,
        headers: &[(String, String)],
    ) -> Result<OperationResult> {
        let record_type = &self.locator.record_type;
        rest.update(record_type, id, &Value::Object(self.body.clone()), headers)
            .await?;

        let mut result = OperationResult::new();
        result.log(format!("Updated {} {}", record_type, id));
        Ok(result.with_loaded_key(RecordKey::resolved(id, record_type)))
    }

    async fn update_by_key<T: Transport>(
        &self,
        rest: &SalesforceRestClient<T>,
        key: &UpsertKey,
        headers: &[(String, String)],
    ) -> Result<OperationResult> {
        let record_type = &self.locator.record_type;
        let upserted = rest
            .update_by_external_id(
                record_type,
                &key.name,
                &key.value,
                &Value::Object(self.body.clone()),
                headers,
            )
            .await?;

        // A 204 carries no body; the key value is all we have.
        let id = upserted
            .map(|u| u.id)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| key.value.clone());

        let mut result = OperationResult::new();
        result.log(format!("Updated {} {}", record_type, id));
        Ok(result.with_loaded_key(RecordKey::resolved(id, record_type)))
    }

}

impl Action for Update {
    type Output = OperationResult;

    fn name(&self) -> &'static str {
        "Update"
    }

    #[instrument(skip_all, fields(sobject = %self.locator.record_type))]
    async fn execute<T: Transport>(&self, rest: &SalesforceRestClient<T>) -> Result<OperationResult> {
        let headers = write_headers(&self.locator);
        match self.locator.update_target() {
            UpdateTarget::Ids(ids) => self.update_many(rest, ids, &headers).await,
            UpdateTarget::Id(id) => self.update_one(rest, id, &headers).await,
            UpdateTarget::UpsertKey(key) => self.update_by_key(rest, key, &headers).await,
            UpdateTarget::Lookup(_) | UpdateTarget::None => Err(Error::invalid_operation(
                "Missing data to update record",
            )),
        }
    }
}
