use serde_json::{Map, Value};
use tracing::{debug, instrument};

use busbar_sf_client::{RequestMethod, Transport};
use busbar_sf_rest::SalesforceRestClient;

use super::headers::write_headers;
use super::Action;
use crate::batch::{Batch, DEFAULT_GRAPH_ID};
use crate::error::Result;
use crate::locator::RecordLocator;
use crate::mapping::Mapping;
use crate::record::RecordKey;
use crate::result::OperationResult;

/// Insert one record.
#[derive(Debug, Clone)]
pub struct Create {
    locator: RecordLocator,
    body: Map<String, Value>,
}

impl Create {
    pub fn new(locator: RecordLocator, mapping: &Mapping) -> Self {
        Self {
            body: mapping.to_body(false),
            locator,
        }
    }

    /// Repeated sections write each iteration into its own graph, so one
    /// failing iteration does not roll back the others.
    fn graph_id(&self) -> String {
        self.locator
            .index
            .map(|index| index.to_string())
            .unwrap_or_else(|| DEFAULT_GRAPH_ID.to_string())
    }
}

impl Action for Create {
    type Output = OperationResult;

    fn name(&self) -> &'static str {
        "Create"
    }

    #[instrument(skip_all, fields(sobject = %self.locator.record_type))]
    async fn execute<T: Transport>(&self, rest: &SalesforceRestClient<T>) -> Result<OperationResult> {
        let record_type = &self.locator.record_type;
        let created = rest
            .create(
                record_type,
                &Value::Object(self.body.clone()),
                &write_headers(&self.locator),
            )
            .await?;
        debug!(id = %created.id, "record created");

        Ok(OperationResult::new().with_loaded_key(RecordKey::resolved(created.id, record_type)))
    }

    fn is_batchable(&self) -> bool {
        true
    }

    fn append_to_batch<T: Transport>(
        &self,
        batch: &mut Batch,
        rest: &SalesforceRestClient<T>,
    ) -> Result<OperationResult> {
        let record_type = &self.locator.record_type;
        let reference_id = batch.push(
            &self.graph_id(),
            RequestMethod::Post,
            rest.sobject_path(record_type),
            Value::Object(self.body.clone()),
            record_type,
            format!("Create {}", record_type),
        );
        debug!(%reference_id, "create queued");

        Ok(OperationResult::new().with_loaded_key(RecordKey::deferred(reference_id, record_type)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn rest() -> SalesforceRestClient {
        SalesforceRestClient::new("https://na1.salesforce.com", "token").unwrap()
    }

    #[test]
    fn test_two_creates_get_distinct_references() {
        let rest = rest();
        let mut batch = Batch::new();
        let mapping = Mapping::new().with("LastName", "Doe").with("Company", "Acme");

        let first = Create::new(RecordLocator::new("Lead"), &mapping)
            .append_to_batch(&mut batch, &rest)
            .unwrap();
        let second = Create::new(RecordLocator::new("Lead"), &mapping)
            .append_to_batch(&mut batch, &rest)
            .unwrap();

        assert_eq!(first.loaded_key, Some(RecordKey::deferred("fa0", "Lead")));
        assert_eq!(second.loaded_key, Some(RecordKey::deferred("fa1", "Lead")));

        let graph = &batch.graphs()[0];
        assert_eq!(graph.id, "0");
        assert_eq!(graph.fragments.len(), 2);
        assert_eq!(graph.fragments[0].url, "/services/data/v60.0/sobjects/Lead");
        assert_eq!(graph.fragments[0].description, "Create Lead");
        assert_eq!(graph.fragments[0].method, RequestMethod::Post);
        assert_eq!(graph.fragments[0].body, json!({"LastName": "Doe", "Company": "Acme"}));
    }

    #[test]
    fn test_indexed_locator_uses_own_graph() {
        let rest = rest();
        let mut batch = Batch::new();

        Create::new(RecordLocator::new("Contact").with_index(4), &Mapping::new())
            .append_to_batch(&mut batch, &rest)
            .unwrap();

        assert_eq!(batch.graphs()[0].id, "4");
    }

    #[tokio::test]
    async fn test_execute_now() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/data/v60.0/sobjects/Lead"))
            .and(header("Sforce-Duplicate-Rule-Header", "allowSave=true"))
            .and(header("Sforce-Mru", "updateMru=false"))
            .and(body_json(json!({"LastName": "Doe"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "00Q5", "success": true, "errors": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let rest = SalesforceRestClient::new(mock_server.uri(), "token").unwrap();
        let create = Create::new(RecordLocator::new("Lead"), &Mapping::new().with("LastName", "Doe"));

        let result = create.execute(&rest).await.unwrap();
        assert!(result.successful);
        assert_eq!(result.loaded_key, Some(RecordKey::resolved("00Q5", "Lead")));
        assert!(result.log.is_empty());
    }
}
