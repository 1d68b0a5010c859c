//! SObject Collections update: one field set applied to many ids.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::sobject::SalesforceError;

/// PATCH body for `composite/sobjects`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRequest {
    pub all_or_none: bool,
    pub records: Vec<Value>,
}

impl CollectionRequest {
    /// Write `fields` to every record in `ids`, rolling the whole request
    /// back if any row fails.
    pub fn update(sobject: &str, ids: &[String], fields: &Map<String, Value>) -> Self {
        let records = ids
            .iter()
            .map(|id| {
                let mut record = fields.clone();
                record.insert("attributes".to_string(), json!({"type": sobject}));
                record.insert("id".to_string(), Value::String(id.clone()));
                Value::Object(record)
            })
            .collect();

        Self {
            all_or_none: true,
            records,
        }
    }
}

/// Outcome of one row, in request order.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionResult {
    #[serde(default)]
    pub id: Option<String>,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<SalesforceError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_shape() {
        let mut fields = Map::new();
        fields.insert("Rating".to_string(), json!("Hot"));
        let ids = vec!["001A".to_string(), "001B".to_string()];

        let request = CollectionRequest::update("Account", &ids, &fields);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "allOrNone": true,
                "records": [
                    {"Rating": "Hot", "attributes": {"type": "Account"}, "id": "001A"},
                    {"Rating": "Hot", "attributes": {"type": "Account"}, "id": "001B"}
                ]
            })
        );
    }

    #[test]
    fn test_rolled_back_row() {
        let result: CollectionResult = serde_json::from_value(json!({
            "id": "001A",
            "success": false,
            "errors": [{"statusCode": "ALL_OR_NONE_OPERATION_ROLLED_BACK", "message": "Record rolled back", "fields": []}]
        }))
        .unwrap();

        assert!(!result.success);
        assert_eq!(result.id.as_deref(), Some("001A"));
        assert_eq!(result.errors[0].to_string(), "Record rolled back (ALL_OR_NONE_OPERATION_ROLLED_BACK)");
    }
}
