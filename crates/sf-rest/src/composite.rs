//! Composite Graph API types.
//!
//! A graph is a group of subrequests the server commits or rolls back as a
//! whole. Subrequests inside one graph may reference earlier ones with
//! `@{referenceId.id}`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A subrequest within a graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeSubrequest {
    pub method: String,
    pub url: String,
    pub reference_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

/// Request body for `composite/graph`.
#[derive(Debug, Clone, Serialize)]
pub struct CompositeGraphRequest {
    pub graphs: Vec<GraphRequest>,
}

/// A single graph within a composite graph request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphRequest {
    pub graph_id: String,
    pub composite_request: Vec<CompositeSubrequest>,
}

/// Response from a composite graph request.
///
/// `graphs` is optional so a malformed answer can be told apart from an
/// empty one.
#[derive(Debug, Clone, Deserialize)]
pub struct CompositeGraphResponse {
    #[serde(default)]
    pub graphs: Option<Vec<GraphResponse>>,
}

/// Response from a single graph.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphResponse {
    #[serde(default)]
    pub graph_id: String,
    pub graph_response: GraphResponseBody,
    #[serde(default)]
    pub is_successful: bool,
}

/// Body of a graph response containing the composite responses.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphResponseBody {
    #[serde(rename = "compositeResponse", default)]
    pub responses: Vec<CompositeSubresponse>,
}

/// Outcome of one subrequest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeSubresponse {
    #[serde(default)]
    pub body: serde_json::Value,
    #[serde(default)]
    pub http_headers: HashMap<String, String>,
    pub http_status_code: u16,
    pub reference_id: String,
}

impl CompositeSubresponse {
    /// 200 or 201.
    pub fn is_accepted(&self) -> bool {
        matches!(self.http_status_code, 200 | 201)
    }
}
