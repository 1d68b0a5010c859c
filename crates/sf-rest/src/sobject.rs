//! SObject write results.

use serde::{Deserialize, Serialize};

/// Result of a create operation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateResult {
    pub id: String,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<SalesforceError>,
}

/// Result of a PATCH to an external-id path.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpsertResult {
    pub id: String,
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub created: bool,
    #[serde(default)]
    pub errors: Vec<SalesforceError>,
}

fn default_success() -> bool {
    true
}

/// Salesforce error in operation results.
///
/// Collections report `statusCode`; composite sub-responses report
/// `errorCode`. Both land in `status_code`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SalesforceError {
    #[serde(rename = "statusCode", alias = "errorCode")]
    pub status_code: String,
    pub message: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl std::fmt::Display for SalesforceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.status_code)
    }
}
