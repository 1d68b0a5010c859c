//! SOQL query response types.

use serde::{Deserialize, Serialize};

/// One page of a SOQL query response.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<T> {
    #[serde(default)]
    pub total_size: u64,
    #[serde(default = "default_done")]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_records_url: Option<String>,
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
}

fn default_done() -> bool {
    true
}

impl<T> QueryResult<T> {
    /// Continuation cursor for the next page, if the server has more rows.
    ///
    /// The cursor is the last path segment of `nextRecordsUrl`
    /// (`/services/data/v60.0/query/01gD0000002HU6KIAW-2000`).
    pub fn cursor(&self) -> Option<&str> {
        if self.done {
            return None;
        }
        self.next_records_url
            .as_deref()
            .and_then(|url| url.trim_end_matches('/').rsplit('/').next())
            .filter(|cursor| !cursor.is_empty())
    }
}
