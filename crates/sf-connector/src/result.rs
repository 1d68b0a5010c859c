//! Per-operation outcomes.

use crate::record::{DeferredRecord, RecordKey, Recordset};

/// Outcome of one logical operation.
///
/// A batched write starts out with a deferred `loaded_key`; the flush that
/// sends it produces a second result carrying the resolved
/// `returned_record`.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResult {
    pub successful: bool,
    pub loaded_key: Option<RecordKey>,
    /// Rows read by a select.
    pub extracted: Option<Recordset>,
    pub returned_record: Option<DeferredRecord>,
    /// Messages for the host pipeline's operation log.
    pub log: Vec<String>,
}

impl Default for OperationResult {
    fn default() -> Self {
        Self {
            successful: true,
            loaded_key: None,
            extracted: None,
            returned_record: None,
            log: Vec::new(),
        }
    }
}

impl OperationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_loaded_key(mut self, key: RecordKey) -> Self {
        self.loaded_key = Some(key);
        self
    }

    pub fn with_extracted(mut self, records: Recordset) -> Self {
        self.extracted = Some(records);
        self
    }

    pub fn log(&mut self, message: impl Into<String>) {
        self.log.push(message.into());
    }

    pub fn fail(&mut self) {
        self.successful = false;
    }
}

/// What `load` hands back to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadResponse {
    /// Key of the written or selected record; deferred for batched creates.
    pub key: RecordKey,
    /// One result record with the key's id and url.
    pub recordset: Recordset,
    pub log: Vec<String>,
}
