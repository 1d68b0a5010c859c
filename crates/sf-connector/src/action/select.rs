use serde_json::{Map, Value};
use tracing::{debug, instrument};

use busbar_sf_client::Transport;
use busbar_sf_rest::{QueryResult, SalesforceRestClient};

use super::Action;
use crate::error::Result;
use crate::locator::RecordLocator;
use crate::mapping::Mapping;
use crate::query::compile;
use crate::record::{Record, RecordKey, Recordset};
use crate::result::OperationResult;

type Row = Map<String, Value>;

/// Read records matching a locator.
///
/// Follows query cursors until the server reports the result complete.
#[derive(Debug, Clone)]
pub struct Select {
    locator: RecordLocator,
    fields: Vec<String>,
    scope: Option<RecordKey>,
}

impl Select {
    /// Project the mapping's keys from records matched by `locator`,
    /// optionally restricted to children of `scope`.
    pub fn new(locator: RecordLocator, mapping: &Mapping, scope: Option<RecordKey>) -> Self {
        Self {
            locator,
            fields: mapping.keys().map(str::to_string).collect(),
            scope,
        }
    }
}

impl Action for Select {
    type Output = OperationResult;

    fn name(&self) -> &'static str {
        "Select"
    }

    #[instrument(skip_all, fields(sobject = %self.locator.record_type))]
    async fn execute<T: Transport>(&self, rest: &SalesforceRestClient<T>) -> Result<OperationResult> {
        let record_type = &self.locator.record_type;
        let soql = compile(
            self.fields.as_slice(),
            record_type,
            self.locator.query.as_ref(),
            self.locator.order_by.as_ref(),
            self.locator.on_many_results,
            self.scope.as_ref(),
        )?;
        debug!(%soql, "running select");

        let mut records = Recordset::new();
        let mut page: QueryResult<Row> = rest.query(&soql).await?;
        loop {
            let cursor = page.cursor().map(str::to_string);
            for row in page.records {
                records.insert(Record::from_row(row, record_type));
            }
            match cursor {
                Some(cursor) => page = rest.query_more(&cursor).await?,
                None => break,
            }
        }

        let count = records.len();
        let mut result = OperationResult::new();
        result.log(format!(
            "Query found {} {} record{}",
            count,
            record_type,
            if count > 1 { "s" } else { "" }
        ));
        if let Some(first) = records.first() {
            result.loaded_key = Some(first.key.clone());
        }

        Ok(result.with_extracted(records))
    }
}
