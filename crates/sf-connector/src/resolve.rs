//! Turning an update locator's filter into concrete record ids.

use tracing::{debug, instrument};

use busbar_sf_client::Transport;
use busbar_sf_rest::SalesforceRestClient;

use crate::action::{Action, Select};
use crate::error::{Error, Result};
use crate::locator::{ManyResultsPolicy, NoResultPolicy, RecordLocator, UpdateTarget};
use crate::mapping::Mapping;
use crate::record::RecordKey;

const NO_RECORD: &str = "No record found.";
const MANY_RECORDS: &str = "Many records found.";

/// Pin down the records an update addresses.
///
/// Locators with ids or an upsert key come back unchanged. A filter is run
/// as an `Id`-only select and the lookup policies decide the outcome:
///
/// | rows | policy     | outcome                                  |
/// |------|------------|------------------------------------------|
/// | 0    | `Skip`     | [`Skipped`](crate::ErrorKind::Skipped)   |
/// | 0    | `Abort`    | [`Aborted`](crate::ErrorKind::Aborted)   |
/// | 0    | `Create`   | [`RecordNotFound`](crate::ErrorKind::RecordNotFound) |
/// | 1    | any        | id bound                                 |
/// | many | `SelectOne`| first id bound                           |
/// | many | `SelectAll`| every id bound                           |
/// | many | `Skip` / `Abort` / `Create` | as for 0 rows           |
///
/// The select's log lines are appended to `log` whatever the outcome.
#[instrument(skip_all, fields(sobject = %locator.record_type))]
pub async fn resolve_update_target<T: Transport>(
    rest: &SalesforceRestClient<T>,
    mut locator: RecordLocator,
    scope: Option<&RecordKey>,
    log: &mut Vec<String>,
) -> Result<RecordLocator> {
    let needs_lookup = match locator.update_target() {
        UpdateTarget::Ids(_) | UpdateTarget::Id(_) | UpdateTarget::UpsertKey(_) => false,
        UpdateTarget::Lookup(_) => true,
        UpdateTarget::None => {
            return Err(Error::invalid_operation("Missing data to update record"))
        }
    };
    if !needs_lookup {
        return Ok(locator);
    }

    let select = Select::new(locator.clone(), &Mapping::ids_only(), scope.cloned());
    let result = select.execute(rest).await?;
    log.extend(result.log);

    let ids = result
        .extracted
        .map(|records| records.resolved_ids())
        .unwrap_or_default();
    debug!(rows = ids.len(), "lookup finished");

    match ids.len() {
        0 => Err(match locator.on_no_result {
            NoResultPolicy::Skip => Error::skipped(NO_RECORD),
            NoResultPolicy::Abort => Error::aborted(NO_RECORD),
            NoResultPolicy::Create => Error::record_not_found(NO_RECORD),
        }),
        1 => {
            locator.record_id = ids.into_iter().next();
            Ok(locator)
        }
        _ => match locator.on_many_results {
            ManyResultsPolicy::SelectOne => {
                locator.record_id = ids.into_iter().next();
                Ok(locator)
            }
            ManyResultsPolicy::SelectAll => {
                locator.record_ids = ids;
                Ok(locator)
            }
            ManyResultsPolicy::Skip => Err(Error::skipped(MANY_RECORDS)),
            ManyResultsPolicy::Abort => Err(Error::aborted(MANY_RECORDS)),
            ManyResultsPolicy::Create => Err(Error::record_not_found(MANY_RECORDS)),
        },
    }
}
