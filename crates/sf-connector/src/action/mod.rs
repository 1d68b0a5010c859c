//! Operations the connector performs against the REST API.
//!
//! Every operation can run immediately; batchable ones can instead queue a
//! fragment into the transaction's [`Batch`] and hand back a deferred key.

use std::future::Future;

use busbar_sf_client::Transport;
use busbar_sf_rest::SalesforceRestClient;

use crate::batch::Batch;
use crate::error::{Error, Result};
use crate::result::OperationResult;

mod batch;
mod create;
mod headers;
mod select;
mod update;

pub use batch::BatchAction;
pub use create::Create;
pub use select::Select;
pub use update::Update;

/// A connector operation.
pub trait Action {
    /// What `execute` yields.
    type Output;

    /// Short name for logs and errors.
    fn name(&self) -> &'static str;

    /// Send the operation now.
    fn execute<T: Transport>(
        &self,
        rest: &SalesforceRestClient<T>,
    ) -> impl Future<Output = Result<Self::Output>> + Send;

    fn is_batchable(&self) -> bool {
        false
    }

    /// Queue the operation for the next flush.
    fn append_to_batch<T: Transport>(
        &self,
        _batch: &mut Batch,
        _rest: &SalesforceRestClient<T>,
    ) -> Result<OperationResult> {
        Err(Error::invalid_operation(format!(
            "{} cannot be batched",
            self.name()
        )))
    }
}

/// The actions `load` dispatches to.
#[derive(Debug, Clone)]
pub enum LoadAction {
    Select(Select),
    Create(Create),
    Update(Update),
}

impl Action for LoadAction {
    type Output = OperationResult;

    fn name(&self) -> &'static str {
        match self {
            LoadAction::Select(a) => a.name(),
            LoadAction::Create(a) => a.name(),
            LoadAction::Update(a) => a.name(),
        }
    }

    async fn execute<T: Transport>(&self, rest: &SalesforceRestClient<T>) -> Result<OperationResult> {
        match self {
            LoadAction::Select(a) => a.execute(rest).await,
            LoadAction::Create(a) => a.execute(rest).await,
            LoadAction::Update(a) => a.execute(rest).await,
        }
    }

    fn is_batchable(&self) -> bool {
        match self {
            LoadAction::Select(a) => a.is_batchable(),
            LoadAction::Create(a) => a.is_batchable(),
            LoadAction::Update(a) => a.is_batchable(),
        }
    }

    fn append_to_batch<T: Transport>(
        &self,
        batch: &mut Batch,
        rest: &SalesforceRestClient<T>,
    ) -> Result<OperationResult> {
        match self {
            LoadAction::Select(a) => a.append_to_batch(batch, rest),
            LoadAction::Create(a) => a.append_to_batch(batch, rest),
            LoadAction::Update(a) => a.append_to_batch(batch, rest),
        }
    }
}
