use tracing::instrument;

use busbar_sf_client::{Request, Transport};

use crate::collections::{CollectionRequest, CollectionResult};
use crate::error::Result;

impl<T: Transport> super::SalesforceRestClient<T> {
    /// Update up to 200 records in one request.
    ///
    /// Each record must carry `attributes.type` and `id`.
    #[instrument(skip(self, request, headers), fields(records = request.records.len()))]
    pub async fn update_collection(
        &self,
        request: &CollectionRequest,
        headers: &[(String, String)],
    ) -> Result<Vec<CollectionResult>> {
        let request = Request::patch(self.rest_path("composite/sobjects"))
            .headers(headers.iter().cloned())
            .json(request)?;
        self.send_json(request).await
    }
}
