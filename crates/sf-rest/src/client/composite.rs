use tracing::instrument;

use busbar_sf_client::{Request, Transport};

use crate::composite::{CompositeGraphRequest, CompositeGraphResponse};
use crate::error::Result;

impl<T: Transport> super::SalesforceRestClient<T> {
    /// Execute a composite graph request.
    ///
    /// Each graph is committed or rolled back on its own; graphs do not
    /// affect each other.
    ///
    /// Available since API v50.0.
    #[instrument(skip(self, request), fields(graphs = request.graphs.len()))]
    pub async fn composite_graph(
        &self,
        request: &CompositeGraphRequest,
    ) -> Result<CompositeGraphResponse> {
        let request = Request::post(self.rest_path("composite/graph")).json(request)?;
        self.send_json(request).await
    }
}
