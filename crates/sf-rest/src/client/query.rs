use serde::de::DeserializeOwned;
use tracing::instrument;

use busbar_sf_client::security::url as url_security;
use busbar_sf_client::{Request, Transport};

use crate::error::Result;
use crate::query::QueryResult;

impl<T: Transport> super::SalesforceRestClient<T> {
    /// Execute a SOQL query and return the first page.
    ///
    /// # Security
    ///
    /// Values interpolated into `soql` must already be escaped with
    /// `busbar_sf_client::security::soql::escape_string`.
    #[instrument(skip(self))]
    pub async fn query<R: DeserializeOwned>(&self, soql: &str) -> Result<QueryResult<R>> {
        let request = Request::get(self.rest_path("query")).query("q", soql);
        self.send_json(request).await
    }

    /// Fetch a continuation page by its cursor.
    #[instrument(skip(self))]
    pub async fn query_more<R: DeserializeOwned>(&self, cursor: &str) -> Result<QueryResult<R>> {
        let path = self.rest_path(&format!("query/{}", url_security::encode_param(cursor)));
        self.send_json(Request::get(path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::SalesforceRestClient;
    use crate::query::QueryResult;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_query_and_query_more_wiremock() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/data/v60.0/query"))
            .and(query_param("q", "SELECT Id FROM Account"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "totalSize": 2,
                "done": false,
                "nextRecordsUrl": "/services/data/v60.0/query/01gXX-1",
                "records": [{"attributes": {"type": "Account"}, "Id": "001A"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/services/data/v60.0/query/01gXX-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "totalSize": 2,
                "done": true,
                "records": [{"attributes": {"type": "Account"}, "Id": "001B"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SalesforceRestClient::new(mock_server.uri(), "test-token").unwrap();
        let first: QueryResult<serde_json::Value> =
            client.query("SELECT Id FROM Account").await.unwrap();
        let cursor = first.cursor().unwrap().to_string();
        let second: QueryResult<serde_json::Value> = client.query_more(&cursor).await.unwrap();

        assert_eq!(first.records[0]["Id"], "001A");
        assert_eq!(second.records[0]["Id"], "001B");
        assert!(second.cursor().is_none());
    }

    #[tokio::test]
    async fn test_query_error_is_propagated() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/data/v60.0/query"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!([
                {"message": "unexpected token", "errorCode": "MALFORMED_QUERY"}
            ])))
            .mount(&mock_server)
            .await;

        let client = SalesforceRestClient::new(mock_server.uri(), "test-token").unwrap();
        let err = client
            .query::<serde_json::Value>("SELECT FROM")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("MALFORMED_QUERY"));
    }
}
