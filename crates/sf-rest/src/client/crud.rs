use tracing::instrument;

use busbar_sf_client::security::{soql, url as url_security};
use busbar_sf_client::{Request, Transport};

use crate::error::{Error, Result};
use crate::sobject::{CreateResult, UpsertResult};

impl<T: Transport> super::SalesforceRestClient<T> {
    /// Create a single record.
    #[instrument(skip(self, body, headers))]
    pub async fn create(
        &self,
        sobject: &str,
        body: &serde_json::Value,
        headers: &[(String, String)],
    ) -> Result<CreateResult> {
        if !soql::is_safe_sobject_name(sobject) {
            return Err(Error::invalid("INVALID_SOBJECT", "Invalid SObject name"));
        }
        let request = Request::post(self.sobject_path(sobject))
            .headers(headers.iter().cloned())
            .json_value(body.clone());
        self.send_json(request).await
    }

    /// Update a single record by id.
    #[instrument(skip(self, body, headers))]
    pub async fn update(
        &self,
        sobject: &str,
        id: &str,
        body: &serde_json::Value,
        headers: &[(String, String)],
    ) -> Result<()> {
        if !soql::is_safe_sobject_name(sobject) {
            return Err(Error::invalid("INVALID_SOBJECT", "Invalid SObject name"));
        }
        let path = format!(
            "{}/{}",
            self.sobject_path(sobject),
            url_security::encode_param(id)
        );
        let request = Request::patch(path)
            .headers(headers.iter().cloned())
            .json_value(body.clone());
        self.transport.execute(request).await?;
        Ok(())
    }

    /// Update a record addressed by an external-id / unique field.
    ///
    /// Returns `None` when the server answers 204 without a body.
    #[instrument(skip(self, body, headers))]
    pub async fn update_by_external_id(
        &self,
        sobject: &str,
        field: &str,
        value: &str,
        body: &serde_json::Value,
        headers: &[(String, String)],
    ) -> Result<Option<UpsertResult>> {
        if !soql::is_safe_sobject_name(sobject) {
            return Err(Error::invalid("INVALID_SOBJECT", "Invalid SObject name"));
        }
        if !soql::is_safe_identifier(field) {
            return Err(Error::invalid("INVALID_FIELD", "Invalid external id field name"));
        }
        let path = format!(
            "{}/{}/{}",
            self.sobject_path(sobject),
            field,
            url_security::encode_param(value)
        );
        let request = Request::patch(path)
            .headers(headers.iter().cloned())
            .json_value(body.clone());
        self.send_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::SalesforceRestClient;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn write_headers() -> Vec<(String, String)> {
        vec![("Sforce-Mru".to_string(), "updateMru=false".to_string())]
    }

    #[tokio::test]
    async fn test_create_invalid_sobject() {
        let client = SalesforceRestClient::new("https://test.salesforce.com", "token").unwrap();
        let result = client
            .create("Bad'; DROP--", &serde_json::json!({}), &[])
            .await;
        assert!(result.unwrap_err().to_string().contains("INVALID_SOBJECT"));
    }

    #[tokio::test]
    async fn test_create_wiremock() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/data/v60.0/sobjects/Account"))
            .and(header("Sforce-Mru", "updateMru=false"))
            .and(body_json(serde_json::json!({"Name": "Acme"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "001xx000003DgAAAS", "success": true, "errors": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SalesforceRestClient::new(mock_server.uri(), "test-token").unwrap();
        let result = client
            .create("Account", &serde_json::json!({"Name": "Acme"}), &write_headers())
            .await
            .unwrap();
        assert_eq!(result.id, "001xx000003DgAAAS");
    }

    #[tokio::test]
    async fn test_update_wiremock() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/services/data/v60.0/sobjects/Account/001A"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SalesforceRestClient::new(mock_server.uri(), "test-token").unwrap();
        client
            .update("Account", "001A", &serde_json::json!({"Name": "X"}), &[])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_by_external_id_wiremock() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/services/data/v60.0/sobjects/Contact/Email/a%40b.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "003X", "success": true, "created": false, "errors": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SalesforceRestClient::new(mock_server.uri(), "test-token").unwrap();
        let result = client
            .update_by_external_id(
                "Contact",
                "Email",
                "a@b.com",
                &serde_json::json!({"LastName": "B"}),
                &[],
            )
            .await
            .unwrap();
        assert_eq!(result.unwrap().id, "003X");
    }

    #[tokio::test]
    async fn test_update_by_external_id_no_content() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/services/data/v60.0/sobjects/Contact/Email/x"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let client = SalesforceRestClient::new(mock_server.uri(), "test-token").unwrap();
        let result = client
            .update_by_external_id("Contact", "Email", "x", &serde_json::json!({}), &[])
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
