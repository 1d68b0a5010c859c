use busbar_sf_connector::connector::{
    ManyResultsPolicy, NoResultPolicy, OperationType, Operator, OrderBy, QueryExpression,
};
use busbar_sf_connector::{BeginOptions, Mapping, RecordKey, RecordLocator};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::{connector, created, id_rows, init_tracing, mount_query, API};

#[tokio::test]
async fn test_parent_and_child_created_in_one_graph() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/composite/graph", API)))
        .and(body_partial_json(json!({"graphs": [{
            "graphId": "0",
            "compositeRequest": [
                {"referenceId": "fa0", "method": "POST", "body": {"Name": "Acme"}},
                {"referenceId": "fa1", "method": "POST",
                 "body": {"LastName": "Doe", "AccountId": "@{fa0.id}"}}
            ]
        }]})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Sforce-Limit-Info", "api-usage=90/100")
                .set_body_json(json!({"graphs": [{
                    "graphId": "0",
                    "isSuccessful": true,
                    "graphResponse": {"compositeResponse": [
                        created("fa0", "001A"),
                        created("fa1", "003A")
                    ]}
                }]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut connector = connector(&server);
    connector.begin(BeginOptions::default());

    let account = connector
        .load(
            RecordLocator::new("Account"),
            Mapping::new().with("Name", "Acme"),
            None,
        )
        .await
        .unwrap();
    assert_eq!(account.key, RecordKey::deferred("fa0", "Account"));
    let placeholder = account.recordset.first().unwrap();
    assert_eq!(placeholder.get("ConnectorResult:Id"), Some(&json!("@{fa0.id}")));
    assert_eq!(placeholder.get("ConnectorResult:Url"), Some(&json!("")));

    let contact = connector
        .load(
            RecordLocator::new("Contact"),
            Mapping::new()
                .with("LastName", "Doe")
                .with("AccountId", account.key.wire_value()),
            None,
        )
        .await
        .unwrap();
    assert_eq!(contact.key, RecordKey::deferred("fa1", "Contact"));
    assert_eq!(connector.pending().len(), 2);

    let results = connector.end().await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.successful));

    let account_url = format!("{}/001A", server.uri());
    assert_eq!(results[0].log, vec![format!("Created Account {}", account_url)]);
    let returned = results[0].returned_record.as_ref().unwrap();
    assert_eq!(returned.resolves, account.key);
    assert_eq!(returned.key, RecordKey::resolved("001A", "Account"));
    assert_eq!(returned.data["ConnectorResult:Url"], json!(account_url));

    assert_eq!(
        results[1].returned_record.as_ref().unwrap().resolves,
        contact.key
    );

    let usage = connector.rest().api_usage().unwrap();
    assert_eq!((usage.used, usage.limit), (90, 100));
    assert!(connector.pending().is_empty());
}

#[tokio::test]
async fn test_update_lookup_flushes_pending_creates_first() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/composite/graph", API)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"graphs": [{
            "graphId": "0",
            "isSuccessful": true,
            "graphResponse": {"compositeResponse": [created("fa0", "00Q1")]}
        }]})))
        .expect(1)
        .mount(&server)
        .await;
    mount_query(
        &server,
        "SELECT Id FROM Contact WHERE LastName = 'Doe'",
        id_rows("Contact", &["003A", "003B"]),
    )
    .await;
    Mock::given(method("PATCH"))
        .and(path(format!("{}/composite/sobjects", API)))
        .and(body_json(json!({
            "allOrNone": true,
            "records": [
                {"Title": "CEO", "attributes": {"type": "Contact"}, "id": "003A"},
                {"Title": "CEO", "attributes": {"type": "Contact"}, "id": "003B"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "003A", "success": true, "errors": []},
            {"id": "003B", "success": true, "errors": []}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut connector = connector(&server);
    connector.begin(BeginOptions::default());

    connector
        .load(
            RecordLocator::new("Lead"),
            Mapping::new().with("LastName", "Roe").with("Company", "Acme"),
            None,
        )
        .await
        .unwrap();
    assert_eq!(connector.pending().len(), 1);

    let locator = RecordLocator::new("Contact")
        .with_operation(OperationType::Update)
        .with_query(QueryExpression::leaf("LastName", Operator::Eq, "Doe"))
        .with_policies(NoResultPolicy::Skip, ManyResultsPolicy::SelectAll);
    let updated = connector
        .load(locator, Mapping::new().with("Title", "CEO"), None)
        .await
        .unwrap();

    assert!(connector.pending().is_empty());
    assert_eq!(connector.deferred_results().len(), 1);
    assert_eq!(updated.key, RecordKey::resolved("003A", "Contact"));
    assert_eq!(
        updated.log,
        vec![
            "Query found 2 Contact records",
            "Updated Contact 003A and 1 other record",
        ]
    );
    let record = updated.recordset.first().unwrap();
    assert_eq!(
        record.get("ConnectorResult:Url"),
        Some(&json!(format!("{}/003A", server.uri())))
    );

    let results = connector.end().await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].loaded_key,
        Some(RecordKey::resolved("00Q1", "Lead"))
    );
}

#[tokio::test]
async fn test_scoped_extract_reads_children_of_a_record() {
    init_tracing();
    let server = MockServer::start().await;

    mount_query(
        &server,
        "SELECT LastName, Email, Id FROM Contact WHERE (Email LIKE '%@acme.com') AND (AccountId = '001A') ORDER BY LastName DESC",
        json!({
            "totalSize": 2,
            "done": true,
            "records": [
                {"attributes": {"type": "Contact"}, "Id": "003B", "LastName": "Roe", "Email": "roe@acme.com"},
                {"attributes": {"type": "Contact"}, "Id": "003A", "LastName": "Doe", "Email": "doe@acme.com"}
            ]
        }),
    )
    .await;

    let mut connector = connector(&server);
    connector.begin(BeginOptions::with_api_version("60.0"));

    let locator = RecordLocator::new("Contact")
        .with_operation(OperationType::Select)
        .with_query(QueryExpression::leaf("Email", Operator::Like, "%@acme.com"))
        .with_order_by(OrderBy::desc("LastName"))
        .with_policies(NoResultPolicy::Skip, ManyResultsPolicy::SelectAll);
    let mapping = Mapping::new().with("LastName", "").with("Email", "");
    let account = RecordKey::resolved("001A", "Account");

    let contacts = connector
        .extract(locator, &mapping, Some(&account))
        .await
        .unwrap();

    assert_eq!(contacts.len(), 2);
    let first = contacts.first().unwrap();
    assert_eq!(first.key, RecordKey::resolved("003B", "Contact"));
    assert_eq!(first.get("Email"), Some(&json!("roe@acme.com")));
    assert_eq!(
        connector.log(),
        &["Query found 2 Contact records", "Selected Contact 003B"]
    );
}
