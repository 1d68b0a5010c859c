use busbar_sf_connector::connector::{
    ManyResultsPolicy, NoResultPolicy, OperationType, Operator, QueryExpression,
};
use busbar_sf_connector::{BeginOptions, Mapping, RecordKey, RecordLocator};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::{connector, created, id_rows, init_tracing, mount_query, API};

fn doe_lookup(no_result: NoResultPolicy, many: ManyResultsPolicy) -> RecordLocator {
    RecordLocator::new("Contact")
        .with_operation(OperationType::Update)
        .with_query(QueryExpression::leaf("LastName", Operator::Eq, "Doe"))
        .with_policies(no_result, many)
}

#[tokio::test]
async fn test_missing_record_is_created_when_asked() {
    init_tracing();
    let server = MockServer::start().await;

    mount_query(
        &server,
        "SELECT Id FROM Contact WHERE LastName = 'Doe' LIMIT 1",
        id_rows("Contact", &[]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(format!("{}/composite/graph", API)))
        .and(body_partial_json(json!({"graphs": [{
            "compositeRequest": [{"referenceId": "fa0", "body": {"LastName": "Doe"}}]
        }]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"graphs": [{
            "graphId": "0",
            "isSuccessful": true,
            "graphResponse": {"compositeResponse": [created("fa0", "003N")]}
        }]})))
        .expect(1)
        .mount(&server)
        .await;

    let mut connector = connector(&server);
    connector.begin(BeginOptions::default());

    let response = connector
        .load(
            doe_lookup(NoResultPolicy::Create, ManyResultsPolicy::SelectOne),
            Mapping::new().with("LastName", "Doe"),
            None,
        )
        .await
        .unwrap();
    assert_eq!(response.key, RecordKey::deferred("fa0", "Contact"));
    assert_eq!(response.log, vec!["Query found 0 Contact record"]);

    let results = connector.end().await.unwrap();
    assert_eq!(
        results[0].loaded_key,
        Some(RecordKey::resolved("003N", "Contact"))
    );
}

#[tokio::test]
async fn test_lookup_policies_stop_the_update() {
    init_tracing();
    let server = MockServer::start().await;

    mount_query(
        &server,
        "SELECT Id FROM Contact WHERE LastName = 'Doe' LIMIT 1",
        id_rows("Contact", &[]),
    )
    .await;
    mount_query(
        &server,
        "SELECT Id FROM Contact WHERE LastName = 'Doe'",
        id_rows("Contact", &["003A", "003B"]),
    )
    .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let mut connector = connector(&server);
    connector.begin(BeginOptions::default());

    let skipped = connector
        .load(
            doe_lookup(NoResultPolicy::Skip, ManyResultsPolicy::SelectOne),
            Mapping::new().with("Title", "CEO"),
            None,
        )
        .await
        .unwrap_err();
    assert!(skipped.is_skipped());
    assert_eq!(connector.take_log(), vec!["Query found 0 Contact record"]);

    // Only SelectOne limits the lookup to one row.
    let aborted = connector
        .load(
            doe_lookup(NoResultPolicy::Skip, ManyResultsPolicy::Abort),
            Mapping::new().with("Title", "CEO"),
            None,
        )
        .await
        .unwrap_err();
    assert!(aborted.is_aborted());
    assert!(aborted.to_string().contains("Many records found."));
    assert_eq!(connector.log(), &["Query found 2 Contact records"]);
}

#[tokio::test]
async fn test_repeated_sections_commit_independently() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/composite/graph", API)))
        .and(body_partial_json(json!({"graphs": [
            {"graphId": "0", "compositeRequest": [{"referenceId": "fa0"}]},
            {"graphId": "1", "compositeRequest": [{"referenceId": "fa1"}]}
        ]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"graphs": [
            {
                "graphId": "0",
                "isSuccessful": true,
                "graphResponse": {"compositeResponse": [created("fa0", "00Q1")]}
            },
            {
                "graphId": "1",
                "isSuccessful": false,
                "graphResponse": {"compositeResponse": [{
                    "referenceId": "fa1",
                    "httpStatusCode": 400,
                    "httpHeaders": {},
                    "body": [{
                        "message": "Required fields are missing: [Company]",
                        "errorCode": "REQUIRED_FIELD_MISSING",
                        "fields": ["Company"]
                    }]
                }]}
            }
        ]})))
        .expect(1)
        .mount(&server)
        .await;

    let mut connector = connector(&server);
    connector.begin(BeginOptions::default());

    for (index, (last_name, company)) in [("Doe", "Acme"), ("Roe", "")].into_iter().enumerate() {
        let mut mapping = Mapping::new().with("LastName", last_name);
        if !company.is_empty() {
            mapping.push("Company", company);
        }
        connector
            .load(RecordLocator::new("Lead").with_index(index), mapping, None)
            .await
            .unwrap();
    }
    assert_eq!(connector.pending().graphs().len(), 2);

    let results = connector.end().await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].successful);
    assert!(!results[1].successful);
    assert_eq!(
        results[1].log,
        vec![
            "Create Lead failed",
            "Required fields are missing: [Company] (REQUIRED_FIELD_MISSING)",
        ]
    );
    let failed = results[1].returned_record.as_ref().unwrap();
    assert_eq!(failed.key, RecordKey::unassigned("Lead"));
    assert_eq!(failed.resolves, RecordKey::deferred("fa1", "Lead"));
}

#[tokio::test]
async fn test_unsafe_filter_is_an_invalid_operation() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut connector = connector(&server);
    connector.begin(BeginOptions::default());

    let locator = RecordLocator::new("Contact")
        .with_operation(OperationType::Select)
        .with_query(QueryExpression::leaf("Name; DROP", Operator::Eq, "x"));
    let err = connector
        .load(locator, Mapping::new(), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err.kind,
        busbar_sf_connector::connector::ErrorKind::InvalidOperation(_)
    ));
}
