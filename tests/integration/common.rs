use busbar_sf_connector::{Connector, SalesforceRestClient, StaticSchema};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API: &str = "/services/data/v60.0";

/// Send test logs through `RUST_LOG`. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn connector(server: &MockServer) -> Connector {
    let rest = SalesforceRestClient::new(server.uri(), "00Dxx0000001gEF!token")
        .expect("mock server uri should be a valid instance url");
    Connector::new(rest, StaticSchema::new())
}

/// A finished query page holding one `Id` column.
pub fn id_rows(record_type: &str, ids: &[&str]) -> Value {
    let records: Vec<Value> = ids
        .iter()
        .map(|id| json!({"attributes": {"type": record_type}, "Id": id}))
        .collect();
    json!({"totalSize": records.len(), "done": true, "records": records})
}

pub async fn mount_query(server: &MockServer, soql: &str, page: Value) {
    Mock::given(method("GET"))
        .and(path(format!("{}/query", API)))
        .and(query_param("q", soql))
        .respond_with(ResponseTemplate::new(200).set_body_json(page))
        .expect(1)
        .mount(server)
        .await;
}

/// One composite-graph sub-response.
pub fn created(reference_id: &str, id: &str) -> Value {
    json!({
        "referenceId": reference_id,
        "httpStatusCode": 201,
        "httpHeaders": {"Location": format!("{}/sobjects/x/{}", API, id)},
        "body": {"id": id, "success": true, "errors": []}
    })
}
