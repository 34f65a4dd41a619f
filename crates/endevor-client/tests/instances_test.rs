//! Contract tests for instance discovery.

use endevor_client::{ClientConfig, EndevorClient, ServiceLocation};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client() -> EndevorClient {
    EndevorClient::new(ClientConfig {
        timeout_secs: 5,
        accept_invalid_certs: false,
        max_retries: 0,
    })
    .unwrap()
}

fn test_location(base_url: &str) -> ServiceLocation {
    ServiceLocation::from_base_url(base_url).unwrap()
}

#[tokio::test]
async fn lists_instance_names() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/EndevorService/api/v2/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "WEBSMFNO", "description": "Endevor Web Services", "status": "Available" },
            { "name": "WEBSMFAM", "description": "Endevor Web Services", "status": "Available" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client();
    let location = test_location(&format!("{}/EndevorService/api/v2", mock_server.uri()));

    let instances = client.list_instances(&location).await;
    assert_eq!(instances, ["WEBSMFNO", "WEBSMFAM"]);
}

#[tokio::test]
async fn listing_needs_no_credential() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/EndevorService/api/v2/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "name": "STC" }])),
        )
        .mount(&mock_server)
        .await;

    let client = test_client();
    let location = test_location(&format!("{}/EndevorService/api/v2", mock_server.uri()));

    let instances = client.list_instances(&location).await;
    assert_eq!(instances, ["STC"]);

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn malformed_listing_degrades_to_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/EndevorService/api/v2/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "description": "a record with no name" }
        ])))
        .mount(&mock_server)
        .await;

    let client = test_client();
    let location = test_location(&format!("{}/EndevorService/api/v2", mock_server.uri()));

    assert!(client.list_instances(&location).await.is_empty());
}

#[tokio::test]
async fn failure_envelope_degrades_to_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/EndevorService/api/v2/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "returnCode": 20,
            "reasonCode": 34,
            "messages": ["server error"],
            "data": []
        })))
        .mount(&mock_server)
        .await;

    let client = test_client();
    let location = test_location(&format!("{}/EndevorService/api/v2", mock_server.uri()));

    assert!(client.list_instances(&location).await.is_empty());
}

#[tokio::test]
async fn connection_failure_degrades_to_empty() {
    let client = test_client();
    let location = test_location("http://127.0.0.1:1/EndevorService/api/v2");

    assert!(client.list_instances(&location).await.is_empty());
}
