//! Tests for the HTTP fetch module

use super::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Leanne Graham"},
            {"id": 2, "name": "Ervin Howell"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let result = client
        .fetch(&format!("{}/users", mock_server.uri()))
        .await
        .unwrap();

    assert!(result.ok);
    assert_eq!(result.status, 200);
    assert_eq!(result.body.as_array().unwrap().len(), 2);
    assert_eq!(result.body[1]["name"], "Ervin Howell");
}

#[tokio::test]
async fn test_fetch_sends_plain_get() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    client
        .fetch(&format!("{}/users", mock_server.uri()))
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("user-agent").is_none());
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_fetch_empty_body_is_null() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let result = client
        .fetch(&format!("{}/empty", mock_server.uri()))
        .await
        .unwrap();

    assert!(result.ok);
    assert_eq!(result.status, 204);
    assert!(result.body.is_null());
    assert!(result.usable_body().is_none());
}

#[tokio::test]
async fn test_fetch_bad_status_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>Not Found</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let result = client
        .fetch(&format!("{}/missing", mock_server.uri()))
        .await
        .unwrap();

    assert!(!result.ok);
    assert_eq!(result.status, 404);
    assert!(result.body.is_null());
    assert!(result.usable_body().is_none());
}

#[tokio::test]
async fn test_fetch_bad_status_keeps_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"error": "maintenance"})))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let result = client
        .fetch(&format!("{}/down", mock_server.uri()))
        .await
        .unwrap();

    assert!(!result.ok);
    assert_eq!(result.body["error"], "maintenance");
    // Not ok, so nothing downstream sees the body
    assert!(result.usable_body().is_none());
}

#[tokio::test]
async fn test_fetch_no_retry_on_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let result = client
        .fetch(&format!("{}/flaky", mock_server.uri()))
        .await
        .unwrap();

    assert!(!result.ok);
    assert_eq!(result.status, 500);
}

#[tokio::test]
async fn test_fetch_invalid_json_on_success_is_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let err = client
        .fetch(&format!("{}/garbled", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, crate::Error::JsonParse(_)));
}

#[tokio::test]
async fn test_fetch_connection_refused_is_error() {
    // Bind and drop a listener to get a port nobody is serving
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpClient::new().unwrap();
    let err = client
        .fetch(&format!("http://{addr}/users"))
        .await
        .unwrap_err();

    assert!(matches!(err, crate::Error::Http(_)));
}

#[test]
fn test_fetch_result_serializes_like_summary() {
    let result = FetchResult {
        ok: true,
        status: 200,
        body: json!([{"id": 1}]),
    };
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"ok": true, "status": 200, "body": [{"id": 1}]})
    );
}
