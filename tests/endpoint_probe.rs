use std::collections::BTreeMap;
use std::time::Duration;

use luncurkan_mcp::platform::probe::{ProbeMethod, join_url};
use luncurkan_mcp::platform::{EndpointProbe, ProbeRequest};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn probe() -> EndpointProbe {
    EndpointProbe::new(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_get_parses_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&mock_server)
        .await;

    let response = probe()
        .probe(
            &join_url(&mock_server.uri(), "/health"),
            &ProbeRequest::default(),
        )
        .await
        .unwrap();
    assert!(response.is_success());
    assert_eq!(response.status, 200);
    assert_eq!(response.status_text, "OK");
    assert_eq!(response.body, json!({ "status": "ok" }));
    assert_eq!(
        response.headers.get("content-type").map(String::as_str),
        Some("application/json")
    );
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({ "email": "a@b.c", "password": "secret" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "token": "t" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = ProbeRequest::post(json!({ "email": "a@b.c", "password": "secret" }));
    let response = probe()
        .probe(&format!("{}/api/auth/login", mock_server.uri()), &request)
        .await
        .unwrap();
    assert_eq!(response.status, 201);
    assert_eq!(response.body["token"], "t");
}

#[tokio::test]
async fn test_non_json_body_is_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&mock_server)
        .await;

    let response = probe()
        .probe(&mock_server.uri(), &ProbeRequest::default())
        .await
        .unwrap();
    assert_eq!(response.body, json!("hello"));
}

#[tokio::test]
async fn test_error_status_is_not_a_probe_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/items/1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let request = ProbeRequest {
        method: ProbeMethod::Delete,
        ..Default::default()
    };
    let response = probe()
        .probe(&format!("{}/items/1", mock_server.uri()), &request)
        .await
        .unwrap();
    assert_eq!(response.status, 503);
    assert!(!response.is_success());
}

#[tokio::test]
async fn test_custom_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut headers = BTreeMap::new();
    headers.insert("Authorization".to_string(), "Bearer abc".to_string());
    let request = ProbeRequest {
        headers,
        ..Default::default()
    };
    let response = probe()
        .probe(&format!("{}/me", mock_server.uri()), &request)
        .await
        .unwrap();
    assert!(response.is_success());
}
