use luncurkan_mcp::platform::api::{
    PlatformApiClient, PlatformApiError, RedeployRequest, TemplateFilters,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> PlatformApiClient {
    PlatformApiClient::with_url("test-token", server.uri()).unwrap()
}

#[tokio::test]
async fn test_get_project_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/projects/42"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "project": {
                "id": 42,
                "name": "widget",
                "github_repo_full_name": "acme/widget"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let project = client(&mock_server).get_project("42").await.unwrap();
    assert_eq!(project.id.as_str(), "42");
    assert_eq!(project.name, "widget");
    assert_eq!(project.github_repo_full_name.as_deref(), Some("acme/widget"));
}

#[tokio::test]
async fn test_error_message_comes_from_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/projects/404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "Project not found" })),
        )
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).get_project("404").await.unwrap_err();
    assert!(matches!(err, PlatformApiError::NotFound(_)));
    assert_eq!(err.to_string(), "Project not found");
}

#[tokio::test]
async fn test_error_message_falls_back_to_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/deployments/abc"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).get_deployment("abc").await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), "HTTP 502");
}

#[tokio::test]
async fn test_message_field_is_used_when_error_is_absent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/organizations"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })),
        )
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).list_organizations().await.unwrap_err();
    assert!(matches!(err, PlatformApiError::Unauthorized(_)));
    assert_eq!(err.to_string(), "Token expired");
}

#[tokio::test]
async fn test_list_projects_for_organization() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/organizations/acme/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [
                { "id": 1, "name": "one" },
                { "id": "2", "name": "two" }
            ]
        })))
        .mount(&mock_server)
        .await;

    let projects = client(&mock_server)
        .list_projects(Some("acme"))
        .await
        .unwrap();
    let ids: Vec<_> = projects.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn test_missing_envelope_key_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).list_projects(None).await.unwrap_err();
    assert!(matches!(err, PlatformApiError::ParseError(_)));
}

#[tokio::test]
async fn test_repo_config_passes_ref() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/installations/7/repos/acme/widget/config"))
        .and(query_param("ref", "feature/x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "config": { "start_command": "node server.js" }
        })))
        .mount(&mock_server)
        .await;

    let config = client(&mock_server)
        .get_repo_config(7, "acme", "widget", Some("feature/x"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(config.start_command.as_deref(), Some("node server.js"));
}

#[tokio::test]
async fn test_repo_config_not_found_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/installations/7/repos/acme/widget/config"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Not found" })))
        .mount(&mock_server)
        .await;

    let config = client(&mock_server)
        .get_repo_config(7, "acme", "widget", None)
        .await
        .unwrap();
    assert!(config.is_none());
}

#[tokio::test]
async fn test_list_templates_with_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/templates/github"))
        .and(query_param("language", "go"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "templates": [{
                "slug": "go-api",
                "name": "Go API",
                "description": "A Go HTTP API",
                "language": "go",
                "category": "api",
                "tags": ["http"],
                "github_url": "https://github.com/luncurkan/go-api"
            }]
        })))
        .mount(&mock_server)
        .await;

    let filters = TemplateFilters {
        language: Some("go".to_string()),
        ..Default::default()
    };
    let templates = client(&mock_server).list_templates(&filters).await.unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].slug, "go-api");
}

#[tokio::test]
async fn test_redeploy_with_options_sends_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/deployments/dep-1/redeploy"))
        .and(body_json(json!({ "branch": "dev" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Redeploy queued",
            "deployment_id": "dep-2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = RedeployRequest {
        branch: Some("dev".to_string()),
        ..Default::default()
    };
    let response = client(&mock_server)
        .redeploy("dep-1", &request)
        .await
        .unwrap();
    assert_eq!(response.message.as_deref(), Some("Redeploy queued"));
    assert_eq!(response.deployment_id.unwrap().as_str(), "dep-2");
}

#[tokio::test]
async fn test_redeploy_without_options_sends_no_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/deployments/dep-1/redeploy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    client(&mock_server)
        .redeploy("dep-1", &RedeployRequest::default())
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_delete_deployment_ignores_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/deployments/dep-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    client(&mock_server)
        .delete_deployment("dep-1")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_deployment_logs_are_raw_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/deployments/dep-1/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "logs": { "build": ["step 1"], "runtime": [] }
        })))
        .mount(&mock_server)
        .await;

    let logs = client(&mock_server)
        .get_deployment_logs("dep-1")
        .await
        .unwrap();
    assert_eq!(logs["build"][0], "step 1");
}
