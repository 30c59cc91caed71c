//! Endpoint testing tools
//!
//! Probe deployed applications over HTTP. A failed probe is reported as a
//! `success: false` result rather than a tool error; only failing to look up
//! the deployment itself is an error.

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::args::{self, present};
use super::error::ToolError;
use crate::platform::api::{Deployment, PlatformApiClient, ResourceId};
use crate::platform::probe::{
    EndpointProbe, ProbeMethod, ProbeRequest, join_url, resolve_deployment_url,
};

const NO_URL_ERROR: &str = "Deployment has no accessible URL";
const DEFAULT_HEALTH_PATH: &str = "/health";
const DEFAULT_REGISTER_PATH: &str = "/api/auth/register";
const DEFAULT_LOGIN_PATH: &str = "/api/auth/login";

// =============================================================================
// test_endpoint
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct TestEndpointArgs {
    pub url: String,
    #[serde(default)]
    pub method: Option<ProbeMethod>,
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
}

/// Tool to send one HTTP request to any URL
#[derive(Debug, Clone)]
pub struct TestEndpointTool {
    probe: Arc<EndpointProbe>,
}

impl TestEndpointTool {
    pub fn new(probe: Arc<EndpointProbe>) -> Self {
        Self { probe }
    }
}

impl Tool for TestEndpointTool {
    const NAME: &'static str = "test_endpoint";

    type Error = ToolError;
    type Args = TestEndpointArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: r#"Test a deployed endpoint by making an HTTP request.

Returns the status, headers, body (parsed when JSON) and latency.
Supports GET, POST, PUT, DELETE and PATCH; the body is only sent for POST, PUT and PATCH."#
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "Full URL to test (e.g. https://my-app.luncurkan.app/api/users)"
                    },
                    "method": {
                        "type": "string",
                        "enum": ["GET", "POST", "PUT", "DELETE", "PATCH"],
                        "description": "HTTP method (default: GET)"
                    },
                    "body": {
                        "type": "object",
                        "description": "Request body for POST/PUT/PATCH requests (as JSON object)",
                        "additionalProperties": true
                    },
                    "headers": {
                        "type": "object",
                        "description": "Custom headers (e.g. {\"Authorization\": \"Bearer token\"})",
                        "additionalProperties": { "type": "string" }
                    }
                },
                "required": ["url"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        args::require("url", &args.url)?;

        let request = ProbeRequest {
            method: args.method.unwrap_or_default(),
            body: args.body,
            headers: args.headers.unwrap_or_default(),
        };
        let echoed = json!({
            "url": args.url,
            "method": request.method,
            "body": request.body.clone().unwrap_or(Value::Null),
        });

        let result = match self.probe.probe(&args.url, &request).await {
            Ok(response) => json!({
                "success": response.is_success(),
                "request": echoed,
                "response": response,
            }),
            Err(e) => json!({
                "success": false,
                "request": echoed,
                "error": e.to_string(),
            }),
        };
        Ok(serde_json::to_string_pretty(&result)?)
    }
}

// =============================================================================
// test_health
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct TestHealthArgs {
    pub deployment_id: ResourceId,
    #[serde(default)]
    pub custom_path: Option<String>,
}

/// Tool to GET a deployment's health endpoint
#[derive(Debug, Clone)]
pub struct TestHealthTool {
    client: Arc<PlatformApiClient>,
    probe: Arc<EndpointProbe>,
}

impl TestHealthTool {
    pub fn new(client: Arc<PlatformApiClient>, probe: Arc<EndpointProbe>) -> Self {
        Self { client, probe }
    }
}

impl Tool for TestHealthTool {
    const NAME: &'static str = "test_health";

    type Error = ToolError;
    type Args = TestHealthArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Quick health check for a deployment. Requests its /health endpoint \
                          (or a custom path) and reports success when it answers 200."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "deployment_id": {
                        "type": "string",
                        "description": "The deployment ID to check health for"
                    },
                    "custom_path": {
                        "type": "string",
                        "description": "Custom health path (default: /health)"
                    }
                },
                "required": ["deployment_id"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        args::require("deployment_id", args.deployment_id.as_str())?;
        let deployment = self
            .client
            .get_deployment(args.deployment_id.as_str())
            .await?;

        let Some(base_url) = resolve_deployment_url(&deployment) else {
            let result = json!({
                "success": false,
                "error": NO_URL_ERROR,
                "deployment_status": deployment.status,
                "deployment_phase": deployment.phase,
            });
            return Ok(serde_json::to_string_pretty(&result)?);
        };

        let path = present(args.custom_path).unwrap_or_else(|| DEFAULT_HEALTH_PATH.to_string());
        let health_url = join_url(&base_url, &path);
        let summary = deployment_summary(&deployment);

        let result = match self.probe.probe(&health_url, &ProbeRequest::default()).await {
            Ok(response) => json!({
                "success": response.status == 200,
                "url": health_url,
                "response": response,
                "deployment": summary,
            }),
            Err(e) => json!({
                "success": false,
                "url": health_url,
                "error": e.to_string(),
                "deployment": summary,
            }),
        };
        Ok(serde_json::to_string_pretty(&result)?)
    }
}

fn deployment_summary(deployment: &Deployment) -> Value {
    json!({
        "id": deployment.id,
        "status": deployment.status,
        "phase": deployment.phase,
    })
}

// =============================================================================
// test_auth_register / test_auth_login
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AuthProbeArgs {
    pub deployment_id: ResourceId,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub custom_path: Option<String>,
}

/// POST `{email, password}` to `path` on the deployment's public URL
async fn post_credentials(
    client: &PlatformApiClient,
    probe: &EndpointProbe,
    args: AuthProbeArgs,
    default_path: &str,
) -> Result<Value, ToolError> {
    args::require("deployment_id", args.deployment_id.as_str())?;
    args::require("email", &args.email)?;

    let deployment = client.get_deployment(args.deployment_id.as_str()).await?;
    let Some(base_url) = resolve_deployment_url(&deployment) else {
        return Ok(json!({ "success": false, "error": NO_URL_ERROR }));
    };

    let path = present(args.custom_path).unwrap_or_else(|| default_path.to_string());
    let url = join_url(&base_url, &path);
    let request = ProbeRequest::post(json!({
        "email": args.email,
        "password": args.password,
    }));

    Ok(match probe.probe(&url, &request).await {
        Ok(response) => json!({
            "success": response.is_success(),
            "url": url,
            "response": response,
        }),
        Err(e) => json!({
            "success": false,
            "url": url,
            "error": e.to_string(),
        }),
    })
}

fn auth_schema(action: &str, default_path: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "deployment_id": {
                "type": "string",
                "description": "The deployment ID of the auth service"
            },
            "email": {
                "type": "string",
                "description": format!("User email to {}", action)
            },
            "password": {
                "type": "string",
                "description": "User password"
            },
            "custom_path": {
                "type": "string",
                "description": format!("Custom {} path (default: {})", action, default_path)
            }
        },
        "required": ["deployment_id", "email", "password"]
    })
}

/// Tool to try registering a user on a deployed auth service
#[derive(Debug, Clone)]
pub struct TestAuthRegisterTool {
    client: Arc<PlatformApiClient>,
    probe: Arc<EndpointProbe>,
}

impl TestAuthRegisterTool {
    pub fn new(client: Arc<PlatformApiClient>, probe: Arc<EndpointProbe>) -> Self {
        Self { client, probe }
    }
}

impl Tool for TestAuthRegisterTool {
    const NAME: &'static str = "test_auth_register";

    type Error = ToolError;
    type Args = AuthProbeArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: format!(
                "Test user registration on a deployed auth service. Posts email and password \
                 to {} (or a custom path).",
                DEFAULT_REGISTER_PATH
            ),
            parameters: auth_schema("register", DEFAULT_REGISTER_PATH),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let result = post_credentials(&self.client, &self.probe, args, DEFAULT_REGISTER_PATH).await?;
        Ok(serde_json::to_string_pretty(&result)?)
    }
}

/// Tool to try logging in on a deployed auth service
#[derive(Debug, Clone)]
pub struct TestAuthLoginTool {
    client: Arc<PlatformApiClient>,
    probe: Arc<EndpointProbe>,
}

impl TestAuthLoginTool {
    pub fn new(client: Arc<PlatformApiClient>, probe: Arc<EndpointProbe>) -> Self {
        Self { client, probe }
    }
}

impl Tool for TestAuthLoginTool {
    const NAME: &'static str = "test_auth_login";

    type Error = ToolError;
    type Args = AuthProbeArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: format!(
                "Test user login on a deployed auth service. Posts email and password \
                 to {} (or a custom path).",
                DEFAULT_LOGIN_PATH
            ),
            parameters: auth_schema("login", DEFAULT_LOGIN_PATH),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let result = post_credentials(&self.client, &self.probe, args, DEFAULT_LOGIN_PATH).await?;
        Ok(serde_json::to_string_pretty(&result)?)
    }
}
