//! Agent tools for the Luncurkan platform
//!
//! Every tool is a [`rig::tool::Tool`] with typed arguments and a JSON schema.
//! [`ToolCatalog`] holds them behind one object-safe trait, routes calls by
//! name, and turns every failure into a structured error result.
//!
//! ## Tools
//!
//! - Projects: `list_projects`, `get_project`, `list_installations`,
//!   `list_installation_repos`, `create_project`, `delete_project`,
//!   `list_templates`, `create_project_from_template`
//! - Deployments: `list_deployments`, `get_deployment`, `create_deployment`,
//!   `redeploy`, `get_deployment_logs`, `delete_deployment`
//! - Organizations: `list_organizations`, `get_organization`,
//!   `list_organization_members`, `get_current_user`
//! - Testing: `test_endpoint`, `test_health`, `test_auth_register`,
//!   `test_auth_login`

pub mod args;
pub mod deployments;
pub mod error;
pub mod organizations;
pub mod projects;
pub mod testing;

use futures_util::future::{BoxFuture, join_all};
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::platform::api::PlatformApiClient;
use crate::platform::assembler::DeploymentAssembler;
use crate::platform::probe::EndpointProbe;
pub use error::{ErrorCategory, ToolError, format_error_for_llm, format_tool_error};

/// Object-safe view of a [`Tool`] taking and returning JSON
pub trait DynTool: Send + Sync {
    fn tool_name(&self) -> &'static str;

    fn tool_definition(&self) -> BoxFuture<'_, ToolDefinition>;

    /// Deserialize `args` into the tool's arguments and run it
    fn call_json(&self, args: Value) -> BoxFuture<'_, Result<String, ToolError>>;
}

impl<T> DynTool for T
where
    T: Tool<Output = String, Error = ToolError> + Send + Sync,
{
    fn tool_name(&self) -> &'static str {
        T::NAME
    }

    fn tool_definition(&self) -> BoxFuture<'_, ToolDefinition> {
        Box::pin(Tool::definition(self, String::new()))
    }

    fn call_json(&self, args: Value) -> BoxFuture<'_, Result<String, ToolError>> {
        Box::pin(async move {
            let args: T::Args = serde_json::from_value(args)
                .map_err(|e| ToolError::validation(format!("Invalid arguments: {}", e)))?;
            Tool::call(self, args).await
        })
    }
}

/// Text payload of a tool call and whether it reports an error
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    pub text: String,
    pub is_error: bool,
}

/// Shared services the tools are built from
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub client: Arc<PlatformApiClient>,
    pub assembler: Arc<DeploymentAssembler>,
    pub probe: Arc<EndpointProbe>,
}

/// Every tool this server exposes, in listing order
pub struct ToolCatalog {
    tools: Vec<Box<dyn DynTool>>,
}

impl ToolCatalog {
    pub fn new(ctx: ToolContext) -> Self {
        let client = ctx.client;
        let tools: Vec<Box<dyn DynTool>> = vec![
            // Projects
            Box::new(projects::ListProjectsTool::new(client.clone())),
            Box::new(projects::GetProjectTool::new(client.clone())),
            Box::new(projects::ListInstallationsTool::new(client.clone())),
            Box::new(projects::ListInstallationReposTool::new(client.clone())),
            Box::new(projects::CreateProjectTool::new(client.clone())),
            Box::new(projects::DeleteProjectTool::new(client.clone())),
            Box::new(projects::ListTemplatesTool::new(client.clone())),
            Box::new(projects::CreateProjectFromTemplateTool::new(client.clone())),
            // Deployments
            Box::new(deployments::ListDeploymentsTool::new(client.clone())),
            Box::new(deployments::GetDeploymentTool::new(client.clone())),
            Box::new(deployments::CreateDeploymentTool::new(ctx.assembler)),
            Box::new(deployments::RedeployTool::new(client.clone())),
            Box::new(deployments::GetDeploymentLogsTool::new(client.clone())),
            Box::new(deployments::DeleteDeploymentTool::new(client.clone())),
            // Organizations and account
            Box::new(organizations::ListOrganizationsTool::new(client.clone())),
            Box::new(organizations::GetOrganizationTool::new(client.clone())),
            Box::new(organizations::ListOrganizationMembersTool::new(client.clone())),
            Box::new(organizations::GetCurrentUserTool::new(client.clone())),
            // Testing
            Box::new(testing::TestEndpointTool::new(ctx.probe.clone())),
            Box::new(testing::TestHealthTool::new(client.clone(), ctx.probe.clone())),
            Box::new(testing::TestAuthRegisterTool::new(client.clone(), ctx.probe.clone())),
            Box::new(testing::TestAuthLoginTool::new(client, ctx.probe)),
        ];
        Self { tools }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.tool_name()).collect()
    }

    pub async fn definitions(&self) -> Vec<ToolDefinition> {
        join_all(self.tools.iter().map(|t| t.tool_definition())).await
    }

    /// Run the tool called `name`; never fails, errors become error payloads
    pub async fn call(&self, name: &str, args: Option<Value>) -> ToolOutcome {
        let Some(tool) = self.tools.iter().find(|t| t.tool_name() == name) else {
            log::warn!("Unknown tool requested: {}", name);
            let payload = format_error_for_llm(
                name,
                ErrorCategory::UnknownTool,
                &format!("Unknown tool: {}", name),
                Some(vec!["Call tools/list to see the available tools"]),
            );
            return error_outcome(payload);
        };

        log::debug!("Calling tool {}", name);
        let args = match args {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(value) => value,
        };

        match tool.call_json(args).await {
            Ok(text) => ToolOutcome {
                text,
                is_error: false,
            },
            Err(e) => {
                log::debug!("Tool {} failed: {}", name, e);
                error_outcome(format_tool_error(name, &e))
            }
        }
    }
}

fn error_outcome(payload: Value) -> ToolOutcome {
    let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
    ToolOutcome {
        text,
        is_error: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::DeployDefaults;
    use std::collections::HashSet;
    use std::time::Duration;

    fn catalog() -> ToolCatalog {
        let client = Arc::new(PlatformApiClient::with_url("token", "http://127.0.0.1:9").unwrap());
        let assembler = Arc::new(DeploymentAssembler::new(
            client.clone(),
            DeployDefaults::default(),
        ));
        let probe = Arc::new(EndpointProbe::new(Duration::from_secs(2)).unwrap());
        ToolCatalog::new(ToolContext {
            client,
            assembler,
            probe,
        })
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let catalog = catalog();
        let names = catalog.names();
        assert_eq!(catalog.len(), 22);
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert!(names.contains(&"create_deployment"));
        assert!(names.contains(&"get_current_user"));
        assert!(!names.contains(&"get_quota"));
    }

    #[tokio::test]
    async fn test_definitions_are_object_schemas() {
        let catalog = catalog();
        let definitions = catalog.definitions().await;
        assert_eq!(definitions.len(), catalog.len());
        for (definition, name) in definitions.iter().zip(catalog.names()) {
            assert_eq!(definition.name, name);
            assert!(!definition.description.is_empty());
            assert_eq!(definition.parameters["type"], "object");
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_an_error_payload() {
        let outcome = catalog().call("launch_rocket", None).await;
        assert!(outcome.is_error);
        let payload: Value = serde_json::from_str(&outcome.text).unwrap();
        assert_eq!(payload["error"], "Unknown tool: launch_rocket");
        assert_eq!(payload["code"], "UNKNOWN_TOOL");
    }

    #[tokio::test]
    async fn test_bad_arguments_are_validation_errors() {
        let outcome = catalog()
            .call("create_deployment", Some(serde_json::json!({ "branch": "main" })))
            .await;
        assert!(outcome.is_error);
        let payload: Value = serde_json::from_str(&outcome.text).unwrap();
        assert_eq!(payload["code"], "VALIDATION_FAILED");
        assert!(payload["error"].as_str().unwrap().contains("project_id"));
    }

    #[tokio::test]
    async fn test_missing_arguments_default_to_empty_object() {
        let outcome = catalog().call("get_project", None).await;
        assert!(outcome.is_error);
        let payload: Value = serde_json::from_str(&outcome.text).unwrap();
        assert_eq!(payload["code"], "VALIDATION_FAILED");
    }
}
