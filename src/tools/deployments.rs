//! Deployment tools
//!
//! `create_deployment` hands off to the [`DeploymentAssembler`]; the other
//! tools map one-to-one onto platform endpoints.

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::args::{self, present};
use super::error::ToolError;
use crate::platform::api::{PlatformApiClient, RedeployRequest, ResourceAllocation, ResourceId};
use crate::platform::assembler::{DeploymentAssembler, DeploymentOverrides};
use crate::platform::dependency::Dependency;

fn deployment_id_schema(description: &str) -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "deployment_id": {
                "type": "string",
                "description": description
            }
        },
        "required": ["deployment_id"]
    })
}

#[derive(Debug, Deserialize)]
pub struct DeploymentIdArgs {
    pub deployment_id: ResourceId,
}

// =============================================================================
// list_deployments
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ListDeploymentsArgs {
    pub project_id: ResourceId,
}

/// Tool to list a project's deployments, newest first as the platform returns them
#[derive(Debug, Clone)]
pub struct ListDeploymentsTool {
    client: Arc<PlatformApiClient>,
}

impl ListDeploymentsTool {
    pub fn new(client: Arc<PlatformApiClient>) -> Self {
        Self { client }
    }
}

impl Tool for ListDeploymentsTool {
    const NAME: &'static str = "list_deployments";

    type Error = ToolError;
    type Args = ListDeploymentsArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "List all deployments of a project with their status, branch, \
                          commit and timestamps."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "The project ID to list deployments for"
                    }
                },
                "required": ["project_id"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        args::require("project_id", args.project_id.as_str())?;
        let deployments = self
            .client
            .list_deployments(args.project_id.as_str())
            .await?;

        let result = json!({
            "deployments": deployments
                .iter()
                .map(|d| json!({
                    "id": d.id,
                    "status": d.status,
                    "branch": d.branch,
                    "commit_sha": d.short_commit_sha(),
                    "commit_message": d.commit_message,
                    "created_at": d.created_at,
                    "completed_at": d.completed_at,
                }))
                .collect::<Vec<_>>(),
            "count": deployments.len()
        });
        Ok(serde_json::to_string_pretty(&result)?)
    }
}

// =============================================================================
// get_deployment
// =============================================================================

/// Tool to fetch one deployment with its configuration and endpoints
#[derive(Debug, Clone)]
pub struct GetDeploymentTool {
    client: Arc<PlatformApiClient>,
}

impl GetDeploymentTool {
    pub fn new(client: Arc<PlatformApiClient>) -> Self {
        Self { client }
    }
}

impl Tool for GetDeploymentTool {
    const NAME: &'static str = "get_deployment";

    type Error = ToolError;
    type Args = DeploymentIdArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Get detailed information about a deployment, including its \
                          configuration, status and public endpoints."
                .to_string(),
            parameters: deployment_id_schema("The deployment ID"),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        args::require("deployment_id", args.deployment_id.as_str())?;
        let deployment = self
            .client
            .get_deployment(args.deployment_id.as_str())
            .await?;
        Ok(serde_json::to_string_pretty(&deployment)?)
    }
}

// =============================================================================
// create_deployment
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateDeploymentArgs {
    pub project_id: ResourceId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub build_command: Option<String>,
    #[serde(default)]
    pub start_command: Option<String>,
    #[serde(default)]
    pub environment_variables: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub dependencies: Option<Vec<Dependency>>,
    #[serde(default)]
    pub resources: Option<ResourceAllocation>,
}

impl CreateDeploymentArgs {
    /// Numeric project id plus the caller's overrides
    pub fn into_overrides(self) -> Result<(i64, DeploymentOverrides), ToolError> {
        let project_id = self.project_id.as_i64().ok_or_else(|| {
            ToolError::validation(format!(
                "project_id must be an integer, got \"{}\"",
                self.project_id
            ))
        })?;

        let overrides = DeploymentOverrides {
            name: present(self.name),
            version: present(self.version),
            branch: present(self.branch),
            build_command: present(self.build_command),
            start_command: present(self.start_command),
            environment_variables: self.environment_variables,
            dependencies: self.dependencies,
            resources: self.resources,
        };
        Ok((project_id, overrides))
    }
}

/// Tool to assemble and trigger a deployment
#[derive(Debug, Clone)]
pub struct CreateDeploymentTool {
    assembler: Arc<DeploymentAssembler>,
}

impl CreateDeploymentTool {
    pub fn new(assembler: Arc<DeploymentAssembler>) -> Self {
        Self { assembler }
    }
}

impl Tool for CreateDeploymentTool {
    const NAME: &'static str = "create_deployment";

    type Error = ToolError;
    type Args = CreateDeploymentArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        let defaults = self.assembler.defaults();
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: format!(
                r#"Create and trigger a new deployment for a project.

Settings are merged from three sources:
- Arguments given here
- The repository's luncurkan.json at the deployed branch
- What the platform detected about the project

Resources given here always win. Without dependencies, the luncurkan.json
dependencies are used, otherwise source, builder, env and domain dependencies
are built from the project. Default resources: cpu {} millicores, memory {} MiB."#,
                defaults.resources.cpu, defaults.resources.memory
            ),
            parameters: json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "The numeric project ID to deploy"
                    },
                    "name": { "type": "string", "description": "Deployment name (optional)" },
                    "version": { "type": "string", "description": "Deployment version (optional)" },
                    "branch": {
                        "type": "string",
                        "description": format!(
                            "Git branch to deploy (default: the project's default branch, else {})",
                            defaults.default_branch
                        )
                    },
                    "build_command": {
                        "type": "string",
                        "description": "Custom build command (e.g. npm run build)"
                    },
                    "start_command": {
                        "type": "string",
                        "description": "Custom start command (e.g. npm start)"
                    },
                    "environment_variables": {
                        "type": "object",
                        "description": "Environment variables as key-value pairs (e.g. {\"NODE_ENV\": \"production\"})",
                        "additionalProperties": { "type": "string" }
                    },
                    "dependencies": {
                        "type": "array",
                        "description": "Deployment dependencies, sent as given",
                        "items": {
                            "type": "object",
                            "properties": {
                                "type": {
                                    "type": "string",
                                    "enum": ["source", "database", "runtime", "builder", "env", "domain"],
                                    "description": "Dependency type"
                                },
                                "managed": { "type": "boolean", "description": "Whether this is a managed dependency" },
                                "ref": { "type": "string", "description": "Git ref for source dependencies" },
                                "db_type": { "type": "string", "description": "Database type (e.g. postgres, mysql)" }
                            },
                            "required": ["type"]
                        }
                    },
                    "resources": {
                        "type": "object",
                        "description": "Resource allocation; overrides luncurkan.json and defaults",
                        "properties": {
                            "cpu": { "type": "number", "description": "CPU in millicores (e.g. 250 = 0.25 vCPU)" },
                            "memory": { "type": "number", "description": "Memory in MiB (e.g. 256)" }
                        },
                        "required": ["cpu", "memory"]
                    }
                },
                "required": ["project_id"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let (project_id, overrides) = args.into_overrides()?;
        let outcome = self
            .assembler
            .create_deployment(project_id, overrides)
            .await?;

        let mut result = json!({
            "message": outcome.message(),
            "deployment": {
                "id": outcome.deployment.id,
                "status": outcome.deployment.status,
                "branch": outcome.deployment.branch,
            }
        });
        if !outcome.warnings.is_empty() {
            result["warnings"] = json!(outcome.warnings);
        }
        Ok(serde_json::to_string_pretty(&result)?)
    }
}

// =============================================================================
// redeploy
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RedeployArgs {
    pub deployment_id: ResourceId,
    #[serde(default)]
    pub resources: Option<ResourceAllocation>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub environment_variables: Option<BTreeMap<String, String>>,
}

/// Tool to redeploy an existing deployment, optionally adjusting it
#[derive(Debug, Clone)]
pub struct RedeployTool {
    client: Arc<PlatformApiClient>,
}

impl RedeployTool {
    pub fn new(client: Arc<PlatformApiClient>) -> Self {
        Self { client }
    }
}

impl Tool for RedeployTool {
    const NAME: &'static str = "redeploy";

    type Error = ToolError;
    type Args = RedeployArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: r#"Redeploy an existing deployment.

Useful for retrying failed deployments, picking up the latest code, or scaling.
Resources, branch and environment variables can optionally be adjusted."#
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "deployment_id": {
                        "type": "string",
                        "description": "The deployment ID to redeploy"
                    },
                    "resources": {
                        "type": "object",
                        "description": "Optional resource adjustment (e.g. {\"cpu\": 100, \"memory\": 128})",
                        "properties": {
                            "cpu": { "type": "number", "description": "CPU in millicores" },
                            "memory": { "type": "number", "description": "Memory in MiB" }
                        }
                    },
                    "branch": {
                        "type": "string",
                        "description": "Optional git branch to deploy from (default: current branch)"
                    },
                    "environment_variables": {
                        "type": "object",
                        "description": "Optional environment variables to add or update",
                        "additionalProperties": { "type": "string" }
                    }
                },
                "required": ["deployment_id"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        args::require("deployment_id", args.deployment_id.as_str())?;
        if let Some(resources) = args.resources {
            if !resources.is_valid() {
                return Err(ToolError::validation(
                    "resources.cpu and resources.memory must be positive integers",
                ));
            }
        }

        let options = RedeployRequest {
            resources: args.resources,
            branch: present(args.branch),
            environment_variables: args.environment_variables,
        };
        let response = self
            .client
            .redeploy(args.deployment_id.as_str(), &options)
            .await?;

        let mut result = json!({
            "message": response
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Redeployment triggered successfully".to_string()),
            "deployment_id": response.deployment_id,
            "stream_url": response.stream_url,
        });
        if let Some(resources) = options.resources {
            result["resources"] = json!(resources);
        }
        if let Some(branch) = options.branch {
            result["branch"] = json!(branch);
        }
        if let Some(vars) = options.environment_variables {
            result["environment_variables"] = json!(vars);
        }
        Ok(serde_json::to_string_pretty(&result)?)
    }
}

// =============================================================================
// get_deployment_logs
// =============================================================================

/// Tool to fetch build and runtime logs
#[derive(Debug, Clone)]
pub struct GetDeploymentLogsTool {
    client: Arc<PlatformApiClient>,
}

impl GetDeploymentLogsTool {
    pub fn new(client: Arc<PlatformApiClient>) -> Self {
        Self { client }
    }
}

impl Tool for GetDeploymentLogsTool {
    const NAME: &'static str = "get_deployment_logs";

    type Error = ToolError;
    type Args = DeploymentIdArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Get the build and runtime logs of a deployment. \
                          Useful for debugging failed deployments."
                .to_string(),
            parameters: deployment_id_schema("The deployment ID"),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        args::require("deployment_id", args.deployment_id.as_str())?;
        let logs = self
            .client
            .get_deployment_logs(args.deployment_id.as_str())
            .await?;

        let result = json!({
            "deployment_id": args.deployment_id,
            "logs": logs
        });
        Ok(serde_json::to_string_pretty(&result)?)
    }
}

// =============================================================================
// delete_deployment
// =============================================================================

/// Tool to stop and delete a deployment
#[derive(Debug, Clone)]
pub struct DeleteDeploymentTool {
    client: Arc<PlatformApiClient>,
}

impl DeleteDeploymentTool {
    pub fn new(client: Arc<PlatformApiClient>) -> Self {
        Self { client }
    }
}

impl Tool for DeleteDeploymentTool {
    const NAME: &'static str = "delete_deployment";

    type Error = ToolError;
    type Args = DeploymentIdArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Delete a deployment. The running deployment is stopped and its \
                          resources are freed. This cannot be undone."
                .to_string(),
            parameters: deployment_id_schema("The deployment ID to delete"),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        args::require("deployment_id", args.deployment_id.as_str())?;
        self.client
            .delete_deployment(args.deployment_id.as_str())
            .await?;

        let result = json!({
            "message": "Deployment deleted successfully",
            "deployment_id": args.deployment_id
        });
        Ok(serde_json::to_string_pretty(&result)?)
    }
}
