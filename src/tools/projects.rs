//! Project tools
//!
//! Listing, inspecting, creating and deleting projects, plus the GitHub App
//! installations and templates that project creation draws on.

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::args::{self, present};
use super::error::ToolError;
use crate::platform::api::{
    CreateProjectFromTemplateRequest, CreateProjectRequest, PlatformApiClient, ResourceId,
    TemplateFilters,
};

// =============================================================================
// list_projects
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ListProjectsArgs {
    #[serde(default)]
    pub organization_slug: Option<String>,
}

/// Tool to list projects, optionally scoped to one organization
#[derive(Debug, Clone)]
pub struct ListProjectsTool {
    client: Arc<PlatformApiClient>,
}

impl ListProjectsTool {
    pub fn new(client: Arc<PlatformApiClient>) -> Self {
        Self { client }
    }
}

impl Tool for ListProjectsTool {
    const NAME: &'static str = "list_projects";

    type Error = ToolError;
    type Args = ListProjectsArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: r#"List all projects you have access to.

Returns each project's ID, name, slug, linked GitHub repository and language.
Pass organization_slug to only list projects of that organization."#
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "organization_slug": {
                        "type": "string",
                        "description": "Only list projects of this organization (optional)"
                    }
                }
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let slug = present(args.organization_slug);
        let projects = self.client.list_projects(slug.as_deref()).await?;

        let project_list: Vec<serde_json::Value> = projects
            .iter()
            .map(|p| {
                json!({
                    "id": p.id,
                    "name": p.name,
                    "slug": p.slug,
                    "description": p.description,
                    "github_repo": p.github_repo_full_name,
                    "language": p.language,
                    "created_at": p.created_at,
                })
            })
            .collect();

        let result = json!({
            "projects": project_list,
            "count": projects.len()
        });
        Ok(serde_json::to_string_pretty(&result)?)
    }
}

// =============================================================================
// get_project
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ProjectIdArgs {
    pub project_id: ResourceId,
}

/// Tool to fetch one project with everything the platform detected about it
#[derive(Debug, Clone)]
pub struct GetProjectTool {
    client: Arc<PlatformApiClient>,
}

impl GetProjectTool {
    pub fn new(client: Arc<PlatformApiClient>) -> Self {
        Self { client }
    }
}

impl Tool for GetProjectTool {
    const NAME: &'static str = "get_project";

    type Error = ToolError;
    type Args = ProjectIdArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Get detailed information about a project, including its repository, \
                          detected language and detected build/start commands."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "The project ID or slug"
                    }
                },
                "required": ["project_id"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        args::require("project_id", args.project_id.as_str())?;
        let project = self.client.get_project(args.project_id.as_str()).await?;
        Ok(serde_json::to_string_pretty(&project)?)
    }
}

// =============================================================================
// list_installations
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct NoArgs {}

/// Tool to list GitHub App installations
#[derive(Debug, Clone)]
pub struct ListInstallationsTool {
    client: Arc<PlatformApiClient>,
}

impl ListInstallationsTool {
    pub fn new(client: Arc<PlatformApiClient>) -> Self {
        Self { client }
    }
}

impl Tool for ListInstallationsTool {
    const NAME: &'static str = "list_installations";

    type Error = ToolError;
    type Args = NoArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "List the GitHub App installations (user and organization accounts) \
                          connected to Luncurkan. Needed before creating a project."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    async fn call(&self, _args: Self::Args) -> Result<Self::Output, Self::Error> {
        let installations = self.client.list_installations().await?;

        let result = json!({
            "installations": installations
                .iter()
                .map(|i| json!({
                    "installation_id": i.installation_id,
                    "account_login": i.account_login,
                    "account_type": i.account_type,
                }))
                .collect::<Vec<_>>(),
            "count": installations.len()
        });
        Ok(serde_json::to_string_pretty(&result)?)
    }
}

// =============================================================================
// list_installation_repos
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct InstallationReposArgs {
    #[serde(deserialize_with = "args::integer")]
    pub installation_id: i64,
}

/// Tool to list repositories an installation grants access to
#[derive(Debug, Clone)]
pub struct ListInstallationReposTool {
    client: Arc<PlatformApiClient>,
}

impl ListInstallationReposTool {
    pub fn new(client: Arc<PlatformApiClient>) -> Self {
        Self { client }
    }
}

impl Tool for ListInstallationReposTool {
    const NAME: &'static str = "list_installation_repos";

    type Error = ToolError;
    type Args = InstallationReposArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "List the repositories a GitHub App installation can access. \
                          Use the repository id and full_name with create_project."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "installation_id": {
                        "type": "number",
                        "description": "GitHub App installation ID (from list_installations)"
                    }
                },
                "required": ["installation_id"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let repos = self
            .client
            .list_installation_repos(args.installation_id)
            .await?;

        let result = json!({
            "repositories": repos
                .iter()
                .map(|r| json!({
                    "id": r.id,
                    "name": r.name,
                    "full_name": r.full_name,
                    "html_url": r.html_url,
                    "default_branch": r.default_branch,
                    "language": r.language,
                    "private": r.private,
                }))
                .collect::<Vec<_>>(),
            "count": repos.len()
        });
        Ok(serde_json::to_string_pretty(&result)?)
    }
}

// =============================================================================
// create_project
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateProjectArgs {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "args::integer")]
    pub installation_id: i64,
    #[serde(deserialize_with = "args::integer")]
    pub github_repo_id: i64,
    pub github_repo_full_name: String,
    #[serde(default)]
    pub github_repo_url: Option<String>,
    #[serde(default)]
    pub github_default_branch: Option<String>,
}

/// Tool to create a project from a GitHub repository
#[derive(Debug, Clone)]
pub struct CreateProjectTool {
    client: Arc<PlatformApiClient>,
}

impl CreateProjectTool {
    pub fn new(client: Arc<PlatformApiClient>) -> Self {
        Self { client }
    }
}

impl Tool for CreateProjectTool {
    const NAME: &'static str = "create_project";

    type Error = ToolError;
    type Args = CreateProjectArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: r#"Create a new project from a GitHub repository.

**Prerequisites:**
- The repository must be reachable through a GitHub App installation
- Use list_installations, then list_installation_repos, to get the IDs"#
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Project name" },
                    "description": { "type": "string", "description": "Optional project description" },
                    "installation_id": {
                        "type": "number",
                        "description": "GitHub App installation ID (from list_installations)"
                    },
                    "github_repo_id": {
                        "type": "number",
                        "description": "GitHub repository ID (from list_installation_repos)"
                    },
                    "github_repo_full_name": {
                        "type": "string",
                        "description": "Repository full name, e.g. owner/repo"
                    },
                    "github_repo_url": {
                        "type": "string",
                        "description": "GitHub repository URL (from list_installation_repos)"
                    },
                    "github_default_branch": {
                        "type": "string",
                        "description": "Default branch name, defaults to \"main\""
                    }
                },
                "required": ["name", "installation_id", "github_repo_id", "github_repo_full_name"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        args::require("name", &args.name)?;
        args::require("github_repo_full_name", &args.github_repo_full_name)?;

        let request = CreateProjectRequest {
            name: args.name,
            description: present(args.description),
            installation_id: args.installation_id,
            github_repo_id: args.github_repo_id,
            github_repo_full_name: args.github_repo_full_name,
            github_repo_url: present(args.github_repo_url),
            github_default_branch: Some(
                present(args.github_default_branch).unwrap_or_else(|| "main".to_string()),
            ),
        };
        let project = self.client.create_project(&request).await?;

        let result = json!({
            "message": format!("Project \"{}\" created successfully", project.name),
            "project": project
        });
        Ok(serde_json::to_string_pretty(&result)?)
    }
}

// =============================================================================
// delete_project
// =============================================================================

/// Tool to delete a project and all its deployments
#[derive(Debug, Clone)]
pub struct DeleteProjectTool {
    client: Arc<PlatformApiClient>,
}

impl DeleteProjectTool {
    pub fn new(client: Arc<PlatformApiClient>) -> Self {
        Self { client }
    }
}

impl Tool for DeleteProjectTool {
    const NAME: &'static str = "delete_project";

    type Error = ToolError;
    type Args = ProjectIdArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Delete a project and all of its deployments. This cannot be undone."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "The project ID to delete"
                    }
                },
                "required": ["project_id"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        args::require("project_id", args.project_id.as_str())?;
        self.client.delete_project(args.project_id.as_str()).await?;

        let result = json!({
            "message": format!("Project {} deleted successfully", args.project_id)
        });
        Ok(serde_json::to_string_pretty(&result)?)
    }
}

// =============================================================================
// list_templates
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ListTemplatesArgs {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

/// Tool to browse project starter templates
#[derive(Debug, Clone)]
pub struct ListTemplatesTool {
    client: Arc<PlatformApiClient>,
}

impl ListTemplatesTool {
    pub fn new(client: Arc<PlatformApiClient>) -> Self {
        Self { client }
    }
}

impl Tool for ListTemplatesTool {
    const NAME: &'static str = "list_templates";

    type Error = ToolError;
    type Args = ListTemplatesArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "List starter templates that new projects can be created from. \
                          Filter by category, language or a search term."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "category": {
                        "type": "string",
                        "description": "Filter by category (e.g. \"api\", \"websocket\", \"auth\")"
                    },
                    "language": {
                        "type": "string",
                        "description": "Filter by language (e.g. \"typescript\", \"go\")"
                    },
                    "search": {
                        "type": "string",
                        "description": "Search templates by name or description"
                    }
                }
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let filters = TemplateFilters {
            category: present(args.category),
            language: present(args.language),
            search: present(args.search),
        };
        let templates = self.client.list_templates(&filters).await?;

        let result = json!({
            "templates": templates
                .iter()
                .map(|t| json!({
                    "slug": t.slug,
                    "name": t.name,
                    "description": t.description,
                    "language": t.language,
                    "category": t.category,
                    "tags": t.tags,
                }))
                .collect::<Vec<_>>(),
            "count": templates.len()
        });
        Ok(serde_json::to_string_pretty(&result)?)
    }
}

// =============================================================================
// create_project_from_template
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateFromTemplateArgs {
    pub name: String,
    pub template_slug: String,
    #[serde(deserialize_with = "args::integer")]
    pub installation_id: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Tool to create a project (and its GitHub repository) from a template
#[derive(Debug, Clone)]
pub struct CreateProjectFromTemplateTool {
    client: Arc<PlatformApiClient>,
}

impl CreateProjectFromTemplateTool {
    pub fn new(client: Arc<PlatformApiClient>) -> Self {
        Self { client }
    }
}

impl Tool for CreateProjectFromTemplateTool {
    const NAME: &'static str = "create_project_from_template";

    type Error = ToolError;
    type Args = CreateFromTemplateArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Create a new project from a starter template. A GitHub repository \
                          named after the project is created under the installation's account."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Project name (also used as the GitHub repository name)"
                    },
                    "template_slug": {
                        "type": "string",
                        "description": "Template slug (from list_templates)"
                    },
                    "installation_id": {
                        "type": "number",
                        "description": "GitHub App installation ID (from list_installations)"
                    },
                    "description": {
                        "type": "string",
                        "description": "Optional project description"
                    }
                },
                "required": ["name", "template_slug", "installation_id"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        args::require("name", &args.name)?;
        args::require("template_slug", &args.template_slug)?;

        let request = CreateProjectFromTemplateRequest {
            name: args.name,
            description: present(args.description),
            template_slug: args.template_slug,
            installation_id: args.installation_id,
        };
        let project = self.client.create_project_from_template(&request).await?;

        let language = project
            .detected_language
            .as_ref()
            .filter(|l| !l.is_empty())
            .or(project.language.as_ref());
        let result = json!({
            "message": format!("Project \"{}\" created from template successfully", project.name),
            "project": {
                "id": project.id,
                "name": project.name,
                "slug": project.slug,
                "github_repo": project.github_repo_full_name,
                "language": language,
            }
        });
        Ok(serde_json::to_string_pretty(&result)?)
    }
}
