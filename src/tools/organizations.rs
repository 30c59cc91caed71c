//! Organization and account tools

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::args;
use super::error::ToolError;
use super::projects::NoArgs;
use crate::platform::api::PlatformApiClient;

#[derive(Debug, Deserialize)]
pub struct OrganizationSlugArgs {
    pub organization_slug: String,
}

fn slug_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "organization_slug": {
                "type": "string",
                "description": "The organization slug"
            }
        },
        "required": ["organization_slug"]
    })
}

/// Tool to list organizations the token's user belongs to
#[derive(Debug, Clone)]
pub struct ListOrganizationsTool {
    client: Arc<PlatformApiClient>,
}

impl ListOrganizationsTool {
    pub fn new(client: Arc<PlatformApiClient>) -> Self {
        Self { client }
    }
}

impl Tool for ListOrganizationsTool {
    const NAME: &'static str = "list_organizations";

    type Error = ToolError;
    type Args = NoArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "List all organizations you are a member of, with their names and slugs."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    async fn call(&self, _args: Self::Args) -> Result<Self::Output, Self::Error> {
        let organizations = self.client.list_organizations().await?;

        let result = json!({
            "organizations": organizations
                .iter()
                .map(|o| json!({
                    "id": o.id,
                    "name": o.name,
                    "slug": o.slug,
                    "created_at": o.created_at,
                }))
                .collect::<Vec<_>>(),
            "count": organizations.len()
        });
        Ok(serde_json::to_string_pretty(&result)?)
    }
}

/// Tool to fetch one organization
#[derive(Debug, Clone)]
pub struct GetOrganizationTool {
    client: Arc<PlatformApiClient>,
}

impl GetOrganizationTool {
    pub fn new(client: Arc<PlatformApiClient>) -> Self {
        Self { client }
    }
}

impl Tool for GetOrganizationTool {
    const NAME: &'static str = "get_organization";

    type Error = ToolError;
    type Args = OrganizationSlugArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Get detailed information about an organization.".to_string(),
            parameters: slug_schema(),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        args::require("organization_slug", &args.organization_slug)?;
        let organization = self
            .client
            .get_organization(&args.organization_slug)
            .await?;
        Ok(serde_json::to_string_pretty(&organization)?)
    }
}

/// Tool to list an organization's members and their roles
#[derive(Debug, Clone)]
pub struct ListOrganizationMembersTool {
    client: Arc<PlatformApiClient>,
}

impl ListOrganizationMembersTool {
    pub fn new(client: Arc<PlatformApiClient>) -> Self {
        Self { client }
    }
}

impl Tool for ListOrganizationMembersTool {
    const NAME: &'static str = "list_organization_members";

    type Error = ToolError;
    type Args = OrganizationSlugArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "List all members of an organization with their roles \
                          (owner, admin, member)."
                .to_string(),
            parameters: slug_schema(),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        args::require("organization_slug", &args.organization_slug)?;
        let members = self
            .client
            .list_organization_members(&args.organization_slug)
            .await?;

        let result = json!({
            "members": members
                .iter()
                .map(|m| json!({
                    "id": m.id,
                    "role": m.role,
                    "user": m.user.as_ref().map(|u| json!({
                        "name": u.name,
                        "email": u.email,
                    })),
                }))
                .collect::<Vec<_>>(),
            "count": members.len()
        });
        Ok(serde_json::to_string_pretty(&result)?)
    }
}

/// Tool to show which user the configured token belongs to
#[derive(Debug, Clone)]
pub struct GetCurrentUserTool {
    client: Arc<PlatformApiClient>,
}

impl GetCurrentUserTool {
    pub fn new(client: Arc<PlatformApiClient>) -> Self {
        Self { client }
    }
}

impl Tool for GetCurrentUserTool {
    const NAME: &'static str = "get_current_user";

    type Error = ToolError;
    type Args = NoArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Get the user the configured API token belongs to. \
                          Useful to confirm the token works."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    async fn call(&self, _args: Self::Args) -> Result<Self::Output, Self::Error> {
        let user = self.client.get_current_user().await?;
        Ok(serde_json::to_string_pretty(&user)?)
    }
}
