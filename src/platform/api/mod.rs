//! Platform API client module
//!
//! Provides authenticated access to the Luncurkan Platform API for managing
//! projects, deployments, organizations and GitHub App installations.
//!
//! # Example
//!
//! ```rust,ignore
//! use luncurkan_mcp::platform::api::PlatformApiClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PlatformApiClient::new("lnk_token")?;
//!
//!     for project in client.list_projects(None).await? {
//!         println!("Project: {}", project.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use client::{DEFAULT_API_URL, PlatformApiClient};
pub use error::{PlatformApiError, Result};
pub use types::{
    ConfigResources, CreateDeploymentRequest, CreateProjectFromTemplateRequest,
    CreateProjectRequest, Deployment, DeploymentEndpoints, DeploymentStatus, GitHubRepository,
    GitHubTemplate, Installation, Organization, OrganizationMember, Project, RedeployRequest,
    RedeployResponse, RepoConfig, ResourceAllocation, ResourceId, TemplateFilters, Timestamp,
    User,
};
