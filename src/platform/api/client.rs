//! Platform API client for Luncurkan
//!
//! Provides bearer-token authenticated access to the Luncurkan Platform API
//! for projects, deployments, organizations and GitHub App installations.
//! The client holds no mutable state; it is built once and shared.

use super::error::{PlatformApiError, Result};
use super::types::{
    ApiErrorResponse, CreateDeploymentRequest, CreateProjectFromTemplateRequest,
    CreateProjectRequest, Deployment, GitHubRepository, GitHubTemplate, Installation,
    Organization, OrganizationMember, Project, RedeployRequest, RedeployResponse, RepoConfig,
    TemplateFilters, User,
};
use crate::config::types::ApiConfig;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Production API URL
pub const DEFAULT_API_URL: &str = "https://workers.luncurkan.dev";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent for API requests
const USER_AGENT: &str = concat!("luncurkan-mcp/", env!("CARGO_PKG_VERSION"));

/// Client for interacting with the Luncurkan Platform API
#[derive(Debug, Clone)]
pub struct PlatformApiClient {
    /// HTTP client with configured timeout and headers
    http_client: Client,
    /// Base API URL, without trailing slash
    api_url: String,
    /// Bearer token
    token: String,
}

impl PlatformApiClient {
    /// Create a new Platform API client against the production API
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_url(token, DEFAULT_API_URL)
    }

    /// Create a new Platform API client with a custom API URL
    pub fn with_url(token: impl Into<String>, api_url: impl Into<String>) -> Result<Self> {
        Self::build(token.into(), api_url.into(), DEFAULT_TIMEOUT)
    }

    /// Create a client from the `[api]` config section
    pub fn from_config(token: impl Into<String>, config: &ApiConfig) -> Result<Self> {
        Self::build(
            token.into(),
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn build(token: String, api_url: String, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(PlatformApiError::HttpError)?;

        Ok(Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Get the configured API URL
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http_client
            .request(method, format!("{}{}", self.api_url, path))
            .bearer_auth(&self.token)
    }

    /// Make an authenticated GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path).send().await?;
        self.handle_response(response).await
    }

    /// Make an authenticated GET request that returns Option<T>
    /// Returns None for 404 responses instead of an error
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let response = self.request(Method::GET, path).send().await?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        self.handle_response(response).await.map(Some)
    }

    /// Make an authenticated POST request with a JSON body
    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        self.handle_response(response).await
    }

    /// Make an authenticated POST request without a body
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::POST, path).send().await?;
        self.handle_response(response).await
    }

    /// Make an authenticated DELETE request, ignoring any response body
    async fn delete(&self, path: &str) -> Result<()> {
        let response = self.request(Method::DELETE, path).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Handle the HTTP response, converting errors appropriately
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status().is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| PlatformApiError::ParseError(e.to_string()))
        } else {
            Err(error_from_response(response).await)
        }
    }

    // =========================================================================
    // Auth API methods
    // =========================================================================

    /// Get the current authenticated user
    ///
    /// Endpoint: GET /auth/me
    pub async fn get_current_user(&self) -> Result<User> {
        self.get("/auth/me").await
    }

    // =========================================================================
    // Project API methods
    // =========================================================================

    /// List projects, optionally scoped to an organization
    ///
    /// Endpoint: GET /api/projects or GET /api/organizations/:slug/projects
    pub async fn list_projects(&self, organization_slug: Option<&str>) -> Result<Vec<Project>> {
        let path = match organization_slug.filter(|s| !s.is_empty()) {
            Some(slug) => format!("/api/organizations/{}/projects", segment(slug)),
            None => "/api/projects".to_string(),
        };
        let body: Value = self.get(&path).await?;
        field(body, "projects")
    }

    /// Get a project by ID
    ///
    /// Endpoint: GET /api/projects/:id
    pub async fn get_project(&self, project_id: &str) -> Result<Project> {
        let body: Value = self
            .get(&format!("/api/projects/{}", segment(project_id)))
            .await?;
        field(body, "project")
    }

    /// Create a project from a GitHub repository
    ///
    /// Endpoint: POST /api/projects/github
    pub async fn create_project(&self, request: &CreateProjectRequest) -> Result<Project> {
        let body: Value = self.post("/api/projects/github", request).await?;
        field(body, "project")
    }

    /// Create a project from a template
    ///
    /// Endpoint: POST /api/projects/template
    pub async fn create_project_from_template(
        &self,
        request: &CreateProjectFromTemplateRequest,
    ) -> Result<Project> {
        let body: Value = self.post("/api/projects/template", request).await?;
        field(body, "project")
    }

    /// Delete a project and all its deployments
    ///
    /// Endpoint: DELETE /api/projects/:id
    pub async fn delete_project(&self, project_id: &str) -> Result<()> {
        self.delete(&format!("/api/projects/{}", segment(project_id)))
            .await
    }

    // =========================================================================
    // GitHub installation API methods
    // =========================================================================

    /// List GitHub App installations
    ///
    /// Endpoint: GET /api/installations
    pub async fn list_installations(&self) -> Result<Vec<Installation>> {
        let body: Value = self.get("/api/installations").await?;
        field(body, "installations")
    }

    /// List repositories accessible through an installation
    ///
    /// Endpoint: GET /api/installations/:id/repos
    pub async fn list_installation_repos(
        &self,
        installation_id: i64,
    ) -> Result<Vec<GitHubRepository>> {
        let body: Value = self
            .get(&format!("/api/installations/{}/repos", installation_id))
            .await?;
        field(body, "repositories")
    }

    /// Fetch a repository's `luncurkan.json` at `git_ref`
    ///
    /// Returns `None` when the file (or the repository) does not exist.
    ///
    /// Endpoint: GET /api/installations/:id/repos/:owner/:repo/config?ref=
    pub async fn get_repo_config(
        &self,
        installation_id: i64,
        owner: &str,
        repo: &str,
        git_ref: Option<&str>,
    ) -> Result<Option<RepoConfig>> {
        #[derive(Deserialize)]
        struct Envelope {
            #[serde(default)]
            config: Option<RepoConfig>,
        }

        let path = repo_config_path(installation_id, owner, repo, git_ref);
        let envelope: Option<Envelope> = self.get_optional(&path).await?;
        Ok(envelope.and_then(|e| e.config))
    }

    // =========================================================================
    // Template API methods
    // =========================================================================

    /// List project templates
    ///
    /// Endpoint: GET /api/templates/github?category=&language=&search=
    pub async fn list_templates(&self, filters: &TemplateFilters) -> Result<Vec<GitHubTemplate>> {
        let query = filters.to_query();
        let path = if query.is_empty() {
            "/api/templates/github".to_string()
        } else {
            format!("/api/templates/github?{}", query)
        };
        let body: Value = self.get(&path).await?;
        field(body, "templates")
    }

    // =========================================================================
    // Deployment API methods
    // =========================================================================

    /// List deployments for a project
    ///
    /// Endpoint: GET /api/projects/:id/deployments
    pub async fn list_deployments(&self, project_id: &str) -> Result<Vec<Deployment>> {
        let body: Value = self
            .get(&format!("/api/projects/{}/deployments", segment(project_id)))
            .await?;
        field(body, "deployments")
    }

    /// Get deployment details
    ///
    /// Endpoint: GET /api/deployments/:id
    pub async fn get_deployment(&self, deployment_id: &str) -> Result<Deployment> {
        let body: Value = self
            .get(&format!("/api/deployments/{}", segment(deployment_id)))
            .await?;
        field(body, "deployment")
    }

    /// Submit a fully assembled deployment
    ///
    /// Endpoint: POST /api/projects/:id/deployments
    pub async fn create_deployment(&self, request: &CreateDeploymentRequest) -> Result<Deployment> {
        let body: Value = self
            .post(
                &format!("/api/projects/{}/deployments", request.project_id),
                request,
            )
            .await?;
        field(body, "deployment")
    }

    /// Redeploy an existing deployment, optionally adjusting it
    ///
    /// The options are sent as the body only when at least one is set.
    ///
    /// Endpoint: POST /api/deployments/:id/redeploy
    pub async fn redeploy(
        &self,
        deployment_id: &str,
        options: &RedeployRequest,
    ) -> Result<RedeployResponse> {
        let path = format!("/api/deployments/{}/redeploy", segment(deployment_id));
        if options.is_empty() {
            self.post_empty(&path).await
        } else {
            self.post(&path, options).await
        }
    }

    /// Get build and runtime logs
    ///
    /// Endpoint: GET /api/deployments/:id/logs
    pub async fn get_deployment_logs(&self, deployment_id: &str) -> Result<Value> {
        let body: Value = self
            .get(&format!("/api/deployments/{}/logs", segment(deployment_id)))
            .await?;
        field(body, "logs")
    }

    /// Delete a deployment
    ///
    /// Endpoint: DELETE /api/deployments/:id
    pub async fn delete_deployment(&self, deployment_id: &str) -> Result<()> {
        self.delete(&format!("/api/deployments/{}", segment(deployment_id)))
            .await
    }

    // =========================================================================
    // Organization API methods
    // =========================================================================

    /// List organizations the user is a member of
    ///
    /// Endpoint: GET /api/organizations
    pub async fn list_organizations(&self) -> Result<Vec<Organization>> {
        let body: Value = self.get("/api/organizations").await?;
        field(body, "organizations")
    }

    /// Get an organization by slug
    ///
    /// Endpoint: GET /api/organizations/:slug
    pub async fn get_organization(&self, slug: &str) -> Result<Organization> {
        let body: Value = self
            .get(&format!("/api/organizations/{}", segment(slug)))
            .await?;
        field(body, "organization")
    }

    /// List members of an organization
    ///
    /// Endpoint: GET /api/organizations/:slug/members
    pub async fn list_organization_members(&self, slug: &str) -> Result<Vec<OrganizationMember>> {
        let body: Value = self
            .get(&format!("/api/organizations/{}/members", segment(slug)))
            .await?;
        field(body, "members")
    }
}

/// Normalize a non-success response into a single error
async fn error_from_response(response: reqwest::Response) -> PlatformApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    PlatformApiError::from_status(status, error_message(status, &body))
}

/// Body `error`, else body `message`, else `HTTP {status}`
pub(crate) fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .and_then(|e| e.get_message())
        .unwrap_or_else(|| format!("HTTP {}", status))
}

/// Pull one field out of a response envelope such as `{"project": {...}}`
fn field<T: DeserializeOwned>(mut body: Value, key: &str) -> Result<T> {
    let value = body
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| PlatformApiError::ParseError(format!("missing `{}` in response", key)))?;
    serde_json::from_value(value).map_err(|e| PlatformApiError::ParseError(e.to_string()))
}

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

pub(crate) fn repo_config_path(
    installation_id: i64,
    owner: &str,
    repo: &str,
    git_ref: Option<&str>,
) -> String {
    let base = format!(
        "/api/installations/{}/repos/{}/{}/config",
        installation_id,
        segment(owner),
        segment(repo)
    );
    match git_ref.filter(|r| !r.is_empty()) {
        Some(r) => format!("{}?ref={}", base, urlencoding::encode(r)),
        None => base,
    }
}
