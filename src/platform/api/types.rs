//! API request and response types for the Luncurkan Platform API
//!
//! These types mirror the backend DTOs for projects, deployments, organizations
//! and GitHub App installations. Field names are snake_case on the wire.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::platform::dependency::{Dependency, RawDependency};

/// Identifier that the backend may send either as a string or as an integer
///
/// Always rendered as a string; `as_i64` recovers the numeric form for
/// endpoints that require it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric form of the id, if it is an integer
    pub fn as_i64(&self) -> Option<i64> {
        self.0.trim().parse().ok()
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for ResourceId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for ResourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Uint(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Int(n) => Self(n.to_string()),
            Raw::Uint(n) => Self(n.to_string()),
        })
    }
}

/// Timestamp exactly as the backend sent it
///
/// The backend mixes RFC 3339, SQL-style `YYYY-MM-DD HH:MM:SS` and epoch
/// numbers, so the raw text is kept and parsed only on request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse as UTC; epoch numbers of 10^11 and above are taken as milliseconds
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let raw = self.0.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(naive.and_utc());
            }
        }
        let epoch: i64 = raw.parse().ok()?;
        if epoch.abs() >= 100_000_000_000 {
            DateTime::from_timestamp_millis(epoch)
        } else {
            DateTime::from_timestamp(epoch, 0)
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Timestamp {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Int(n) => Self(n.to_string()),
            Raw::Float(n) => Self(n.to_string()),
        })
    }
}

/// API error response format
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorResponse {
    /// Error message
    pub error: Option<String>,
    /// Detailed error message
    pub message: Option<String>,
}

impl ApiErrorResponse {
    /// Get the error message, preferring `error` over `message`
    pub fn get_message(&self) -> Option<String> {
        self.error
            .clone()
            .filter(|e| !e.is_empty())
            .or_else(|| self.message.clone().filter(|m| !m.is_empty()))
    }
}

/// Authenticated user (from /auth/me)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// "admin" or "member"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Project information
///
/// A project points at a source repository plus whatever the platform
/// detected about its runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier
    pub id: ResourceId,
    /// Project display name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    /// GitHub App installation that grants access to the repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo_url: Option<String>,
    /// "owner/repo"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo_full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_default_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_build_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_start_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

/// Network endpoints of a running deployment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentEndpoints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_cluster_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_dns: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    /// Bound domains, without scheme
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains: Option<Vec<String>>,
}

/// Deployment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Pending,
    Processing,
    Processed,
    Completed,
    Running,
    Fail,
    /// Any status this client does not know about yet
    #[serde(other)]
    Unknown,
}

impl DeploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentStatus::Pending => "pending",
            DeploymentStatus::Processing => "processing",
            DeploymentStatus::Processed => "processed",
            DeploymentStatus::Completed => "completed",
            DeploymentStatus::Running => "running",
            DeploymentStatus::Fail => "fail",
            DeploymentStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deployment information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    pub id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ResourceId>,
    /// Absent when the backend leaves it out of a response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeploymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_variables: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<DeploymentEndpoints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
}

impl Deployment {
    /// Commit SHA shortened to 7 characters for summaries
    pub fn short_commit_sha(&self) -> Option<&str> {
        self.commit_sha
            .as_deref()
            .map(|sha| sha.get(..7).unwrap_or(sha))
    }
}

/// Organization information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: ResourceId,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

/// Organization membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationMember {
    pub id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<ResourceId>,
    /// "owner", "admin" or "member"
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// GitHub App installation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub installation_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub account_login: String,
    pub account_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<i64>,
}

/// Repository visible through an installation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepository {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    pub html_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub default_branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Project starter template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubTemplate {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub github_url: String,
}

/// Filters for the template listing
#[derive(Debug, Clone, Default)]
pub struct TemplateFilters {
    pub category: Option<String>,
    pub language: Option<String>,
    pub search: Option<String>,
}

impl TemplateFilters {
    /// Encoded query string without the leading `?`, empty when no filter is set
    pub fn to_query(&self) -> String {
        [
            ("category", &self.category),
            ("language", &self.language),
            ("search", &self.search),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| format!("{}={}", key, urlencoding::encode(v)))
        })
        .collect::<Vec<_>>()
        .join("&")
    }
}

/// Request body for creating a project from a GitHub repository
#[derive(Debug, Clone, Serialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub installation_id: i64,
    pub github_repo_id: i64,
    pub github_repo_full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_repo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_default_branch: Option<String>,
}

/// Request body for creating a project from a template
#[derive(Debug, Clone, Serialize)]
pub struct CreateProjectFromTemplateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub template_slug: String,
    pub installation_id: i64,
}

// =============================================================================
// Deployment Types
// =============================================================================

/// CPU and memory for one deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAllocation {
    /// Millicores (250 = 0.25 vCPU)
    pub cpu: u32,
    /// MiB
    pub memory: u32,
}

impl ResourceAllocation {
    pub fn is_valid(&self) -> bool {
        self.cpu > 0 && self.memory > 0
    }
}

/// Resource block of a repository config; either field may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigResources {
    #[serde(default)]
    pub cpu: Option<u32>,
    #[serde(default)]
    pub memory: Option<u32>,
}

/// Contents of a repository's `luncurkan.json`
///
/// Parsed field by field: a field with the wrong shape is left out and
/// reported in `warnings`, the rest of the file still applies.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepoConfig {
    pub resources: Option<ConfigResources>,
    pub build_command: Option<String>,
    pub start_command: Option<String>,
    pub environment_variables: Option<BTreeMap<String, String>>,
    pub domains: Option<Vec<String>>,
    /// Loosely typed; checked when turned into [`Dependency`] values
    pub dependencies: Option<Vec<RawDependency>>,
    /// Fields that were ignored while parsing
    #[serde(skip)]
    pub warnings: Vec<String>,
}

impl RepoConfig {
    /// Parse a config object, keeping every field that has a usable shape
    ///
    /// Only a non-object document is an error. Numeric strings and integral
    /// floats are accepted for resources; numbers and booleans in
    /// `environment_variables` are turned into strings.
    pub fn from_json(value: Value) -> Result<Self, String> {
        let Value::Object(mut object) = value else {
            return Err(format!("expected an object, got {}", json_kind(&value)));
        };
        let mut warnings = Vec::new();

        let resources = match object.remove("resources") {
            None | Some(Value::Null) => None,
            Some(Value::Object(fields)) => Some(ConfigResources {
                cpu: resource_field(&fields, "cpu", &mut warnings),
                memory: resource_field(&fields, "memory", &mut warnings),
            }),
            Some(other) => {
                warnings.push(wrong_shape("resources", "an object", &other));
                None
            }
        };

        let build_command = string_field(&mut object, "build_command", &mut warnings);
        let start_command = string_field(&mut object, "start_command", &mut warnings);

        let environment_variables = match object.remove("environment_variables") {
            None | Some(Value::Null) => None,
            Some(Value::Object(vars)) => {
                let mut env = BTreeMap::new();
                for (name, value) in vars {
                    match value {
                        Value::String(text) => {
                            env.insert(name, text);
                        }
                        Value::Number(_) | Value::Bool(_) => {
                            env.insert(name, value.to_string());
                        }
                        other => warnings.push(wrong_shape(
                            &format!("environment_variables.{}", name),
                            "a string",
                            &other,
                        )),
                    }
                }
                Some(env)
            }
            Some(other) => {
                warnings.push(wrong_shape("environment_variables", "an object", &other));
                None
            }
        };

        let domains = match object.remove("domains") {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(
                items
                    .into_iter()
                    .enumerate()
                    .filter_map(|(index, item)| match item {
                        Value::String(domain) => Some(domain),
                        other => {
                            warnings.push(wrong_shape(&format!("domains[{}]", index), "a string", &other));
                            None
                        }
                    })
                    .collect(),
            ),
            Some(other) => {
                warnings.push(wrong_shape("domains", "an array", &other));
                None
            }
        };

        let dependencies = match object.remove("dependencies") {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(
                items
                    .into_iter()
                    .enumerate()
                    .filter_map(|(index, item)| match item {
                        Value::Object(fields) => Some(RawDependency::from_fields(fields)),
                        other => {
                            warnings.push(wrong_shape(
                                &format!("dependencies[{}]", index),
                                "an object",
                                &other,
                            ));
                            None
                        }
                    })
                    .collect(),
            ),
            Some(other) => {
                warnings.push(wrong_shape("dependencies", "an array", &other));
                None
            }
        };

        Ok(RepoConfig {
            resources,
            build_command,
            start_command,
            environment_variables,
            domains,
            dependencies,
            warnings,
        })
    }
}

impl<'de> Deserialize<'de> for RepoConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        RepoConfig::from_json(value).map_err(de::Error::custom)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn wrong_shape(field: &str, expected: &str, got: &Value) -> String {
    format!("{}: expected {}, got {}, ignored", field, expected, json_kind(got))
}

fn string_field(object: &mut Map<String, Value>, key: &str, warnings: &mut Vec<String>) -> Option<String> {
    match object.remove(key)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => {
            warnings.push(wrong_shape(key, "a string", &other));
            None
        }
    }
}

fn resource_field(fields: &Map<String, Value>, key: &str, warnings: &mut Vec<String>) -> Option<u32> {
    let value = fields.get(key)?;
    let parsed = match value {
        Value::Null => return None,
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    match parsed.and_then(|n| u32::try_from(n).ok()) {
        Some(n) => Some(n),
        None => {
            warnings.push(format!(
                "resources.{}: expected a non-negative integer, got {}, ignored",
                key, value
            ));
            None
        }
    }
}

/// Request body for creating a deployment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateDeploymentRequest {
    /// UUID v7
    pub id: String,
    pub project_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_variables: Option<BTreeMap<String, String>>,
    pub dependencies: Vec<Dependency>,
    pub resources: ResourceAllocation,
}

/// Optional adjustments sent with a redeploy
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RedeployRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceAllocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_variables: Option<BTreeMap<String, String>>,
}

impl RedeployRequest {
    pub fn is_empty(&self) -> bool {
        self.resources.is_none() && self.branch.is_none() && self.environment_variables.is_none()
    }
}

/// Response from the redeploy endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedeployResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub deployment_id: Option<ResourceId>,
    #[serde(default)]
    pub stream_url: Option<String>,
    #[serde(default)]
    pub deployment: Option<Deployment>,
}
