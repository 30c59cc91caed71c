use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::platform::api::ResourceAllocation;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub probe: ProbeConfig,
    pub deploy: DeployDefaults,
}

impl Config {
    /// Reject values that parse but cannot work
    pub fn validate(&self) -> Result<(), String> {
        if self.api.timeout_secs == 0 {
            return Err("api.timeout_secs must be greater than 0".to_string());
        }
        if self.probe.timeout_secs == 0 {
            return Err("probe.timeout_secs must be greater than 0".to_string());
        }
        if !self.deploy.resources.is_valid() {
            return Err(format!(
                "deploy.resources must have positive cpu and memory (got cpu={}, memory={})",
                self.deploy.resources.cpu, self.deploy.resources.memory
            ));
        }
        Ok(())
    }
}

/// Platform API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Endpoint probe configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub timeout_secs: u64,
}

/// Values the deployment assembler falls back to when neither the caller
/// nor the repository config supplies one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployDefaults {
    /// Git ref used when neither the caller nor the project names a branch
    pub default_branch: String,
    pub resources: ResourceAllocation,
    /// Image version of auto-constructed builder dependencies
    pub builder_version: String,
    /// Builder command when neither repo config nor project detection has one
    pub fallback_start_command: String,
    pub builder_root_path: String,
    /// Environment baked into every auto-constructed builder dependency
    pub builder_env: BTreeMap<String, String>,
    /// Apex under which generated domains live
    pub domain_suffix: String,
    /// Prefix for source URLs built from `owner/repo`
    pub github_base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: crate::platform::api::DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl Default for DeployDefaults {
    fn default() -> Self {
        Self {
            default_branch: "main".to_string(),
            resources: ResourceAllocation {
                cpu: 250,
                memory: 256,
            },
            builder_version: "latest".to_string(),
            fallback_start_command: "npm start".to_string(),
            builder_root_path: ".".to_string(),
            builder_env: BTreeMap::from([
                ("HOST".to_string(), "0.0.0.0".to_string()),
                ("PORT".to_string(), "3000".to_string()),
            ]),
            domain_suffix: "luncurkan.app".to_string(),
            github_base_url: "https://github.com".to_string(),
        }
    }
}
