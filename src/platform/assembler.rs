//! Deployment assembly
//!
//! Turns a project id plus caller overrides into one complete deployment
//! request. Three sources compete for every field: the caller's arguments,
//! the repository's `luncurkan.json`, and what the platform detected about
//! the project (backed by [`DeployDefaults`]).
//!
//! Precedence differs per field:
//!
//! | Field | Order |
//! |---|---|
//! | resources | caller (whole) > repo config (per field) > defaults |
//! | dependencies | caller (verbatim) > repo config (fresh ids) > auto-constructed |
//! | build/start command | repo config > caller |
//! | environment variables | caller > repo config |
//!
//! Only the project fetch can fail the operation. A repo config that is
//! missing or cannot be fetched is treated as absent.

use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::config::types::DeployDefaults;
use crate::platform::api::{
    CreateDeploymentRequest, Deployment, PlatformApiClient, PlatformApiError, Project,
    RepoConfig, ResourceAllocation,
};
use crate::platform::dependency::Dependency;
use crate::platform::domains::DomainGenerator;
use crate::platform::ids::new_id;

const SUCCESS_MESSAGE: &str = "Deployment triggered successfully";
const REPO_CONFIG_NOTE: &str = " (using luncurkan.json config)";

/// Everything a caller may pin when creating a deployment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeploymentOverrides {
    pub name: Option<String>,
    pub version: Option<String>,
    pub branch: Option<String>,
    pub build_command: Option<String>,
    pub start_command: Option<String>,
    pub environment_variables: Option<BTreeMap<String, String>>,
    /// Used verbatim when non-empty
    pub dependencies: Option<Vec<Dependency>>,
    /// Wins outright over repo config and defaults
    pub resources: Option<ResourceAllocation>,
}

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("resources.cpu and resources.memory must be positive integers (got cpu={cpu}, memory={memory})")]
    InvalidResources { cpu: u32, memory: u32 },

    #[error(transparent)]
    Api(#[from] PlatformApiError),
}

/// A request ready for submission, plus how it was derived
#[derive(Debug, Clone)]
pub struct AssembledDeployment {
    pub request: CreateDeploymentRequest,
    pub used_repo_config: bool,
    /// Problems found in repo-config dependencies
    pub warnings: Vec<String>,
}

/// Result of a submitted deployment
#[derive(Debug, Clone)]
pub struct DeploymentOutcome {
    pub deployment: Deployment,
    pub used_repo_config: bool,
    pub warnings: Vec<String>,
}

impl DeploymentOutcome {
    pub fn message(&self) -> String {
        if self.used_repo_config {
            format!("{}{}", SUCCESS_MESSAGE, REPO_CONFIG_NOTE)
        } else {
            SUCCESS_MESSAGE.to_string()
        }
    }
}

/// Builds and submits deployments for projects
#[derive(Debug, Clone)]
pub struct DeploymentAssembler {
    client: Arc<PlatformApiClient>,
    defaults: DeployDefaults,
    domains: DomainGenerator,
}

impl DeploymentAssembler {
    pub fn new(client: Arc<PlatformApiClient>, defaults: DeployDefaults) -> Self {
        let domains = DomainGenerator::new(defaults.domain_suffix.clone());
        Self {
            client,
            defaults,
            domains,
        }
    }

    pub fn defaults(&self) -> &DeployDefaults {
        &self.defaults
    }

    /// Assemble a deployment for `project_id` and submit it once
    pub async fn create_deployment(
        &self,
        project_id: i64,
        overrides: DeploymentOverrides,
    ) -> Result<DeploymentOutcome, AssembleError> {
        if let Some(resources) = overrides.resources {
            if !resources.is_valid() {
                return Err(AssembleError::InvalidResources {
                    cpu: resources.cpu,
                    memory: resources.memory,
                });
            }
        }

        let project = self.client.get_project(&project_id.to_string()).await?;
        let config = self
            .fetch_repo_config(&project, overrides.branch.as_deref())
            .await;

        let assembled = self.assemble(project_id, &project, config.as_ref(), overrides);
        for warning in &assembled.warnings {
            log::warn!("luncurkan.json: {}", warning);
        }

        log::info!(
            "Submitting deployment {} for project {} ({} dependencies)",
            assembled.request.id,
            project_id,
            assembled.request.dependencies.len()
        );
        let deployment = self.client.create_deployment(&assembled.request).await?;

        Ok(DeploymentOutcome {
            deployment,
            used_repo_config: assembled.used_repo_config,
            warnings: assembled.warnings,
        })
    }

    /// Fetch the project's repo config, treating every failure as "no config"
    async fn fetch_repo_config(&self, project: &Project, branch: Option<&str>) -> Option<RepoConfig> {
        let installation_id = project.installation_id.filter(|id| *id != 0)?;
        let full_name = non_empty(&project.github_repo_full_name)?;
        let (owner, repo) = split_repo_full_name(full_name)?;
        let git_ref = self.resolve_branch(project, branch);

        match self
            .client
            .get_repo_config(installation_id, owner, repo, Some(&git_ref))
            .await
        {
            Ok(Some(config)) => {
                log::debug!("Using luncurkan.json from {}@{}", full_name, git_ref);
                Some(config)
            }
            Ok(None) => {
                log::debug!("No luncurkan.json in {}@{}", full_name, git_ref);
                None
            }
            Err(e) => {
                log::warn!(
                    "Could not fetch luncurkan.json from {}@{}, continuing without it: {}",
                    full_name,
                    git_ref,
                    e
                );
                None
            }
        }
    }

    /// Build the request from already-fetched inputs
    ///
    /// Performs no I/O; identifiers and the generated domain are fresh on
    /// every call.
    pub fn assemble(
        &self,
        project_id: i64,
        project: &Project,
        config: Option<&RepoConfig>,
        overrides: DeploymentOverrides,
    ) -> AssembledDeployment {
        let resources = resolve_resources(overrides.resources, config, self.defaults.resources);
        let mut warnings = config.map(|c| c.warnings.clone()).unwrap_or_default();
        let (dependencies, dependency_warnings) =
            self.resolve_dependencies(project, config, &overrides);
        warnings.extend(dependency_warnings);

        let build_command = config
            .and_then(|c| non_empty(&c.build_command))
            .or_else(|| non_empty(&overrides.build_command))
            .map(str::to_string);
        let start_command = config
            .and_then(|c| non_empty(&c.start_command))
            .or_else(|| non_empty(&overrides.start_command))
            .map(str::to_string);
        let environment_variables = overrides
            .environment_variables
            .clone()
            .or_else(|| config.and_then(|c| c.environment_variables.clone()));

        let request = CreateDeploymentRequest {
            id: new_id(),
            project_id,
            name: overrides.name,
            version: overrides.version,
            branch: overrides.branch,
            build_command,
            start_command,
            environment_variables,
            dependencies,
            resources,
        };

        AssembledDeployment {
            request,
            used_repo_config: config.is_some(),
            warnings,
        }
    }

    /// Caller branch, else the project's default branch, else the configured default
    fn resolve_branch(&self, project: &Project, branch: Option<&str>) -> String {
        branch
            .filter(|b| !b.is_empty())
            .or_else(|| non_empty(&project.github_default_branch))
            .unwrap_or(self.defaults.default_branch.as_str())
            .to_string()
    }

    fn resolve_dependencies(
        &self,
        project: &Project,
        config: Option<&RepoConfig>,
        overrides: &DeploymentOverrides,
    ) -> (Vec<Dependency>, Vec<String>) {
        if let Some(deps) = overrides.dependencies.as_ref().filter(|d| !d.is_empty()) {
            return (deps.clone(), Vec::new());
        }

        if let Some(declared) = config
            .and_then(|c| c.dependencies.as_ref())
            .filter(|d| !d.is_empty())
        {
            let mut dependencies = Vec::with_capacity(declared.len());
            let mut warnings = Vec::new();
            for (index, raw) in declared.iter().cloned().enumerate() {
                let (dependency, issue) = raw.into_dependency(index, new_id());
                if let Some(issue) = issue {
                    warnings.push(issue.to_string());
                }
                dependencies.extend(dependency);
            }
            return (dependencies, warnings);
        }

        (self.auto_dependencies(project, config, overrides), Vec::new())
    }

    /// `[source?, builder?, env?, domain]`, in that order
    fn auto_dependencies(
        &self,
        project: &Project,
        config: Option<&RepoConfig>,
        overrides: &DeploymentOverrides,
    ) -> Vec<Dependency> {
        let mut dependencies = Vec::with_capacity(4);

        let repo_url = non_empty(&project.github_repo_url)
            .map(str::to_string)
            .or_else(|| {
                non_empty(&project.github_repo_full_name).map(|full_name| {
                    format!(
                        "{}/{}",
                        self.defaults.github_base_url.trim_end_matches('/'),
                        full_name
                    )
                })
            });
        if let Some(url) = repo_url {
            let git_ref = self.resolve_branch(project, overrides.branch.as_deref());
            dependencies.push(Dependency::source(new_id(), url, git_ref));
        }

        if let Some(lang) = non_empty(&project.detected_language) {
            let command = config
                .and_then(|c| non_empty(&c.start_command))
                .or_else(|| non_empty(&project.detected_start_command))
                .unwrap_or(self.defaults.fallback_start_command.as_str());
            let root_path =
                non_empty(&project.root_path).unwrap_or(self.defaults.builder_root_path.as_str());
            dependencies.push(Dependency::builder(
                new_id(),
                lang,
                self.defaults.builder_version.clone(),
                command,
                root_path,
                self.defaults.builder_env.clone(),
            ));
        }

        let env_vars = overrides
            .environment_variables
            .as_ref()
            .or_else(|| config.and_then(|c| c.environment_variables.as_ref()));
        if let Some(vars) = env_vars.filter(|v| !v.is_empty()) {
            dependencies.push(Dependency::env(new_id(), vars));
        }

        dependencies.push(Dependency::domain(new_id(), vec![self.domains.new_domain()]));
        dependencies
    }
}

/// Caller resources win outright; repo config fills per field, with 0 or a
/// missing field falling back to the default
pub fn resolve_resources(
    caller: Option<ResourceAllocation>,
    config: Option<&RepoConfig>,
    default: ResourceAllocation,
) -> ResourceAllocation {
    if let Some(resources) = caller {
        return resources;
    }
    match config.and_then(|c| c.resources) {
        Some(configured) => ResourceAllocation {
            cpu: configured.cpu.filter(|v| *v > 0).unwrap_or(default.cpu),
            memory: configured.memory.filter(|v| *v > 0).unwrap_or(default.memory),
        },
        None => default,
    }
}

/// `owner/repo` from a full name; extra segments are ignored
pub fn split_repo_full_name(full_name: &str) -> Option<(&str, &str)> {
    let mut parts = full_name.split('/');
    let owner = parts.next().filter(|s| !s.is_empty())?;
    let repo = parts.next().filter(|s| !s.is_empty())?;
    Some((owner, repo))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::api::{ConfigResources, ResourceId};
    use crate::platform::dependency::DependencyKind;
    use proptest::prelude::*;
    use serde_json::json;

    fn assembler() -> DeploymentAssembler {
        let client = PlatformApiClient::with_url("token", "http://127.0.0.1:9").unwrap();
        DeploymentAssembler::new(Arc::new(client), DeployDefaults::default())
    }

    fn project() -> Project {
        Project {
            id: ResourceId::from(7i64),
            name: "widget".to_string(),
            installation_id: Some(11),
            github_repo_full_name: Some("acme/widget".to_string()),
            github_default_branch: Some("trunk".to_string()),
            detected_language: Some("node".to_string()),
            detected_start_command: Some("node server.js".to_string()),
            ..Default::default()
        }
    }

    fn kinds(deps: &[Dependency]) -> Vec<DependencyKind> {
        deps.iter().map(|d| d.kind).collect()
    }

    fn config(value: serde_json::Value) -> RepoConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults_without_config_or_overrides() {
        let assembled = assembler().assemble(7, &project(), None, DeploymentOverrides::default());
        let request = &assembled.request;

        assert_eq!(request.resources, ResourceAllocation { cpu: 250, memory: 256 });
        assert_eq!(request.project_id, 7);
        assert_eq!(request.branch, None);
        assert_eq!(request.build_command, None);
        assert_eq!(request.start_command, None);
        assert_eq!(request.environment_variables, None);
        assert!(!assembled.used_repo_config);
        assert_eq!(
            kinds(&request.dependencies),
            vec![DependencyKind::Source, DependencyKind::Builder, DependencyKind::Domain]
        );
    }

    #[test]
    fn test_source_url_built_from_full_name() {
        let assembled = assembler().assemble(7, &project(), None, DeploymentOverrides::default());
        let source = &assembled.request.dependencies[0];
        assert_eq!(source.url.as_deref(), Some("https://github.com/acme/widget"));
        assert_eq!(source.git_ref.as_deref(), Some("trunk"));
    }

    #[test]
    fn test_explicit_repo_url_and_caller_branch() {
        let mut project = project();
        project.github_repo_url = Some("https://git.example.com/acme/widget".to_string());
        let overrides = DeploymentOverrides {
            branch: Some("release".to_string()),
            ..Default::default()
        };

        let assembled = assembler().assemble(7, &project, None, overrides);
        let source = &assembled.request.dependencies[0];
        assert_eq!(source.url.as_deref(), Some("https://git.example.com/acme/widget"));
        assert_eq!(source.git_ref.as_deref(), Some("release"));
        assert_eq!(assembled.request.branch.as_deref(), Some("release"));
    }

    #[test]
    fn test_branch_falls_back_to_main() {
        let mut project = project();
        project.github_default_branch = Some(String::new());
        let assembled = assembler().assemble(7, &project, None, DeploymentOverrides::default());
        assert_eq!(assembled.request.dependencies[0].git_ref.as_deref(), Some("main"));
    }

    #[test]
    fn test_builder_fields() {
        let assembled = assembler().assemble(7, &project(), None, DeploymentOverrides::default());
        let builder = &assembled.request.dependencies[1];
        assert_eq!(builder.lang.as_deref(), Some("node"));
        assert_eq!(builder.version.as_deref(), Some("latest"));
        assert_eq!(builder.command.as_deref(), Some("node server.js"));
        assert_eq!(builder.root_path.as_deref(), Some("."));
        assert_eq!(
            serde_json::to_value(&builder.env).unwrap(),
            json!({ "HOST": "0.0.0.0", "PORT": "3000" })
        );
    }

    #[test]
    fn test_builder_command_prefers_repo_config() {
        let cfg = config(json!({ "start_command": "yarn serve" }));
        let assembled =
            assembler().assemble(7, &project(), Some(&cfg), DeploymentOverrides::default());
        assert_eq!(assembled.request.dependencies[1].command.as_deref(), Some("yarn serve"));

        let mut project = project();
        project.detected_start_command = None;
        let assembled = assembler().assemble(7, &project, None, DeploymentOverrides::default());
        assert_eq!(assembled.request.dependencies[1].command.as_deref(), Some("npm start"));
    }

    #[test]
    fn test_only_domain_for_bare_project() {
        let project = Project {
            id: ResourceId::from(1i64),
            name: "bare".to_string(),
            ..Default::default()
        };
        let assembled = assembler().assemble(1, &project, None, DeploymentOverrides::default());
        let deps = &assembled.request.dependencies;
        assert_eq!(kinds(deps), vec![DependencyKind::Domain]);
        let url = &deps[0].urls.as_ref().unwrap()[0];
        assert!(url.starts_with("https://") && url.ends_with(".luncurkan.app"));
    }

    #[test]
    fn test_env_dependency_from_caller_before_domain() {
        let overrides = DeploymentOverrides {
            environment_variables: Some(BTreeMap::from([
                ("NODE_ENV".to_string(), "production".to_string()),
            ])),
            ..Default::default()
        };
        let cfg = config(json!({ "environment_variables": { "FROM_CONFIG": "1" } }));

        let assembled = assembler().assemble(7, &project(), Some(&cfg), overrides);
        let deps = &assembled.request.dependencies;
        assert_eq!(
            kinds(deps),
            vec![
                DependencyKind::Source,
                DependencyKind::Builder,
                DependencyKind::Env,
                DependencyKind::Domain
            ]
        );
        assert_eq!(
            serde_json::to_value(&deps[2].env).unwrap(),
            json!([{ "key": "NODE_ENV", "val": "production" }])
        );
        assert_eq!(
            assembled.request.environment_variables,
            Some(BTreeMap::from([("NODE_ENV".to_string(), "production".to_string())]))
        );
    }

    #[test]
    fn test_env_dependency_from_config_when_caller_silent() {
        let cfg = config(json!({ "environment_variables": { "B": "2", "A": "1" } }));
        let assembled =
            assembler().assemble(7, &project(), Some(&cfg), DeploymentOverrides::default());
        let env = assembled
            .request
            .dependencies
            .iter()
            .find(|d| d.kind == DependencyKind::Env)
            .unwrap();
        assert_eq!(
            serde_json::to_value(&env.env).unwrap(),
            json!([{ "key": "A", "val": "1" }, { "key": "B", "val": "2" }])
        );
    }

    #[test]
    fn test_empty_caller_env_suppresses_env_dependency() {
        let overrides = DeploymentOverrides {
            environment_variables: Some(BTreeMap::new()),
            ..Default::default()
        };
        let cfg = config(json!({ "environment_variables": { "A": "1" } }));
        let assembled = assembler().assemble(7, &project(), Some(&cfg), overrides);
        assert!(!kinds(&assembled.request.dependencies).contains(&DependencyKind::Env));
        assert_eq!(assembled.request.environment_variables, Some(BTreeMap::new()));
    }

    #[test]
    fn test_caller_dependencies_are_verbatim() {
        let caller: Vec<Dependency> = serde_json::from_value(json!([
            { "type": "source", "ref": "dev" },
            { "type": "database", "db_type": "postgres", "managed": true }
        ]))
        .unwrap();
        let cfg = config(json!({ "dependencies": [{ "type": "runtime", "lang": "go" }] }));
        let overrides = DeploymentOverrides {
            dependencies: Some(caller.clone()),
            ..Default::default()
        };

        let assembled = assembler().assemble(7, &project(), Some(&cfg), overrides);
        assert_eq!(assembled.request.dependencies, caller);
        assert!(assembled.request.dependencies.iter().all(|d| d.id.is_none()));
    }

    #[test]
    fn test_empty_caller_dependencies_fall_through() {
        let overrides = DeploymentOverrides {
            dependencies: Some(Vec::new()),
            ..Default::default()
        };
        let assembled = assembler().assemble(7, &project(), None, overrides);
        assert_eq!(assembled.request.dependencies.last().unwrap().kind, DependencyKind::Domain);
    }

    #[test]
    fn test_config_dependencies_get_fresh_ids_and_warnings() {
        let cfg = config(json!({
            "dependencies": [
                { "type": "database", "db_type": "postgres", "id": "old" },
                { "type": "cache" },
                { "type": "source" }
            ]
        }));
        let assembled =
            assembler().assemble(7, &project(), Some(&cfg), DeploymentOverrides::default());
        let deps = &assembled.request.dependencies;

        assert_eq!(kinds(deps), vec![DependencyKind::Database, DependencyKind::Source]);
        assert!(deps.iter().all(|d| d.id.as_deref().is_some_and(|id| id != "old")));
        assert_ne!(deps[0].id, deps[1].id);
        assert_eq!(assembled.warnings.len(), 2);
        assert!(assembled.warnings[0].contains("unknown type 'cache'"));
        assert!(assembled.warnings[1].contains("missing url, ref"));
        assert!(assembled.used_repo_config);
    }

    #[test]
    fn test_config_dependencies_drop_caller_env_vars() {
        // Known quirk: a repo config with its own dependencies replaces the
        // auto-constructed list, so the caller's variables only reach the
        // top-level field and never become an env dependency.
        let cfg = config(json!({ "dependencies": [{ "type": "runtime", "lang": "go" }] }));
        let overrides = DeploymentOverrides {
            environment_variables: Some(BTreeMap::from([("K".to_string(), "v".to_string())])),
            ..Default::default()
        };

        let assembled = assembler().assemble(7, &project(), Some(&cfg), overrides);
        assert_eq!(kinds(&assembled.request.dependencies), vec![DependencyKind::Runtime]);
        assert_eq!(
            assembled.request.environment_variables,
            Some(BTreeMap::from([("K".to_string(), "v".to_string())]))
        );
    }

    #[test]
    fn test_commands_prefer_repo_config() {
        let cfg = config(json!({ "build_command": "make", "start_command": "" }));
        let overrides = DeploymentOverrides {
            build_command: Some("npm run build".to_string()),
            start_command: Some("npm start".to_string()),
            ..Default::default()
        };
        let assembled = assembler().assemble(7, &project(), Some(&cfg), overrides);
        assert_eq!(assembled.request.build_command.as_deref(), Some("make"));
        assert_eq!(assembled.request.start_command.as_deref(), Some("npm start"));
    }

    #[test]
    fn test_request_ids_are_fresh() {
        let a = assembler();
        let first = a.assemble(7, &project(), None, DeploymentOverrides::default());
        let second = a.assemble(7, &project(), None, DeploymentOverrides::default());
        assert_ne!(first.request.id, second.request.id);

        let mut ids: Vec<&str> = first
            .request
            .dependencies
            .iter()
            .filter_map(|d| d.id.as_deref())
            .collect();
        ids.push(&first.request.id);
        let count = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn test_config_resources_fill_per_field() {
        let default = ResourceAllocation { cpu: 250, memory: 256 };
        let cfg = RepoConfig {
            resources: Some(ConfigResources {
                cpu: Some(500),
                memory: Some(0),
            }),
            ..Default::default()
        };
        assert_eq!(
            resolve_resources(None, Some(&cfg), default),
            ResourceAllocation { cpu: 500, memory: 256 }
        );
        assert_eq!(resolve_resources(None, Some(&RepoConfig::default()), default), default);
    }

    #[test]
    fn test_split_repo_full_name() {
        assert_eq!(split_repo_full_name("acme/widget"), Some(("acme", "widget")));
        assert_eq!(split_repo_full_name("acme/widget/extra"), Some(("acme", "widget")));
        assert_eq!(split_repo_full_name("acme"), None);
        assert_eq!(split_repo_full_name("/widget"), None);
        assert_eq!(split_repo_full_name("acme/"), None);
    }

    #[test]
    fn test_outcome_message() {
        let outcome = DeploymentOutcome {
            deployment: serde_json::from_value(json!({ "id": "d1" })).unwrap(),
            used_repo_config: true,
            warnings: Vec::new(),
        };
        assert_eq!(
            outcome.message(),
            "Deployment triggered successfully (using luncurkan.json config)"
        );
    }

    #[tokio::test]
    async fn test_invalid_caller_resources_fail_before_io() {
        let overrides = DeploymentOverrides {
            resources: Some(ResourceAllocation { cpu: 0, memory: 128 }),
            ..Default::default()
        };
        // The client points at a closed port; reaching it would be an Api error.
        let result = assembler().create_deployment(7, overrides).await;
        assert!(matches!(
            result,
            Err(AssembleError::InvalidResources { cpu: 0, memory: 128 })
        ));
    }

    proptest! {
        #[test]
        fn prop_caller_resources_always_win(
            cpu in 1u32..10_000,
            memory in 1u32..65_536,
            cfg_cpu in proptest::option::of(0u32..10_000),
            cfg_memory in proptest::option::of(0u32..65_536),
            has_config in any::<bool>(),
            has_resources in any::<bool>(),
        ) {
            let caller = ResourceAllocation { cpu, memory };
            let cfg = RepoConfig {
                resources: has_resources.then_some(ConfigResources { cpu: cfg_cpu, memory: cfg_memory }),
                ..Default::default()
            };
            let config = has_config.then_some(&cfg);
            let default = ResourceAllocation { cpu: 250, memory: 256 };
            prop_assert_eq!(resolve_resources(Some(caller), config, default), caller);
        }

        #[test]
        fn prop_resolved_resources_are_positive(
            cfg_cpu in proptest::option::of(0u32..10_000),
            cfg_memory in proptest::option::of(0u32..65_536),
        ) {
            let cfg = RepoConfig {
                resources: Some(ConfigResources { cpu: cfg_cpu, memory: cfg_memory }),
                ..Default::default()
            };
            let default = ResourceAllocation { cpu: 250, memory: 256 };
            prop_assert!(resolve_resources(None, Some(&cfg), default).is_valid());
        }
    }
}
