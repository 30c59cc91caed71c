//! Deployment dependencies
//!
//! A dependency is a unit the platform provisions next to a deployment: a
//! source checkout, a managed database, a runtime or builder image, an
//! environment bundle, or a domain binding. On the wire it is one object
//! discriminated by its `type` tag; fields that do not apply to the tag are
//! left out.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The six dependency kinds the platform understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Source,
    Database,
    Runtime,
    Builder,
    Env,
    Domain,
}

impl DependencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::Source => "source",
            DependencyKind::Database => "database",
            DependencyKind::Runtime => "runtime",
            DependencyKind::Builder => "builder",
            DependencyKind::Env => "env",
            DependencyKind::Domain => "domain",
        }
    }

    /// Fields that must be present for this kind to be provisionable
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            DependencyKind::Source => &["url", "ref"],
            DependencyKind::Database => &["db_type"],
            DependencyKind::Runtime => &["lang"],
            DependencyKind::Builder => &["lang", "command"],
            DependencyKind::Env => &["env"],
            DependencyKind::Domain => &["urls"],
        }
    }

    pub fn all() -> &'static [DependencyKind] {
        &[
            DependencyKind::Source,
            DependencyKind::Database,
            DependencyKind::Runtime,
            DependencyKind::Builder,
            DependencyKind::Env,
            DependencyKind::Domain,
        ]
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DependencyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DependencyKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown dependency type: '{}'. Valid options: source, database, runtime, builder, env, domain",
                    s
                )
            })
    }
}

/// One environment variable in list form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvPair {
    pub key: String,
    pub val: String,
}

/// Environment carried by a dependency: a mapping (builder) or a pair list (env)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvSpec {
    Map(BTreeMap<String, String>),
    Pairs(Vec<EnvPair>),
}

impl EnvSpec {
    /// Convert a mapping into the ordered `{key, val}` list form
    pub fn pairs_from(vars: &BTreeMap<String, String>) -> Self {
        EnvSpec::Pairs(
            vars.iter()
                .map(|(key, val)| EnvPair {
                    key: key.clone(),
                    val: val.clone(),
                })
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        match self {
            EnvSpec::Map(map) => map.is_empty(),
            EnvSpec::Pairs(pairs) => pairs.is_empty(),
        }
    }
}

/// A deployment dependency
///
/// Kind-specific fields are optional; `extra` keeps any field this client does
/// not model so config-declared dependencies reach the platform untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    /// UUID v7; absent only on caller-supplied dependencies, which are sent as given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: DependencyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed: Option<bool>,
    /// Git ref for `source`
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<EnvSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dependency {
    fn bare(id: String, kind: DependencyKind) -> Self {
        Self {
            id: Some(id),
            kind,
            managed: None,
            git_ref: None,
            db_type: None,
            url: None,
            lang: None,
            version: None,
            command: None,
            root_path: None,
            env: None,
            urls: None,
            extra: Map::new(),
        }
    }

    /// Repository checkout at `git_ref`
    pub fn source(id: String, url: impl Into<String>, git_ref: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            git_ref: Some(git_ref.into()),
            ..Self::bare(id, DependencyKind::Source)
        }
    }

    /// Build image for a detected language
    pub fn builder(
        id: String,
        lang: impl Into<String>,
        version: impl Into<String>,
        command: impl Into<String>,
        root_path: impl Into<String>,
        env: BTreeMap<String, String>,
    ) -> Self {
        Self {
            lang: Some(lang.into()),
            version: Some(version.into()),
            command: Some(command.into()),
            root_path: Some(root_path.into()),
            env: Some(EnvSpec::Map(env)),
            ..Self::bare(id, DependencyKind::Builder)
        }
    }

    /// Runtime environment variables
    pub fn env(id: String, vars: &BTreeMap<String, String>) -> Self {
        Self {
            env: Some(EnvSpec::pairs_from(vars)),
            ..Self::bare(id, DependencyKind::Env)
        }
    }

    /// Domain binding
    pub fn domain(id: String, urls: Vec<String>) -> Self {
        Self {
            urls: Some(urls),
            ..Self::bare(id, DependencyKind::Domain)
        }
    }

    /// Required fields for this dependency's kind that are missing or empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.kind
            .required_fields()
            .iter()
            .copied()
            .filter(|field| !self.has_field(field))
            .collect()
    }

    fn has_field(&self, field: &str) -> bool {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
        match field {
            "url" => present(&self.url),
            "ref" => present(&self.git_ref),
            "db_type" => present(&self.db_type),
            "lang" => present(&self.lang),
            "command" => present(&self.command),
            "env" => self.env.as_ref().is_some_and(|env| !env.is_empty()),
            "urls" => self.urls.as_ref().is_some_and(|urls| !urls.is_empty()),
            other => self.extra.contains_key(other),
        }
    }
}

/// Dependency as declared in a repository config: a `type` tag plus any fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDependency {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Problems found while turning config-declared dependencies into typed ones
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DependencyIssue {
    /// The `type` tag is not one of the six known kinds; the entry is dropped
    #[error("dependency #{index}: unknown type '{kind}', entry skipped")]
    UnknownKind { index: usize, kind: String },

    /// A field has the wrong shape for its kind; the entry is dropped
    #[error("dependency #{index} ({kind}): {reason}, entry skipped")]
    Malformed {
        index: usize,
        kind: DependencyKind,
        reason: String,
    },

    /// Required fields are missing; the entry is kept as declared
    #[error("dependency #{index} ({kind}): missing {}", .fields.join(", "))]
    MissingFields {
        index: usize,
        kind: DependencyKind,
        fields: Vec<&'static str>,
    },
}

impl DependencyIssue {
    /// Whether the offending entry is left out of the deployment
    pub fn is_dropped(&self) -> bool {
        !matches!(self, DependencyIssue::MissingFields { .. })
    }
}

impl RawDependency {
    /// Split a declared object into its `type` tag and the remaining fields
    ///
    /// A non-string tag is kept in its JSON form so it is reported as an
    /// unknown type rather than failing the whole config.
    pub fn from_fields(mut fields: Map<String, Value>) -> Self {
        let kind = match fields.remove("type") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(kind)) => kind,
            Some(other) => other.to_string(),
        };
        Self { kind, fields }
    }

    /// Type a config-declared dependency, assigning it `id`
    ///
    /// Every declared field is kept as-is except `id`, which is replaced.
    /// Returns the dependency (if it could be typed) and at most one issue.
    pub fn into_dependency(
        self,
        index: usize,
        id: String,
    ) -> (Option<Dependency>, Option<DependencyIssue>) {
        let kind = match DependencyKind::from_str(&self.kind) {
            Ok(kind) => kind,
            Err(_) => {
                return (
                    None,
                    Some(DependencyIssue::UnknownKind {
                        index,
                        kind: self.kind,
                    }),
                );
            }
        };

        let mut object = self.fields;
        object.insert("id".to_string(), Value::String(id));
        object.insert("type".to_string(), Value::String(kind.as_str().to_string()));

        let dependency: Dependency = match serde_json::from_value(Value::Object(object)) {
            Ok(dep) => dep,
            Err(e) => {
                return (
                    None,
                    Some(DependencyIssue::Malformed {
                        index,
                        kind,
                        reason: e.to_string(),
                    }),
                );
            }
        };

        let missing = dependency.missing_fields();
        let issue = (!missing.is_empty()).then(|| DependencyIssue::MissingFields {
            index,
            kind,
            fields: missing,
        });
        (Some(dependency), issue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fields_keeps_odd_type_tags() {
        let raw = RawDependency::from_fields(
            serde_json::json!({ "type": 5, "url": "x" })
                .as_object()
                .cloned()
                .unwrap(),
        );
        assert_eq!(raw.kind, "5");
        assert!(!raw.fields.contains_key("type"));
        let (dependency, issue) = raw.into_dependency(0, "id".to_string());
        assert!(dependency.is_none());
        assert!(issue.unwrap().is_dropped());
    }
    use serde_json::json;

    fn raw(value: Value) -> RawDependency {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(DependencyKind::from_str("builder").unwrap(), DependencyKind::Builder);
        assert!(DependencyKind::from_str("Builder").is_err());
        assert!(DependencyKind::from_str("cache").is_err());
        assert_eq!(DependencyKind::all().len(), 6);
    }

    #[test]
    fn test_source_serialization() {
        let dep = Dependency::source("id-1".to_string(), "https://github.com/acme/widget", "main");
        assert_eq!(
            serde_json::to_value(&dep).unwrap(),
            json!({
                "id": "id-1",
                "type": "source",
                "url": "https://github.com/acme/widget",
                "ref": "main"
            })
        );
    }

    #[test]
    fn test_env_dependency_uses_pair_list() {
        let vars = BTreeMap::from([
            ("NODE_ENV".to_string(), "production".to_string()),
            ("API_KEY".to_string(), "abc".to_string()),
        ]);
        let dep = Dependency::env("id-2".to_string(), &vars);
        assert_eq!(
            serde_json::to_value(&dep).unwrap()["env"],
            json!([
                { "key": "API_KEY", "val": "abc" },
                { "key": "NODE_ENV", "val": "production" }
            ])
        );
    }

    #[test]
    fn test_caller_dependency_roundtrips_without_id() {
        let dep: Dependency = serde_json::from_value(json!({ "type": "source" })).unwrap();
        assert_eq!(dep.id, None);
        assert_eq!(serde_json::to_value(&dep).unwrap(), json!({ "type": "source" }));
    }

    #[test]
    fn test_config_dependency_keeps_fields_and_replaces_id() {
        let (dep, issue) = raw(json!({
            "type": "database",
            "id": "stale",
            "db_type": "postgres",
            "managed": true,
            "size": "small"
        }))
        .into_dependency(0, "fresh".to_string());

        let dep = dep.unwrap();
        assert!(issue.is_none());
        assert_eq!(dep.id.as_deref(), Some("fresh"));
        assert_eq!(dep.kind, DependencyKind::Database);
        assert_eq!(dep.db_type.as_deref(), Some("postgres"));
        assert_eq!(dep.extra.get("size"), Some(&json!("small")));
    }

    #[test]
    fn test_config_dependency_missing_fields_is_flagged_but_kept() {
        let (dep, issue) = raw(json!({ "type": "source" })).into_dependency(2, "x".to_string());
        assert!(dep.is_some());
        let issue = issue.unwrap();
        assert!(!issue.is_dropped());
        assert_eq!(
            issue.to_string(),
            "dependency #2 (source): missing url, ref"
        );
    }

    #[test]
    fn test_config_dependency_unknown_kind_is_dropped() {
        let (dep, issue) = raw(json!({ "type": "cache" })).into_dependency(1, "x".to_string());
        assert!(dep.is_none());
        assert!(issue.unwrap().is_dropped());
    }

    #[test]
    fn test_config_dependency_wrong_shape_is_dropped() {
        let (dep, issue) =
            raw(json!({ "type": "domain", "urls": "not-a-list" })).into_dependency(0, "x".to_string());
        assert!(dep.is_none());
        assert!(matches!(issue, Some(DependencyIssue::Malformed { .. })));
    }

    #[test]
    fn test_missing_fields_per_kind() {
        let builder = Dependency::builder(
            "b".to_string(),
            "node",
            "latest",
            "npm start",
            ".",
            BTreeMap::new(),
        );
        assert!(builder.missing_fields().is_empty());

        let domain = Dependency::domain("d".to_string(), vec![]);
        assert_eq!(domain.missing_fields(), vec!["urls"]);
    }
}
