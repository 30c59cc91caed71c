pub mod types;

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".luncurkan.toml";

/// Get the global config file path (~/.luncurkan.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (<dir>/.luncurkan.toml)
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Load configuration from file or use defaults
///
/// An explicit path must exist and parse. Otherwise the local config in
/// `working_dir` is tried first, then the global one; a file that cannot be
/// read or parsed is skipped.
pub fn load_config(explicit: Option<&Path>, working_dir: Option<&Path>) -> Result<types::Config> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let candidates = working_dir
        .map(local_config_path)
        .into_iter()
        .chain(global_config_path());

    for path in candidates {
        if !path.exists() {
            continue;
        }
        match read_config(&path) {
            Ok(config) => {
                log::debug!("Loaded configuration from {}", path.display());
                return Ok(config);
            }
            Err(e) => log::warn!("Ignoring config file: {}", e),
        }
    }

    Ok(types::Config::default())
}

fn read_config(path: &Path) -> Result<types::Config> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let config: types::Config =
        toml::from_str(&content).map_err(|e| ConfigError::ParsingFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    config
        .validate()
        .map_err(|message| ConfigError::ParsingFailed {
            path: path.to_path_buf(),
            message,
        })?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LuncurkanError;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = types::Config::default();
        assert_eq!(config.api.base_url, "https://workers.luncurkan.dev");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.probe.timeout_secs, 30);
        assert_eq!(config.deploy.default_branch, "main");
        assert_eq!(config.deploy.resources.cpu, 250);
        assert_eq!(config.deploy.resources.memory, 256);
        assert_eq!(config.deploy.fallback_start_command, "npm start");
        assert_eq!(config.deploy.builder_env.get("PORT").map(String::as_str), Some("3000"));
        assert_eq!(config.deploy.builder_env.get("HOST").map(String::as_str), Some("0.0.0.0"));
    }

    #[test]
    fn test_local_config_partial_sections() {
        let dir = TempDir::new().unwrap();
        let mut file = fs::File::create(local_config_path(dir.path())).unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://localhost:8787\"\n\n[deploy]\ndomain_suffix = \"example.test\"\n\n[deploy.resources]\ncpu = 500\nmemory = 512"
        )
        .unwrap();

        let config = load_config(None, Some(dir.path())).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8787");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.deploy.domain_suffix, "example.test");
        assert_eq!(config.deploy.resources.cpu, 500);
        assert_eq!(config.deploy.default_branch, "main");
    }

    #[test]
    fn test_explicit_path_must_parse() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[api\nbase_url = ").unwrap();

        let result = load_config(Some(&path), None);
        assert!(matches!(
            result,
            Err(LuncurkanError::Config(ConfigError::ParsingFailed { .. }))
        ));
    }

    #[test]
    fn test_zero_resources_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zero.toml");
        fs::write(&path, "[deploy.resources]\ncpu = 0\nmemory = 0\n").unwrap();

        match load_config(Some(&path), None) {
            Err(LuncurkanError::Config(ConfigError::ParsingFailed { message, .. })) => {
                assert!(message.contains("deploy.resources"));
            }
            other => panic!("expected ParsingFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("timeout.toml");
        fs::write(&path, "[probe]\ntimeout_secs = 0\n").unwrap();

        let result = load_config(Some(&path), None);
        assert!(matches!(
            result,
            Err(LuncurkanError::Config(ConfigError::ParsingFailed { .. }))
        ));
    }

    #[test]
    fn test_invalid_local_config_falls_back() {
        let dir = TempDir::new().unwrap();
        fs::write(
            local_config_path(dir.path()),
            "[api]\ntimeout_secs = 0\n",
        )
        .unwrap();

        let config = load_config(None, Some(dir.path())).unwrap();
        assert_ne!(config.api.timeout_secs, 0);
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = TempDir::new().unwrap();
        let result = load_config(Some(&dir.path().join("missing.toml")), None);
        assert!(matches!(
            result,
            Err(LuncurkanError::Config(ConfigError::ReadFailed { .. }))
        ));
    }

    #[test]
    fn test_broken_local_config_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(local_config_path(dir.path()), "not = [valid").unwrap();

        let config = load_config(None, Some(dir.path())).unwrap();
        // Falls through to the global file or defaults; either way the
        // broken local file is not an error.
        assert!(!config.api.base_url.is_empty());
    }
}
