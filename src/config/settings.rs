use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use super::{WorkspaceConfig, DEFAULT_CONFIG_FILE};

/// Loads the configuration from a `key=value` properties file.
///
/// Defaults to `workspace.properties` in the working directory. Blank lines and
/// lines starting with `#` are skipped. `base_path` and `gpt_shared_secret` are
/// required; `base_path` must name an existing directory.
pub fn load_config(path: Option<&Path>) -> Result<WorkspaceConfig> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    if !config_path.exists() {
        bail!("Configuration file {:?} not found", config_path);
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read configuration file {:?}", config_path))?;
    let config = parse_config(&content)
        .with_context(|| format!("Invalid configuration in {:?}", config_path))?;

    tracing::info!(
        "Loaded config from {:?} (workspace root {:?})",
        config_path,
        config.base_path
    );
    Ok(config)
}

/// Parses properties text into a validated `WorkspaceConfig`.
pub fn parse_config(content: &str) -> Result<WorkspaceConfig> {
    let properties = parse_properties(content);

    for required in ["base_path", "gpt_shared_secret"] {
        match properties.get(required) {
            Some(Value::String(value)) if !value.is_empty() => {}
            _ => bail!("'{}' configuration is required", required),
        }
    }

    let config: WorkspaceConfig = serde_json::from_value(Value::Object(properties))?;

    if !config.base_path.is_dir() {
        bail!(
            "base_path {:?} does not exist or is not a directory",
            config.base_path
        );
    }
    Ok(config)
}

/// Splits properties text into a JSON object of string values. Later keys win.
fn parse_properties(content: &str) -> Map<String, Value> {
    let mut properties = Map::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line.split_once('=').unwrap_or((line, ""));
        properties.insert(
            key.trim().to_string(),
            Value::String(value.trim().to_string()),
        );
    }
    properties
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LISTEN_ADDR;

    fn workspace_dir() -> tempfile::TempDir {
        tempfile::tempdir().expect("Failed to create temp dir")
    }

    #[test]
    fn test_parse_minimal_config_applies_defaults() {
        let dir = workspace_dir();
        let content = format!(
            "# workspace settings\nbase_path={}\ngpt_shared_secret = some-magical-key\n",
            dir.path().display()
        );
        let config = parse_config(&content).unwrap();
        assert_eq!(config.base_path, dir.path());
        assert_eq!(config.shared_secret, "some-magical-key");
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.git_binary, "git");
    }

    #[test]
    fn test_parse_overrides_and_unknown_keys() {
        let dir = workspace_dir();
        let content = format!(
            "base_path={}\ngpt_shared_secret=abc=def\nlisten_addr=127.0.0.1:9000\n\
             git_binary=/usr/local/bin/git\nunused=value\n",
            dir.path().display()
        );
        let config = parse_config(&content).unwrap();
        assert_eq!(config.shared_secret, "abc=def");
        assert_eq!(config.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.git_binary, "/usr/local/bin/git");
    }

    #[test]
    fn test_missing_base_path_is_rejected() {
        let err = parse_config("gpt_shared_secret=x\n").unwrap_err();
        assert!(err.to_string().contains("base_path"));
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let dir = workspace_dir();
        let content = format!("base_path={}\ngpt_shared_secret=\n", dir.path().display());
        let err = parse_config(&content).unwrap_err();
        assert!(err.to_string().contains("gpt_shared_secret"));
    }

    #[test]
    fn test_base_path_must_be_directory() {
        let dir = workspace_dir();
        let missing = dir.path().join("nope");
        let content = format!("base_path={}\ngpt_shared_secret=x\n", missing.display());
        assert!(parse_config(&content).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = workspace_dir();
        let config_path = dir.path().join("workspace.properties");
        fs::write(
            &config_path,
            format!("base_path={}\ngpt_shared_secret=s3cret\n", dir.path().display()),
        )
        .unwrap();

        let config = load_config(Some(&config_path)).unwrap();
        assert_eq!(config.shared_secret, "s3cret");
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = workspace_dir();
        let err = load_config(Some(&dir.path().join("absent.properties"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
