pub mod settings;

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "workspace.properties";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WorkspaceConfig {
    /// Root directory exposed by the service.
    pub base_path: PathBuf,
    /// Shared secret every authenticated request must present.
    #[serde(rename = "gpt_shared_secret")]
    pub shared_secret: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_git_binary")]
    pub git_binary: String,
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

fn default_git_binary() -> String {
    "git".to_string()
}

impl WorkspaceConfig {
    pub fn new(base_path: impl Into<PathBuf>, shared_secret: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            shared_secret: shared_secret.into(),
            listen_addr: default_listen_addr(),
            git_binary: default_git_binary(),
        }
    }

    /// Loads and validates the configuration from a properties file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        settings::load_config(path)
    }
}
