//! Commits the workspace through an external version-control tool.

use super::error::{CoreError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Records the current state of the workspace under a message.
pub trait VersionControl: Send + Sync {
    fn commit(&self, message: &str) -> Result<()>;
}

/// Runs `git add -A` followed by `git commit -m <message>` in the workspace root.
#[derive(Debug, Clone)]
pub struct GitCommitter {
    binary: String,
    workdir: PathBuf,
}

impl GitCommitter {
    pub fn new(binary: impl Into<String>, workdir: impl AsRef<Path>) -> Self {
        Self {
            binary: binary.into(),
            workdir: workdir.as_ref().to_path_buf(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| CoreError::Commit(format!("failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            let diagnostic = if stderr.is_empty() { stdout } else { stderr };
            return Err(CoreError::Commit(format!(
                "{} {} exited with {}: {}",
                self.binary,
                args.first().copied().unwrap_or_default(),
                output.status,
                diagnostic
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VersionControl for GitCommitter {
    fn commit(&self, message: &str) -> Result<()> {
        self.run(&["add", "-A"])?;
        let summary = self.run(&["commit", "-m", message])?;
        tracing::info!(
            "Committed workspace: {}",
            summary.lines().next().unwrap_or_default()
        );
        Ok(())
    }
}
