//! Resolution of client-supplied relative paths into workspace-confined filesystem paths.

use super::error::{CoreError, Result};
use camino::Utf8PathBuf;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Turns client-relative paths into absolute paths that are guaranteed to lie
/// within the workspace root.
///
/// Containment is checked lexically: the joined path is normalized (`.`, `..`
/// and redundant separators collapsed) and must start with the root, compared
/// component by component. Symlinks are not resolved before the check.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Creates a resolver for `root`. A relative root is made absolute against
    /// the current working directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let absolute = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| CoreError::io(e, root))?
                .join(root)
        };
        Ok(Self {
            root: normalize_path(&absolute),
        })
    }

    /// The normalized, absolute workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins `relative` onto the root and validates the result stays inside it.
    /// Does not check existence.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let full_path = normalize_path(&self.root.join(relative));
        if !full_path.starts_with(&self.root) {
            tracing::warn!("Rejected path outside workspace root: {:?}", relative);
            return Err(CoreError::PathTraversal(relative.to_string()));
        }
        Ok(full_path)
    }

    /// Like [`resolve`](Self::resolve), but also creates any missing parent
    /// directories of the resolved path. Created directories are never rolled back.
    pub fn resolve_or_create(&self, relative: &str) -> Result<PathBuf> {
        let full_path = self.resolve(relative)?;
        if let Some(parent) = full_path.parent() {
            if !parent.is_dir() {
                fs::create_dir_all(parent).map_err(|e| CoreError::io(e, parent))?;
                tracing::debug!("Created parent directories {:?}", parent);
            }
        }
        Ok(full_path)
    }

    /// Renders an absolute path below the root as a `/`-separated relative path.
    ///
    /// Returns `None` for paths outside the root and for non-UTF-8 names.
    pub fn relative_to_root(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let relative = Utf8PathBuf::from_path_buf(relative.to_path_buf()).ok()?;
        let rendered = relative
            .components()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join("/");
        Some(rendered)
    }
}

/// Lexically normalizes a path without touching the filesystem.
///
/// `..` pops the previous component; at the filesystem root it is dropped.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}
