use super::error::{CoreError, Result};
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Name of the ignore file read from the workspace root.
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Directory names that are always pruned from traversal, regardless of ignore rules.
pub const EXCLUDED_DIRECTORY_NAMES: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "__pycache__",
    ".venv",
    "venv",
    "target",
    "dist",
    "build",
];

/// Returns `true` if a directory with this name must never be descended into.
pub fn is_excluded_dir_name(name: &str) -> bool {
    EXCLUDED_DIRECTORY_NAMES.contains(&name)
}

/// Compiles a single glob with the matching rules shared by ignore rules and
/// search path filters: case-sensitive, and `*`/`?` never cross a `/`.
pub fn compile_glob(pattern: &str) -> std::result::Result<Glob, globset::Error> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .case_insensitive(false)
        .build()
}

/// Builds a `GlobSet` from caller-supplied patterns. Any invalid pattern fails the whole set.
pub fn build_globset_strict(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(compile_glob(pattern)?);
    }
    Ok(builder.build()?)
}

/// The glob patterns loaded from the workspace ignore file.
///
/// This is a flat list matched against root-relative paths; it is not full
/// gitignore semantics (no negation, no directory-only markers, no anchoring).
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    patterns: Vec<String>,
    glob_set: GlobSet,
}

impl IgnoreRules {
    /// A rule set that excludes nothing.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            glob_set: GlobSet::empty(),
        }
    }

    /// Loads a fresh rule set from `root/.gitignore`. A missing file yields an empty set.
    pub fn load(root: &Path) -> Result<Self> {
        let ignore_path = root.join(IGNORE_FILE_NAME);
        match fs::read_to_string(&ignore_path) {
            Ok(content) => Ok(Self::from_lines(content.lines())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::empty()),
            Err(e) => Err(CoreError::io(e, ignore_path)),
        }
    }

    /// Builds a rule set from ignore-file lines, in order. Blank lines and `#`
    /// comments are dropped; lines that are not valid globs are logged and skipped.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut builder = GlobSetBuilder::new();
        let mut patterns = Vec::new();

        for line in lines {
            let pattern = line.trim();
            if pattern.is_empty() || pattern.starts_with('#') {
                continue;
            }
            match compile_glob(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                    patterns.push(pattern.to_string());
                }
                Err(e) => tracing::warn!("Skipping invalid ignore pattern {:?}: {}", pattern, e),
            }
        }

        let glob_set = builder.build().unwrap_or_else(|e| {
            tracing::error!("Failed to build glob set from ignore patterns: {}", e);
            GlobSet::empty()
        });

        Self { patterns, glob_set }
    }

    /// The accepted patterns, in file order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Tests a root-relative, `/`-separated path against every pattern.
    pub fn is_excluded(&self, relative_path: &str) -> bool {
        self.glob_set.is_match(relative_path)
    }
}
