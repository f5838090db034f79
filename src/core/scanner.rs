use super::error::Result;
use super::ignore::{is_excluded_dir_name, IgnoreRules};
use super::paths::PathResolver;
use ignore::WalkBuilder;
use std::path::PathBuf;

/// A regular file found during a workspace walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceFile {
    pub path: PathBuf,
    pub relative: String,
}

/// Walks the workspace tree, pruning excluded directories and ignored files.
pub struct DirectoryScanner<'a> {
    resolver: &'a PathResolver,
}

impl<'a> DirectoryScanner<'a> {
    pub fn new(resolver: &'a PathResolver) -> Self {
        Self { resolver }
    }

    /// Lists every non-excluded file as a root-relative path.
    ///
    /// Ignore rules are reloaded from disk on every call.
    pub fn list_files(&self) -> Result<Vec<String>> {
        let rules = IgnoreRules::load(self.resolver.root())?;
        let files: Vec<String> = self
            .collect_files(&rules)
            .into_iter()
            .map(|file| file.relative)
            .collect();
        tracing::info!(
            "Listed {} files ({} ignore patterns active)",
            files.len(),
            rules.patterns().len()
        );
        Ok(files)
    }

    /// Collects all regular files under the root that survive the directory
    /// denylist and `rules`. Symlinks are neither followed nor reported, and
    /// unreadable directories are skipped.
    pub fn collect_files(&self, rules: &IgnoreRules) -> Vec<WorkspaceFile> {
        let walker = WalkBuilder::new(self.resolver.root())
            .standard_filters(false)
            .hidden(false)
            .follow_links(false)
            .filter_entry(|entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
                !(is_dir && entry.file_name().to_str().is_some_and(is_excluded_dir_name))
            })
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry during walk: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let Some(relative) = self.resolver.relative_to_root(entry.path()) else {
                tracing::debug!("Skipping non-UTF-8 path {:?}", entry.path());
                continue;
            };

            if rules.is_excluded(&relative) {
                continue;
            }

            files.push(WorkspaceFile {
                path: entry.into_path(),
                relative,
            });
        }
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_helpers::{setup_test_logging, TestWorkspace};
    use std::collections::HashSet;

    fn listed(workspace: &TestWorkspace) -> HashSet<String> {
        let files = DirectoryScanner::new(&workspace.resolver).list_files().unwrap();
        let set: HashSet<String> = files.iter().cloned().collect();
        assert_eq!(set.len(), files.len(), "Every file must appear exactly once");
        set
    }

    #[test]
    fn test_lists_nested_files() {
        setup_test_logging();
        let workspace = TestWorkspace::new();
        workspace.setup_basic_project();

        let files = listed(&workspace);
        let expected: HashSet<String> = [
            "src/main.rs",
            "src/lib.rs",
            "README.md",
            "Cargo.toml",
            "docs/guide.txt",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(files, expected);
    }

    #[test]
    fn test_excludes_ignored_file_and_git_directory() {
        setup_test_logging();
        let workspace = TestWorkspace::new();
        workspace.create_file(".gitignore", "ignored_file.txt\n");
        workspace.create_file("ignored_file.txt", "hidden");
        workspace.create_file("kept.txt", "visible");
        workspace.create_file(".git/config", "[core]");
        workspace.create_file(".git/objects/ab/cdef", "blob");
        workspace.create_file("sub/ignored_file.txt", "nested copy");

        let files = listed(&workspace);
        assert!(files.contains("kept.txt"));
        assert!(files.contains(".gitignore"));
        assert!(files.contains("sub/ignored_file.txt"));
        assert!(!files.contains("ignored_file.txt"));
        assert!(files.iter().all(|f| !f.starts_with(".git/")));
    }

    #[test]
    fn test_prunes_every_denylisted_directory_at_any_depth() {
        let workspace = TestWorkspace::new();
        workspace.create_file("app/node_modules/pkg/index.js", "x");
        workspace.create_file("target/debug/app", "x");
        workspace.create_file("pkg/__pycache__/mod.pyc", "x");
        workspace.create_file("app/index.js", "x");
        // A plain file that happens to share a denylisted name is still listed.
        workspace.create_file("docs/build", "x");

        let files = listed(&workspace);
        let expected: HashSet<String> = ["app/index.js", "docs/build"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(files, expected);
    }

    #[test]
    fn test_ignore_rules_are_reloaded_per_call() {
        let workspace = TestWorkspace::new();
        workspace.create_file("a.tmp", "x");
        workspace.create_file("b.txt", "x");
        workspace.create_file(".gitignore", "*.tmp\n");
        assert!(!listed(&workspace).contains("a.tmp"));

        workspace.create_file(".gitignore", "b.txt\n");
        let files = listed(&workspace);
        assert!(files.contains("a.tmp"));
        assert!(!files.contains("b.txt"));

        std::fs::remove_file(workspace.root().join(".gitignore")).unwrap();
        let files = listed(&workspace);
        assert!(files.contains("a.tmp"));
        assert!(files.contains("b.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_followed() {
        let workspace = TestWorkspace::new();
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "outside").unwrap();
        std::os::unix::fs::symlink(outside.path(), workspace.root().join("link")).unwrap();
        workspace.create_file("real.txt", "inside");

        let files = listed(&workspace);
        assert_eq!(files.len(), 1);
        assert!(files.contains("real.txt"));
    }

    #[test]
    fn test_empty_workspace() {
        let workspace = TestWorkspace::new();
        assert!(listed(&workspace).is_empty());
    }
}
