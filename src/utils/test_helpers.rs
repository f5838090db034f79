use crate::core::PathResolver;
use std::fs;
use std::path::Path;
use std::sync::Once;
use tempfile::TempDir;

static LOGGING_INIT: Once = Once::new();

/// Initializes the tracing subscriber for tests.
///
/// This function is wrapped in a `Once` block to ensure that the global
/// subscriber is set exactly one time, even when tests are run in parallel.
pub fn setup_test_logging() {
    LOGGING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok(); // Ignore the error if it's already set by another crate.
    });
}

#[cfg(test)]
pub use log_capture::capture_logs;


/// An isolated workspace root backed by a temporary directory.
///
/// Test-only support: shared by the unit tests and `tests/integration_tests.rs`,
/// which is why it lives in the library. It panics on fixture I/O failures and
/// is not meant for production callers.
pub struct TestWorkspace {
    pub resolver: PathResolver,
    _temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let resolver = PathResolver::new(temp_dir.path()).expect("Failed to create resolver");
        Self {
            resolver,
            _temp_dir: temp_dir,
        }
    }

    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    /// Creates a file inside the workspace, including missing parents.
    pub fn create_file(&self, path: &str, content: &str) {
        let file_path = self.root().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(file_path, content).expect("Failed to write file");
    }

    pub fn read_file(&self, path: &str) -> String {
        fs::read_to_string(self.root().join(path)).expect("Failed to read file")
    }

    /// Sets up a standard project structure for testing.
    pub fn setup_basic_project(&self) {
        self.create_file("src/main.rs", "fn main() {}");
        self.create_file("src/lib.rs", "// Library code");
        self.create_file("README.md", "# My Project");
        self.create_file("Cargo.toml", "[package]\nname = \"test\"");
        self.create_file("docs/guide.txt", "User guide content");
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns true when the current process runs as root (UID 0).
/// We use this to skip permission-sensitive tests in Docker/act.
#[cfg(test)]
#[inline]
pub fn running_as_root() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: libc call has no side effects; used for testing only.
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
