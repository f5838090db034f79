pub mod error;
pub mod file_handler;
pub mod ignore;
pub mod paths;
pub mod scanner;
pub mod search;
pub mod vcs;

pub use error::CoreError;
pub use file_handler::FileHandler;
pub use self::ignore::{IgnoreRules, EXCLUDED_DIRECTORY_NAMES, IGNORE_FILE_NAME};
pub use paths::PathResolver;
pub use scanner::DirectoryScanner;
pub use search::{SearchEngine, SearchMatch, SearchMode, SearchQuery};
pub use vcs::{GitCommitter, VersionControl};
