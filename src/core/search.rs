//! Content search over the workspace tree with bounded context windows.

use super::error::Result;
use super::ignore::{build_globset_strict, IgnoreRules};
use super::paths::PathResolver;
use super::scanner::{DirectoryScanner, WorkspaceFile};
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;

pub const DEFAULT_CONTEXT_LINES: usize = 2;

/// How the query is tested against each line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Plain substring containment.
    #[default]
    Literal,
    /// Unanchored regular expression search.
    Pattern,
}

/// A content search request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,
    /// Glob filters on the relative path; a file is scanned if it matches any.
    #[serde(default)]
    pub paths: Vec<String>,
}

fn default_context_lines() -> usize {
    DEFAULT_CONTEXT_LINES
}

impl SearchQuery {
    pub fn literal(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            mode: SearchMode::Literal,
            context_lines: DEFAULT_CONTEXT_LINES,
            paths: Vec::new(),
        }
    }

    pub fn pattern(query: impl Into<String>) -> Self {
        Self {
            mode: SearchMode::Pattern,
            ..Self::literal(query)
        }
    }

    pub fn with_context_lines(mut self, context_lines: usize) -> Self {
        self.context_lines = context_lines;
        self
    }

    pub fn with_paths(mut self, paths: &[&str]) -> Self {
        self.paths = paths.iter().map(|p| p.to_string()).collect();
        self
    }
}

/// One matching line together with its surrounding context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub path: String,
    /// 1-based line number.
    pub line: usize,
    #[serde(rename = "match")]
    pub matched: String,
    pub context_before: Vec<String>,
    pub context_after: Vec<String>,
}

enum LineMatcher {
    Literal(String),
    Pattern(Regex),
}

impl LineMatcher {
    fn new(query: &SearchQuery) -> Result<Self> {
        Ok(match query.mode {
            SearchMode::Literal => LineMatcher::Literal(query.query.clone()),
            SearchMode::Pattern => LineMatcher::Pattern(Regex::new(&query.query)?),
        })
    }

    fn is_match(&self, line: &str) -> bool {
        match self {
            LineMatcher::Literal(needle) => line.contains(needle.as_str()),
            LineMatcher::Pattern(regex) => regex.is_match(line),
        }
    }
}

/// Searches file contents across the workspace.
pub struct SearchEngine<'a> {
    resolver: &'a PathResolver,
}

impl<'a> SearchEngine<'a> {
    pub fn new(resolver: &'a PathResolver) -> Self {
        Self { resolver }
    }

    /// Runs `query` against every eligible file.
    ///
    /// The pattern and path filters are compiled before the walk, so invalid
    /// input fails the request without touching any file. Files that cannot be
    /// read or decoded as UTF-8 are skipped. Results follow traversal order,
    /// then line order within each file.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<SearchMatch>> {
        let matcher = LineMatcher::new(query)?;
        let filters = if query.paths.is_empty() {
            None
        } else {
            Some(build_globset_strict(&query.paths)?)
        };

        let rules = IgnoreRules::load(self.resolver.root())?;
        let candidates: Vec<WorkspaceFile> = DirectoryScanner::new(self.resolver)
            .collect_files(&rules)
            .into_iter()
            .filter(|file| {
                filters
                    .as_ref()
                    .map_or(true, |set| set.is_match(&file.relative))
            })
            .collect();

        let matches: Vec<SearchMatch> = candidates
            .par_iter()
            .map(|file| Self::search_file(file, &matcher, query.context_lines))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect();

        tracing::info!(
            "Search {:?} ({:?}) scanned {} files, found {} matches",
            query.query,
            query.mode,
            candidates.len(),
            matches.len()
        );
        Ok(matches)
    }

    fn search_file(
        file: &WorkspaceFile,
        matcher: &LineMatcher,
        context_lines: usize,
    ) -> Vec<SearchMatch> {
        let bytes = match fs::read(&file.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!("Skipping unreadable file {}: {}", file.relative, e);
                return Vec::new();
            }
        };
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(_) => {
                tracing::debug!("Skipping non-UTF-8 file {}", file.relative);
                return Vec::new();
            }
        };

        let lines: Vec<&str> = content.lines().collect();
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| matcher.is_match(line))
            .map(|(idx, line)| SearchMatch {
                path: file.relative.clone(),
                line: idx + 1,
                matched: line.trim().to_string(),
                context_before: context_window(&lines, idx.saturating_sub(context_lines), idx),
                context_after: context_window(
                    &lines,
                    idx + 1,
                    (idx + 1).saturating_add(context_lines).min(lines.len()),
                ),
            })
            .collect()
    }
}

fn context_window(lines: &[&str], start: usize, end: usize) -> Vec<String> {
    lines[start..end]
        .iter()
        .map(|line| line.trim_end_matches(['\r', '\n']).to_string())
        .collect()
}
