//! Path filtering using .gitignore-style patterns
//!
//! Architectural Principle: Service Layer - PathFilter decides which AST documents are analyzed
//! - Configured patterns are applied in order, the last match wins
//! - `!pattern` re-includes a path excluded by an earlier pattern
//! - Ignore files are read from every ancestor directory, deeper files take precedence

use crate::config::PathConfig;
use crate::domain::violations::{GuardianError, GuardianResult};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Manages path filtering using .gitignore-style patterns
#[derive(Debug, Clone)]
pub struct PathFilter {
    patterns: Vec<FilterPattern>,
    /// Ignore file name; `None` disables ignore file processing
    ignore_filename: Option<String>,
}

/// A single gitignore-style line
#[derive(Debug, Clone)]
pub struct FilterPattern {
    glob: glob::Pattern,
    /// `!pattern`: re-include instead of exclude
    negated: bool,
    /// `pattern/`: only directories match
    dir_only: bool,
    /// Contains a slash, so it is matched against the whole relative path
    anchored: bool,
}

impl FilterPattern {
    /// Parse one pattern line; blank lines and `#` comments yield `None`
    pub fn parse(line: &str) -> GuardianResult<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (negated, rest) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        let dir_only = rest.ends_with('/');
        let rest = rest.trim_end_matches('/');
        let anchored = rest.contains('/');
        let rest = rest.strip_prefix('/').unwrap_or(rest);

        if rest.is_empty() {
            return Err(GuardianError::pattern(format!("Empty pattern '{line}'")));
        }

        let glob = glob::Pattern::new(rest)
            .map_err(|e| GuardianError::pattern(format!("Invalid pattern '{line}': {e}")))?;

        Ok(Some(Self { glob, negated, dir_only, anchored }))
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Match a path relative to the pattern's base directory
    pub fn matches(&self, relative: &Path) -> bool {
        let components: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        if components.is_empty() {
            return false;
        }

        // A directory pattern never matches the file itself, only its ancestors
        let candidates = if self.dir_only { components.len() - 1 } else { components.len() };

        if self.anchored {
            // Matching a leading directory excludes everything below it
            (1..=candidates).any(|len| self.glob.matches(&components[..len].join("/")))
        } else {
            components[..candidates].iter().any(|part| self.glob.matches(part))
        }
    }
}

impl PathFilter {
    /// Create a new path filter with the given patterns
    pub fn new(patterns: Vec<String>, ignore_filename: Option<String>) -> GuardianResult<Self> {
        let mut filter = Self { patterns: Vec::with_capacity(patterns.len()), ignore_filename };
        for pattern in patterns {
            filter.add_pattern(&pattern)?;
        }
        Ok(filter)
    }

    /// Create a default path filter with sensible exclusions
    pub fn with_defaults() -> GuardianResult<Self> {
        let paths = PathConfig::default();
        Self::new(paths.patterns, paths.ignore_file)
    }

    /// Add a pattern after the existing ones, so it takes precedence
    pub fn add_pattern(&mut self, pattern: &str) -> GuardianResult<()> {
        if let Some(pattern) = FilterPattern::parse(pattern)? {
            self.patterns.push(pattern);
        }
        Ok(())
    }

    /// Stop reading ignore files
    pub fn disable_ignore_files(&mut self) {
        self.ignore_filename = None;
    }

    pub fn ignore_filename(&self) -> Option<&str> {
        self.ignore_filename.as_deref()
    }

    /// Check if a file should be analyzed based on all patterns and ignore files
    pub fn should_analyze<P: AsRef<Path>>(&self, path: P) -> GuardianResult<bool> {
        let path = path.as_ref();
        self.evaluate(path, path.strip_prefix(".").unwrap_or(path))
    }

    /// Configured patterns see `relative`; ignore files see the real `path`
    fn evaluate(&self, path: &Path, relative: &Path) -> GuardianResult<bool> {
        if let Some(excluded) = last_match(&self.patterns, relative) {
            if excluded {
                return Ok(false);
            }
        }

        match &self.ignore_filename {
            Some(name) => Ok(!self.is_ignored_by_files(path, name)?),
            None => Ok(true),
        }
    }

    /// Consult ignore files from the outermost ancestor inwards
    fn is_ignored_by_files(&self, path: &Path, ignore_filename: &str) -> GuardianResult<bool> {
        let mut ancestors: Vec<&Path> = path.ancestors().skip(1).collect();
        ancestors.reverse();

        let mut ignored = false;
        for dir in ancestors {
            let ignore_file = dir.join(ignore_filename);
            if !ignore_file.is_file() {
                continue;
            }

            let Ok(relative) = path.strip_prefix(dir) else {
                continue;
            };
            if let Some(excluded) = last_match(&load_ignore_file(&ignore_file)?, relative) {
                ignored = excluded;
            }
        }

        Ok(ignored)
    }

    /// Get all files that should be analyzed in a directory tree
    pub fn find_files<P: AsRef<Path>>(&self, root: P) -> GuardianResult<Vec<PathBuf>> {
        self.find_matching(root, |_| true)
    }

    /// Like `find_files`, restricted to files accepted by `accept`
    pub fn find_matching<P, F>(&self, root: P, accept: F) -> GuardianResult<Vec<PathBuf>>
    where
        P: AsRef<Path>,
        F: Fn(&Path) -> bool,
    {
        let root = root.as_ref();
        let mut files = Vec::new();

        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {e}");
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !accept(path) {
                continue;
            }
            if self.evaluate(path, path.strip_prefix(root).unwrap_or(path))? {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// Filter a list of paths to only those that should be analyzed
    pub fn filter_paths<P: AsRef<Path>>(&self, paths: &[P]) -> GuardianResult<Vec<PathBuf>> {
        let mut filtered = Vec::new();
        for path in paths {
            if self.should_analyze(path)? {
                filtered.push(path.as_ref().to_path_buf());
            }
        }
        Ok(filtered)
    }
}

/// Verdict of the last matching pattern: `Some(true)` excluded, `Some(false)` re-included
fn last_match(patterns: &[FilterPattern], relative: &Path) -> Option<bool> {
    patterns
        .iter()
        .rev()
        .find(|pattern| pattern.matches(relative))
        .map(|pattern| !pattern.is_negated())
}

/// Load patterns from an ignore file, skipping invalid lines
fn load_ignore_file(path: &Path) -> GuardianResult<Vec<FilterPattern>> {
    let content = fs::read_to_string(path).map_err(|e| {
        GuardianError::config(format!("Failed to read ignore file '{}': {e}", path.display()))
    })?;

    let mut patterns = Vec::new();
    for line in content.lines() {
        match FilterPattern::parse(line) {
            Ok(Some(pattern)) => patterns.push(pattern),
            Ok(None) => {}
            Err(e) => tracing::warn!("{} in {}", e, path.display()),
        }
    }
    Ok(patterns)
}
