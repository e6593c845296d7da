//! Main analysis orchestrator for Export Guardian
//!
//! CDD Principle: Domain Services - Analyzer orchestrates document validation workflows
//! - Coordinates path filtering, document loading, rule checks, and result aggregation
//! - Provides clean interface for validating single documents or directory trees
//! - Handles parallel processing and error recovery gracefully

pub mod document;

pub use document::{is_ast_document, module_path_for, AstDocument, AST_SUFFIX};

use crate::config::GuardianConfig;
use crate::domain::violations::{
    GuardianError, GuardianResult, Severity, ValidationReport, Violation,
};
use crate::paths::PathFilter;
use crate::rules::RuleSet;
use crate::syntax::ModuleTree;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

/// Main analyzer that orchestrates the entire validation process
pub struct Analyzer {
    config: GuardianConfig,
    rules: RuleSet,
    path_filter: PathFilter,
    loader: Box<dyn ModuleLoader>,
}

/// Options for customizing analysis behavior
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Whether to use parallel processing
    pub parallel: bool,
    /// Maximum number of documents to analyze
    pub max_files: Option<usize>,
    /// Whether to stop at the first unreadable document
    pub fail_fast: bool,
    /// Additional paths to exclude for this run
    pub exclude_patterns: Vec<String>,
    /// Whether to skip ignore files
    pub ignore_ignore_files: bool,
    /// Module path to check a single document against, overriding the document's own
    pub module_path: Option<PathBuf>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            max_files: None,
            fail_fast: false,
            exclude_patterns: Vec::new(),
            ignore_ignore_files: false,
            module_path: None,
        }
    }
}

/// A module tree ready for the rule engine
pub struct LoadedModule {
    pub module_path: PathBuf,
    pub tree: Box<dyn ModuleTree + Send + Sync>,
}

/// Turns document contents into module trees
pub trait ModuleLoader: Send + Sync {
    /// Check if this loader handles the given document
    fn handles_file(&self, file_path: &Path) -> bool;

    fn load(&self, file_path: &Path, content: &str) -> GuardianResult<LoadedModule>;
}

/// Loader for `*.ast.json` ESTree documents
#[derive(Debug, Default, Clone, Copy)]
pub struct EstreeLoader;

impl ModuleLoader for EstreeLoader {
    fn handles_file(&self, file_path: &Path) -> bool {
        is_ast_document(file_path)
    }

    fn load(&self, file_path: &Path, content: &str) -> GuardianResult<LoadedModule> {
        let document = AstDocument::parse(file_path, content)?;
        Ok(LoadedModule { module_path: document.module_path, tree: Box::new(document.program) })
    }
}

impl Analyzer {
    /// Create a new analyzer with the given configuration
    pub fn new(config: GuardianConfig) -> GuardianResult<Self> {
        config.validate()?;

        let ignore_file = config.paths.ignore_file.clone().filter(|name| !name.is_empty());
        let path_filter = PathFilter::new(config.paths.patterns.clone(), ignore_file)
            .map_err(|e| GuardianError::config(format!("Failed to create path filter: {e}")))?;

        let rules = config.rule_set();
        tracing::debug!("Analyzer ready with {} enabled rule(s)", rules.len());

        Ok(Self { config, rules, path_filter, loader: Box::new(EstreeLoader) })
    }

    /// Create an analyzer with default configuration
    pub fn with_defaults() -> GuardianResult<Self> {
        Self::new(GuardianConfig::default())
    }

    /// Replace the document loader
    pub fn with_loader(mut self, loader: impl ModuleLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn config(&self) -> &GuardianConfig {
        &self.config
    }

    /// Analyze a single document and return violations; filtered paths yield nothing
    pub fn analyze_file<P: AsRef<Path>>(&self, file_path: P) -> GuardianResult<Vec<Violation>> {
        let file_path = file_path.as_ref();
        if !self.path_filter.should_analyze(file_path)? {
            tracing::debug!("{} excluded by path filter", file_path.display());
            return Ok(Vec::new());
        }
        self.analyze_document(file_path, None)
    }

    /// Check a module tree that is already in memory
    pub fn check_tree(&self, tree: &dyn ModuleTree, module_path: &Path) -> Vec<Violation> {
        self.rules
            .check(tree, module_path)
            .into_iter()
            .map(|finding| {
                let severity = self.config.severity_for(&finding.rule_id).unwrap_or(Severity::Error);
                Violation::from_finding(finding, severity, module_path.to_path_buf())
            })
            .collect()
    }

    fn analyze_document(
        &self,
        file_path: &Path,
        module_path: Option<&Path>,
    ) -> GuardianResult<Vec<Violation>> {
        let content = fs::read_to_string(file_path).map_err(|e| {
            GuardianError::analysis(
                file_path.display().to_string(),
                format!("Failed to read file: {e}"),
            )
        })?;

        let module = self.loader.load(file_path, &content)?;
        let module_path = module_path.unwrap_or(&module.module_path);
        Ok(self.check_tree(module.tree.as_ref(), module_path))
    }

    /// Analyze documents and directories and return a complete validation report
    pub fn analyze_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
        options: &AnalysisOptions,
    ) -> GuardianResult<ValidationReport> {
        let start_time = Instant::now();

        let mut filter = self.path_filter.clone();
        if options.ignore_ignore_files {
            filter.disable_ignore_files();
        }
        for pattern in &options.exclude_patterns {
            filter.add_pattern(pattern)?;
        }

        let mut files_to_analyze = Vec::new();
        for path in paths {
            let path = path.as_ref();
            if path.is_file() {
                if filter.should_analyze(path)? {
                    files_to_analyze.push(path.to_path_buf());
                }
            } else if path.is_dir() {
                files_to_analyze
                    .extend(filter.find_matching(path, |file| self.loader.handles_file(file))?);
            } else {
                let error = GuardianError::analysis(
                    path.display().to_string(),
                    "No such file or directory",
                );
                if options.fail_fast {
                    return Err(error);
                }
                tracing::warn!("{error}");
            }
        }

        if let Some(max_files) = options.max_files {
            files_to_analyze.truncate(max_files);
        }

        if options.module_path.is_some() && files_to_analyze.len() > 1 {
            return Err(GuardianError::config(format!(
                "A module path override needs exactly one document, found {}",
                files_to_analyze.len()
            )));
        }

        let module_path = options.module_path.as_deref();
        let violations = if options.parallel && files_to_analyze.len() > 1 {
            self.analyze_files_parallel(&files_to_analyze, options)?
        } else {
            self.analyze_files_sequential(&files_to_analyze, module_path, options)?
        };

        let mut report = ValidationReport::new();
        for violation in violations {
            report.add_violation(violation);
        }

        report.set_files_analyzed(files_to_analyze.len());
        report.set_execution_time(start_time.elapsed().as_millis() as u64);
        report.set_config_fingerprint(self.config.fingerprint());
        report.sort_violations();

        Ok(report)
    }

    fn analyze_files_sequential(
        &self,
        files: &[PathBuf],
        module_path: Option<&Path>,
        options: &AnalysisOptions,
    ) -> GuardianResult<Vec<Violation>> {
        let mut all_violations = Vec::new();

        for file_path in files {
            match self.analyze_document(file_path, module_path) {
                Ok(violations) => all_violations.extend(violations),
                Err(e) if options.fail_fast => return Err(e),
                Err(e) => tracing::warn!("Failed to analyze {}: {}", file_path.display(), e),
            }
        }

        Ok(all_violations)
    }

    fn analyze_files_parallel(
        &self,
        files: &[PathBuf],
        options: &AnalysisOptions,
    ) -> GuardianResult<Vec<Violation>> {
        let violations = Mutex::new(Vec::new());
        let errors = Mutex::new(Vec::new());

        files.par_iter().enumerate().for_each(|(index, file_path)| {
            match self.analyze_document(file_path, None) {
                Ok(file_violations) => {
                    if let Ok(mut collected) = violations.lock() {
                        collected.extend(file_violations);
                    }
                }
                Err(e) => {
                    if let Ok(mut collected) = errors.lock() {
                        collected.push((index, e));
                    }
                }
            }
        });

        let mut errors = errors.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
        errors.sort_by_key(|(index, _)| *index);

        if options.fail_fast {
            if let Some((_, error)) = errors.into_iter().next() {
                return Err(error);
            }
        } else {
            for (index, error) in errors {
                tracing::warn!("Failed to analyze {}: {}", files[index].display(), error);
            }
        }

        Ok(violations.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }

    /// Analyze a directory tree and return a validation report
    pub fn analyze_directory<P: AsRef<Path>>(
        &self,
        root: P,
        options: &AnalysisOptions,
    ) -> GuardianResult<ValidationReport> {
        self.analyze_paths(&[root.as_ref()], options)
    }

    pub fn config_fingerprint(&self) -> String {
        self.config.fingerprint()
    }

    /// Get statistics about the configured rules
    pub fn rule_stats(&self) -> RuleStats {
        let summaries = self.config.rule_summaries();
        let enabled_rules = summaries.iter().filter(|rule| rule.enabled).count();
        RuleStats {
            enabled_rules,
            disabled_rules: summaries.len() - enabled_rules,
            blocking_rules: summaries
                .iter()
                .filter(|rule| rule.enabled && rule.severity.is_blocking())
                .count(),
        }
    }
}

/// Statistics about configured rules
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RuleStats {
    pub enabled_rules: usize,
    pub disabled_rules: usize,
    /// Enabled rules whose violations fail the run
    pub blocking_rules: usize,
}

impl RuleStats {
    pub fn total_rules(&self) -> usize {
        self.enabled_rules + self.disabled_rules
    }
}
