//! Export rules and the engine that drives them over a module
//!
//! Architecture: Domain Services - each rule opens a pass per module
//! - `ExportRule::begin` creates the per-module state, or declines the module
//! - Every export node is classified once and shown to every open pass
//! - `RulePass::finish` consumes the state exactly once at the end of the module

pub mod case;
pub mod classify;
pub mod export_limit;
pub mod filename;

pub use case::{to_camel_case, to_pascal_case, CaseCandidates};
pub use classify::classify;
pub use export_limit::{ExportLimit, ExportLimitOptions};
pub use filename::{FilenameMatch, FilenameOptions};

use crate::domain::exports::ExportRecord;
use crate::domain::findings::{Finding, ReportSink};
use crate::syntax::ModuleTree;
use std::path::Path;

/// The module currently being checked
#[derive(Debug, Clone)]
pub struct ModuleContext<'a> {
    path: &'a Path,
    stem: String,
}

impl<'a> ModuleContext<'a> {
    pub fn new(path: &'a Path) -> Self {
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, stem }
    }

    pub fn path(&self) -> &Path {
        self.path
    }

    /// File name without directory and extension
    pub fn stem(&self) -> &str {
        &self.stem
    }
}

/// A policy over the exports of a single module
pub trait ExportRule: Send + Sync {
    fn id(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Start checking a module; `None` means the rule skips it entirely
    fn begin(&self, module: &ModuleContext<'_>) -> Option<Box<dyn RulePass + '_>>;
}

/// Per-module state of one rule
pub trait RulePass {
    fn visit(&mut self, record: &ExportRecord, sink: &mut dyn ReportSink);

    fn finish(self: Box<Self>, sink: &mut dyn ReportSink);
}

/// Ordered collection of export rules
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn ExportRule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both rules with their default options
    pub fn with_defaults() -> Self {
        Self::new()
            .with_rule(ExportLimit::new(ExportLimitOptions::default()))
            .with_rule(FilenameMatch::new(FilenameOptions::default()))
    }

    pub fn with_rule(mut self, rule: impl ExportRule + 'static) -> Self {
        self.push(Box::new(rule));
        self
    }

    pub fn push(&mut self, rule: Box<dyn ExportRule>) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = &(dyn ExportRule + 'static)> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Run every rule over one module, reporting into `sink`
    pub fn check_module(&self, tree: &dyn ModuleTree, path: &Path, sink: &mut dyn ReportSink) {
        let module = ModuleContext::new(path);
        let mut passes: Vec<_> = self.rules.iter().filter_map(|rule| rule.begin(&module)).collect();
        if passes.is_empty() {
            return;
        }

        for node in tree.visit_exports() {
            let record = classify(node);
            for pass in &mut passes {
                pass.visit(&record, sink);
            }
        }

        for pass in passes {
            pass.finish(sink);
        }
    }

    /// Run every rule over one module and collect the findings
    pub fn check(&self, tree: &dyn ModuleTree, path: &Path) -> Vec<Finding> {
        let mut findings = Vec::new();
        self.check_module(tree, path, &mut findings);
        tracing::debug!("{}: {} finding(s)", path.display(), findings.len());
        findings
    }
}
