//! Export Guardian - one-export-per-file and filename conventions for JS/TS modules
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - The rule engine in `rules` is pure and works on any `syntax::ModuleTree`
//! - Path discovery, document loading, and reporting live around it
//! - Agent integration API provides validation workflows

pub mod analyzer;
pub mod config;
pub mod domain;
pub mod paths;
pub mod report;
pub mod rules;
pub mod syntax;

// Re-export main types for convenient access
pub use domain::exports::{ExportKind, ExportRecord, Position};
pub use domain::findings::{Finding, FindingKind, ReportSink};
pub use domain::violations::{
    GuardianError, GuardianResult, Severity, ValidationReport, ValidationSummary, Violation,
};

pub use config::{ConfigBuilder, GuardianConfig, RuleSummary};

pub use analyzer::{AnalysisOptions, Analyzer, ModuleLoader, RuleStats};

pub use report::{OutputFormat, ReportFormatter, ReportOptions};

pub use rules::{
    ExportLimit, ExportLimitOptions, ExportRule, FilenameMatch, FilenameOptions, RuleSet,
};

use std::path::{Path, PathBuf};

/// Main Guardian validator providing high-level validation operations
pub struct GuardianValidator {
    analyzer: Analyzer,
    report_formatter: ReportFormatter,
}

/// Options for agent validation workflows
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Output format for results
    pub output_format: OutputFormat,
    /// Report options
    pub report_options: ReportOptions,
    /// Analysis options
    pub analysis_options: AnalysisOptions,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Human,
            report_options: ReportOptions::default(),
            analysis_options: AnalysisOptions::default(),
        }
    }
}

impl GuardianValidator {
    /// Create a new validator with the given configuration
    pub fn new_with_config(config: GuardianConfig) -> GuardianResult<Self> {
        let analyzer = Analyzer::new(config)?;
        Ok(Self { analyzer, report_formatter: ReportFormatter::default() })
    }

    /// Create a validator with default configuration
    pub fn new() -> GuardianResult<Self> {
        Self::new_with_config(GuardianConfig::default())
    }

    /// Create a validator loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> GuardianResult<Self> {
        let config = GuardianConfig::load_from_file(path)?;
        Self::new_with_config(config)
    }

    /// Set custom report formatter
    pub fn with_report_formatter(mut self, formatter: ReportFormatter) -> Self {
        self.report_formatter = formatter;
        self
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Validate documents for agent workflows - primary API for autonomous agents
    pub fn validate_for_agent<P: AsRef<Path>>(
        &self,
        paths: Vec<P>,
    ) -> GuardianResult<ValidationReport> {
        self.validate_with_options(paths, &ValidationOptions::default())
    }

    /// Validate documents and directories with custom options
    pub fn validate_with_options<P: AsRef<Path>>(
        &self,
        paths: Vec<P>,
        options: &ValidationOptions,
    ) -> GuardianResult<ValidationReport> {
        let paths: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
        self.analyzer.analyze_paths(&paths, &options.analysis_options)
    }

    /// Validate a single document
    pub fn validate_file<P: AsRef<Path>>(&self, file_path: P) -> GuardianResult<ValidationReport> {
        let violations = self.analyzer.analyze_file(file_path)?;

        let mut report = ValidationReport::new();
        for violation in violations {
            report.add_violation(violation);
        }
        report.set_files_analyzed(1);
        report.set_config_fingerprint(self.analyzer.config_fingerprint());

        Ok(report)
    }

    /// Validate entire directory tree
    pub fn validate_directory<P: AsRef<Path>>(
        &self,
        root: P,
        options: &AnalysisOptions,
    ) -> GuardianResult<ValidationReport> {
        self.analyzer.analyze_directory(root, options)
    }

    /// Format a validation report for output
    pub fn format_report(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
    ) -> GuardianResult<String> {
        self.report_formatter.format_report(report, format)
    }

    /// Format a report with the output settings carried by `options`
    pub fn format_with_options(
        &self,
        report: &ValidationReport,
        options: &ValidationOptions,
    ) -> GuardianResult<String> {
        ReportFormatter::new(options.report_options.clone())
            .format_report(report, options.output_format)
    }

    /// Get statistics about the configured rules
    pub fn rule_statistics(&self) -> RuleStats {
        self.analyzer.rule_stats()
    }
}

/// Convenience function to create a validator with default settings
pub fn create_validator() -> GuardianResult<GuardianValidator> {
    GuardianValidator::new()
}

/// Convenience function to validate documents with default settings
pub fn validate_files<P: AsRef<Path>>(files: Vec<P>) -> GuardianResult<ValidationReport> {
    GuardianValidator::new()?.validate_for_agent(files)
}

/// Convenience function to validate a directory with default settings
pub fn validate_directory<P: AsRef<Path>>(directory: P) -> GuardianResult<ValidationReport> {
    let validator = GuardianValidator::new()?;
    validator.validate_directory(directory, &AnalysisOptions::default())
}

/// Agent integration utilities
pub mod agent {
    use super::*;

    /// Pre-commit validation for autonomous agents
    ///
    /// Returns an error if any blocking violations are found in the given
    /// documents.
    pub fn pre_commit_check<P: AsRef<Path>>(modified_files: Vec<P>) -> GuardianResult<()> {
        let report = GuardianValidator::new()?.validate_for_agent(modified_files)?;

        if report.has_errors() {
            let error_count = report.summary.violations_by_severity.error;
            return Err(GuardianError::config(format!(
                "Pre-commit check failed: {} blocking violation{} found",
                error_count,
                if error_count == 1 { "" } else { "s" }
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::fixtures::*;
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::TempDir;

    fn write_document(path: &Path, statements: Vec<Value>) {
        let body: Vec<Value> = statements
            .into_iter()
            .enumerate()
            .map(|(index, mut statement)| {
                statement["loc"] = json!({"start": {"line": index + 1, "column": 0}});
                statement
            })
            .collect();
        fs::write(path, json!({"type": "Program", "body": body}).to_string()).unwrap();
    }

    #[test]
    fn test_validator_creation() {
        let validator = GuardianValidator::new().unwrap();
        let stats = validator.rule_statistics();

        assert_eq!(stats.enabled_rules, 2);
        assert_eq!(stats.disabled_rules, 0);
    }

    #[test]
    fn test_validate_for_agent() {
        let temp_dir = TempDir::new().unwrap();
        let document = temp_dir.path().join("calculate-total.ts.ast.json");
        write_document(
            &document,
            vec![
                export_function("calculateTotal"),
                export_function("calculateTax"),
                export_function("calculateDiscount"),
            ],
        );

        let validator = GuardianValidator::new().unwrap();
        let report = validator.validate_for_agent(vec![document]).unwrap();

        let counts: Vec<_> = report
            .violations_for_rule("export_limit")
            .map(|v| v.data.as_ref().and_then(FindingKind::count))
            .collect();
        assert_eq!(counts, vec![Some(3), Some(3)]);
        assert_eq!(report.violations_for_rule("filename_match").count(), 2);
    }

    #[test]
    fn test_single_file_validation() {
        let temp_dir = TempDir::new().unwrap();
        let document = temp_dir.path().join("user-service.ts.ast.json");
        write_document(&document, vec![export_const("wrongName")]);

        let validator = GuardianValidator::new().unwrap();
        let report = validator.validate_file(&document).unwrap();

        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].file_path, temp_dir.path().join("user-service.ts"));
        assert_eq!(report.summary.total_files, 1);
        assert!(report.config_fingerprint.is_some());
    }

    #[test]
    fn test_directory_validation() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src/types")).unwrap();

        write_document(&root.join("src/user-service.ts.ast.json"), vec![export_const("userService")]);
        write_document(
            &root.join("src/types/shapes.ts.ast.json"),
            vec![export_type_alias("Circle"), export_interface("Square")],
        );

        let validator = GuardianValidator::new().unwrap();
        let report = validator.validate_directory(root, &AnalysisOptions::default()).unwrap();

        assert_eq!(report.summary.total_files, 2);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(
            report.violations[0].data,
            Some(FindingKind::TooManyTypeExports {
                count: 2,
                first_export: Some(Position::new(1, 1))
            })
        );
    }

    #[test]
    fn test_malformed_export_keeps_findings_for_valid_exports() {
        let temp_dir = TempDir::new().unwrap();
        let document = temp_dir.path().join("x.js.ast.json");
        let malformed = json!({
            "type": "ExportNamedDeclaration",
            "declaration": {
                "type": "VariableDeclaration",
                "kind": "const",
                "declarations": [{"type": "VariableDeclarator", "init": null}]
            },
            "specifiers": null,
            "source": null
        });
        write_document(
            &document,
            vec![export_function("first"), export_function("second"), malformed],
        );

        let validator = GuardianValidator::new().unwrap();
        let report = validator.validate_file(&document).unwrap();

        let counts: Vec<_> = report
            .violations_for_rule("export_limit")
            .map(|v| v.data.as_ref().and_then(FindingKind::count))
            .collect();
        assert_eq!(counts, vec![Some(3), Some(3)]);
        assert_eq!(report.violations_for_rule("filename_match").count(), 2);
    }

    #[test]
    fn test_report_formatting() {
        let temp_dir = TempDir::new().unwrap();
        let document = temp_dir.path().join("api.js.ast.json");
        write_document(&document, vec![export_const("fetchUsers")]);

        let validator = GuardianValidator::new()
            .unwrap()
            .with_report_formatter(ReportFormatter::new(ReportOptions {
                use_colors: false,
                ..Default::default()
            }));
        let report = validator.validate_file(&document).unwrap();

        let human = validator.format_report(&report, OutputFormat::Human).unwrap();
        assert!(human.contains("Export Violations Found"));
        assert!(human.contains("Expected export name to be 'api'"));

        let json = validator.format_report(&report, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["violations"][0]["data"]["messageId"], "namedExportMismatch");

        let options = ValidationOptions {
            output_format: OutputFormat::GitHub,
            report_options: ReportOptions { min_severity: Some(Severity::Error), ..Default::default() },
            ..Default::default()
        };
        let annotations = validator.format_with_options(&report, &options).unwrap();
        assert!(annotations.starts_with("::error "));
    }

    #[test]
    fn test_from_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("export_guardian.yaml");
        fs::write(
            &config_path,
            "version: \"1.0\"\nrules:\n  filename_match:\n    enabled: false\n",
        )
        .unwrap();

        let validator = GuardianValidator::from_config_file(&config_path).unwrap();
        let stats = validator.rule_statistics();
        assert_eq!(stats.enabled_rules, 1);
        assert_eq!(stats.disabled_rules, 1);
    }

    #[test]
    fn test_agent_pre_commit_check() {
        let temp_dir = TempDir::new().unwrap();
        let clean = temp_dir.path().join("format-date.ts.ast.json");
        let dirty = temp_dir.path().join("helpers.ts.ast.json");

        write_document(&clean, vec![export_function("formatDate"), export_default()]);
        write_document(&dirty, vec![export_const("a"), export_const("b")]);

        assert!(agent::pre_commit_check(vec![clean]).is_ok());

        let error = agent::pre_commit_check(vec![dirty]).unwrap_err();
        assert!(error.to_string().contains("blocking violations found"));
    }

    #[test]
    fn test_convenience_functions() {
        let temp_dir = TempDir::new().unwrap();
        write_document(&temp_dir.path().join("index.ts.ast.json"), vec![export_const("anything")]);

        let validator = create_validator().unwrap();
        assert_eq!(validator.rule_statistics().total_rules(), 2);

        let report = validate_directory(temp_dir.path()).unwrap();
        assert_eq!(report.summary.total_files, 1);
        assert!(!report.has_violations());

        let report = validate_files(vec![temp_dir.path()]).unwrap();
        assert!(!report.has_violations());
    }
}
