//! Violations and validation reports produced by the host
//!
//! Architecture: Rich Domain Models - a violation is a finding attributed to a file
//! - Severity comes from the rule configuration, not from the rule itself
//! - ValidationReport is the aggregate root over every analyzed module

use crate::domain::exports::Position;
use crate::domain::findings::{Finding, FindingKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity levels for export violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    /// Fails the check run
    Error,
}

impl Severity {
    /// Whether this severity level should cause validation to fail
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A rule finding attributed to a module file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Rule that reported the finding
    pub rule_id: String,
    pub severity: Severity,
    /// Module the finding belongs to
    pub file_path: PathBuf,
    /// Line number (1-indexed)
    pub line_number: Option<u32>,
    /// Column number (1-indexed)
    pub column_number: Option<u32>,
    pub message: String,
    /// Message id and data of the underlying finding
    pub data: Option<FindingKind>,
    pub suggested_fix: Option<String>,
    pub detected_at: DateTime<Utc>,
}

impl Violation {
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        file_path: PathBuf,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            file_path,
            line_number: None,
            column_number: None,
            message: message.into(),
            data: None,
            suggested_fix: None,
            detected_at: Utc::now(),
        }
    }

    /// Attribute a rule finding to a module file
    pub fn from_finding(finding: Finding, severity: Severity, file_path: PathBuf) -> Self {
        let mut violation = Self::new(finding.rule_id, severity, file_path, finding.kind.message());
        if let Some(position) = finding.position {
            violation = violation.with_position(position);
        }
        violation.suggested_fix = finding.kind.suggestion();
        violation.data = Some(finding.kind);
        violation
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.line_number = Some(position.line);
        self.column_number = Some(position.column);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggested_fix = Some(suggestion.into());
        self
    }

    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }

    /// `path:line:col [severity] message`
    pub fn format_display(&self) -> String {
        let location = match (self.line_number, self.column_number) {
            (Some(line), Some(col)) => format!(":{line}:{col}"),
            (Some(line), None) => format!(":{line}"),
            _ => String::new(),
        };

        format!(
            "{}{} [{}] {}",
            self.file_path.display(),
            location,
            self.severity.as_str(),
            self.message
        )
    }
}

/// Summary statistics for a validation report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total_files: usize,
    pub violations_by_severity: ViolationCounts,
    pub execution_time_ms: u64,
    pub validated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViolationCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl ViolationCounts {
    pub fn total(&self) -> usize {
        self.error + self.warning + self.info
    }

    pub fn has_blocking(&self) -> bool {
        self.error > 0
    }

    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.error += 1,
            Severity::Warning => self.warning += 1,
            Severity::Info => self.info += 1,
        }
    }
}

/// All violations found in one run, with summary metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
    pub summary: ValidationSummary,
    /// Fingerprint of the configuration used for this run
    pub config_fingerprint: Option<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            violations: Vec::new(),
            summary: ValidationSummary { validated_at: Utc::now(), ..Default::default() },
            config_fingerprint: None,
        }
    }

    pub fn add_violation(&mut self, violation: Violation) {
        self.summary.violations_by_severity.add(violation.severity);
        self.violations.push(violation);
    }

    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Whether the report contains blocking violations
    pub fn has_errors(&self) -> bool {
        self.summary.violations_by_severity.has_blocking()
    }

    pub fn violations_by_severity(&self, severity: Severity) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.severity == severity)
    }

    pub fn violations_for_rule<'a>(
        &'a self,
        rule_id: &'a str,
    ) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| v.rule_id == rule_id)
    }

    pub fn set_files_analyzed(&mut self, count: usize) {
        self.summary.total_files = count;
    }

    pub fn set_execution_time(&mut self, duration_ms: u64) {
        self.summary.execution_time_ms = duration_ms;
    }

    pub fn set_config_fingerprint(&mut self, fingerprint: impl Into<String>) {
        self.config_fingerprint = Some(fingerprint.into());
    }

    pub fn merge(&mut self, other: ValidationReport) {
        for violation in other.violations {
            self.add_violation(violation);
        }
        self.summary.total_files += other.summary.total_files;
    }

    /// Order by file, then position; the sort is stable so same-line findings keep rule order
    pub fn sort_violations(&mut self) {
        self.violations.sort_by(|a, b| {
            a.file_path
                .cmp(&b.file_path)
                .then_with(|| a.line_number.unwrap_or(0).cmp(&b.line_number.unwrap_or(0)))
                .then_with(|| a.column_number.unwrap_or(0).cmp(&b.column_number.unwrap_or(0)))
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors raised by the host around the rule engine
#[derive(Debug, thiserror::Error)]
pub enum GuardianError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Path pattern compilation failed
    #[error("Pattern error: {message}")]
    Pattern { message: String },

    #[error("Analysis error in {file}: {message}")]
    Analysis { file: String, message: String },

    /// An AST document could not be decoded
    #[error("Syntax tree error in {file}: {message}")]
    Syntax { file: String, message: String },
}

impl GuardianError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern { message: message.into() }
    }

    pub fn analysis(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Analysis { file: file.into(), message: message.into() }
    }

    pub fn syntax(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Syntax { file: file.into(), message: message.into() }
    }
}

pub type GuardianResult<T> = Result<T, GuardianError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_violation_creation() {
        let violation = Violation::new(
            "export_limit",
            Severity::Error,
            PathBuf::from("src/api.ts"),
            "Test message",
        );

        assert_eq!(violation.rule_id, "export_limit");
        assert_eq!(violation.file_path, Path::new("src/api.ts"));
        assert!(violation.is_blocking());
        assert_eq!(violation.format_display(), "src/api.ts [error] Test message");
    }

    #[test]
    fn test_violation_from_finding() {
        let finding = Finding::new(
            "filename_match",
            Some(Position::new(4, 1)),
            FindingKind::FilenameMismatch {
                export_name: "wrongName".into(),
                filename: "user-service".into(),
                expected_name: "userService".into(),
            },
        );

        let violation =
            Violation::from_finding(finding, Severity::Warning, PathBuf::from("user-service.ts"));

        assert_eq!(violation.rule_id, "filename_match");
        assert_eq!(violation.line_number, Some(4));
        assert_eq!(violation.column_number, Some(1));
        assert!(violation.message.contains("'wrongName'"));
        assert!(violation.suggested_fix.as_deref().unwrap().contains("userService"));
        assert!(matches!(violation.data, Some(FindingKind::FilenameMismatch { .. })));
        assert!(!violation.is_blocking());
        assert_eq!(
            violation.format_display(),
            format!("user-service.ts:4:1 [warning] {}", violation.message)
        );
    }

    #[test]
    fn test_validation_report() {
        let mut report = ValidationReport::new();

        report.add_violation(Violation::new(
            "export_limit",
            Severity::Error,
            PathBuf::from("b.ts"),
            "Error message",
        ));
        report.add_violation(
            Violation::new("filename_match", Severity::Warning, PathBuf::from("a.ts"), "Warning")
                .with_position(Position::new(2, 1)),
        );

        assert!(report.has_violations());
        assert!(report.has_errors());
        assert_eq!(report.summary.violations_by_severity.total(), 2);
        assert_eq!(report.violations_for_rule("filename_match").count(), 1);

        report.sort_violations();
        assert_eq!(report.violations[0].file_path, Path::new("a.ts"));
    }

    #[test]
    fn test_merge_reports() {
        let mut first = ValidationReport::new();
        first.set_files_analyzed(2);
        let mut second = ValidationReport::new();
        second.add_violation(Violation::new("r", Severity::Info, PathBuf::from("x.ts"), "m"));
        second.set_files_analyzed(3);

        first.merge(second);
        assert_eq!(first.summary.total_files, 5);
        assert_eq!(first.summary.violations_by_severity.info, 1);
        assert!(!first.has_errors());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert!(!Severity::Warning.is_blocking());
    }
}
