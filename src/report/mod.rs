//! Report generation with multiple output formats
//!
//! CDD Principle: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - ValidationReport (domain) is converted to various external representations
//! - Each formatter encapsulates the rules for its specific output format
//! - Domain logic remains pure while supporting multiple presentation needs

use crate::domain::violations::{
    GuardianError, GuardianResult, Severity, ValidationReport, Violation,
};
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Supported output formats for validation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format, optionally coloured
    Human,
    /// JSON format for programmatic consumption
    Json,
    /// SARIF 2.1.0 for code scanning tools
    Sarif,
    /// GitHub Actions workflow commands
    GitHub,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            "sarif" => Some(Self::Sarif),
            "github" => Some(Self::GitHub),
            _ => None,
        }
    }

    pub fn all_formats() -> &'static [&'static str] {
        &["human", "json", "sarif", "github"]
    }
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (for human format)
    pub use_colors: bool,
    /// Whether to show suggested fixes
    pub show_suggestions: bool,
    /// Maximum number of violations to include
    pub max_violations: Option<usize>,
    /// Minimum severity level to include
    pub min_severity: Option<Severity>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { use_colors: true, show_suggestions: true, max_violations: None, min_severity: None }
    }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Error,
    Warning,
    Info,
    Success,
    Dim,
    Bold,
}

impl From<Severity> for Tone {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => Tone::Error,
            Severity::Warning => Tone::Warning,
            Severity::Info => Tone::Info,
        }
    }
}

/// Main report formatter that dispatches to specific formatters
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Format a validation report in the specified format
    pub fn format_report(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
    ) -> GuardianResult<String> {
        let (violations, hidden) = self.filter_violations(&report.violations);

        match format {
            OutputFormat::Human => Ok(self.format_human(report, &violations, hidden)),
            OutputFormat::Json => self.format_json(report, &violations),
            OutputFormat::Sarif => self.format_sarif(&violations),
            OutputFormat::GitHub => Ok(self.format_github(&violations)),
        }
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
        mut writer: W,
    ) -> GuardianResult<()> {
        let formatted = self.format_report(report, format)?;
        writer.write_all(formatted.as_bytes())?;
        Ok(())
    }

    /// Apply severity and count limits; also returns how many were cut by the limit
    fn filter_violations<'a>(&self, violations: &'a [Violation]) -> (Vec<&'a Violation>, usize) {
        let mut filtered: Vec<&Violation> = violations
            .iter()
            .filter(|v| self.options.min_severity.map_or(true, |min| v.severity >= min))
            .collect();

        let mut hidden = 0;
        if let Some(max) = self.options.max_violations {
            hidden = filtered.len().saturating_sub(max);
            filtered.truncate(max);
        }

        (filtered, hidden)
    }

    #[cfg(feature = "colors")]
    fn paint(&self, text: &str, tone: Tone) -> String {
        use colored::Colorize;

        if !self.options.use_colors {
            return text.to_string();
        }
        match tone {
            Tone::Error => text.red(),
            Tone::Warning => text.yellow(),
            Tone::Info => text.cyan(),
            Tone::Success => text.green(),
            Tone::Dim => text.dimmed(),
            Tone::Bold => text.bold(),
        }
        .to_string()
    }

    #[cfg(not(feature = "colors"))]
    fn paint(&self, text: &str, _tone: Tone) -> String {
        text.to_string()
    }

    fn format_human(
        &self,
        report: &ValidationReport,
        violations: &[&Violation],
        hidden: usize,
    ) -> String {
        let mut output = String::new();

        if violations.is_empty() {
            output.push_str(&format!("✅ {}\n", self.paint("No export violations found", Tone::Success)));
        } else {
            let (icon, tone) =
                if report.has_errors() { ("❌", Tone::Error) } else { ("⚠️", Tone::Warning) };
            output.push_str(&format!("{icon} {}\n\n", self.paint("Export Violations Found", tone)));

            let mut by_file: BTreeMap<&Path, Vec<&Violation>> = BTreeMap::new();
            for violation in violations {
                by_file.entry(&violation.file_path).or_default().push(violation);
            }

            for (file_path, file_violations) in by_file {
                output.push_str(&format!("📁 {}\n", file_path.display()));

                for violation in file_violations {
                    let position = match (violation.line_number, violation.column_number) {
                        (Some(line), Some(col)) => format!("{line}:{col}"),
                        (Some(line), None) => line.to_string(),
                        _ => "-".to_string(),
                    };

                    output.push_str(&format!(
                        "  {} [{}] {}\n",
                        self.paint(&format!("{position} {}", violation.rule_id), Tone::Dim),
                        self.paint(violation.severity.as_str(), violation.severity.into()),
                        violation.message
                    ));

                    if self.options.show_suggestions {
                        if let Some(suggestion) = &violation.suggested_fix {
                            output.push_str(&format!(
                                "    💡 {}\n",
                                self.paint(suggestion, Tone::Success)
                            ));
                        }
                    }
                }
                output.push('\n');
            }

            if hidden > 0 {
                output.push_str(&format!(
                    "… {hidden} more violation{} not shown\n\n",
                    if hidden == 1 { "" } else { "s" }
                ));
            }
        }

        output.push_str(&self.format_summary(report));
        output
    }

    fn format_json(
        &self,
        report: &ValidationReport,
        violations: &[&Violation],
    ) -> GuardianResult<String> {
        let json_violations: Vec<JsonValue> = violations
            .iter()
            .map(|v| {
                json!({
                    "rule_id": v.rule_id,
                    "severity": v.severity.as_str(),
                    "file_path": v.file_path.display().to_string(),
                    "line_number": v.line_number,
                    "column_number": v.column_number,
                    "message": v.message,
                    "data": v.data,
                    "suggested_fix": v.suggested_fix,
                    "detected_at": v.detected_at.to_rfc3339()
                })
            })
            .collect();

        let counts = &report.summary.violations_by_severity;
        let json_report = json!({
            "violations": json_violations,
            "summary": {
                "total_files": report.summary.total_files,
                "violations_by_severity": {
                    "error": counts.error,
                    "warning": counts.warning,
                    "info": counts.info
                },
                "execution_time_ms": report.summary.execution_time_ms,
                "validated_at": report.summary.validated_at.to_rfc3339()
            },
            "config_fingerprint": report.config_fingerprint
        });

        serde_json::to_string_pretty(&json_report)
            .map_err(|e| GuardianError::config(format!("JSON serialization failed: {e}")))
    }

    fn format_sarif(&self, violations: &[&Violation]) -> GuardianResult<String> {
        let mut rule_ids: Vec<&str> = violations.iter().map(|v| v.rule_id.as_str()).collect();
        rule_ids.sort_unstable();
        rule_ids.dedup();

        let rules: Vec<JsonValue> = rule_ids.iter().map(|id| json!({ "id": id })).collect();

        let results: Vec<JsonValue> = violations
            .iter()
            .map(|v| {
                let level = match v.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                    Severity::Info => "note",
                };

                let mut result = json!({
                    "ruleId": v.rule_id,
                    "level": level,
                    "message": { "text": v.message },
                    "locations": [{
                        "physicalLocation": {
                            "artifactLocation": {
                                "uri": v.file_path.display().to_string().replace('\\', "/")
                            },
                            "region": {
                                "startLine": v.line_number.unwrap_or(1),
                                "startColumn": v.column_number.unwrap_or(1)
                            }
                        }
                    }]
                });
                if let Some(data) = &v.data {
                    result["properties"] = json!({ "data": data });
                }
                result
            })
            .collect();

        let sarif_report = json!({
            "version": "2.1.0",
            "$schema": "https://json.schemastore.org/sarif-2.1.0.json",
            "runs": [{
                "tool": {
                    "driver": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION"),
                        "rules": rules
                    }
                },
                "results": results
            }]
        });

        serde_json::to_string_pretty(&sarif_report)
            .map_err(|e| GuardianError::config(format!("SARIF serialization failed: {e}")))
    }

    fn format_github(&self, violations: &[&Violation]) -> String {
        let mut output = String::new();

        for violation in violations {
            let level = match violation.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Info => "notice",
            };

            let mut properties = vec![
                format!("file={}", escape_property(&violation.file_path.display().to_string())),
                format!("title={}", escape_property(&violation.rule_id)),
            ];
            if let Some(line) = violation.line_number {
                properties.push(format!("line={line}"));
            }
            if let Some(col) = violation.column_number {
                properties.push(format!("col={col}"));
            }

            output.push_str(&format!(
                "::{level} {}::{}\n",
                properties.join(","),
                escape_data(&violation.message)
            ));
        }

        output
    }

    fn format_summary(&self, report: &ValidationReport) -> String {
        let counts = &report.summary.violations_by_severity;
        let execution_time = (report.summary.execution_time_ms as f64) / 1000.0;
        let files = report.summary.total_files;
        let files_label = if files == 1 { "file" } else { "files" };

        let totals = if counts.total() == 0 {
            self.paint("0 violations", Tone::Success)
        } else {
            let mut parts = Vec::new();
            if counts.error > 0 {
                let text = format!("{} error{}", counts.error, if counts.error == 1 { "" } else { "s" });
                parts.push(self.paint(&text, Tone::Error));
            }
            if counts.warning > 0 {
                let text =
                    format!("{} warning{}", counts.warning, if counts.warning == 1 { "" } else { "s" });
                parts.push(self.paint(&text, Tone::Warning));
            }
            if counts.info > 0 {
                parts.push(self.paint(&format!("{} info", counts.info), Tone::Info));
            }
            parts.join(", ")
        };

        format!(
            "📊 {} {totals} in {files} {files_label} ({execution_time:.1}s)\n",
            self.paint("Summary:", Tone::Bold)
        )
    }
}

/// Escape a workflow command message
fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Escape a workflow command property value
fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
