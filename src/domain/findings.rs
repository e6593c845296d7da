//! Findings emitted by the export rules and the sink that receives them
//!
//! Architecture: Domain Events - rules never throw, they report
//! - A finding carries its rule, position, and message data
//! - The host decides severity, file attribution, and presentation

use crate::domain::exports::Position;
use serde::{Deserialize, Serialize};

/// What a rule found, together with its message data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "messageId", rename_all = "camelCase")]
pub enum FindingKind {
    /// A value export beyond the first
    TooManyNamedExports {
        count: usize,
        #[serde(rename = "firstExport", skip_serializing_if = "Option::is_none")]
        first_export: Option<Position>,
    },
    /// A type export beyond the first
    TooManyTypeExports {
        count: usize,
        #[serde(rename = "firstExport", skip_serializing_if = "Option::is_none")]
        first_export: Option<Position>,
    },
    /// A named export whose identifier does not correspond to the file name
    #[serde(rename = "namedExportMismatch")]
    FilenameMismatch {
        #[serde(rename = "exportName")]
        export_name: String,
        filename: String,
        #[serde(rename = "expectedName")]
        expected_name: String,
    },
}

impl FindingKind {
    /// Stable message identifier
    pub fn message_id(&self) -> &'static str {
        match self {
            Self::TooManyNamedExports { .. } => "tooManyNamedExports",
            Self::TooManyTypeExports { .. } => "tooManyTypeExports",
            Self::FilenameMismatch { .. } => "namedExportMismatch",
        }
    }

    /// Total size of the offending category, for count findings
    pub fn count(&self) -> Option<usize> {
        match self {
            Self::TooManyNamedExports { count, .. } | Self::TooManyTypeExports { count, .. } => {
                Some(*count)
            }
            Self::FilenameMismatch { .. } => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::TooManyNamedExports { count, .. } => format!(
                "Only one named export is allowed per file. Found {count} named exports."
            ),
            Self::TooManyTypeExports { count, .. } => {
                format!("Only one type export is allowed per file. Found {count} type exports.")
            }
            Self::FilenameMismatch { export_name, filename, expected_name } => format!(
                "Named export '{export_name}' does not match filename '{filename}'. \
                 Expected export name to be '{expected_name}'."
            ),
        }
    }

    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::TooManyNamedExports { first_export, .. }
            | Self::TooManyTypeExports { first_export, .. } => first_export.map(|position| {
                format!("First named export was here ({position}); move this export to its own module")
            }),
            Self::FilenameMismatch { expected_name, .. } => {
                Some(format!("Rename the export to '{expected_name}' or rename the file"))
            }
        }
    }
}

/// A single rule finding, positioned within the module under analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub position: Option<Position>,
    pub kind: FindingKind,
}

impl Finding {
    pub fn new(rule_id: impl Into<String>, position: Option<Position>, kind: FindingKind) -> Self {
        Self { rule_id: rule_id.into(), position, kind }
    }

    pub fn message(&self) -> String {
        self.kind.message()
    }
}

/// Receiver for findings while a module is being checked
pub trait ReportSink {
    fn report(&mut self, finding: Finding);
}

impl ReportSink for Vec<Finding> {
    fn report(&mut self, finding: Finding) {
        self.push(finding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_messages() {
        let kind = FindingKind::TooManyNamedExports { count: 3, first_export: None };
        assert_eq!(kind.message_id(), "tooManyNamedExports");
        assert_eq!(kind.count(), Some(3));
        assert_eq!(
            kind.message(),
            "Only one named export is allowed per file. Found 3 named exports."
        );
        assert_eq!(kind.suggestion(), None);

        let kind = FindingKind::TooManyTypeExports {
            count: 2,
            first_export: Some(Position::new(1, 1)),
        };
        assert!(kind.message().contains("Found 2 type exports"));
        assert!(kind.suggestion().unwrap().contains("(1:1)"));
    }

    #[test]
    fn test_mismatch_message() {
        let kind = FindingKind::FilenameMismatch {
            export_name: "wrongName".into(),
            filename: "user-service".into(),
            expected_name: "userService".into(),
        };
        assert_eq!(
            kind.message(),
            "Named export 'wrongName' does not match filename 'user-service'. \
             Expected export name to be 'userService'."
        );
        assert_eq!(kind.count(), None);
    }

    #[test]
    fn test_message_data_serialization() {
        let kind = FindingKind::FilenameMismatch {
            export_name: "wrongName".into(),
            filename: "user-service".into(),
            expected_name: "userService".into(),
        };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["messageId"], "namedExportMismatch");
        assert_eq!(json["exportName"], "wrongName");
        assert_eq!(json["expectedName"], "userService");

        let json = serde_json::to_value(FindingKind::TooManyTypeExports {
            count: 2,
            first_export: None,
        })
        .unwrap();
        assert_eq!(json["messageId"], "tooManyTypeExports");
        assert_eq!(json["count"], 2);
        assert!(json.get("firstExport").is_none());
    }

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<Finding> = Vec::new();
        sink.report(Finding::new(
            "export_limit",
            Some(Position::new(2, 1)),
            FindingKind::TooManyNamedExports { count: 2, first_export: None },
        ));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].rule_id, "export_limit");
    }
}
