//! Filename correspondence: a named export must be named after its module

use super::case::CaseCandidates;
use super::{ExportRule, ModuleContext, RulePass};
use crate::domain::exports::{ExportKind, ExportRecord};
use crate::domain::findings::{Finding, FindingKind, ReportSink};
use serde::{Deserialize, Serialize};

const INDEX_STEM: &str = "index";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FilenameOptions {
    /// Skip modules named `index` entirely
    pub ignore_index_files: bool,
    /// Hold `export { x } from "mod"` to the same naming policy
    pub check_re_exports: bool,
}

impl Default for FilenameOptions {
    fn default() -> Self {
        Self { ignore_index_files: true, check_re_exports: false }
    }
}

/// Requires named value exports to match the module file name
#[derive(Debug, Clone, Default)]
pub struct FilenameMatch {
    options: FilenameOptions,
}

impl FilenameMatch {
    pub const ID: &'static str = "filename_match";

    pub fn new(options: FilenameOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> FilenameOptions {
        self.options
    }
}

impl ExportRule for FilenameMatch {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn description(&self) -> &'static str {
        "Ensure file name matches exactly with the exported name"
    }

    fn begin(&self, module: &ModuleContext<'_>) -> Option<Box<dyn RulePass + '_>> {
        if self.options.ignore_index_files && module.stem() == INDEX_STEM {
            tracing::trace!("{}: index module skipped by {}", module.path().display(), Self::ID);
            return None;
        }

        Some(Box::new(NameCheck {
            options: self.options,
            candidates: CaseCandidates::from_stem(module.stem()),
        }))
    }
}

struct NameCheck {
    options: FilenameOptions,
    candidates: CaseCandidates,
}

impl NameCheck {
    fn applies_to(&self, kind: ExportKind) -> bool {
        match kind {
            ExportKind::NamedValue => true,
            ExportKind::ReExport => self.options.check_re_exports,
            ExportKind::NamedType | ExportKind::Default => false,
        }
    }
}

impl RulePass for NameCheck {
    fn visit(&mut self, record: &ExportRecord, sink: &mut dyn ReportSink) {
        if !self.applies_to(record.kind) {
            return;
        }
        let Some(name) = record.identifier() else {
            return;
        };
        if self.candidates.accepts(name) {
            return;
        }

        sink.report(Finding::new(
            FilenameMatch::ID,
            record.position,
            FindingKind::FilenameMismatch {
                export_name: name.to_string(),
                filename: self.candidates.stem.clone(),
                expected_name: self.candidates.expected_for(name).to_string(),
            },
        ));
    }

    fn finish(self: Box<Self>, _sink: &mut dyn ReportSink) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::exports::Position;
    use crate::rules::RuleSet;
    use crate::syntax::fixtures::*;
    use rstest::rstest;
    use serde_json::Value;
    use std::path::Path;

    fn check_with(statements: Vec<Value>, filename: &str, options: FilenameOptions) -> Vec<Finding> {
        RuleSet::new()
            .with_rule(FilenameMatch::new(options))
            .check(&program(statements), Path::new(filename))
    }

    fn check(statements: Vec<Value>, filename: &str) -> Vec<Finding> {
        check_with(statements, filename, FilenameOptions::default())
    }

    fn mismatch(export_name: &str, filename: &str, expected_name: &str) -> FindingKind {
        FindingKind::FilenameMismatch {
            export_name: export_name.into(),
            filename: filename.into(),
            expected_name: expected_name.into(),
        }
    }

    #[rstest]
    #[case::exact(vec![export_const("userService")], "userService.js")]
    #[case::camel_from_kebab(vec![export_const("userService")], "user-service.js")]
    #[case::pascal_from_kebab(vec![export_class("UserService")], "user-service.js")]
    #[case::kebab_literal(vec![export_const("user-service")], "user-service.js")]
    #[case::function(vec![export_function("calculateTotal")], "calculate-total.js")]
    #[case::ignored_index(vec![export_const("anything")], "index.js")]
    #[case::specifier(vec![plain_const("userService"), export_specifiers(&["userService"])], "user-service.js")]
    #[case::default_export(vec![export_default()], "whatever.js")]
    #[case::type_alias(vec![export_type_alias("UserData")], "user-service.ts")]
    #[case::interface(vec![export_interface("ApiResponse")], "user-service.ts")]
    #[case::type_specifier(vec![export_type_specifiers(&["UserData"])], "user-service.ts")]
    #[case::re_export(vec![re_export(&["something"], "somewhere")], "user-service.js")]
    #[case::anonymous(vec![export_enum("Color"), export_specifiers(&[])], "user-service.ts")]
    #[case::nested_directory(vec![export_const("userService")], "src/services/user-service.ts")]
    fn test_allows(#[case] statements: Vec<Value>, #[case] filename: &str) {
        assert!(check(statements, filename).is_empty());
    }

    #[rstest]
    #[case::camel(export_const("wrongName"), "user-service.js", mismatch("wrongName", "user-service", "userService"))]
    #[case::pascal(export_class("WrongName"), "user-service.js", mismatch("WrongName", "user-service", "UserService"))]
    #[case::function(
        export_function("wrongFunction"),
        "calculate-total.js",
        mismatch("wrongFunction", "calculate-total", "calculateTotal")
    )]
    #[case::variable(export_const("badName"), "good-name.js", mismatch("badName", "good-name", "goodName"))]
    #[case::lowercase(
        export_const("wrongname"),
        "user-service.js",
        mismatch("wrongname", "user-service", "userService")
    )]
    fn test_reports_mismatch(
        #[case] statement: Value,
        #[case] filename: &str,
        #[case] expected: FindingKind,
    ) {
        let findings = check(vec![statement], filename);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, FilenameMatch::ID);
        assert_eq!(findings[0].kind, expected);
        assert_eq!(findings[0].position, Some(Position::new(1, 1)));
    }

    #[test]
    fn test_specifier_mismatch() {
        let findings = check(
            vec![plain_const("wrongExport"), export_specifiers(&["wrongExport"])],
            "correct-name.js",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, mismatch("wrongExport", "correct-name", "correctName"));
        assert_eq!(findings[0].position, Some(Position::new(2, 1)));
    }

    #[test]
    fn test_index_files_checked_when_not_ignored() {
        let options = FilenameOptions { ignore_index_files: false, ..Default::default() };

        assert!(check_with(vec![export_const("index")], "index.js", options).is_empty());

        let findings = check_with(vec![export_const("wrongName")], "index.js", options);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, mismatch("wrongName", "index", "index"));
    }

    #[test]
    fn test_every_mismatching_export_is_reported() {
        let findings = check(
            vec![export_const("userService"), export_const("first"), export_class("Second")],
            "user-service.js",
        );
        let names: Vec<_> = findings
            .iter()
            .map(|finding| match &finding.kind {
                FindingKind::FilenameMismatch { export_name, .. } => export_name.as_str(),
                other => panic!("unexpected finding {other:?}"),
            })
            .collect();
        assert_eq!(names, vec!["first", "Second"]);
    }

    #[test]
    fn test_re_exports_checked_when_enabled() {
        let options = FilenameOptions { check_re_exports: true, ..Default::default() };

        let findings = check_with(vec![re_export(&["something"], "somewhere")], "user-service.js", options);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, mismatch("something", "user-service", "userService"));

        assert!(check_with(vec![re_export(&["UserService"], "./impl")], "user-service.js", options)
            .is_empty());
    }

    #[test]
    fn test_options_deserialize() {
        let options: FilenameOptions = serde_json::from_str(r#"{"ignoreIndexFiles": false}"#).unwrap();
        assert!(!options.ignore_index_files);
        assert!(!options.check_re_exports);
        assert_eq!(serde_json::from_str::<FilenameOptions>("{}").unwrap(), FilenameOptions::default());
    }
}
