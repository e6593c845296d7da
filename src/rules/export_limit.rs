//! Export-count policy: at most one named value export, and one type export
//!
//! Named exports are tallied while the module is visited and judged once, at
//! the end of the module. The first export of a category is authoritative and
//! every later one is reported with the size of the whole category.

use super::{ExportRule, ModuleContext, RulePass};
use crate::domain::exports::{ExportRecord, Position};
use crate::domain::findings::{Finding, FindingKind, ReportSink};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ExportLimitOptions {
    /// A default export may sit next to the named export; default exports are never counted
    pub allow_default_export: bool,
    /// Count type exports against their own budget instead of the shared one
    pub allow_type_exports: bool,
}

impl Default for ExportLimitOptions {
    fn default() -> Self {
        Self { allow_default_export: true, allow_type_exports: true }
    }
}

/// Limits a module to one named export
#[derive(Debug, Clone, Default)]
pub struct ExportLimit {
    options: ExportLimitOptions,
}

impl ExportLimit {
    pub const ID: &'static str = "export_limit";

    pub fn new(options: ExportLimitOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ExportLimitOptions {
        self.options
    }
}

impl ExportRule for ExportLimit {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn description(&self) -> &'static str {
        "Limit files to only one named export"
    }

    fn begin(&self, _module: &ModuleContext<'_>) -> Option<Box<dyn RulePass + '_>> {
        Some(Box::new(ExportTally::new(self.options)))
    }
}

#[derive(Debug, Clone, Copy)]
struct TalliedExport {
    order: usize,
    position: Option<Position>,
}

/// Named exports seen so far in the current module
#[derive(Debug)]
struct ExportTally {
    options: ExportLimitOptions,
    seen: usize,
    type_exports: Vec<TalliedExport>,
    value_exports: Vec<TalliedExport>,
}

impl ExportTally {
    fn new(options: ExportLimitOptions) -> Self {
        Self { options, seen: 0, type_exports: Vec::new(), value_exports: Vec::new() }
    }
}

impl RulePass for ExportTally {
    fn visit(&mut self, record: &ExportRecord, _sink: &mut dyn ReportSink) {
        let tallied = TalliedExport { order: self.seen, position: record.position };
        if record.kind.is_type() {
            self.type_exports.push(tallied);
        } else if record.kind.counts_as_value() {
            self.value_exports.push(tallied);
        } else {
            return;
        }
        self.seen += 1;
    }

    fn finish(self: Box<Self>, sink: &mut dyn ReportSink) {
        let ExportTally { options, type_exports, value_exports, .. } = *self;

        if options.allow_type_exports {
            report_excess(&type_exports, sink, |count, first_export| {
                FindingKind::TooManyTypeExports { count, first_export }
            });
            report_excess(&value_exports, sink, |count, first_export| {
                FindingKind::TooManyNamedExports { count, first_export }
            });
        } else {
            let mut merged = type_exports;
            merged.extend(value_exports);
            merged.sort_by_key(|export| export.order);
            report_excess(&merged, sink, |count, first_export| FindingKind::TooManyNamedExports {
                count,
                first_export,
            });
        }
    }
}

/// Report every export after the first, each carrying the category total
fn report_excess(
    exports: &[TalliedExport],
    sink: &mut dyn ReportSink,
    kind: impl Fn(usize, Option<Position>) -> FindingKind,
) {
    let Some((first, rest)) = exports.split_first() else {
        return;
    };

    let count = exports.len();
    for export in rest {
        sink.report(Finding::new(ExportLimit::ID, export.position, kind(count, first.position)));
    }
}
