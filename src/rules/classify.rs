//! Export classification: one declaration node in, one `ExportRecord` out

use crate::domain::exports::{ExportKind, ExportRecord};
use crate::syntax::estree::{BindingPattern, Declaration, ExportNamedDeclaration};
use crate::syntax::ExportNode;

/// Classify a single export declaration.
///
/// Unrecognized declaration shapes fall back to a named value export without
/// an identifier, which both rules tolerate.
pub fn classify(node: ExportNode<'_>) -> ExportRecord {
    let position = node.position();
    match node {
        ExportNode::Default(_) => ExportRecord::new(ExportKind::Default, None, position),
        ExportNode::Named(declaration) => {
            let kind = if is_type_export(declaration) {
                ExportKind::NamedType
            } else if declaration.is_re_export() {
                ExportKind::ReExport
            } else {
                ExportKind::NamedValue
            };
            ExportRecord::new(kind, exported_name(declaration), position)
        }
    }
}

/// Whether a named export only exports types
pub fn is_type_export(node: &ExportNamedDeclaration) -> bool {
    node.export_kind.as_deref() == Some("type")
        || node.declaration.as_ref().is_some_and(Declaration::is_type_declaration)
        || node.specifiers.iter().any(|specifier| specifier.is_type_only())
}

/// Identifier a named export binds; only the first declarator or specifier counts
pub fn exported_name(node: &ExportNamedDeclaration) -> Option<String> {
    let declared = match &node.declaration {
        Some(Declaration::VariableDeclaration(variables)) => {
            variables.declarations.first().and_then(|declarator| match &declarator.id {
                BindingPattern::Identifier(identifier) => Some(identifier.name.clone()),
                BindingPattern::Other => None,
            })
        }
        Some(
            Declaration::FunctionDeclaration(named)
            | Declaration::ClassDeclaration(named)
            | Declaration::TsInterfaceDeclaration(named)
            | Declaration::TsTypeAliasDeclaration(named),
        ) => named.id.as_ref().map(|identifier| identifier.name.clone()),
        Some(Declaration::TsModuleDeclaration(_) | Declaration::Other) | None => None,
    };

    declared.or_else(|| {
        node.specifiers
            .first()
            .and_then(|specifier| specifier.exported_name())
            .map(str::to_owned)
    })
}
