//! Syntax trees handed to the rule engine
//!
//! Architecture: Anti-Corruption Layer - the engine never walks parser output directly
//! - `ModuleTree::visit_exports` yields export declarations in source order
//! - Any tree representation can drive the rules by implementing the trait

pub mod estree;

#[cfg(test)]
pub(crate) mod fixtures;

pub use estree::{
    Declaration, ExportDefaultDeclaration, ExportNamedDeclaration, ExportSpecifier, Program,
    Statement, TsModuleBody, TsModuleDeclaration,
};

use crate::domain::exports::Position;

/// An export declaration node borrowed from a module tree
#[derive(Debug, Clone, Copy)]
pub enum ExportNode<'a> {
    Named(&'a ExportNamedDeclaration),
    Default(&'a ExportDefaultDeclaration),
}

impl ExportNode<'_> {
    pub fn position(&self) -> Option<Position> {
        let loc = match self {
            Self::Named(node) => node.loc,
            Self::Default(node) => node.loc,
        };
        loc.map(|loc| loc.start_position())
    }
}

/// A module syntax tree that can enumerate its export declarations
pub trait ModuleTree {
    /// Export declarations in source order; a node is yielded before any nested exports it contains
    fn visit_exports(&self) -> Vec<ExportNode<'_>>;
}

impl ModuleTree for Program {
    fn visit_exports(&self) -> Vec<ExportNode<'_>> {
        let mut exports = Vec::new();
        collect_exports(&self.body, &mut exports);
        exports
    }
}

impl ModuleTree for [Statement] {
    fn visit_exports(&self) -> Vec<ExportNode<'_>> {
        let mut exports = Vec::new();
        collect_exports(self, &mut exports);
        exports
    }
}

fn collect_exports<'a>(statements: &'a [Statement], exports: &mut Vec<ExportNode<'a>>) {
    for statement in statements {
        match statement {
            Statement::ExportNamedDeclaration(node) => {
                exports.push(ExportNode::Named(node));
                if let Some(Declaration::TsModuleDeclaration(module)) = &node.declaration {
                    collect_namespace_exports(module, exports);
                }
            }
            Statement::ExportDefaultDeclaration(node) => exports.push(ExportNode::Default(node)),
            Statement::TsModuleDeclaration(module) => collect_namespace_exports(module, exports),
            Statement::Other => {}
        }
    }
}

fn collect_namespace_exports<'a>(
    module: &'a TsModuleDeclaration,
    exports: &mut Vec<ExportNode<'a>>,
) {
    match &module.body {
        Some(TsModuleBody::Block { body }) => collect_exports(body, exports),
        Some(TsModuleBody::Nested(inner)) => collect_namespace_exports(inner, exports),
        Some(TsModuleBody::Other) | None => {}
    }
}
