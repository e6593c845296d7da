//! AST documents: ESTree JSON written next to (or instead of) the source module
//!
//! A document is either a bare `Program` node, in which case the module path is
//! the document path without its `.ast.json` suffix, or a wrapper object
//! `{ "filename": "src/user-service.ts", "ast": { "type": "Program", .. } }`.

use crate::domain::violations::{GuardianError, GuardianResult};
use crate::syntax::{ModuleTree, Program};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

pub const AST_SUFFIX: &str = ".ast.json";

/// Whether a file name carries the AST document suffix
pub fn is_ast_document(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.len() > AST_SUFFIX.len() && name.ends_with(AST_SUFFIX))
}

/// `src/user-service.ts.ast.json` -> `src/user-service.ts`
pub fn module_path_for(document_path: &Path) -> PathBuf {
    match document_path.file_name().and_then(|name| name.to_str()) {
        Some(name) if is_ast_document(document_path) => {
            document_path.with_file_name(&name[..name.len() - AST_SUFFIX.len()])
        }
        _ => document_path.to_path_buf(),
    }
}

/// A decoded AST document
#[derive(Debug, Clone)]
pub struct AstDocument {
    pub document_path: PathBuf,
    /// Path of the source module the tree was parsed from
    pub module_path: PathBuf,
    pub program: Program,
}

impl AstDocument {
    pub fn parse(document_path: &Path, content: &str) -> GuardianResult<Self> {
        let syntax_error = |message: String| {
            GuardianError::syntax(document_path.display().to_string(), message)
        };

        let value: JsonValue =
            serde_json::from_str(content).map_err(|e| syntax_error(format!("Invalid JSON: {e}")))?;

        let (filename, ast) = match value {
            JsonValue::Object(mut wrapper) if wrapper.contains_key("ast") => {
                let filename = match wrapper.remove("filename") {
                    Some(JsonValue::String(name)) => (!name.is_empty()).then(|| PathBuf::from(name)),
                    Some(JsonValue::Null) | None => None,
                    Some(other) => {
                        return Err(syntax_error(format!(
                            "'filename' must be a string, found {other}"
                        )))
                    }
                };
                (filename, wrapper.remove("ast").unwrap_or(JsonValue::Null))
            }
            bare => (None, bare),
        };

        let program: Program = serde_json::from_value(ast)
            .map_err(|e| syntax_error(format!("Unreadable syntax tree: {e}")))?;
        if !program.is_program() {
            return Err(syntax_error(format!(
                "Expected a Program root node, found '{}'",
                program.node_type
            )));
        }

        Ok(Self {
            document_path: document_path.to_path_buf(),
            module_path: filename.unwrap_or_else(|| module_path_for(document_path)),
            program,
        })
    }

    pub fn tree(&self) -> &dyn ModuleTree {
        &self.program
    }
}
