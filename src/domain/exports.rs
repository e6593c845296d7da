//! Export records: the classified shape of one export declaration
//!
//! Architecture: Value Objects - records are produced once per declaration node
//! - The export kind is a closed set, so every policy matches on the same union
//! - Records carry only what the policies read: kind, identifier, and position

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 1-indexed line/column position inside a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Shape of an export declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportKind {
    /// `export const x`, `export function f`, `export class C`, `export { x }`
    NamedValue,
    /// `export type T`, `export interface I`, `export type { T }`
    NamedType,
    /// `export default ...`
    Default,
    /// `export { x } from "./other"`
    ReExport,
}

impl ExportKind {
    /// Whether this export is charged against the value budget
    pub fn counts_as_value(self) -> bool {
        matches!(self, Self::NamedValue | Self::ReExport)
    }

    pub fn is_type(self) -> bool {
        matches!(self, Self::NamedType)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NamedValue => "named-value",
            Self::NamedType => "named-type",
            Self::Default => "default",
            Self::ReExport => "re-export",
        }
    }
}

/// One classified export declaration within a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub kind: ExportKind,
    /// Declared or exported identifier, absent when the node binds none
    pub name: Option<String>,
    pub position: Option<Position>,
}

impl ExportRecord {
    pub fn new(kind: ExportKind, name: Option<String>, position: Option<Position>) -> Self {
        Self { kind, name, position }
    }

    /// Identifier as a non-empty string
    pub fn identifier(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}
