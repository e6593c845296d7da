//! Serde model of the ESTree / typescript-estree JSON emitted by external parsers
//!
//! Only the node shapes the export rules read are typed. Every other node
//! collapses into an `Other` variant, so unfamiliar syntax never fails a load.
//! Fields inside export nodes are read leniently: a malformed field falls back
//! to its default, leaving an anonymous named-value export.

use crate::domain::exports::Position;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

/// Read a field, falling back to its default when the shape is unexpected
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Read a node list, dropping elements that do not deserialize
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match JsonValue::deserialize(deserializer)? {
        JsonValue::Array(items) => {
            Ok(items.into_iter().filter_map(|item| T::deserialize(item).ok()).collect())
        }
        _ => Ok(Vec::new()),
    }
}

/// Read a module body; the body must be an array, but bad statements are dropped
fn statement_list<'de, D>(deserializer: D) -> Result<Vec<Statement>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Vec::<JsonValue>::deserialize(deserializer)?;
    Ok(items.into_iter().filter_map(|item| Statement::deserialize(item).ok()).collect())
}

/// Root node of a module
#[derive(Debug, Clone, Deserialize)]
pub struct Program {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, deserialize_with = "statement_list")]
    pub body: Vec<Statement>,
    #[serde(default, rename = "sourceType")]
    pub source_type: Option<String>,
}

impl Program {
    pub fn is_program(&self) -> bool {
        self.node_type == "Program"
    }
}

/// Top-level (or namespace-level) statement
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Statement {
    ExportNamedDeclaration(ExportNamedDeclaration),
    ExportDefaultDeclaration(ExportDefaultDeclaration),
    #[serde(rename = "TSModuleDeclaration")]
    TsModuleDeclaration(TsModuleDeclaration),
    #[serde(other)]
    Other,
}

/// `export const x`, `export { x }`, `export { x } from "y"`, `export type T = ..`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportNamedDeclaration {
    #[serde(default, deserialize_with = "lenient")]
    pub declaration: Option<Declaration>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub specifiers: Vec<ExportSpecifier>,
    /// Module specifier of a re-export
    #[serde(default)]
    pub source: Option<JsonValue>,
    #[serde(default, rename = "exportKind", deserialize_with = "lenient")]
    pub export_kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub loc: Option<SourceLocation>,
}

impl ExportNamedDeclaration {
    pub fn is_re_export(&self) -> bool {
        self.source.is_some()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportDefaultDeclaration {
    #[serde(default, deserialize_with = "lenient")]
    pub loc: Option<SourceLocation>,
}

/// Declaration carried by a named export
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Declaration {
    VariableDeclaration(VariableDeclaration),
    FunctionDeclaration(NamedDeclaration),
    ClassDeclaration(NamedDeclaration),
    #[serde(rename = "TSInterfaceDeclaration")]
    TsInterfaceDeclaration(NamedDeclaration),
    #[serde(rename = "TSTypeAliasDeclaration")]
    TsTypeAliasDeclaration(NamedDeclaration),
    #[serde(rename = "TSModuleDeclaration")]
    TsModuleDeclaration(TsModuleDeclaration),
    #[serde(other)]
    Other,
}

impl Declaration {
    /// Type alias and interface declarations bind no runtime value
    pub fn is_type_declaration(&self) -> bool {
        matches!(self, Self::TsInterfaceDeclaration(_) | Self::TsTypeAliasDeclaration(_))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariableDeclaration {
    #[serde(default, deserialize_with = "lenient_list")]
    pub declarations: Vec<VariableDeclarator>,
    #[serde(default, deserialize_with = "lenient")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariableDeclarator {
    #[serde(default, deserialize_with = "lenient")]
    pub id: BindingPattern,
}

/// Left-hand side of a declarator
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "type")]
pub enum BindingPattern {
    Identifier(Identifier),
    #[default]
    #[serde(other)]
    Other,
}

/// Function, class, interface, or type alias declaration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedDeclaration {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<Identifier>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Identifier {
    pub name: String,
}

/// `namespace A { .. }` or `declare module "x" { .. }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TsModuleDeclaration {
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<TsModuleBody>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum TsModuleBody {
    #[serde(rename = "TSModuleBlock")]
    Block {
        #[serde(default, deserialize_with = "lenient_list")]
        body: Vec<Statement>,
    },
    /// Older typescript-estree output nests `namespace A.B` declarations
    #[serde(rename = "TSModuleDeclaration")]
    Nested(Box<TsModuleDeclaration>),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportSpecifier {
    #[serde(default, deserialize_with = "lenient")]
    pub local: Option<ModuleExportName>,
    #[serde(default, deserialize_with = "lenient")]
    pub exported: Option<ModuleExportName>,
    #[serde(default, rename = "exportKind", deserialize_with = "lenient")]
    pub export_kind: Option<String>,
}

impl ExportSpecifier {
    pub fn is_type_only(&self) -> bool {
        self.export_kind.as_deref() == Some("type")
    }

    /// Name the specifier is exported under
    pub fn exported_name(&self) -> Option<&str> {
        self.exported.as_ref().and_then(ModuleExportName::as_str)
    }
}

/// `x` or `"string name"` in an export specifier
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ModuleExportName {
    Identifier(Identifier),
    Literal {
        #[serde(default)]
        value: JsonValue,
    },
    #[serde(other)]
    Other,
}

impl ModuleExportName {
    /// Identifier name; string-literal names such as `"foo-bar"` yield `None`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Identifier(identifier) => Some(&identifier.name),
            Self::Literal { .. } | Self::Other => None,
        }
    }
}

/// ESTree `loc`: 1-based lines, 0-based columns
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SourceLocation {
    pub start: LineColumn,
    #[serde(default)]
    pub end: Option<LineColumn>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LineColumn {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn start_position(&self) -> Position {
        Position::new(self.start.line, self.start.column + 1)
    }
}
