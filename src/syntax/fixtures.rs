//! ESTree JSON builders for tests
//!
//! Each helper returns the node a TypeScript-aware ESTree parser emits for the
//! statement named in its doc line. `program` numbers top-level statements one
//! per line.

use super::estree::Program;
use serde_json::{json, Value};

pub(crate) fn program(body: Vec<Value>) -> Program {
    let body: Vec<Value> = body
        .into_iter()
        .enumerate()
        .map(|(index, mut statement)| {
            if let Some(node) = statement.as_object_mut() {
                let line = index + 1;
                node.entry("loc").or_insert_with(|| {
                    json!({
                        "start": {"line": line, "column": 0},
                        "end": {"line": line, "column": 40}
                    })
                });
            }
            statement
        })
        .collect();

    serde_json::from_value(json!({"type": "Program", "sourceType": "module", "body": body}))
        .expect("fixture program should deserialize")
}

fn named_export(declaration: Value) -> Value {
    json!({
        "type": "ExportNamedDeclaration",
        "declaration": declaration,
        "specifiers": [],
        "source": null,
        "exportKind": "value"
    })
}

fn identifier(name: &str) -> Value {
    json!({"type": "Identifier", "name": name})
}

/// `export const <name> = {};`
pub(crate) fn export_const(name: &str) -> Value {
    named_export(json!({
        "type": "VariableDeclaration",
        "kind": "const",
        "declarations": [{
            "type": "VariableDeclarator",
            "id": identifier(name),
            "init": {"type": "ObjectExpression", "properties": []}
        }]
    }))
}

/// `export function <name>() {}`
pub(crate) fn export_function(name: &str) -> Value {
    named_export(json!({
        "type": "FunctionDeclaration",
        "id": identifier(name),
        "params": [],
        "body": {"type": "BlockStatement", "body": []}
    }))
}

/// `export class <name> {}`
pub(crate) fn export_class(name: &str) -> Value {
    named_export(json!({
        "type": "ClassDeclaration",
        "id": identifier(name),
        "superClass": null,
        "body": {"type": "ClassBody", "body": []}
    }))
}

/// `export type <name> = {};`
pub(crate) fn export_type_alias(name: &str) -> Value {
    let mut node = named_export(json!({
        "type": "TSTypeAliasDeclaration",
        "id": identifier(name),
        "typeAnnotation": {"type": "TSTypeLiteral", "members": []}
    }));
    node["exportKind"] = json!("type");
    node
}

/// `export interface <name> {}`
pub(crate) fn export_interface(name: &str) -> Value {
    let mut node = named_export(json!({
        "type": "TSInterfaceDeclaration",
        "id": identifier(name),
        "body": {"type": "TSInterfaceBody", "body": []}
    }));
    node["exportKind"] = json!("type");
    node
}

/// `export enum <name> {}`
pub(crate) fn export_enum(name: &str) -> Value {
    named_export(json!({"type": "TSEnumDeclaration", "id": identifier(name), "members": []}))
}

fn specifier(name: &str, export_kind: &str) -> Value {
    json!({
        "type": "ExportSpecifier",
        "local": identifier(name),
        "exported": identifier(name),
        "exportKind": export_kind
    })
}

/// `export { <names> };`
pub(crate) fn export_specifiers(names: &[&str]) -> Value {
    json!({
        "type": "ExportNamedDeclaration",
        "declaration": null,
        "specifiers": names.iter().map(|name| specifier(name, "value")).collect::<Vec<_>>(),
        "source": null,
        "exportKind": "value"
    })
}

/// `export type { <names> };`
pub(crate) fn export_type_specifiers(names: &[&str]) -> Value {
    json!({
        "type": "ExportNamedDeclaration",
        "declaration": null,
        "specifiers": names.iter().map(|name| specifier(name, "value")).collect::<Vec<_>>(),
        "source": null,
        "exportKind": "type"
    })
}

/// `export { <names> } from "<source>";`
pub(crate) fn re_export(names: &[&str], source: &str) -> Value {
    json!({
        "type": "ExportNamedDeclaration",
        "declaration": null,
        "specifiers": names.iter().map(|name| specifier(name, "value")).collect::<Vec<_>>(),
        "source": {"type": "Literal", "value": source, "raw": format!("\"{source}\"")},
        "exportKind": "value"
    })
}

/// `export default {};`
pub(crate) fn export_default() -> Value {
    json!({
        "type": "ExportDefaultDeclaration",
        "declaration": {"type": "ObjectExpression", "properties": []},
        "exportKind": "value"
    })
}

/// `const <name> = {};`
pub(crate) fn plain_const(name: &str) -> Value {
    json!({
        "type": "VariableDeclaration",
        "kind": "const",
        "declarations": [{
            "type": "VariableDeclarator",
            "id": identifier(name),
            "init": {"type": "ObjectExpression", "properties": []}
        }]
    })
}

/// `import { something } from "<source>";`
pub(crate) fn import_declaration(source: &str) -> Value {
    json!({
        "type": "ImportDeclaration",
        "specifiers": [{
            "type": "ImportSpecifier",
            "imported": identifier("something"),
            "local": identifier("something")
        }],
        "source": {"type": "Literal", "value": source}
    })
}
