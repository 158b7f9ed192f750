//! Type-declaration backend: schema → TypeScript structural types.

use serde_json::{Map, Value};

use crate::walker::{walk, Field, NodeCx, SchemaBackend};

/// Emit a named top-level declaration for `schema`.
///
/// An absent schema becomes a trivial alias to `any` under the requested
/// name; everything else becomes an `export interface`.
#[must_use]
pub fn declaration(schema: Option<&Value>, name: &str) -> String {
    match schema {
        None => format!("export type {name} = any;"),
        Some(schema) => format!(
            "export interface {name} {}",
            walk(&mut TypeScript, Some(schema), NodeCx::root())
        ),
    }
}

/// Emit the bare type expression for `schema` (no declaration wrapper).
#[must_use]
pub fn expression(schema: Option<&Value>) -> String {
    walk(&mut TypeScript, schema, NodeCx::root())
}

/// The TypeScript backend. Stateless; depth drives indentation.
struct TypeScript;

impl SchemaBackend for TypeScript {
    type Output = String;

    fn on_missing(&mut self, _cx: NodeCx<'_>) -> String {
        "any".to_string()
    }

    fn on_unknown(&mut self, _cx: NodeCx<'_>) -> String {
        "any".to_string()
    }

    fn on_reference(&mut self, target: &str, _cx: NodeCx<'_>) -> String {
        // Assumed declared elsewhere
        target.to_string()
    }

    fn on_union(&mut self, alternatives: Vec<String>, _cx: NodeCx<'_>) -> String {
        alternatives.join(" | ")
    }

    fn on_object(&mut self, fields: Option<Vec<Field<String>>>, cx: NodeCx<'_>) -> String {
        let Some(fields) = fields else {
            return "Record<string, any>".to_string();
        };
        let indent = "  ".repeat(cx.depth);
        let mut out = String::from("{\n");
        for field in fields {
            let marker = if field.required { "" } else { "?" };
            out.push_str(&format!(
                "{indent}  {}{marker}: {};\n",
                field.name, field.output
            ));
        }
        out.push_str(&indent);
        out.push('}');
        out
    }

    fn on_array(&mut self, node: &Map<String, Value>, cx: NodeCx<'_>) -> String {
        format!("{}[]", walk(self, node.get("items"), cx))
    }

    fn on_string(&mut self, node: &Map<String, Value>, _cx: NodeCx<'_>) -> String {
        match node.get("enum").and_then(Value::as_array) {
            Some(values) => values
                .iter()
                .map(quote_literal)
                .collect::<Vec<_>>()
                .join(" | "),
            None => "string".to_string(),
        }
    }

    fn on_number(&mut self, _node: &Map<String, Value>, _cx: NodeCx<'_>) -> String {
        "number".to_string()
    }

    fn on_boolean(&mut self, _node: &Map<String, Value>, _cx: NodeCx<'_>) -> String {
        "boolean".to_string()
    }
}

fn quote_literal(value: &Value) -> String {
    match value.as_str() {
        Some(text) => format!("'{text}'"),
        None => value.to_string(),
    }
}
