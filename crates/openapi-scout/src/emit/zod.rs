//! Validator-expression backend: schema → Zod combinator chains.

use serde_json::{Map, Value};

use crate::walker::{walk, Field, NodeCx, SchemaBackend};

/// Emit a complete validator module (`import` line + `schema` constant).
///
/// An absent schema is the bare accept-anything expression with no module
/// wrapper.
#[must_use]
pub fn module(schema: Option<&Value>) -> String {
    match schema {
        None => "z.any()".to_string(),
        Some(schema) => format!(
            "import {{ z }} from 'zod';\n\nexport const schema = {};",
            expression(Some(schema))
        ),
    }
}

/// Emit the bare validator expression for `schema`.
#[must_use]
pub fn expression(schema: Option<&Value>) -> String {
    walk(&mut Zod, schema, NodeCx::root())
}

struct Zod;

impl SchemaBackend for Zod {
    type Output = String;

    fn on_missing(&mut self, _cx: NodeCx<'_>) -> String {
        "z.any()".to_string()
    }

    fn on_unknown(&mut self, _cx: NodeCx<'_>) -> String {
        "z.any()".to_string()
    }

    fn on_reference(&mut self, target: &str, _cx: NodeCx<'_>) -> String {
        // Named validators are not resolved by this engine; emit an inert
        // placeholder instead of a live reference. Callers needing one must
        // post-process.
        format!("// Reference to {target} - please check defined schemas")
    }

    fn on_union(&mut self, _alternatives: Vec<String>, _cx: NodeCx<'_>) -> String {
        "z.any()".to_string()
    }

    fn on_object(&mut self, fields: Option<Vec<Field<String>>>, _cx: NodeCx<'_>) -> String {
        let mut out = String::from("z.object({\n");
        for field in fields.unwrap_or_default() {
            let optional = if field.required { "" } else { ".optional()" };
            out.push_str(&format!("  {}: {}{optional},\n", field.name, field.output));
        }
        out.push_str("})");
        out
    }

    fn on_array(&mut self, node: &Map<String, Value>, cx: NodeCx<'_>) -> String {
        format!("z.array({})", walk(self, node.get("items"), cx))
    }

    fn on_string(&mut self, node: &Map<String, Value>, _cx: NodeCx<'_>) -> String {
        // enum short-circuits to an exact-literal-set validator
        let mut expr = match node.get("enum").and_then(Value::as_array) {
            Some(values) => {
                let literals = values
                    .iter()
                    .map(quote_literal)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("z.enum([{literals}])")
            }
            None => "z.string()".to_string(),
        };

        if let Some(pattern) = node.get("pattern").and_then(Value::as_str) {
            expr.push_str(&format!(".regex(/{pattern}/)"));
        }
        if let Some(min) = node.get("minLength") {
            expr.push_str(&format!(".min({min})"));
        }
        if let Some(max) = node.get("maxLength") {
            expr.push_str(&format!(".max({max})"));
        }
        match node.get("format").and_then(Value::as_str) {
            Some("email") => expr.push_str(".email()"),
            Some("url" | "uri") => expr.push_str(".url()"),
            _ => {}
        }
        expr
    }

    fn on_number(&mut self, node: &Map<String, Value>, _cx: NodeCx<'_>) -> String {
        let mut expr = String::from("z.number()");
        if let Some(min) = node.get("minimum") {
            expr.push_str(&format!(".min({min})"));
        }
        if let Some(max) = node.get("maximum") {
            expr.push_str(&format!(".max({max})"));
        }
        expr
    }

    fn on_boolean(&mut self, _node: &Map<String, Value>, _cx: NodeCx<'_>) -> String {
        "z.boolean()".to_string()
    }
}

fn quote_literal(value: &Value) -> String {
    match value.as_str() {
        Some(text) => format!("'{text}'"),
        None => value.to_string(),
    }
}
