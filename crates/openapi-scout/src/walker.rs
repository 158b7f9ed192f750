//! Shared recursive schema traversal.
//!
//! One dispatcher ([`walk`]) classifies a schema node and hands it to a
//! [`SchemaBackend`] — the per-target leaf/branch handlers. All four
//! generation backends (TypeScript, Zod, mock, snippet types) run on this
//! single traversal, so they agree on classification order and edge cases:
//!
//! - `$ref` wins over everything else; the referenced name's last path
//!   segment is handed to the backend.
//! - `oneOf`/`anyOf` are folded alternative-by-alternative at the same depth.
//! - Object properties are folded in declared order (insertion order is
//!   preserved by the `preserve_order` JSON map), each at depth + 1.
//! - Arrays are re-walked by the backend itself: the mock backend samples
//!   the element schema several times, the text backends fold it once.
//! - A missing schema or unrecognized `type` is always a well-defined input.

use std::collections::HashSet;

use serde_json::{Map, Value};

/// Per-node context handed to backend callbacks.
#[derive(Debug, Clone, Copy)]
pub struct NodeCx<'a> {
    /// Field name under which this node was reached (empty at the root).
    /// Array elements and union alternatives inherit their parent's name.
    pub name: &'a str,
    /// Nesting depth from the root schema. Drives indentation in the text
    /// backends and the recursion guard in the mock backend.
    pub depth: usize,
}

impl<'a> NodeCx<'a> {
    /// Context for a top-level schema.
    #[must_use]
    pub fn root() -> Self {
        Self { name: "", depth: 0 }
    }

    /// Context for a node reached through a named field.
    #[must_use]
    pub fn named(name: &'a str, depth: usize) -> Self {
        Self { name, depth }
    }
}

/// One folded object property.
pub struct Field<T> {
    /// Property name, in declared order.
    pub name: String,
    /// Whether the name appears in the parent object's `required` set.
    pub required: bool,
    /// The backend's output for the property schema.
    pub output: T,
}

/// Capability interface implemented by each generation backend.
///
/// `on_array` takes the raw node so the backend can re-walk `items` as many
/// times as it needs; everything else receives pre-folded children.
pub trait SchemaBackend {
    /// The backend's result type (text for the emitters, a JSON value for
    /// the mock synthesizer).
    type Output;

    /// Pre-classification hook. Returning `Some` short-circuits the node
    /// entirely (the mock backend uses this for explicit `example` values
    /// and its depth guard).
    fn intercept(&mut self, _node: &Map<String, Value>, _cx: NodeCx<'_>) -> Option<Self::Output> {
        None
    }

    /// Schema absent.
    fn on_missing(&mut self, cx: NodeCx<'_>) -> Self::Output;

    /// Node with no recognized `type` and no `$ref`/`oneOf`/`anyOf`.
    fn on_unknown(&mut self, cx: NodeCx<'_>) -> Self::Output;

    /// Unresolved `$ref`; `target` is the last path segment of the
    /// reference string.
    fn on_reference(&mut self, target: &str, cx: NodeCx<'_>) -> Self::Output;

    /// `oneOf`/`anyOf`, one folded output per alternative in declared order.
    fn on_union(&mut self, alternatives: Vec<Self::Output>, cx: NodeCx<'_>) -> Self::Output;

    /// Object node. `None` when no `properties` mapping is declared (an open
    /// string-keyed map), `Some` with the folded fields otherwise.
    fn on_object(&mut self, fields: Option<Vec<Field<Self::Output>>>, cx: NodeCx<'_>)
        -> Self::Output;

    /// Array node. Call [`walk`] on `node.get("items")` to fold the element.
    fn on_array(&mut self, node: &Map<String, Value>, cx: NodeCx<'_>) -> Self::Output
    where
        Self: Sized;

    /// String leaf (constraints available on `node`).
    fn on_string(&mut self, node: &Map<String, Value>, cx: NodeCx<'_>) -> Self::Output;

    /// Number or integer leaf.
    fn on_number(&mut self, node: &Map<String, Value>, cx: NodeCx<'_>) -> Self::Output;

    /// Boolean leaf.
    fn on_boolean(&mut self, node: &Map<String, Value>, cx: NodeCx<'_>) -> Self::Output;
}

/// Recursively fold a schema node through a backend.
pub fn walk<B: SchemaBackend>(backend: &mut B, schema: Option<&Value>, cx: NodeCx<'_>) -> B::Output {
    let Some(schema) = schema else {
        return backend.on_missing(cx);
    };
    let Some(node) = schema.as_object() else {
        return backend.on_unknown(cx);
    };

    if let Some(output) = backend.intercept(node, cx) {
        return output;
    }

    if let Some(target) = node.get("$ref").and_then(Value::as_str) {
        let name = target.rsplit('/').next().unwrap_or(target);
        return backend.on_reference(name, cx);
    }

    if let Some(alternatives) = node
        .get("oneOf")
        .or_else(|| node.get("anyOf"))
        .and_then(Value::as_array)
    {
        let outputs = alternatives
            .iter()
            .map(|alt| walk(backend, Some(alt), cx))
            .collect();
        return backend.on_union(outputs, cx);
    }

    match node.get("type").and_then(Value::as_str) {
        Some("object") => {
            let fields = node.get("properties").and_then(Value::as_object).map(|props| {
                let required = required_names(node);
                props
                    .iter()
                    .map(|(name, sub)| Field {
                        required: required.contains(name.as_str()),
                        output: walk(backend, Some(sub), NodeCx::named(name, cx.depth + 1)),
                        name: name.clone(),
                    })
                    .collect()
            });
            backend.on_object(fields, cx)
        }
        Some("array") => backend.on_array(node, cx),
        Some("string") => backend.on_string(node, cx),
        Some("number" | "integer") => backend.on_number(node, cx),
        Some("boolean") => backend.on_boolean(node, cx),
        _ => backend.on_unknown(cx),
    }
}

/// The `required` name set of an object node.
fn required_names(node: &Map<String, Value>) -> HashSet<&str> {
    node.get("required")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .collect()
}
