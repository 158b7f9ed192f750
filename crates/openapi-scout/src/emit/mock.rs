//! Mock-data synthesizer: schema → one representative sample value.
//!
//! String and number leaves are name-sensitive: the field name a node was
//! reached through (case-insensitive substring match) picks a plausible
//! value before format-based and generic fallbacks. An explicit
//! `example`/`examples` on a node always wins and is returned verbatim.

use chrono::{SecondsFormat, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};

use crate::walker::{walk, Field, NodeCx, SchemaBackend};

/// Recursion guard: self-referential schemas that survive dereferencing
/// terminate as `null` past this depth.
const MAX_DEPTH: usize = 16;

/// Filler sentence for description-like fields.
const FILLER_TEXT: &str = "This is a high-fidelity semantic description generated \
     to test layout constraints and text wrapping in a professional environment.";

/// Mock value generator.
///
/// Values come from names, formats and enums only: validation constraints
/// (`minLength`, `pattern`, `minimum`, ...) are not consulted, so output is
/// only guaranteed to satisfy schemas whose leaves carry no such bounds.
/// Schemas with explicit `example` values always round-trip, since those are
/// returned verbatim.
///
/// Three modes control sampling:
/// - [`deterministic`](Mock::deterministic) — first enum value, one array
///   element, fixed placeholder seeds. Stable across runs.
/// - [`seeded`](Mock::seeded) — random picks and 1–3 element arrays, but
///   reproducible from the seed.
/// - [`randomized`](Mock::randomized) — fresh entropy per call.
#[derive(Debug)]
pub struct Mock {
    rng: Option<StdRng>,
}

impl Mock {
    /// Fully deterministic mode.
    #[must_use]
    pub fn deterministic() -> Self {
        Self { rng: None }
    }

    /// Reproducible sampling from a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Some(StdRng::seed_from_u64(seed)),
        }
    }

    /// Fresh entropy per generator.
    #[must_use]
    pub fn randomized() -> Self {
        Self {
            rng: Some(StdRng::from_entropy()),
        }
    }

    /// Synthesize one value for `schema`. A missing schema is `null`.
    pub fn generate(&mut self, schema: Option<&Value>) -> Value {
        walk(self, schema, NodeCx::root())
    }

    fn pick(&mut self, len: usize) -> usize {
        match &mut self.rng {
            Some(rng) => rng.gen_range(0..len),
            None => 0,
        }
    }

    fn array_len(&mut self) -> usize {
        match &mut self.rng {
            Some(rng) => rng.gen_range(1..=3),
            None => 1,
        }
    }

    fn image_seed(&mut self) -> u32 {
        match &mut self.rng {
            Some(rng) => rng.gen(),
            None => 42,
        }
    }
}

impl SchemaBackend for Mock {
    type Output = Value;

    fn intercept(&mut self, node: &Map<String, Value>, cx: NodeCx<'_>) -> Option<Value> {
        if cx.depth > MAX_DEPTH {
            tracing::debug!(depth = cx.depth, "mock recursion guard hit");
            return Some(Value::Null);
        }
        if let Some(example) = node.get("example") {
            return Some(example.clone());
        }
        match node.get("examples") {
            Some(Value::Array(items)) => items.first().cloned(),
            Some(Value::Object(map)) => map.values().next().cloned(),
            _ => None,
        }
    }

    fn on_missing(&mut self, _cx: NodeCx<'_>) -> Value {
        Value::Null
    }

    fn on_unknown(&mut self, _cx: NodeCx<'_>) -> Value {
        Value::Null
    }

    fn on_reference(&mut self, _target: &str, _cx: NodeCx<'_>) -> Value {
        // Unresolved references are opaque; there is nothing to sample.
        Value::Null
    }

    fn on_union(&mut self, alternatives: Vec<Value>, _cx: NodeCx<'_>) -> Value {
        alternatives.into_iter().next().unwrap_or(Value::Null)
    }

    fn on_object(&mut self, fields: Option<Vec<Field<Value>>>, _cx: NodeCx<'_>) -> Value {
        let mut out = Map::new();
        for field in fields.unwrap_or_default() {
            out.insert(field.name, field.output);
        }
        Value::Object(out)
    }

    fn on_array(&mut self, node: &Map<String, Value>, cx: NodeCx<'_>) -> Value {
        let len = self.array_len();
        let items = (0..len)
            .map(|_| walk(self, node.get("items"), cx))
            .collect();
        Value::Array(items)
    }

    fn on_string(&mut self, node: &Map<String, Value>, cx: NodeCx<'_>) -> Value {
        if let Some(values) = node.get("enum").and_then(Value::as_array) {
            if !values.is_empty() {
                return values[self.pick(values.len())].clone();
            }
        }

        let name = cx.name.to_lowercase();
        let format = node.get("format").and_then(Value::as_str);

        let text = if name.contains("avatar") || name.contains("image") || name.contains("img") {
            format!("https://picsum.photos/seed/{}/200/300", self.image_seed())
        } else if name.contains("email") || format == Some("email") {
            "dev.architect@example.com".to_string()
        } else if name.contains("name") {
            "Jane Architect Doe".to_string()
        } else if name.contains("description") || name.contains("content") || name.contains("bio") {
            FILLER_TEXT.to_string()
        } else if name.contains("url") || format == Some("uri") {
            "https://example.com/api".to_string()
        } else if format == Some("date-time") {
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
        } else if format == Some("date") {
            Utc::now().format("%Y-%m-%d").to_string()
        } else {
            "Standard String".to_string()
        };
        Value::String(text)
    }

    fn on_number(&mut self, _node: &Map<String, Value>, cx: NodeCx<'_>) -> Value {
        let name = cx.name.to_lowercase();
        if name.contains("price") {
            serde_json::json!(149.99)
        } else if name.contains("count") || name.contains("total") {
            serde_json::json!(42)
        } else {
            serde_json::json!(100)
        }
    }

    fn on_boolean(&mut self, _node: &Map<String, Value>, _cx: NodeCx<'_>) -> Value {
        Value::Bool(true)
    }
}
