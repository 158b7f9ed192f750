//! Document loading and schema extraction.
//!
//! A [`Document`] wraps the parsed description as a `serde_json::Value`
//! tree. Accessors are deliberately forgiving: a missing schema is `None`
//! (every backend has a well-defined sentinel for it), only a missing
//! *operation* is an error.
//!
//! Both OpenAPI v3 (`requestBody` / `content.application/json.schema`) and
//! Swagger v2 (`in: body` parameters, `response.schema`) layouts are
//! understood.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// HTTP methods the catalog and iteration helpers recognize.
pub const METHODS: [&str; 5] = ["get", "post", "put", "delete", "patch"];

/// How many levels of `$ref` inlining [`Document::dereference`] performs
/// before leaving the reference in place. Cyclic component references
/// terminate as opaque `$ref` leaves past this depth.
const MAX_REF_DEPTH: usize = 8;

/// A parsed (ideally dereferenced) API description.
#[derive(Debug, Clone)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Wrap an already-parsed document value.
    #[must_use]
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Parse a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if `text` is not valid JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if `text` is not valid YAML.
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(Self::new(serde_yaml_ng::from_str(text)?))
    }

    /// Load a document from disk, picking the parser from the file
    /// extension (`.yaml`/`.yml` → YAML, anything else tries JSON first,
    /// then YAML).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if matches!(extension, "yaml" | "yml") {
            Self::from_yaml(&text)
        } else {
            Self::from_json(&text).or_else(|_| Self::from_yaml(&text))
        }
    }

    /// Fetch a document over HTTP. One round trip, no caching: repeated
    /// calls against the same URL re-fetch.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-success status, or an
    /// unparseable body.
    #[cfg(feature = "fetch")]
    pub fn fetch(url: &str) -> Result<Self> {
        tracing::debug!(url, "fetching document");
        let body = reqwest::blocking::get(url)?.error_for_status()?.text()?;
        Self::from_json(&body).or_else(|_| Self::from_yaml(&body))
    }

    /// The underlying document tree.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Look up the operation at `path` + `method`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EndpointNotFound`] when the pair has no operation —
    /// a lookup miss is fatal for the call, never an empty result.
    pub fn operation(&self, path: &str, method: &str) -> Result<&Map<String, Value>> {
        let method_key = method.to_ascii_lowercase();
        self.root
            .get("paths")
            .and_then(|paths| paths.get(path))
            .and_then(|item| item.get(method_key.as_str()))
            .and_then(Value::as_object)
            .ok_or_else(|| Error::EndpointNotFound {
                method: method.to_ascii_uppercase(),
                path: path.to_string(),
            })
    }

    /// Inline internal `$ref` pointers (`#/components/schemas/...`) up to a
    /// fixed depth. External references and references that survive the
    /// depth limit are left in place; downstream backends treat them as
    /// opaque leaves.
    pub fn dereference(&mut self) {
        let snapshot = self.root.clone();
        resolve_refs(&mut self.root, &snapshot, 0);
    }
}

fn resolve_refs(value: &mut Value, root: &Value, depth: usize) {
    match value {
        Value::Object(map) => {
            if let Some(target) = map.get("$ref").and_then(Value::as_str) {
                if depth >= MAX_REF_DEPTH {
                    return;
                }
                let Some(resolved) = target
                    .strip_prefix('#')
                    .and_then(|pointer| root.pointer(pointer))
                else {
                    tracing::debug!(target, "unresolvable reference left in place");
                    return;
                };
                let mut resolved = resolved.clone();
                resolve_refs(&mut resolved, root, depth + 1);
                *value = resolved;
                return;
            }
            for child in map.values_mut() {
                resolve_refs(child, root, depth);
            }
        }
        Value::Array(items) => {
            for item in items {
                resolve_refs(item, root, depth);
            }
        }
        _ => {}
    }
}

/// Iterate over all operations in the document, calling
/// `f(path, method, operation)`.
///
/// Only the methods in [`METHODS`] are visited, so path-level metadata keys
/// (`summary`, `parameters`, `servers`) never reach the callback.
pub fn for_each_operation<'a>(
    doc: &'a Value,
    mut f: impl FnMut(&'a str, &'a str, &'a Map<String, Value>),
) {
    let Some(paths) = doc.get("paths").and_then(Value::as_object) else {
        return;
    };

    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        for (method, operation) in item {
            if !METHODS.contains(&method.as_str()) {
                continue;
            }
            let Some(operation) = operation.as_object() else {
                continue;
            };
            f(path, method, operation);
        }
    }
}

/// The operation's JSON request-body schema, if any.
///
/// Checks the OpenAPI v3 `requestBody` first, then falls back to a Swagger
/// v2 `in: body` parameter.
#[must_use]
pub fn request_schema(op: &Map<String, Value>) -> Option<&Value> {
    let v3 = op
        .get("requestBody")
        .and_then(|body| body.get("content"))
        .and_then(|content| content.get("application/json"))
        .and_then(|media| media.get("schema"));
    if v3.is_some() {
        return v3;
    }

    op.get("parameters")?
        .as_array()?
        .iter()
        .find(|p| p.get("in").and_then(Value::as_str) == Some("body"))?
        .get("schema")
}

/// The operation's JSON response schema for `status`.
///
/// A `"200"` lookup falls back to `"201"` when `200` is not declared. Any
/// other undeclared status is `None` — schema absence is a sentinel, not an
/// error.
#[must_use]
pub fn response_schema<'a>(op: &'a Map<String, Value>, status: &str) -> Option<&'a Value> {
    let responses = op.get("responses")?;
    let response = responses
        .get(status)
        .or_else(|| (status == "200").then(|| responses.get("201")).flatten())?;

    response.get("schema").or_else(|| {
        response
            .get("content")
            .and_then(|content| content.get("application/json"))
            .and_then(|media| media.get("schema"))
    })
}
