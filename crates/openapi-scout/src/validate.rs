//! Response-contract checking, delegated to the `jsonschema` crate.
//!
//! A failing value is not an error: the check call succeeds procedurally and
//! reports a structured violation list; only the compliance flag is false.

use serde_json::Value;

use crate::error::{Error, Result};

/// One contract violation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Violation {
    /// JSON-pointer-style path to the offending value (`/items/0/name`).
    pub location: String,
    /// Path to the schema constraint that failed (`/properties/name/type`).
    pub constraint: String,
    /// Human-readable message.
    pub message: String,
}

/// Outcome of checking one value against one schema.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ContractReport {
    /// True when the violation list is empty.
    pub compliant: bool,
    /// Every violation found, in validator order.
    pub violations: Vec<Violation>,
}

/// Check `value` against `schema`.
///
/// # Errors
///
/// Returns [`Error::SchemaCompile`] when the schema itself does not compile;
/// violations in the checked value are reported, not raised.
pub fn check(schema: &Value, value: &Value) -> Result<ContractReport> {
    let validator =
        jsonschema::validator_for(schema).map_err(|e| Error::SchemaCompile(e.to_string()))?;

    let violations: Vec<Violation> = validator
        .iter_errors(value)
        .map(|error| Violation {
            location: error.instance_path.to_string(),
            constraint: error.schema_path.to_string(),
            message: error.to_string(),
        })
        .collect();

    Ok(ContractReport {
        compliant: violations.is_empty(),
        violations,
    })
}
