//! Generation backends.
//!
//! Each submodule is one target representation of a schema subtree, built on
//! the shared traversal in [`crate::walker`]:
//!
//! - [`typescript`] — structural type declarations
//! - [`zod`] — fluent validator expressions
//! - [`mock`] — representative sample values
//! - [`snippet`] — callable client request code (composes [`typescript`])
//!
//! The emitted text grammars are committed artifacts consumed verbatim by
//! downstream tools; changes to braces, separators, or chaining syntax are
//! breaking.

pub mod mock;
pub mod snippet;
pub mod typescript;
pub mod zod;
