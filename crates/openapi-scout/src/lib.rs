#![allow(clippy::doc_markdown)] // README uses "OpenAPI" proper noun throughout
#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! ## API Reference

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod analyzer;
pub mod document;
pub mod emit;
pub mod error;
pub mod validate;
pub mod walker;

pub use document::Document;
pub use error::{Error, Result};
