//! Typed error enum for the `openapi-scout` library API.
//!
//! Library consumers can match on specific variants. The CLI (`main.rs`)
//! converts these to `anyhow::Error` at the binary boundary for richer
//! context messages.

/// Errors produced by `openapi-scout` library operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// File I/O failure (reading a spec or data file).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Document fetch failure (HTTP error or unreachable host).
    #[cfg(feature = "fetch")]
    #[error("failed to fetch document: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The requested path + method pair has no operation in the document.
    ///
    /// Check the path template spelling (`/users/{id}`, not a concrete URL)
    /// and that the method is one the document declares.
    #[error("endpoint {method} {path} not found in the document")]
    EndpointNotFound {
        /// The requested HTTP method (uppercased).
        method: String,
        /// The requested path template.
        path: String,
    },

    /// The response schema could not be compiled for contract checking.
    #[error("response schema does not compile: {0}")]
    SchemaCompile(String),
}

/// Convenience alias used throughout the library's public API.
pub type Result<T> = std::result::Result<T, Error>;
