//! # Error Types
//!
//! Coercion and defaulting are total and never produce errors. The types
//! here cover the fallible edges of the workspace: reading schema
//! definition documents, resource files, and serializing results.

use thiserror::Error;

/// Top-level error type for modelkit.
#[derive(Error, Debug)]
pub enum ModelkitError {
    /// A schema definition or resource document is malformed.
    #[error("definition error in '{source_name}': {reason}")]
    Definition {
        /// File name or other identifier of the offending document.
        source_name: String,
        /// Why the document was rejected.
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ModelkitError {
    /// Build a [`ModelkitError::Definition`] for the named document.
    pub fn definition(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Definition {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ModelkitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
