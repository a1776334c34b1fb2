//! # ABNT Error Handling
//!
//! This module defines the AbntError enum, which represents the different error
//! types that can occur in the abnt-rs crate.
//!
//! The public parse entry points never return these errors for malformed dump
//! content: a bad slot or field is logged and skipped, and a missing section
//! yields an empty result. The errors surface from the internal decoders, from
//! configuration loading and from file I/O.

use thiserror::Error;

/// Represents the different error types that can occur in the ABNT crate.
#[derive(Debug, Error)]
pub enum AbntError {
    /// The expected header or record marker is absent from the input.
    #[error("Format mismatch: {0}")]
    FormatMismatch(String),

    /// A single fixed-offset field could not be interpreted as its expected type.
    #[error("Cannot decode field '{field}' from '{value}'")]
    FieldDecode { field: &'static str, value: String },

    /// A caller-supplied or dump-supplied boundary is unusable.
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    /// Too few samples for a computation that needs a full window.
    #[error("Insufficient data: need {needed} samples, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// Reading an input or configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration JSON could not be parsed or written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The semicolon-separated task export could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A catch‑all error for uncategorized cases.
    #[error("Other error: {0}")]
    Other(String),
}

impl AbntError {
    pub(crate) fn field(field: &'static str, value: impl Into<String>) -> Self {
        AbntError::FieldDecode {
            field,
            value: value.into(),
        }
    }
}
