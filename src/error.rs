//! Error types for lexprobe.
//!
//! All fallible operations return [`LexprobeError`]. Configuration errors
//! (unknown fields, ambiguous queries, regexes on hidden fields) are raised
//! before any output is written, so a failed run never leaves partial results
//! in the sink.
//!
//! # Examples
//!
//! ```
//! use lexprobe::error::{LexprobeError, Result};
//!
//! fn check() -> Result<()> {
//!     Err(LexprobeError::invalid_fields(["colour", "sise"]))
//! }
//!
//! let err = check().unwrap_err();
//! assert_eq!(err.to_string(), "Invalid field names: [colour, sise]");
//! ```

use std::io;

use thiserror::Error;

/// The main error type for lexprobe operations.
#[derive(Error, Debug)]
pub enum LexprobeError {
    /// I/O errors (reading id files, writing to the sink, ...)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// One or more field names are not present in the field catalog.
    #[error("Invalid field names: [{}]", .0.join(", "))]
    InvalidField(Vec<String>),

    /// A query has neither a `field:` qualifier nor a default field.
    #[error("Query has no ':' and no query field defined: {0}")]
    AmbiguousField(String),

    /// The query text could not be parsed.
    #[error("Query parse error: {0}")]
    QueryParse(String),

    /// The field exists but has no indexed terms in any segment.
    #[error("Unindexed field: {0}")]
    MissingIndex(String),

    /// A regex filter targets a field excluded from the projection.
    #[error("Attempted to apply regex to field not in results: {0}")]
    FieldNotProjected(String),

    /// The index could not be opened.
    #[error("Cannot open index: {0}")]
    IndexOpen(String),

    /// Unsupported analyzer name.
    #[error("Invalid analyzer {0}: only keyword and standard are supported")]
    InvalidAnalyzer(String),

    /// A document id token is not a non-negative integer.
    #[error("Invalid document id: {0}")]
    InvalidDocumentId(String),

    /// A document id is outside the index.
    #[error("Document not found: {0}")]
    DocumentNotFound(u32),

    /// Malformed operation or option value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Corrupt segment payload.
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Segment payload encoding errors
    #[error("Encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with LexprobeError.
pub type Result<T> = std::result::Result<T, LexprobeError>;

impl LexprobeError {
    /// Create an invalid field error listing every offending name.
    pub fn invalid_fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LexprobeError::InvalidField(names.into_iter().map(Into::into).collect())
    }

    /// Create a new query parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        LexprobeError::QueryParse(msg.into())
    }

    /// Create a new index open error.
    pub fn index_open<S: Into<String>>(msg: S) -> Self {
        LexprobeError::IndexOpen(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        LexprobeError::Storage(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        LexprobeError::InvalidArgument(msg.into())
    }

    /// Whether this error was raised while validating configuration, before
    /// any document was retrieved.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            LexprobeError::InvalidField(_)
                | LexprobeError::AmbiguousField(_)
                | LexprobeError::QueryParse(_)
                | LexprobeError::FieldNotProjected(_)
                | LexprobeError::InvalidAnalyzer(_)
                | LexprobeError::InvalidArgument(_)
        )
    }
}
