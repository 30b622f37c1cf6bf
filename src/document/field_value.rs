//! Field value types for stored documents.
//!
//! # Display
//!
//! Every value except [`FieldValue::Null`] has a string representation:
//!
//! ```
//! use lexprobe::document::FieldValue;
//!
//! assert_eq!(FieldValue::Text("hello".to_string()).display(), Some("hello".to_string()));
//! assert_eq!(FieldValue::Integer(42).display(), Some("42".to_string()));
//! assert_eq!(FieldValue::Binary(b"raw".to_vec()).display(), Some("raw".to_string()));
//! assert_eq!(FieldValue::Null.display(), None);
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Represents a stored value for a field in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Text value
    Text(String),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// Binary data
    Binary(Vec<u8>),
    /// DateTime value
    DateTime(DateTime<Utc>),
    /// Null value
    Null,
}

impl FieldValue {
    /// Convert to text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value for display.
    ///
    /// Binary payloads are decoded as UTF-8, replacing invalid sequences.
    /// `Null` has no representation.
    pub fn display(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Boolean(b) => Some(b.to_string()),
            FieldValue::Binary(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            FieldValue::DateTime(dt) => Some(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            FieldValue::Null => None,
        }
    }

    /// The text fed to an analyzer when this value is indexed.
    pub fn index_text(&self) -> Option<String> {
        match self {
            FieldValue::Binary(_) | FieldValue::Null => None,
            other => other.display(),
        }
    }

    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}
