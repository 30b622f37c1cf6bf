//! Stored documents as returned by the index.
//!
//! A [`document::Document`] is an ordered multimap: a field name may appear
//! several times and the stored order of `(name, value)` pairs is preserved.
//! Values are [`field_value::FieldValue`]s, which know how to render
//! themselves for display.

pub mod document;
pub mod field_value;

pub use document::{Document, DocumentBuilder};
pub use field_value::FieldValue;
