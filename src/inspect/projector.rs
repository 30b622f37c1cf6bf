//! Turns a stored document into the ordered field list and values to print.

use ahash::AHashMap;

use crate::config::InspectConfig;
use crate::document::Document;

/// Synthetic field holding the document id.
pub const ID_FIELD: &str = "<id>";
/// Synthetic field holding the score.
pub const SCORE_FIELD: &str = "<score>";
/// Displayed for values without a string representation and for missing
/// projected fields.
pub const NULL_MARKER: &str = "null";

/// Which fields to emit, and in which order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionSpec {
    /// Explicit subset in configured order; `None` keeps every field.
    pub fields: Option<Vec<String>>,
    pub show_id: bool,
    pub show_score: bool,
    pub sort_fields: bool,
}

impl From<&InspectConfig> for ProjectionSpec {
    fn from(config: &InspectConfig) -> Self {
        ProjectionSpec {
            fields: config.fields.clone(),
            show_id: config.show_id,
            show_score: config.show_score,
            sort_fields: config.sort_fields,
        }
    }
}

/// One document ready for formatting.
///
/// The key set of the value map always equals the field list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedDocument {
    fields: Vec<String>,
    values: AHashMap<String, Vec<String>>,
}

impl ProjectedDocument {
    /// Field names in output order, without duplicates.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Display values of one field.
    pub fn values(&self, field: &str) -> &[String] {
        self.values.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Values of one field joined by a comma.
    ///
    /// Commas inside values are not escaped, so `["a,b"]` and `["a", "b"]`
    /// print the same.
    pub fn joined(&self, field: &str) -> String {
        self.values(field).join(",")
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn push(&mut self, field: &str, values: Vec<String>) {
        if !self.values.contains_key(field) {
            self.fields.push(field.to_string());
            self.values.insert(field.to_string(), values);
        }
    }
}

/// Applies a [`ProjectionSpec`] to documents.
#[derive(Debug, Clone)]
pub struct DocumentProjector {
    spec: ProjectionSpec,
}

impl DocumentProjector {
    pub fn new(spec: ProjectionSpec) -> Self {
        DocumentProjector { spec }
    }

    pub fn spec(&self) -> &ProjectionSpec {
        &self.spec
    }

    /// Fields to fetch from the index; `None` fetches the whole document.
    pub fn fetch_fields(&self) -> Option<&[String]> {
        self.spec.fields.as_deref()
    }

    /// Project `document` with its id and score.
    pub fn project(&self, document: &Document, doc_id: u32, score: f32) -> ProjectedDocument {
        let mut projected = ProjectedDocument::default();

        if self.spec.show_id {
            projected.push(ID_FIELD, vec![doc_id.to_string()]);
        }
        if self.spec.show_score {
            projected.push(SCORE_FIELD, vec![score.to_string()]);
        }

        match &self.spec.fields {
            Some(fields) => {
                for field in fields {
                    projected.push(field, display_values(document, field));
                }
            }
            None => {
                for field in document.field_names() {
                    projected.push(field, display_values(document, field));
                }
            }
        }

        if self.spec.sort_fields {
            projected.fields.sort();
        }
        projected
    }
}

fn display_values(document: &Document, field: &str) -> Vec<String> {
    let values: Vec<String> = document
        .values(field)
        .map(|value| value.display().unwrap_or_else(|| NULL_MARKER.to_string()))
        .collect();
    if values.is_empty() {
        vec![NULL_MARKER.to_string()]
    } else {
        values
    }
}
