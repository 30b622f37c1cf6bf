//! Post-retrieval regex filter.

use regex::Regex;

use crate::config::RegexSpec;
use crate::document::Document;
use crate::error::{LexprobeError, Result};
use crate::inspect::catalog::FieldCatalog;

/// Keeps documents whose first value of one field matches a regex.
#[derive(Debug, Clone)]
pub struct RegexFilter {
    field: String,
    regex: Regex,
}

impl RegexFilter {
    /// Compile a filter without checking the field against an index.
    pub fn new(spec: &RegexSpec) -> Result<Self> {
        let regex = Regex::new(&spec.pattern).map_err(|e| {
            LexprobeError::invalid_argument(format!("invalid regex for {}: {e}", spec.field))
        })?;
        Ok(RegexFilter {
            field: spec.field.clone(),
            regex,
        })
    }

    /// Validate and compile the configured filter, if any.
    ///
    /// The field must be in the catalog and, when a projection subset is
    /// given, inside it.
    pub fn configure(
        spec: Option<&RegexSpec>,
        catalog: &FieldCatalog,
        projection: Option<&[String]>,
    ) -> Result<Option<Self>> {
        let Some(spec) = spec else {
            return Ok(None);
        };
        catalog.validate([&spec.field])?;
        if let Some(fields) = projection {
            if !fields.contains(&spec.field) {
                return Err(LexprobeError::FieldNotProjected(spec.field.clone()));
            }
        }
        Self::new(spec).map(Some)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Whether `document` passes. An absent field never passes.
    pub fn matches(&self, document: &Document) -> bool {
        document
            .get(&self.field)
            .and_then(|value| value.display())
            .is_some_and(|value| self.regex.is_match(&value))
    }
}
