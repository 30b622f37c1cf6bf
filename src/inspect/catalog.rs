//! The set of field names known to an index.

use ahash::AHashSet;

use crate::error::{LexprobeError, Result};
use crate::index::IndexReader;

/// Every field name of an open index, in first-seen order across segments.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    names: Vec<String>,
    lookup: AHashSet<String>,
}

impl FieldCatalog {
    /// Scan every segment of `reader` and union their field names.
    pub fn from_reader(reader: &dyn IndexReader) -> Self {
        Self::from_names((0..reader.segment_count()).flat_map(|seg| reader.segment_field_names(seg)))
    }

    /// Build a catalog from names; duplicates keep their first position.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = FieldCatalog::default();
        for name in names {
            let name = name.into();
            if catalog.lookup.insert(name.clone()) {
                catalog.names.push(name);
            }
        }
        catalog
    }

    /// All field names, catalog order.
    pub fn all_fields(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains(name)
    }

    /// Fail with every name that is not in the catalog.
    pub fn validate<I, S>(&self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut invalid: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref();
            if !self.contains(name) && !invalid.iter().any(|n| n == name) {
                invalid.push(name.to_string());
            }
        }
        if invalid.is_empty() {
            Ok(())
        } else {
            Err(LexprobeError::InvalidField(invalid))
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
