//! Builds segments from documents.
//!
//! The writer exists so fixture indexes can be produced for tests, benches
//! and local experiments; it keeps everything in memory and emits a single
//! segment.
//!
//! # Examples
//!
//! ```
//! use lexprobe::analysis::AnalyzerKind;
//! use lexprobe::document::Document;
//! use lexprobe::index::{FieldOption, SegmentWriter};
//!
//! let mut writer = SegmentWriter::new()
//!     .with_field_option("body", FieldOption::Indexed(AnalyzerKind::Standard))
//!     .with_field_option("raw", FieldOption::Stored);
//! writer.add_document(Document::builder().add_text("body", "Hello World").build());
//!
//! let segment = writer.finish().unwrap();
//! assert_eq!(segment.doc_freq("body", "hello"), 1);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use ahash::AHashMap;

use crate::analysis::{Analyzer, AnalyzerKind};
use crate::document::Document;
use crate::error::{LexprobeError, Result};
use crate::index::segment::{FieldInfo, Posting, Segment, TermDictionary};

/// How values of a field are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOption {
    /// Stored and indexed with the given analyzer.
    Indexed(AnalyzerKind),
    /// Stored only; the field has no terms.
    Stored,
}

impl Default for FieldOption {
    fn default() -> Self {
        FieldOption::Indexed(AnalyzerKind::Keyword)
    }
}

/// Accumulates documents and produces a [`Segment`].
#[derive(Debug, Default)]
pub struct SegmentWriter {
    default_option: FieldOption,
    field_options: AHashMap<String, FieldOption>,
    documents: Vec<Document>,
    deleted: BTreeSet<u32>,
}

impl SegmentWriter {
    /// Create a writer that indexes every field with the keyword analyzer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Option used for fields without an explicit option.
    pub fn with_default_option(mut self, option: FieldOption) -> Self {
        self.default_option = option;
        self
    }

    /// Option for one field.
    pub fn with_field_option<S: Into<String>>(mut self, field: S, option: FieldOption) -> Self {
        self.field_options.insert(field.into(), option);
        self
    }

    /// Add a document and return its segment-local id.
    pub fn add_document(&mut self, document: Document) -> u32 {
        self.documents.push(document);
        (self.documents.len() - 1) as u32
    }

    /// Mark a previously added document as deleted.
    pub fn delete_document(&mut self, doc: u32) -> Result<()> {
        if doc as usize >= self.documents.len() {
            return Err(LexprobeError::DocumentNotFound(doc));
        }
        self.deleted.insert(doc);
        Ok(())
    }

    /// Number of documents added so far.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no document was added.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn option_for(&self, field: &str) -> FieldOption {
        self.field_options
            .get(field)
            .copied()
            .unwrap_or(self.default_option)
    }

    /// Analyze every document and build the segment.
    pub fn finish(self) -> Result<Segment> {
        let mut field_infos: Vec<FieldInfo> = Vec::new();
        let mut analyzers: AHashMap<AnalyzerKind, Arc<dyn Analyzer>> = AHashMap::new();
        let mut terms: TermDictionary = BTreeMap::new();

        for (doc, document) in self.documents.iter().enumerate() {
            let mut doc_terms: BTreeMap<(&str, String), u32> = BTreeMap::new();

            for (name, value) in document.iter() {
                let option = self.option_for(name);
                if !field_infos.iter().any(|info| info.name == name) {
                    field_infos.push(FieldInfo {
                        name: name.to_string(),
                        analyzer: match option {
                            FieldOption::Indexed(kind) => Some(kind),
                            FieldOption::Stored => None,
                        },
                    });
                }

                let FieldOption::Indexed(kind) = option else {
                    continue;
                };
                let Some(text) = value.index_text() else {
                    continue;
                };
                let analyzer = analyzers.entry(kind).or_insert_with(|| kind.analyzer());
                for term in analyzer.analyze(&text)? {
                    *doc_terms.entry((name, term)).or_insert(0) += 1;
                }
            }

            for ((field, term), freq) in doc_terms {
                terms
                    .entry(field.to_string())
                    .or_default()
                    .entry(term)
                    .or_default()
                    .push(Posting {
                        doc: doc as u32,
                        freq,
                    });
            }
        }

        Segment::new(
            field_infos,
            self.documents,
            self.deleted.into_iter().collect(),
            terms,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_frequencies() {
        let mut writer =
            SegmentWriter::new().with_default_option(FieldOption::Indexed(AnalyzerKind::Standard));
        writer.add_document(
            Document::builder()
                .add_text("body", "cat dog cat")
                .add_text("body", "cat")
                .build(),
        );
        writer.add_document(Document::builder().add_text("body", "dog").build());

        let segment = writer.finish().unwrap();
        assert_eq!(
            segment.postings("body", "cat"),
            Some(&[Posting { doc: 0, freq: 3 }][..])
        );
        assert_eq!(segment.doc_freq("body", "dog"), 2);
    }

    #[test]
    fn test_stored_field_has_info_but_no_terms() {
        let mut writer = SegmentWriter::new().with_field_option("raw", FieldOption::Stored);
        writer.add_document(Document::builder().add_text("raw", "x").build());

        let segment = writer.finish().unwrap();
        assert_eq!(segment.field_infos().len(), 1);
        assert!(!segment.field_infos()[0].is_indexed());
        assert!(segment.terms("raw").is_none());
    }

    #[test]
    fn test_delete_unknown_document() {
        let mut writer = SegmentWriter::new();
        assert!(matches!(
            writer.delete_document(0),
            Err(LexprobeError::DocumentNotFound(0))
        ));
    }
}
