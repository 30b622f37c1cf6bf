//! Index reader trait and the segmented implementation.

use std::path::Path;

use tracing::debug;

use crate::document::Document;
use crate::error::{LexprobeError, Result};
use crate::index::directory::IndexDirectory;
use crate::index::search::{CollectionStats, evaluate};
use crate::index::segment::Segment;
use crate::query::{Collector, Query};

/// Read access to an index, as needed by the inspection pipeline.
///
/// Document ids are global: segment-local ids offset by the number of
/// documents in preceding segments.
pub trait IndexReader: Send + Sync + std::fmt::Debug {
    /// Number of segments.
    fn segment_count(&self) -> usize;

    /// Total number of documents, deleted ones included.
    fn max_doc(&self) -> u32;

    /// Field names known to one segment, in segment order.
    fn segment_field_names(&self, segment: usize) -> Vec<String>;

    /// Run `query` and hand every matching document to `collector`, segment
    /// by segment in ascending document order.
    fn search(&self, query: &Query, collector: &mut dyn Collector) -> Result<()>;

    /// Fetch a stored document, optionally restricted to `fields`.
    fn document(&self, doc_id: u32, fields: Option<&[String]>) -> Result<Document>;

    /// `(term, doc_freq)` pairs of `field` in one segment, ascending by term,
    /// or `None` if the segment has no terms for the field.
    fn segment_terms(&self, segment: usize, field: &str) -> Option<Vec<(String, u64)>>;

    /// Number of documents of one segment with at least one term in `field`.
    fn segment_docs_with_field(&self, segment: usize, field: &str) -> u64;
}

/// Segments from one or more index directories seen as a single index.
#[derive(Debug)]
pub struct SegmentedIndex {
    segments: Vec<Segment>,
    doc_bases: Vec<u32>,
    max_doc: u32,
}

impl SegmentedIndex {
    /// Open the segments of every directory, in the given order.
    pub fn open<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        if paths.is_empty() {
            return Err(LexprobeError::index_open("no index directory given"));
        }
        let mut segments = Vec::new();
        for path in paths {
            let directory = IndexDirectory::open(path)?;
            segments.extend(directory.read_segments()?);
        }
        Self::from_segments(segments)
    }

    /// Build an index over in-memory segments.
    pub fn from_segments(segments: Vec<Segment>) -> Result<Self> {
        let mut doc_bases = Vec::with_capacity(segments.len());
        let mut max_doc: u32 = 0;
        for segment in &segments {
            doc_bases.push(max_doc);
            max_doc = max_doc
                .checked_add(segment.max_doc())
                .ok_or_else(|| LexprobeError::index_open("too many documents"))?;
        }
        debug!(segments = segments.len(), max_doc, "opened index");
        Ok(SegmentedIndex {
            segments,
            doc_bases,
            max_doc,
        })
    }

    /// The segments in document id order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Map a global document id to `(segment index, local id)`.
    fn locate(&self, doc_id: u32) -> Option<(usize, u32)> {
        if doc_id >= self.max_doc {
            return None;
        }
        let segment = self.doc_bases.partition_point(|&base| base <= doc_id) - 1;
        Some((segment, doc_id - self.doc_bases[segment]))
    }
}

impl IndexReader for SegmentedIndex {
    fn segment_count(&self) -> usize {
        self.segments.len()
    }

    fn max_doc(&self) -> u32 {
        self.max_doc
    }

    fn segment_field_names(&self, segment: usize) -> Vec<String> {
        self.segments
            .get(segment)
            .map(|s| s.field_infos().iter().map(|info| info.name.clone()).collect())
            .unwrap_or_default()
    }

    fn search(&self, query: &Query, collector: &mut dyn Collector) -> Result<()> {
        let stats = CollectionStats::for_query(query, self.segments.iter());
        for (segment, base) in self.segments.iter().zip(&self.doc_bases) {
            for (doc, score) in evaluate(segment, query, &stats) {
                collector.collect(base + doc, score)?;
            }
        }
        Ok(())
    }

    fn document(&self, doc_id: u32, fields: Option<&[String]>) -> Result<Document> {
        let (segment, local) = self
            .locate(doc_id)
            .ok_or(LexprobeError::DocumentNotFound(doc_id))?;
        let document = self.segments[segment]
            .document(local)
            .ok_or(LexprobeError::DocumentNotFound(doc_id))?;
        Ok(match fields {
            Some(fields) => document.select(fields),
            None => document.clone(),
        })
    }

    fn segment_terms(&self, segment: usize, field: &str) -> Option<Vec<(String, u64)>> {
        let terms = self.segments.get(segment)?.terms(field)?;
        Some(
            terms
                .iter()
                .map(|(term, postings)| (term.clone(), postings.len() as u64))
                .collect(),
        )
    }

    fn segment_docs_with_field(&self, segment: usize, field: &str) -> u64 {
        self.segments
            .get(segment)
            .map_or(0, |s| s.docs_with_field(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FieldValue;
    use crate::index::writer::SegmentWriter;

    fn index() -> SegmentedIndex {
        let mut first = SegmentWriter::new();
        first.add_document(Document::builder().add_text("status", "C").build());
        first.add_document(Document::builder().add_text("status", "A").build());

        let mut second = SegmentWriter::new();
        second.add_document(
            Document::builder()
                .add_text("status", "C")
                .add_text("title", "late")
                .build(),
        );

        SegmentedIndex::from_segments(vec![first.finish().unwrap(), second.finish().unwrap()])
            .unwrap()
    }

    #[test]
    fn test_global_document_ids() {
        let index = index();
        let mut hits = Vec::new();
        index
            .search(
                &Query::term("status", "C"),
                &mut |doc: u32, _score: f32| -> Result<()> {
                    hits.push(doc);
                    Ok(())
                },
            )
            .unwrap();

        assert_eq!(hits, vec![0, 2]);
        assert_eq!(
            index.document(2, None).unwrap().get("title"),
            Some(&FieldValue::Text("late".to_string()))
        );
    }

    #[test]
    fn test_document_field_subset() {
        let index = index();
        let doc = index.document(2, Some(&["title".to_string()])).unwrap();
        assert!(doc.has_field("title"));
        assert!(!doc.has_field("status"));
    }

    #[test]
    fn test_document_out_of_range() {
        assert!(matches!(
            index().document(3, None),
            Err(LexprobeError::DocumentNotFound(3))
        ));
    }

    #[test]
    fn test_segment_level_statistics() {
        let index = index();
        assert_eq!(index.segment_count(), 2);
        assert_eq!(index.segment_field_names(1), vec!["status", "title"]);
        assert_eq!(
            index.segment_terms(0, "status"),
            Some(vec![("A".to_string(), 1), ("C".to_string(), 1)])
        );
        assert_eq!(index.segment_terms(0, "title"), None);
        assert_eq!(index.segment_docs_with_field(1, "title"), 1);
    }
}
