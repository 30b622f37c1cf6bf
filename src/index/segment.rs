//! Immutable index segments and their on-disk encoding.
//!
//! # File layout
//!
//! ```text
//! +--------+---------+----------+-------------+-------------------+
//! | "LXPS" | version | crc32    | payload len | bincode payload   |
//! | 4 B    | u32 LE  | u32 LE   | u64 LE      | payload len bytes |
//! +--------+---------+----------+-------------+-------------------+
//! ```

use std::collections::BTreeMap;

use bit_vec::BitVec;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use crate::analysis::AnalyzerKind;
use crate::document::Document;
use crate::error::{LexprobeError, Result};

const SEGMENT_MAGIC: &[u8; 4] = b"LXPS";
const SEGMENT_VERSION: u32 = 1;
const HEADER_LEN: usize = 4 + 4 + 4 + 8;

/// Per-segment metadata for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    /// Field name.
    pub name: String,
    /// Analyzer used at index time, `None` for stored-only fields.
    pub analyzer: Option<AnalyzerKind>,
}

impl FieldInfo {
    /// Whether values of this field were indexed.
    pub fn is_indexed(&self) -> bool {
        self.analyzer.is_some()
    }
}

/// One entry of a postings list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Segment-local document id.
    pub doc: u32,
    /// Occurrences of the term in the document.
    pub freq: u32,
}

/// field → term → postings (ascending doc order)
pub(crate) type TermDictionary = BTreeMap<String, BTreeMap<String, Vec<Posting>>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SegmentData {
    field_infos: Vec<FieldInfo>,
    documents: Vec<Document>,
    deleted: Vec<u32>,
    terms: TermDictionary,
}

/// An immutable segment.
#[derive(Debug, Clone)]
pub struct Segment {
    data: SegmentData,
    live: BitVec,
}

impl Segment {
    pub(crate) fn new(
        field_infos: Vec<FieldInfo>,
        documents: Vec<Document>,
        deleted: Vec<u32>,
        terms: TermDictionary,
    ) -> Result<Self> {
        Self::from_data(SegmentData {
            field_infos,
            documents,
            deleted,
            terms,
        })
    }

    fn from_data(data: SegmentData) -> Result<Self> {
        let max_doc = data.documents.len();
        let mut live = BitVec::from_elem(max_doc, true);
        for &doc in &data.deleted {
            if doc as usize >= max_doc {
                return Err(LexprobeError::storage(format!(
                    "deleted document {doc} is outside segment of {max_doc} documents"
                )));
            }
            live.set(doc as usize, false);
        }
        for (field, terms) in &data.terms {
            for (term, postings) in terms {
                if let Some(posting) = postings.iter().find(|p| p.doc as usize >= max_doc) {
                    return Err(LexprobeError::storage(format!(
                        "posting {field}:{term} references document {} outside segment of {max_doc} documents",
                        posting.doc
                    )));
                }
            }
        }
        Ok(Segment { data, live })
    }

    /// Number of documents, deleted ones included.
    pub fn max_doc(&self) -> u32 {
        self.data.documents.len() as u32
    }

    /// Number of documents that are not deleted.
    pub fn num_live_docs(&self) -> u32 {
        self.live.iter().filter(|live| *live).count() as u32
    }

    /// Whether a segment-local document is live.
    pub fn is_live(&self, doc: u32) -> bool {
        self.live.get(doc as usize).unwrap_or(false)
    }

    /// Live document ids in ascending order.
    pub fn live_docs(&self) -> impl Iterator<Item = u32> + '_ {
        self.live
            .iter()
            .enumerate()
            .filter(|(_, live)| *live)
            .map(|(doc, _)| doc as u32)
    }

    /// Field metadata in first-seen order.
    pub fn field_infos(&self) -> &[FieldInfo] {
        &self.data.field_infos
    }

    /// Stored document by segment-local id.
    pub fn document(&self, doc: u32) -> Option<&Document> {
        self.data.documents.get(doc as usize)
    }

    /// Term dictionary of a field, `None` when the field has no terms here.
    pub fn terms(&self, field: &str) -> Option<&BTreeMap<String, Vec<Posting>>> {
        self.data.terms.get(field).filter(|terms| !terms.is_empty())
    }

    /// Postings for one term.
    pub fn postings(&self, field: &str, term: &str) -> Option<&[Posting]> {
        self.data
            .terms
            .get(field)
            .and_then(|terms| terms.get(term))
            .map(Vec::as_slice)
    }

    /// Document frequency of a term, deleted documents included.
    pub fn doc_freq(&self, field: &str, term: &str) -> u64 {
        self.postings(field, term).map_or(0, |p| p.len() as u64)
    }

    /// Number of documents with at least one term in `field`, deleted
    /// documents included.
    pub fn docs_with_field(&self, field: &str) -> u64 {
        let Some(terms) = self.terms(field) else {
            return 0;
        };
        let mut seen = BitVec::from_elem(self.data.documents.len(), false);
        for posting in terms.values().flatten() {
            seen.set(posting.doc as usize, true);
        }
        seen.iter().filter(|bit| *bit).count() as u64
    }

    /// Encode the segment into its file representation.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(&self.data)?;

        let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
        out.extend_from_slice(SEGMENT_MAGIC);
        out.write_u32::<LittleEndian>(SEGMENT_VERSION)?;
        out.write_u32::<LittleEndian>(crc32fast::hash(&payload))?;
        out.write_u64::<LittleEndian>(payload.len() as u64)?;
        out.extend_from_slice(&payload);
        Ok(out)
    }

    /// Decode a segment from its file representation.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN || &bytes[..4] != SEGMENT_MAGIC {
            return Err(LexprobeError::index_open("not a segment file"));
        }

        let mut header = &bytes[4..HEADER_LEN];
        let version = header.read_u32::<LittleEndian>()?;
        let checksum = header.read_u32::<LittleEndian>()?;
        let payload_len = header.read_u64::<LittleEndian>()?;

        if version != SEGMENT_VERSION {
            return Err(LexprobeError::index_open(format!(
                "unsupported segment version {version}"
            )));
        }

        let payload = &bytes[HEADER_LEN..];
        if payload.len() as u64 != payload_len {
            return Err(LexprobeError::index_open(format!(
                "truncated segment: expected {payload_len} payload bytes, found {}",
                payload.len()
            )));
        }
        if crc32fast::hash(payload) != checksum {
            return Err(LexprobeError::index_open("segment checksum mismatch"));
        }

        let data: SegmentData = bincode::deserialize(payload)?;
        Self::from_data(data)
    }
}
