//! Read-only segmented index used as the search backend.
//!
//! An index is one or more directories of `*.seg` files. Each segment holds
//! stored documents, a deleted-documents set and a per-field term dictionary
//! with postings. [`reader::SegmentedIndex`] stitches segments from several
//! directories into one document id space and implements the
//! [`reader::IndexReader`] trait the inspection pipeline runs against.

pub mod directory;
pub mod reader;
pub mod search;
pub mod segment;
pub mod writer;

pub use directory::IndexDirectory;
pub use reader::{IndexReader, SegmentedIndex};
pub use segment::{FieldInfo, Posting, Segment};
pub use writer::{FieldOption, SegmentWriter};
