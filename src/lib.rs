//! # lexprobe
//!
//! Inspect the contents of a segmented inverted index from the command line
//! or from code.
//!
//! ## Features
//!
//! - Free-text queries, `%all`, lookups by document id
//! - Field listing, per-field document counts and term enumeration
//! - Field projection with synthetic `<id>` / `<score>` columns
//! - Regex post-filtering and output limits that keep true hit counts
//! - Multiline, tabular, JSON and pretty JSON output
//!
//! ## Example
//!
//! ```
//! use lexprobe::config::InspectConfig;
//! use lexprobe::document::Document;
//! use lexprobe::index::{SegmentWriter, SegmentedIndex};
//! use lexprobe::inspect::Operation;
//!
//! let mut writer = SegmentWriter::new();
//! writer.add_document(
//!     Document::builder()
//!         .add_text("title", "Hello")
//!         .add_text("status", "C")
//!         .build(),
//! );
//! let index = SegmentedIndex::from_segments(vec![writer.finish().unwrap()]).unwrap();
//!
//! let config = InspectConfig::builder().fields(["title"]).build();
//! let operation = Operation::parse(&["status:C"]).unwrap();
//!
//! let mut out = Vec::new();
//! lexprobe::run_operation(&index, config, &operation, &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "title: Hello\n");
//! ```

use std::io::Write;

pub mod analysis;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod inspect;
pub mod query;

use crate::config::InspectConfig;
use crate::error::Result;
use crate::index::IndexReader;
use crate::inspect::{Inspector, Operation, OperationResult};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Validate `config` against `reader` and run one operation into `sink`.
pub fn run_operation<W: Write>(
    reader: &dyn IndexReader,
    config: InspectConfig,
    operation: &Operation,
    sink: &mut W,
) -> Result<OperationResult> {
    Inspector::new(reader, config)?.run(operation, sink)
}
