//! Text analysis used when parsing queries and writing fixture segments.
//!
//! Only two analyzers exist: [`keyword::KeywordAnalyzer`], which keeps the
//! whole input as one token, and [`standard::StandardAnalyzer`], which splits
//! on Unicode word boundaries, lowercases and drops English stop words.

pub mod analyzer;
pub mod keyword;
pub mod standard;

pub use analyzer::{Analyzer, AnalyzerKind};
