//! Keyword analyzer that treats the entire input as a single term.
//!
//! Suited to identifier-like fields (status codes, accession numbers) that
//! must match exactly as stored.

use crate::analysis::analyzer::Analyzer;
use crate::error::Result;

/// A keyword analyzer that treats the entire input as a single term.
#[derive(Debug, Clone, Default)]
pub struct KeywordAnalyzer;

impl KeywordAnalyzer {
    /// Create a new keyword analyzer.
    pub fn new() -> Self {
        KeywordAnalyzer
    }
}

impl Analyzer for KeywordAnalyzer {
    fn analyze(&self, text: &str) -> Result<Vec<String>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![text.to_string()])
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}
