//! Standard analyzer: Unicode word boundaries, lowercase, English stop words.
//!
//! # Pipeline
//!
//! 1. Unicode word segmentation (UAX #29)
//! 2. Lowercase normalization
//! 3. Stop word removal (33 common English stop words)

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::analyzer::Analyzer;
use crate::error::Result;

const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// A standard analyzer that provides good defaults for prose fields.
#[derive(Debug, Clone, Default)]
pub struct StandardAnalyzer;

impl StandardAnalyzer {
    /// Create a new standard analyzer.
    pub fn new() -> Self {
        StandardAnalyzer
    }

    fn is_stop_word(word: &str) -> bool {
        DEFAULT_ENGLISH_STOP_WORDS.contains(&word)
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, text: &str) -> Result<Vec<String>> {
        Ok(text
            .unicode_words()
            .map(str::to_lowercase)
            .filter(|word| !Self::is_stop_word(word))
            .collect())
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}
