//! Core analyzer trait and the closed set of analyzer kinds.
//!
//! # Examples
//!
//! ```
//! use lexprobe::analysis::AnalyzerKind;
//!
//! let kind: AnalyzerKind = "StandardAnalyzer".parse().unwrap();
//! assert_eq!(kind, AnalyzerKind::Standard);
//!
//! let tokens = kind.analyzer().analyze("Hello the World").unwrap();
//! assert_eq!(tokens, vec!["hello", "world"]);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::keyword::KeywordAnalyzer;
use crate::analysis::standard::StandardAnalyzer;
use crate::error::{LexprobeError, Result};

/// Trait for analyzers that convert text into index terms.
///
/// The trait requires `Send + Sync` so one analyzer can be shared by the
/// per-segment workers.
pub trait Analyzer: Send + Sync + fmt::Debug {
    /// Analyze the given text and return its terms in order.
    fn analyze(&self, text: &str) -> Result<Vec<String>>;

    /// Get the name of this analyzer (for logs and configuration).
    fn name(&self) -> &'static str;
}

/// The analyzers a query or a field can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalyzerKind {
    /// Whole input is a single term.
    #[default]
    Keyword,
    /// Unicode words, lowercased, English stop words removed.
    Standard,
}

impl AnalyzerKind {
    /// Build a shared analyzer instance of this kind.
    pub fn analyzer(self) -> Arc<dyn Analyzer> {
        match self {
            AnalyzerKind::Keyword => Arc::new(KeywordAnalyzer::new()),
            AnalyzerKind::Standard => Arc::new(StandardAnalyzer::new()),
        }
    }

    /// The canonical configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            AnalyzerKind::Keyword => "keyword",
            AnalyzerKind::Standard => "standard",
        }
    }
}

impl FromStr for AnalyzerKind {
    type Err = LexprobeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "keyword" | "keywordanalyzer" => Ok(AnalyzerKind::Keyword),
            "standard" | "standardanalyzer" => Ok(AnalyzerKind::Standard),
            _ => Err(LexprobeError::InvalidAnalyzer(s.to_string())),
        }
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
