//! Configuration for an inspection run.
//!
//! [`InspectConfig`] is plain serde data so it can be loaded from a JSON file
//! and then overridden field by field, which is what the command line does.
//!
//! # Example
//!
//! ```
//! use lexprobe::config::InspectConfig;
//! use lexprobe::inspect::OutputFormat;
//!
//! let config = InspectConfig::builder()
//!     .fields(["title", "status"])
//!     .show_id(true)
//!     .output_limit(10)
//!     .format(OutputFormat::Tabular)
//!     .build();
//!
//! assert_eq!(config.output_limit, Some(10));
//! assert_eq!(config.column_width, 24);
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalyzerKind;
use crate::error::{LexprobeError, Result};
use crate::inspect::OutputFormat;

/// Default width of a TABULAR column.
pub const DEFAULT_COLUMN_WIDTH: usize = 24;

/// A regex filter on one field, written `field:/pattern/` on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexSpec {
    /// Field whose first value is tested.
    pub field: String,
    /// Regular expression source.
    pub pattern: String,
}

impl RegexSpec {
    /// Create a new regex spec.
    pub fn new<F: Into<String>, P: Into<String>>(field: F, pattern: P) -> Self {
        RegexSpec {
            field: field.into(),
            pattern: pattern.into(),
        }
    }
}

impl FromStr for RegexSpec {
    type Err = LexprobeError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed =
            || LexprobeError::invalid_argument(format!("regex must be field:/pattern/, got {s}"));

        let (field, rest) = s.split_once(':').ok_or_else(malformed)?;
        let pattern = rest
            .strip_prefix('/')
            .and_then(|p| p.strip_suffix('/'))
            .ok_or_else(malformed)?;
        if field.is_empty() {
            return Err(malformed());
        }
        Ok(RegexSpec::new(field, pattern))
    }
}

impl fmt::Display for RegexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:/{}/", self.field, self.pattern)
    }
}

/// Options of an inspection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    /// Fields to print, in this order. `None` prints every stored field.
    pub fields: Option<Vec<String>>,
    /// Sort the printed field names alphabetically.
    pub sort_fields: bool,
    /// Maximum number of documents printed. `None` is unlimited.
    pub output_limit: Option<usize>,
    /// Analyzer used for query text.
    pub analyzer: AnalyzerKind,
    /// Field used for unqualified query terms.
    pub default_field: Option<String>,
    /// Prepend the `<id>` field.
    pub show_id: bool,
    /// Prepend the `<score>` field.
    pub show_score: bool,
    /// Print `totalHits: N` after a query.
    pub show_hits: bool,
    /// Optional post-retrieval filter.
    pub regex: Option<RegexSpec>,
    /// Output format.
    pub format: OutputFormat,
    /// Print values without field names.
    pub suppress_names: bool,
    /// Width of a TABULAR column.
    pub column_width: usize,
}

impl Default for InspectConfig {
    fn default() -> Self {
        InspectConfig {
            fields: None,
            sort_fields: false,
            output_limit: None,
            analyzer: AnalyzerKind::default(),
            default_field: None,
            show_id: false,
            show_score: false,
            show_hits: false,
            regex: None,
            format: OutputFormat::default(),
            suppress_names: false,
            column_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

impl InspectConfig {
    /// Create a new builder starting from the defaults.
    pub fn builder() -> InspectConfigBuilder {
        InspectConfigBuilder::new()
    }

    /// Parse a configuration from JSON text. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// The output limit with `None` resolved to unlimited.
    pub fn effective_output_limit(&self) -> usize {
        self.output_limit.unwrap_or(usize::MAX)
    }
}

/// Fluent builder for [`InspectConfig`].
#[derive(Debug, Clone, Default)]
pub struct InspectConfigBuilder {
    config: InspectConfig,
}

impl InspectConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration (e.g. one loaded from a file).
    pub fn from_config(config: InspectConfig) -> Self {
        InspectConfigBuilder { config }
    }

    /// Restrict output to these fields, in this order.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn sort_fields(mut self, sort: bool) -> Self {
        self.config.sort_fields = sort;
        self
    }

    pub fn output_limit(mut self, limit: usize) -> Self {
        self.config.output_limit = Some(limit);
        self
    }

    pub fn analyzer(mut self, analyzer: AnalyzerKind) -> Self {
        self.config.analyzer = analyzer;
        self
    }

    pub fn default_field<S: Into<String>>(mut self, field: S) -> Self {
        self.config.default_field = Some(field.into());
        self
    }

    pub fn show_id(mut self, show: bool) -> Self {
        self.config.show_id = show;
        self
    }

    pub fn show_score(mut self, show: bool) -> Self {
        self.config.show_score = show;
        self
    }

    pub fn show_hits(mut self, show: bool) -> Self {
        self.config.show_hits = show;
        self
    }

    pub fn regex(mut self, regex: RegexSpec) -> Self {
        self.config.regex = Some(regex);
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn suppress_names(mut self, suppress: bool) -> Self {
        self.config.suppress_names = suppress;
        self
    }

    pub fn column_width(mut self, width: usize) -> Self {
        self.config.column_width = width;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> InspectConfig {
        self.config
    }
}
