//! Result formatting strategies.
//!
//! A [`ResultFormatter`] turns one [`ProjectedDocument`] into text and never
//! reorders fields. Framing between documents (blank lines, the TABULAR
//! header) is left to the caller.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::DEFAULT_COLUMN_WIDTH;
use crate::error::{LexprobeError, Result};
use crate::inspect::projector::ProjectedDocument;

/// Output format of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// `field: value`, one line per field.
    #[default]
    Multiline,
    /// Fixed-width columns, one line per document.
    Tabular,
    /// One compact JSON object per line.
    Json,
    /// Indented JSON.
    JsonPretty,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Multiline => "multiline",
            OutputFormat::Tabular => "tabular",
            OutputFormat::Json => "json",
            OutputFormat::JsonPretty => "json-pretty",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = LexprobeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "multiline" => Ok(OutputFormat::Multiline),
            "tabular" => Ok(OutputFormat::Tabular),
            "json" => Ok(OutputFormat::Json),
            "json-pretty" => Ok(OutputFormat::JsonPretty),
            _ => Err(LexprobeError::invalid_argument(format!(
                "unknown output format {s}: expected multiline, tabular, json or json-pretty"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats projected documents in one [`OutputFormat`].
#[derive(Debug, Clone)]
pub struct ResultFormatter {
    format: OutputFormat,
    suppress_names: bool,
    column_width: usize,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        ResultFormatter {
            format,
            suppress_names: false,
            column_width: DEFAULT_COLUMN_WIDTH,
        }
    }

    /// Print values only.
    pub fn with_suppress_names(mut self, suppress: bool) -> Self {
        self.suppress_names = suppress;
        self
    }

    /// Width TABULAR cells are padded to.
    pub fn with_column_width(mut self, width: usize) -> Self {
        self.column_width = width;
        self
    }

    pub fn format_kind(&self) -> OutputFormat {
        self.format
    }

    pub fn suppress_names(&self) -> bool {
        self.suppress_names
    }

    /// Whether a header line should precede the first row.
    pub fn wants_header(&self) -> bool {
        self.format == OutputFormat::Tabular && !self.suppress_names
    }

    /// Format one document. Empty only when there are no fields.
    pub fn format(&self, document: &ProjectedDocument) -> Result<String> {
        if document.is_empty() {
            return Ok(String::new());
        }
        match self.format {
            OutputFormat::Multiline => Ok(self.format_multiline(document)),
            OutputFormat::Tabular => Ok(self.row(
                document
                    .fields()
                    .iter()
                    .map(|field| document.joined(field)),
            )),
            OutputFormat::Json => Ok(serde_json::to_string(&self.json_value(document))?),
            OutputFormat::JsonPretty => {
                Ok(serde_json::to_string_pretty(&self.json_value(document))?)
            }
        }
    }

    /// TABULAR header line for the given fields.
    pub fn header(&self, fields: &[String]) -> String {
        self.row(fields.iter().cloned())
    }

    fn format_multiline(&self, document: &ProjectedDocument) -> String {
        document
            .fields()
            .iter()
            .map(|field| {
                if self.suppress_names {
                    document.joined(field)
                } else {
                    format!("{field}: {}", document.joined(field))
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn row<I: Iterator<Item = String>>(&self, cells: I) -> String {
        let width = self.column_width;
        let mut line = String::new();
        for cell in cells {
            if cell.chars().count() < width {
                line.push_str(&format!("{cell:<width$}"));
            } else {
                line.push_str(&cell);
                line.push(' ');
            }
        }
        line.trim_end().to_string()
    }

    fn json_value(&self, document: &ProjectedDocument) -> Value {
        let field_value = |field: &str| match document.values(field) {
            [single] => Value::String(single.clone()),
            many => Value::Array(many.iter().cloned().map(Value::String).collect()),
        };

        if self.suppress_names {
            Value::Array(document.fields().iter().map(|f| field_value(f)).collect())
        } else {
            let mut map = Map::new();
            for field in document.fields() {
                map.insert(field.clone(), field_value(field));
            }
            Value::Object(map)
        }
    }
}
