//! Command line argument parsing for lexprobe using clap.

use std::path::PathBuf;

use clap::Parser;

use crate::analysis::AnalyzerKind;
use crate::config::{InspectConfig, InspectConfigBuilder, RegexSpec};
use crate::error::Result;
use crate::inspect::OutputFormat;

/// lexprobe - inspect the documents, fields and terms of a segmented index
#[derive(Parser, Debug, Clone)]
#[command(name = "lexprobe")]
#[command(about = "Inspect the documents, fields and terms of a segmented index")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
#[command(after_help = "OPERATIONS:\n  \
    %all                    every document\n  \
    %ids ID...              documents by id\n  \
    %id-file FILE           ids listed one per line\n  \
    %enumerate-fields       field names\n  \
    %count-fields           documents with terms, per field\n  \
    %enumerate-terms FIELD  terms of a field with document frequency\n  \
    anything else           a query such as 'status:C AND body:\"x y\"'")]
pub struct LexprobeArgs {
    /// Index directories (comma-separated or repeated)
    #[arg(short, long, value_delimiter = ',', required = true, value_name = "DIR")]
    pub index: Vec<PathBuf>,

    /// Query text or %operation, followed by its arguments
    #[arg(short, long, num_args = 1.., value_name = "TOKEN")]
    pub query: Vec<String>,

    /// More query tokens; put them after `--` if they start with '-'
    #[arg(value_name = "TOKENS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub tokens: Vec<String>,

    /// Only print documents whose field matches, written field:/regex/
    #[arg(long, value_name = "FIELD:/REGEX/")]
    pub regex: Option<RegexSpec>,

    /// Fields to print (comma-separated or repeated)
    #[arg(long, value_delimiter = ',', value_name = "FIELD")]
    pub fields: Option<Vec<String>>,

    /// Sort printed fields by name
    #[arg(long)]
    pub sort_fields: bool,

    /// Maximum number of documents to print
    #[arg(long, visible_alias = "query-limit", value_name = "N")]
    pub output_limit: Option<usize>,

    /// Analyzer for query text: keyword or standard
    #[arg(long, value_name = "ANALYZER")]
    pub analyzer: Option<AnalyzerKind>,

    /// Field searched by query terms without a field: prefix
    #[arg(long, value_name = "FIELD")]
    pub query_field: Option<String>,

    /// Print the document id as <id>
    #[arg(long)]
    pub show_id: bool,

    /// Print the score as <score>
    #[arg(long)]
    pub show_score: bool,

    /// Print the total number of hits after a query
    #[arg(long)]
    pub show_hits: bool,

    /// Output format: multiline, tabular, json or json-pretty
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Print values without field names
    #[arg(long)]
    pub suppress_names: bool,

    /// Column width of the tabular format
    #[arg(long, value_name = "N")]
    pub column_width: Option<usize>,

    /// JSON configuration file; command line flags take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Verbosity level (-vv info, -vvv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(long)]
    pub quiet: bool,
}

impl LexprobeArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }

    /// `--query` values followed by trailing tokens.
    pub fn query_tokens(&self) -> Vec<String> {
        self.query.iter().chain(&self.tokens).cloned().collect()
    }

    /// The configuration file (if any) with command line flags applied.
    pub fn to_config(&self) -> Result<InspectConfig> {
        let base = match &self.config {
            Some(path) => InspectConfig::from_json_file(path)?,
            None => InspectConfig::default(),
        };
        let mut builder = InspectConfigBuilder::from_config(base);

        if let Some(fields) = &self.fields {
            builder = builder.fields(fields.iter().cloned());
        }
        if self.sort_fields {
            builder = builder.sort_fields(true);
        }
        if let Some(limit) = self.output_limit {
            builder = builder.output_limit(limit);
        }
        if let Some(analyzer) = self.analyzer {
            builder = builder.analyzer(analyzer);
        }
        if let Some(field) = &self.query_field {
            builder = builder.default_field(field.clone());
        }
        if self.show_id {
            builder = builder.show_id(true);
        }
        if self.show_score {
            builder = builder.show_score(true);
        }
        if self.show_hits {
            builder = builder.show_hits(true);
        }
        if let Some(regex) = &self.regex {
            builder = builder.regex(regex.clone());
        }
        if let Some(format) = self.format {
            builder = builder.format(format);
        }
        if self.suppress_names {
            builder = builder.suppress_names(true);
        }
        if let Some(width) = self.column_width {
            builder = builder.column_width(width);
        }
        Ok(builder.build())
    }
}
