//! Runs operations against an index and writes their output.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use ahash::AHashMap;
use rayon::prelude::*;
use tracing::debug;

use crate::config::InspectConfig;
use crate::error::{LexprobeError, Result};
use crate::index::IndexReader;
use crate::inspect::catalog::FieldCatalog;
use crate::inspect::filter::RegexFilter;
use crate::inspect::formatter::{OutputFormat, ResultFormatter};
use crate::inspect::limiter::{OperationResult, OutputLimiter, RunState};
use crate::inspect::operation::Operation;
use crate::inspect::projector::{DocumentProjector, ProjectionSpec};
use crate::query::{Query, QueryParser};

/// A validated configuration bound to an open index.
///
/// Construction fails on any configuration error, so [`run`](Self::run)
/// only fails on problems specific to the operation.
///
/// # Example
///
/// ```
/// use lexprobe::config::InspectConfig;
/// use lexprobe::document::Document;
/// use lexprobe::index::{SegmentWriter, SegmentedIndex};
/// use lexprobe::inspect::{Inspector, Operation};
///
/// let mut writer = SegmentWriter::new();
/// writer.add_document(Document::builder().add_text("status", "C").build());
/// let index = SegmentedIndex::from_segments(vec![writer.finish().unwrap()]).unwrap();
///
/// let inspector = Inspector::new(&index, InspectConfig::default()).unwrap();
/// let mut out = Vec::new();
/// let result = inspector
///     .run(&Operation::Search(Some("status:C".to_string())), &mut out)
///     .unwrap();
///
/// assert_eq!(result.total_hits, Some(1));
/// assert_eq!(String::from_utf8(out).unwrap(), "status: C\n");
/// ```
#[derive(Debug)]
pub struct Inspector<'a> {
    reader: &'a dyn IndexReader,
    config: InspectConfig,
    catalog: FieldCatalog,
    parser: QueryParser,
    filter: Option<RegexFilter>,
    projector: DocumentProjector,
    formatter: ResultFormatter,
    limiter: OutputLimiter,
}

impl<'a> Inspector<'a> {
    /// Validate `config` against the fields of `reader`.
    pub fn new(reader: &'a dyn IndexReader, config: InspectConfig) -> Result<Self> {
        let catalog = FieldCatalog::from_reader(reader);

        if let Some(fields) = &config.fields {
            catalog.validate(fields)?;
        }
        let mut parser = QueryParser::new(config.analyzer.analyzer());
        if let Some(field) = &config.default_field {
            catalog.validate([field])?;
            parser = parser.with_default_field(field.clone());
        }
        let filter =
            RegexFilter::configure(config.regex.as_ref(), &catalog, config.fields.as_deref())?;

        let projector = DocumentProjector::new(ProjectionSpec::from(&config));
        let formatter = ResultFormatter::new(config.format)
            .with_suppress_names(config.suppress_names)
            .with_column_width(config.column_width);
        let limiter = OutputLimiter::new(config.output_limit);

        debug!(
            fields = catalog.len(),
            format = %config.format,
            analyzer = %config.analyzer,
            "inspector configured"
        );

        Ok(Inspector {
            reader,
            config,
            catalog,
            parser,
            filter,
            projector,
            formatter,
            limiter,
        })
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &InspectConfig {
        &self.config
    }

    /// Run one operation, writing its output to `sink`.
    ///
    /// Equivalent to [`prepare`](Self::prepare) followed by
    /// [`execute`](Self::execute).
    pub fn run<W: Write>(&self, operation: &Operation, sink: &mut W) -> Result<OperationResult> {
        let prepared = self.prepare(operation)?;
        self.execute(&prepared, sink)
    }

    /// Validate an operation against the index without writing anything.
    ///
    /// Queries are parsed and checked, ids are parsed and range checked, id
    /// files are read and term dictionaries are merged. Whatever fails here
    /// fails before the sink is touched.
    pub fn prepare(&self, operation: &Operation) -> Result<PreparedOperation> {
        debug!(%operation, "preparing operation");
        let prepared = match operation {
            Operation::Search(None) => PreparedOperation::Search(Query::MatchAll),
            Operation::Search(Some(text)) => PreparedOperation::Search(self.parse_query(text)?),
            Operation::Ids(ids) => PreparedOperation::Ids(self.parse_doc_ids(ids)?),
            Operation::IdFile(path) => {
                PreparedOperation::Ids(self.parse_doc_ids(&read_id_file(path)?)?)
            }
            Operation::EnumerateFields => PreparedOperation::EnumerateFields,
            Operation::CountFields => PreparedOperation::CountFields,
            Operation::EnumerateTerms(field) => {
                PreparedOperation::EnumerateTerms(self.merge_terms(field)?)
            }
        };
        Ok(prepared)
    }

    /// Write the output of a prepared operation to `sink`.
    pub fn execute<W: Write>(
        &self,
        prepared: &PreparedOperation,
        sink: &mut W,
    ) -> Result<OperationResult> {
        let result = match prepared {
            PreparedOperation::Search(query) => self.run_query(query, sink)?,
            PreparedOperation::Ids(ids) => self.dump_ids(ids, sink)?,
            PreparedOperation::EnumerateFields => {
                for field in self.catalog.all_fields() {
                    writeln!(sink, "{field}")?;
                }
                OperationResult::default()
            }
            PreparedOperation::CountFields => self.count_fields(sink)?,
            PreparedOperation::EnumerateTerms(terms) => {
                for (term, doc_freq) in terms {
                    writeln!(sink, "{term} ({doc_freq})")?;
                }
                OperationResult::default()
            }
        };
        sink.flush()?;
        debug!(
            total_hits = ?result.total_hits,
            docs_printed = result.docs_printed,
            "operation finished"
        );
        Ok(result)
    }

    /// Parse and validate a query without running it.
    pub fn parse_query(&self, text: &str) -> Result<Query> {
        if !text.contains(':') && self.parser.default_field().is_none() {
            return Err(LexprobeError::AmbiguousField(text.to_string()));
        }
        let query = self.parser.parse(text)?;
        self.catalog.validate(query.fields())?;
        Ok(query)
    }

    fn run_query<W: Write>(&self, query: &Query, sink: &mut W) -> Result<OperationResult> {
        debug!(query = %query.description(), "running query");

        let mut state = RunState::counting_hits();
        self.reader.search(
            query,
            &mut |doc_id: u32, score: f32| -> Result<()> {
                state.record_hit();
                if self.limiter.is_reached(&state) {
                    return Ok(());
                }
                self.print_document(doc_id, score, true, &mut state, &mut *sink)
            },
        )?;

        if self.config.show_hits {
            writeln!(sink, "totalHits: {}", state.total_hits().unwrap_or(0))?;
            writeln!(sink)?;
        }
        Ok(state.finish())
    }

    fn dump_ids<W: Write>(&self, ids: &[u32], sink: &mut W) -> Result<OperationResult> {
        let mut state = RunState::uncounted();
        for &doc_id in ids {
            if self.limiter.is_reached(&state) {
                break;
            }
            self.print_document(doc_id, 1.0, false, &mut state, sink)?;
        }
        Ok(state.finish())
    }

    fn parse_doc_ids<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<u32>> {
        ids.iter()
            .map(|token| self.parse_doc_id(token.as_ref()))
            .collect()
    }

    fn parse_doc_id(&self, token: &str) -> Result<u32> {
        let doc_id: u32 = token
            .trim()
            .parse()
            .map_err(|_| LexprobeError::InvalidDocumentId(token.to_string()))?;
        if doc_id >= self.reader.max_doc() {
            return Err(LexprobeError::DocumentNotFound(doc_id));
        }
        Ok(doc_id)
    }

    fn print_document<W: Write>(
        &self,
        doc_id: u32,
        score: f32,
        apply_filter: bool,
        state: &mut RunState,
        sink: &mut W,
    ) -> Result<()> {
        let document = self
            .reader
            .document(doc_id, self.projector.fetch_fields())?;

        if apply_filter {
            if let Some(filter) = &self.filter {
                if !filter.matches(&document) {
                    return Ok(());
                }
            }
        }

        let projected = self.projector.project(&document, doc_id, score);
        let formatted = self.formatter.format(&projected)?;
        if formatted.is_empty() {
            return Ok(());
        }

        if state.docs_printed() == 0 && self.formatter.wants_header() {
            writeln!(sink, "{}", self.formatter.header(projected.fields()))?;
        }
        if state.docs_printed() > 0 && self.formatter.format_kind() == OutputFormat::Multiline {
            writeln!(sink)?;
        }
        writeln!(sink, "{formatted}")?;
        state.record_printed();
        Ok(())
    }

    fn count_fields<W: Write>(&self, sink: &mut W) -> Result<OperationResult> {
        let fields = self.catalog.all_fields();
        let totals = (0..self.reader.segment_count())
            .into_par_iter()
            .map(|segment| {
                fields
                    .iter()
                    .map(|field| self.reader.segment_docs_with_field(segment, field))
                    .collect::<Vec<u64>>()
            })
            .reduce(
                || vec![0; fields.len()],
                |mut acc, counts| {
                    for (total, count) in acc.iter_mut().zip(counts) {
                        *total += count;
                    }
                    acc
                },
            );

        for (field, count) in fields.iter().zip(totals) {
            writeln!(sink, "{field}: {count}")?;
        }
        Ok(OperationResult::default())
    }

    fn merge_terms(&self, field: &str) -> Result<BTreeMap<String, u64>> {
        self.catalog.validate([field])?;

        let partials: Vec<Option<Vec<(String, u64)>>> = (0..self.reader.segment_count())
            .into_par_iter()
            .map(|segment| self.reader.segment_terms(segment, field))
            .collect();

        if partials.iter().all(Option::is_none) {
            return Err(LexprobeError::MissingIndex(field.to_string()));
        }

        let mut merged: AHashMap<String, u64> = AHashMap::new();
        for (term, doc_freq) in partials.into_iter().flatten().flatten() {
            *merged.entry(term).or_insert(0) += doc_freq;
        }
        Ok(merged.into_iter().collect())
    }
}

/// An operation that passed validation and only has output left to write.
#[derive(Debug, Clone)]
pub enum PreparedOperation {
    /// A parsed and field-checked query.
    Search(Query),
    /// Range-checked document ids, in request order.
    Ids(Vec<u32>),
    EnumerateFields,
    CountFields,
    /// Merged term dictionary of one field, sorted by term.
    EnumerateTerms(BTreeMap<String, u64>),
}

fn read_id_file(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|e| {
        LexprobeError::invalid_argument(format!("cannot read id file {}: {e}", path.display()))
    })?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegexSpec;
    use crate::document::Document;
    use crate::index::{FieldOption, SegmentWriter, SegmentedIndex};

    fn index() -> SegmentedIndex {
        let mut writer = SegmentWriter::new().with_field_option("note", FieldOption::Stored);
        for (title, status) in [("one", "C"), ("two", "A"), ("three", "C"), ("four", "C")] {
            writer.add_document(
                Document::builder()
                    .add_text("title", title)
                    .add_text("status", status)
                    .add_text("note", "n")
                    .build(),
            );
        }
        SegmentedIndex::from_segments(vec![writer.finish().unwrap()]).unwrap()
    }

    fn run(index: &SegmentedIndex, config: InspectConfig, op: Operation) -> (String, OperationResult) {
        let inspector = Inspector::new(index, config).unwrap();
        let mut out = Vec::new();
        let result = inspector.run(&op, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), result)
    }

    fn query(text: &str) -> Operation {
        Operation::Search(Some(text.to_string()))
    }

    #[test]
    fn test_multiline_framing() {
        let config = InspectConfig::builder().fields(["title"]).build();
        let (out, result) = run(&index(), config, query("status:C"));

        assert_eq!(out, "title: one\n\ntitle: three\n\ntitle: four\n");
        assert_eq!(result.total_hits, Some(3));
        assert_eq!(result.docs_printed, 3);
    }

    #[test]
    fn test_limit_still_counts_hits() {
        let config = InspectConfig::builder()
            .fields(["title"])
            .output_limit(1)
            .show_hits(true)
            .build();
        let (out, result) = run(&index(), config, query("status:C"));

        assert_eq!(out, "title: one\ntotalHits: 3\n\n");
        assert_eq!(result.docs_printed, 1);
    }

    #[test]
    fn test_regex_drops_documents_but_counts_them() {
        let config = InspectConfig::builder()
            .regex(RegexSpec::new("title", "^t"))
            .fields(["title", "status"])
            .format(OutputFormat::Json)
            .build();
        let (out, result) = run(&index(), config, Operation::Search(None));

        assert_eq!(
            out,
            "{\"title\":\"two\",\"status\":\"A\"}\n{\"title\":\"three\",\"status\":\"C\"}\n"
        );
        assert_eq!(result.total_hits, Some(4));
        assert_eq!(result.docs_printed, 2);
    }

    #[test]
    fn test_tabular_header_once() {
        let config = InspectConfig::builder()
            .fields(["title", "status"])
            .format(OutputFormat::Tabular)
            .column_width(8)
            .show_id(true)
            .build();
        let (out, _) = run(&index(), config, query("status:A OR status:C"));

        assert_eq!(
            out,
            "<id>    title   status\n0       one     C\n1       two     A\n2       three   C\n3       four    C\n"
        );
    }

    #[test]
    fn test_ids_bypass_filter_and_scoring() {
        let config = InspectConfig::builder()
            .fields(["title"])
            .regex(RegexSpec::new("title", "^zzz"))
            .show_score(true)
            .format(OutputFormat::Json)
            .build();
        let (out, result) = run(
            &index(),
            config,
            Operation::Ids(vec!["3".to_string(), "0".to_string()]),
        );

        assert_eq!(
            out,
            "{\"<score>\":\"1\",\"title\":\"four\"}\n{\"<score>\":\"1\",\"title\":\"one\"}\n"
        );
        assert_eq!(result.total_hits, None);
    }

    #[test]
    fn test_ids_are_checked_before_output() {
        let index = index();
        let inspector = Inspector::new(&index, InspectConfig::default()).unwrap();
        let mut out = Vec::new();

        let err = inspector
            .run(&Operation::Ids(vec!["0".to_string(), "x".to_string()]), &mut out)
            .unwrap_err();
        assert!(matches!(err, LexprobeError::InvalidDocumentId(_)));

        let err = inspector
            .run(&Operation::Ids(vec!["0".to_string(), "9".to_string()]), &mut out)
            .unwrap_err();
        assert!(matches!(err, LexprobeError::DocumentNotFound(9)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_query_validation() {
        let index = index();
        let inspector = Inspector::new(&index, InspectConfig::default()).unwrap();

        assert!(matches!(
            inspector.parse_query("C"),
            Err(LexprobeError::AmbiguousField(_))
        ));
        assert!(matches!(
            inspector.parse_query("colour:red OR size:xl"),
            Err(LexprobeError::InvalidField(names)) if names == ["colour", "size"]
        ));

        let config = InspectConfig::builder().default_field("status").build();
        let inspector = Inspector::new(&index, config).unwrap();
        assert!(inspector.parse_query("C").is_ok());
    }

    #[test]
    fn test_configuration_errors() {
        let index = index();

        let config = InspectConfig::builder().fields(["title", "colour"]).build();
        assert!(matches!(
            Inspector::new(&index, config),
            Err(LexprobeError::InvalidField(_))
        ));

        let config = InspectConfig::builder()
            .fields(["title"])
            .regex(RegexSpec::new("status", "C"))
            .build();
        assert!(matches!(
            Inspector::new(&index, config),
            Err(LexprobeError::FieldNotProjected(_))
        ));

        let config = InspectConfig::builder().default_field("colour").build();
        assert!(matches!(
            Inspector::new(&index, config),
            Err(LexprobeError::InvalidField(_))
        ));
    }

    #[test]
    fn test_field_statistics() {
        let index = index();

        let (out, _) = run(&index, InspectConfig::default(), Operation::EnumerateFields);
        assert_eq!(out, "title\nstatus\nnote\n");

        let (out, _) = run(&index, InspectConfig::default(), Operation::CountFields);
        assert_eq!(out, "title: 4\nstatus: 4\nnote: 0\n");

        let (out, _) = run(
            &index,
            InspectConfig::default(),
            Operation::EnumerateTerms("status".to_string()),
        );
        assert_eq!(out, "A (1)\nC (3)\n");
    }

    #[test]
    fn test_prepare_resolves_operations() {
        let index = index();
        let inspector = Inspector::new(&index, InspectConfig::default()).unwrap();

        match inspector.prepare(&query("status:C")).unwrap() {
            PreparedOperation::Search(query) => assert_eq!(query.fields(), vec!["status"]),
            other => panic!("unexpected {other:?}"),
        }
        match inspector
            .prepare(&Operation::Ids(vec![" 2".to_string(), "0".to_string()]))
            .unwrap()
        {
            PreparedOperation::Ids(ids) => assert_eq!(ids, vec![2, 0]),
            other => panic!("unexpected {other:?}"),
        }

        for bad in [
            query("C"),
            query("colour:red"),
            query("status:("),
            Operation::Ids(vec!["9".to_string()]),
            Operation::IdFile("/nonexistent/ids.txt".into()),
            Operation::EnumerateTerms("note".to_string()),
        ] {
            assert!(inspector.prepare(&bad).is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn test_enumerate_terms_errors() {
        let index = index();
        let inspector = Inspector::new(&index, InspectConfig::default()).unwrap();
        let mut out = Vec::new();

        assert!(matches!(
            inspector.run(&Operation::EnumerateTerms("note".to_string()), &mut out),
            Err(LexprobeError::MissingIndex(_))
        ));
        assert!(matches!(
            inspector.run(&Operation::EnumerateTerms("colour".to_string()), &mut out),
            Err(LexprobeError::InvalidField(_))
        ));
    }
}
