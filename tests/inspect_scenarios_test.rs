//! End-to-end scenarios for the inspection pipeline over an on-disk index.

use lexprobe::analysis::AnalyzerKind;
use lexprobe::config::{InspectConfig, RegexSpec};
use lexprobe::document::Document;
use lexprobe::error::{LexprobeError, Result};
use lexprobe::index::{FieldOption, IndexDirectory, SegmentWriter, SegmentedIndex};
use lexprobe::inspect::{Operation, OutputFormat};
use lexprobe::run_operation;
use serde_json::Value;
use tempfile::TempDir;

/// Five tickets in one segment; `note` is stored only, `body` uses the
/// standard analyzer.
fn create_index(temp_dir: &TempDir) -> Result<SegmentedIndex> {
    let mut writer = SegmentWriter::new()
        .with_field_option("note", FieldOption::Stored)
        .with_field_option("body", FieldOption::Indexed(AnalyzerKind::Standard));

    let tickets = [
        ("Hello", "C", "the quick brown fox"),
        ("Open ticket", "A", "lazy dog"),
        ("Closed early", "C", "quick fix"),
        ("Closed late", "C", "slow fix"),
        ("Reopened", "C", "the brown dog"),
        ("Rejected", "C", "quick brown"),
    ];
    for (title, status, body) in tickets {
        writer.add_document(
            Document::builder()
                .add_text("title", title)
                .add_text("status", status)
                .add_text("body", body)
                .add_text("note", "internal")
                .build(),
        );
    }
    // "Rejected" is deleted and must never show up.
    writer.delete_document(5)?;

    let directory = IndexDirectory::create(temp_dir.path())?;
    directory.write_segment(&writer.finish()?)?;
    SegmentedIndex::open(&[temp_dir.path()])
}

fn run(index: &SegmentedIndex, config: InspectConfig, tokens: &[&str]) -> Result<String> {
    let operation = Operation::parse(tokens)?;
    let mut out = Vec::new();
    run_operation(index, config, &operation, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_scenario_multivalued_projection() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let mut writer = SegmentWriter::new();
    writer.add_document(
        Document::builder()
            .add_text("title", "Hello")
            .add_text("body", "a")
            .add_text("body", "b")
            .build(),
    );
    IndexDirectory::create(temp_dir.path())?.write_segment(&writer.finish()?)?;
    let index = SegmentedIndex::open(&[temp_dir.path()])?;

    let config = InspectConfig::builder().fields(["title", "body"]).build();
    assert_eq!(run(&index, config, &["%all"])?, "title: Hello\nbody: a,b\n");
    Ok(())
}

#[test]
fn test_scenario_qualified_and_ambiguous_queries() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let index = create_index(&temp_dir)?;

    let config = InspectConfig::builder().fields(["title"]).build();
    let out = run(&index, config.clone(), &["status:A"])?;
    assert_eq!(out, "title: Open ticket\n");

    let err = run(&index, config, &["C"]).unwrap_err();
    assert!(matches!(err, LexprobeError::AmbiguousField(_)));
    Ok(())
}

#[test]
fn test_scenario_output_limit_keeps_total_hits() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let index = create_index(&temp_dir)?;

    let config = InspectConfig::builder()
        .fields(["title"])
        .output_limit(2)
        .build();
    let operation = Operation::parse(&["status:C"])?;
    let mut out = Vec::new();
    let result = run_operation(&index, config, &operation, &mut out)?;

    assert_eq!(result.total_hits, Some(4));
    assert_eq!(result.docs_printed, 2);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "title: Hello\n\ntitle: Closed early\n"
    );
    Ok(())
}

#[test]
fn test_scenario_regex_field_not_projected() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let index = create_index(&temp_dir)?;

    let config = InspectConfig::builder()
        .fields(["title"])
        .regex(RegexSpec::new("status", "C"))
        .build();
    let err = run(&index, config, &["%all"]).unwrap_err();

    assert!(matches!(&err, LexprobeError::FieldNotProjected(field) if field == "status"));
    assert!(err.is_configuration_error());
    Ok(())
}

#[test]
fn test_scenario_enumerate_terms_on_stored_field() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let index = create_index(&temp_dir)?;

    let err = run(
        &index,
        InspectConfig::default(),
        &["%enumerate-terms", "note"],
    )
    .unwrap_err();
    assert!(matches!(&err, LexprobeError::MissingIndex(field) if field == "note"));
    assert_eq!(err.to_string(), "Unindexed field: note");
    Ok(())
}

#[test]
fn test_enumerate_terms_uses_index_time_analysis() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let index = create_index(&temp_dir)?;

    // Deleted documents still count towards document frequency.
    let out = run(&index, InspectConfig::default(), &["%enumerate-terms", "body"])?;
    assert_eq!(
        out,
        "brown (3)\ndog (2)\nfix (2)\nfox (1)\nlazy (1)\nquick (3)\nslow (1)\n"
    );
    Ok(())
}

#[test]
fn test_output_limit_zero_prints_nothing() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let index = create_index(&temp_dir)?;

    let config = InspectConfig::builder()
        .output_limit(0)
        .show_hits(true)
        .build();
    assert_eq!(run(&index, config, &["%all"])?, "totalHits: 5\n\n");
    Ok(())
}

#[test]
fn test_same_operation_is_byte_identical() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let index = create_index(&temp_dir)?;

    let config = InspectConfig::builder()
        .show_id(true)
        .show_score(true)
        .analyzer(AnalyzerKind::Standard)
        .default_field("body")
        .format(OutputFormat::Tabular)
        .build();
    let first = run(&index, config.clone(), &["quick", "OR", "dog"])?;
    let second = run(&index, config, &["quick", "OR", "dog"])?;

    assert!(!first.is_empty());
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_json_output_parses_back() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let index = create_index(&temp_dir)?;

    let config = InspectConfig::builder()
        .fields(["status", "title"])
        .show_id(true)
        .format(OutputFormat::Json)
        .build();
    let out = run(&index, config, &["title:Reopened"])?;
    let parsed: Value = serde_json::from_str(out.trim_end()).unwrap();

    let object = parsed.as_object().unwrap();
    assert_eq!(
        object.keys().collect::<Vec<_>>(),
        vec!["<id>", "status", "title"]
    );
    assert_eq!(object["<id>"], "4");
    assert_eq!(object["title"], "Reopened");
    Ok(())
}

#[test]
fn test_phrase_and_negation() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let index = create_index(&temp_dir)?;

    let config = InspectConfig::builder()
        .fields(["title"])
        .analyzer(AnalyzerKind::Standard)
        .format(OutputFormat::Multiline)
        .suppress_names(true)
        .build();
    let out = run(
        &index,
        config,
        &["body:\"brown dog\"", "OR", "body:quick", "-body:fox"],
    )?;
    assert_eq!(out, "Closed early\n\nReopened\n");
    Ok(())
}

#[test]
fn test_sorted_fields_with_synthetic_columns() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let index = create_index(&temp_dir)?;

    let config = InspectConfig::builder()
        .fields(["title", "status"])
        .sort_fields(true)
        .show_id(true)
        .build();
    let out = run(&index, config, &["%ids", "1"])?;
    assert_eq!(out, "<id>: 1\nstatus: A\ntitle: Open ticket\n");
    Ok(())
}
