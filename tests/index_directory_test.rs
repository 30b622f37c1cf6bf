//! Integration tests for multi-directory indexes, id files and field
//! statistics across segments.

use std::fs;

use lexprobe::config::InspectConfig;
use lexprobe::document::Document;
use lexprobe::error::{LexprobeError, Result};
use lexprobe::index::{IndexDirectory, IndexReader, SegmentWriter, SegmentedIndex};
use lexprobe::inspect::{Inspector, Operation};
use tempfile::TempDir;

fn write_segment(directory: &IndexDirectory, docs: &[(&str, Option<&str>)]) -> Result<()> {
    let mut writer = SegmentWriter::new();
    for (title, status) in docs {
        let mut builder = Document::builder().add_text("title", *title);
        if let Some(status) = status {
            builder = builder.add_text("status", *status);
        }
        writer.add_document(builder.build());
    }
    directory.write_segment(&writer.finish()?)?;
    Ok(())
}

/// Two directories, three segments, six documents.
fn create_indexes(temp_dir: &TempDir) -> Result<SegmentedIndex> {
    let first = IndexDirectory::create(temp_dir.path().join("first"))?;
    write_segment(&first, &[("a", Some("C")), ("b", Some("A"))])?;
    write_segment(&first, &[("c", Some("C"))])?;

    let second = IndexDirectory::create(temp_dir.path().join("second"))?;
    write_segment(&second, &[("d", None), ("e", Some("C")), ("f", None)])?;

    SegmentedIndex::open(&[first.path(), second.path()])
}

fn run(index: &SegmentedIndex, config: InspectConfig, operation: Operation) -> Result<String> {
    let mut out = Vec::new();
    Inspector::new(index, config)?.run(&operation, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_directories_form_one_id_space() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let index = create_indexes(&temp_dir)?;

    assert_eq!(index.segment_count(), 3);
    assert_eq!(index.max_doc(), 6);

    let config = InspectConfig::builder()
        .fields(["title"])
        .show_id(true)
        .suppress_names(true)
        .build();
    let out = run(
        &index,
        config,
        Operation::Search(Some("status:C".to_string())),
    )?;
    assert_eq!(out, "0\na\n\n2\nc\n\n4\ne\n");
    Ok(())
}

#[test]
fn test_field_statistics_merge_segments() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let index = create_indexes(&temp_dir)?;

    let out = run(&index, InspectConfig::default(), Operation::CountFields)?;
    assert_eq!(out, "title: 6\nstatus: 4\n");

    let out = run(
        &index,
        InspectConfig::default(),
        Operation::EnumerateTerms("status".to_string()),
    )?;
    assert_eq!(out, "A (1)\nC (3)\n");
    Ok(())
}

#[test]
fn test_missing_projected_field_prints_null() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let index = create_indexes(&temp_dir)?;

    let config = InspectConfig::builder().fields(["status"]).build();
    let out = run(&index, config, Operation::Ids(vec!["3".to_string()]))?;
    assert_eq!(out, "status: null\n");
    Ok(())
}

#[test]
fn test_id_file() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let index = create_indexes(&temp_dir)?;
    let id_file = temp_dir.path().join("ids.txt");
    fs::write(&id_file, "5\n\n  1 \n0\n")?;

    let config = InspectConfig::builder()
        .fields(["title"])
        .output_limit(2)
        .build();
    let out = run(&index, config, Operation::IdFile(id_file))?;
    assert_eq!(out, "title: f\n\ntitle: b\n");
    Ok(())
}

#[test]
fn test_id_file_with_out_of_range_id() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let index = create_indexes(&temp_dir)?;
    let id_file = temp_dir.path().join("ids.txt");
    fs::write(&id_file, "0\n6\n")?;

    let err = run(&index, InspectConfig::default(), Operation::IdFile(id_file)).unwrap_err();
    assert!(matches!(err, LexprobeError::DocumentNotFound(6)));
    Ok(())
}

#[test]
fn test_open_errors() {
    let temp_dir = TempDir::new().unwrap();

    let missing = temp_dir.path().join("missing");
    assert!(matches!(
        SegmentedIndex::open(&[missing]),
        Err(LexprobeError::IndexOpen(_))
    ));

    // An empty directory has no segments.
    assert!(matches!(
        SegmentedIndex::open(&[temp_dir.path()]),
        Err(LexprobeError::IndexOpen(_))
    ));
}
