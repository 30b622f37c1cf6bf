//! Command implementation for the lexprobe CLI.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use tracing::info;

use crate::cli::args::LexprobeArgs;
use crate::error::Result;
use crate::index::{IndexReader, SegmentedIndex};
use crate::inspect::{Inspector, Operation, OperationResult};

/// Execute the operation described by `args`.
///
/// The operation is fully prepared (config, index, field names, query, ids,
/// term dictionary) before the output file is created, so a failing run
/// leaves an existing output file untouched.
pub fn execute_command(args: &LexprobeArgs) -> Result<OperationResult> {
    let operation = Operation::parse(&args.query_tokens())?;
    let config = args.to_config()?;

    let index = SegmentedIndex::open(&args.index)?;
    info!(
        directories = args.index.len(),
        segments = index.segment_count(),
        max_doc = index.max_doc(),
        "index opened"
    );

    let inspector = Inspector::new(&index, config)?;
    let prepared = inspector.prepare(&operation)?;

    let result = match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            let result = inspector.execute(&prepared, &mut writer)?;
            writer.flush()?;
            result
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            inspector.execute(&prepared, &mut writer)?
        }
    };

    info!(
        total_hits = ?result.total_hits,
        docs_printed = result.docs_printed,
        "done"
    );
    Ok(result)
}
