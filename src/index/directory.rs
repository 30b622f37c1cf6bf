//! Index directories: a folder of `*.seg` files.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use memmap2::MmapOptions;
use tracing::debug;
use uuid::Uuid;

use crate::error::{LexprobeError, Result};
use crate::index::segment::Segment;

const SEGMENT_EXTENSION: &str = "seg";

/// A directory holding the segment files of one index.
#[derive(Debug, Clone)]
pub struct IndexDirectory {
    path: PathBuf,
}

impl IndexDirectory {
    /// Open an existing index directory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(LexprobeError::index_open(format!(
                "{} is not a directory",
                path.display()
            )));
        }
        Ok(IndexDirectory {
            path: path.to_path_buf(),
        })
    }

    /// Create the directory (and parents) if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        fs::create_dir_all(path.as_ref())?;
        Self::open(path)
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Segment files sorted by file name.
    pub fn segment_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == SEGMENT_EXTENSION) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Write a segment as the next generation of this directory.
    pub fn write_segment(&self, segment: &Segment) -> Result<PathBuf> {
        let generation = self.segment_files()?.len();
        let name = format!(
            "seg_{generation:06}_{}.{SEGMENT_EXTENSION}",
            Uuid::new_v4().simple()
        );
        let path = self.path.join(name);
        fs::write(&path, segment.encode()?)?;
        debug!(path = %path.display(), docs = segment.max_doc(), "wrote segment");
        Ok(path)
    }

    /// Read every segment in file-name order.
    pub fn read_segments(&self) -> Result<Vec<Segment>> {
        let files = self.segment_files()?;
        if files.is_empty() {
            return Err(LexprobeError::index_open(format!(
                "no segments found in {}",
                self.path.display()
            )));
        }
        files.iter().map(|path| read_segment_file(path)).collect()
    }
}

fn read_segment_file(path: &Path) -> Result<Segment> {
    let open_error =
        |e: &dyn std::fmt::Display| LexprobeError::index_open(format!("{}: {e}", path.display()));

    let file = File::open(path).map_err(|e| open_error(&e))?;
    let len = file.metadata().map_err(|e| open_error(&e))?.len();
    if len == 0 {
        return Err(open_error(&"empty segment file"));
    }

    // SAFETY: segments are immutable once written; the map is dropped before
    // this function returns.
    let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(|e| open_error(&e))?;
    let segment = Segment::decode(&mmap).map_err(|e| match e {
        LexprobeError::IndexOpen(msg) => open_error(&msg),
        other => open_error(&other),
    })?;

    debug!(path = %path.display(), docs = segment.max_doc(), "loaded segment");
    Ok(segment)
}
