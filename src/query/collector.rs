//! Collector trait for receiving search hits.

use crate::error::Result;

/// Receives matching documents in visitation order.
///
/// The index calls [`collect`](Collector::collect) once per match; an error
/// aborts the search and is returned to the caller.
pub trait Collector {
    /// Collect a document hit.
    fn collect(&mut self, doc_id: u32, score: f32) -> Result<()>;
}

impl<F> Collector for F
where
    F: FnMut(u32, f32) -> Result<()>,
{
    fn collect(&mut self, doc_id: u32, score: f32) -> Result<()> {
        self(doc_id, score)
    }
}
