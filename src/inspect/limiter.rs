//! Output limit and per-run counters.

use serde::Serialize;

/// Caps the number of printed documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLimiter {
    limit: usize,
}

impl OutputLimiter {
    /// `None` means unlimited.
    pub fn new(limit: Option<usize>) -> Self {
        OutputLimiter {
            limit: limit.unwrap_or(usize::MAX),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Whether no further document may be printed.
    pub fn is_reached(&self, state: &RunState) -> bool {
        state.docs_printed >= self.limit
    }
}

impl Default for OutputLimiter {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Counters owned by one running operation.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    total_hits: Option<u64>,
    docs_printed: usize,
}

impl RunState {
    /// State for the query path, which counts every candidate.
    pub fn counting_hits() -> Self {
        RunState {
            total_hits: Some(0),
            docs_printed: 0,
        }
    }

    /// State for operations that do not track hits.
    pub fn uncounted() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        if let Some(hits) = self.total_hits.as_mut() {
            *hits += 1;
        }
    }

    pub fn record_printed(&mut self) {
        self.docs_printed += 1;
    }

    pub fn docs_printed(&self) -> usize {
        self.docs_printed
    }

    pub fn total_hits(&self) -> Option<u64> {
        self.total_hits
    }

    pub fn finish(self) -> OperationResult {
        OperationResult {
            total_hits: self.total_hits,
            docs_printed: self.docs_printed,
        }
    }
}

/// What a finished operation reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    /// Documents examined; only the query path tracks it.
    pub total_hits: Option<u64>,
    /// Documents written to the sink.
    pub docs_printed: usize,
}
