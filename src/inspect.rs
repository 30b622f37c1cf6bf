//! The inspection pipeline.
//!
//! One [`Operation`] runs per invocation. For the query kinds the
//! [`Inspector`] asks the index for candidates and pushes each one through
//! the [`RegexFilter`], the [`DocumentProjector`] and the
//! [`ResultFormatter`], gated by the [`OutputLimiter`]:
//!
//! ```text
//! IndexReader::search ─▶ RegexFilter ─▶ DocumentProjector ─▶ ResultFormatter ─▶ sink
//!                                 (skipped once OutputLimiter is reached)
//! ```

pub mod catalog;
pub mod filter;
pub mod formatter;
pub mod inspector;
pub mod limiter;
pub mod operation;
pub mod projector;

pub use catalog::FieldCatalog;
pub use filter::RegexFilter;
pub use formatter::{OutputFormat, ResultFormatter};
pub use inspector::{Inspector, PreparedOperation};
pub use limiter::{OperationResult, OutputLimiter, RunState};
pub use operation::Operation;
pub use projector::{DocumentProjector, ProjectedDocument, ProjectionSpec};
