//! Query representation, parsing and result collection.

pub mod collector;
pub mod parser;
#[allow(clippy::module_inception)]
pub mod query;

pub use collector::Collector;
pub use parser::QueryParser;
pub use query::{BooleanClause, Occur, Query};
