//! Parsed query tree.

use serde::{Deserialize, Serialize};

/// How a clause participates in a boolean query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occur {
    /// The clause must match.
    Must,
    /// The clause may match and contributes to the score.
    Should,
    /// The clause must not match.
    MustNot,
}

/// A clause of a boolean query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanClause {
    /// Participation rule.
    pub occur: Occur,
    /// The nested query.
    pub query: Query,
}

/// A query that can be run against the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Query {
    /// Matches every live document with a constant score.
    MatchAll,
    /// Matches documents containing `term` in `field`.
    Term { field: String, term: String },
    /// Matches documents containing every term in `field`.
    ///
    /// Term positions are not stored, so adjacency is not checked.
    Phrase { field: String, terms: Vec<String> },
    /// Combination of clauses.
    Boolean(Vec<BooleanClause>),
}

impl Query {
    /// Create a term query.
    pub fn term<F: Into<String>, T: Into<String>>(field: F, term: T) -> Self {
        Query::Term {
            field: field.into(),
            term: term.into(),
        }
    }

    /// Every field referenced by the query, in first-seen order.
    pub fn fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields(&self, fields: &mut Vec<String>) {
        match self {
            Query::MatchAll => {}
            Query::Term { field, .. } | Query::Phrase { field, .. } => {
                if !fields.contains(field) {
                    fields.push(field.clone());
                }
            }
            Query::Boolean(clauses) => {
                for clause in clauses {
                    clause.query.collect_fields(fields);
                }
            }
        }
    }

    /// Every `(field, term)` pair referenced by the query.
    pub fn terms(&self) -> Vec<(&str, &str)> {
        let mut terms = Vec::new();
        self.collect_terms(&mut terms);
        terms
    }

    fn collect_terms<'a>(&'a self, terms: &mut Vec<(&'a str, &'a str)>) {
        match self {
            Query::MatchAll => {}
            Query::Term { field, term } => terms.push((field, term)),
            Query::Phrase { field, terms: words } => {
                terms.extend(words.iter().map(|w| (field.as_str(), w.as_str())));
            }
            Query::Boolean(clauses) => {
                for clause in clauses {
                    clause.query.collect_terms(terms);
                }
            }
        }
    }

    /// Human-readable description, close to the input syntax.
    pub fn description(&self) -> String {
        match self {
            Query::MatchAll => "*:*".to_string(),
            Query::Term { field, term } => format!("{field}:{term}"),
            Query::Phrase { field, terms } => format!("{field}:\"{}\"", terms.join(" ")),
            Query::Boolean(clauses) => {
                let parts: Vec<String> = clauses
                    .iter()
                    .map(|clause| {
                        let prefix = match clause.occur {
                            Occur::Must => "+",
                            Occur::Should => "",
                            Occur::MustNot => "-",
                        };
                        format!("{prefix}{}", clause.query.description())
                    })
                    .collect();
                format!("({})", parts.join(" "))
            }
        }
    }
}
