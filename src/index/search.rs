//! Query evaluation against a single segment.
//!
//! Scores are a plain tf-idf sum: every matching term clause contributes
//! `sqrt(freq) * idf`, with `idf = 1 + ln(num_docs / (doc_freq + 1))`
//! computed from index-wide statistics. `MatchAll` scores 1.0.

use std::collections::{BTreeMap, BTreeSet};

use ahash::AHashMap;

use crate::index::segment::Segment;
use crate::query::{Occur, Query};

/// Index-wide statistics used for scoring.
#[derive(Debug, Clone, Default)]
pub struct CollectionStats {
    num_docs: u64,
    doc_freqs: AHashMap<(String, String), u64>,
}

impl CollectionStats {
    /// Gather statistics for every term of `query` across `segments`.
    pub fn for_query<'a, I>(query: &Query, segments: I) -> Self
    where
        I: IntoIterator<Item = &'a Segment> + Clone,
    {
        let num_docs = segments
            .clone()
            .into_iter()
            .map(|segment| segment.max_doc() as u64)
            .sum();

        let mut doc_freqs = AHashMap::new();
        for (field, term) in query.terms() {
            let key = (field.to_string(), term.to_string());
            if doc_freqs.contains_key(&key) {
                continue;
            }
            let df = segments
                .clone()
                .into_iter()
                .map(|segment| segment.doc_freq(field, term))
                .sum();
            doc_freqs.insert(key, df);
        }

        CollectionStats {
            num_docs,
            doc_freqs,
        }
    }

    /// Inverse document frequency of a term.
    pub fn idf(&self, field: &str, term: &str) -> f32 {
        let df = self
            .doc_freqs
            .get(&(field.to_string(), term.to_string()))
            .copied()
            .unwrap_or(0);
        let num_docs = self.num_docs.max(1) as f32;
        1.0 + (num_docs / (df as f32 + 1.0)).ln()
    }
}

/// Matching live documents of `segment` with their scores, ascending by
/// segment-local id.
pub fn evaluate(segment: &Segment, query: &Query, stats: &CollectionStats) -> BTreeMap<u32, f32> {
    match query {
        Query::MatchAll => segment.live_docs().map(|doc| (doc, 1.0)).collect(),
        Query::Term { field, term } => score_term(segment, field, term, stats),
        Query::Phrase { field, terms } => {
            let mut iter = terms.iter();
            let Some(first) = iter.next() else {
                return BTreeMap::new();
            };
            let mut matched = score_term(segment, field, first, stats);
            for term in iter {
                let next = score_term(segment, field, term, stats);
                matched.retain(|doc, _| next.contains_key(doc));
                for (doc, score) in matched.iter_mut() {
                    *score += next[doc];
                }
            }
            matched
        }
        Query::Boolean(clauses) => {
            let mut required: Option<BTreeMap<u32, f32>> = None;
            let mut optional: BTreeMap<u32, f32> = BTreeMap::new();
            let mut excluded: BTreeSet<u32> = BTreeSet::new();

            for clause in clauses {
                let matched = evaluate(segment, &clause.query, stats);
                match clause.occur {
                    Occur::Must => {
                        required = Some(match required {
                            None => matched,
                            Some(mut acc) => {
                                acc.retain(|doc, _| matched.contains_key(doc));
                                for (doc, score) in acc.iter_mut() {
                                    *score += matched[doc];
                                }
                                acc
                            }
                        });
                    }
                    Occur::Should => {
                        for (doc, score) in matched {
                            *optional.entry(doc).or_insert(0.0) += score;
                        }
                    }
                    Occur::MustNot => excluded.extend(matched.into_keys()),
                }
            }

            let mut result = match required {
                Some(mut acc) => {
                    for (doc, score) in acc.iter_mut() {
                        if let Some(extra) = optional.get(doc) {
                            *score += extra;
                        }
                    }
                    acc
                }
                None => optional,
            };
            result.retain(|doc, _| !excluded.contains(doc));
            result
        }
    }
}

fn score_term(segment: &Segment, field: &str, term: &str, stats: &CollectionStats) -> BTreeMap<u32, f32> {
    let Some(postings) = segment.postings(field, term) else {
        return BTreeMap::new();
    };
    let idf = stats.idf(field, term);
    postings
        .iter()
        .filter(|posting| segment.is_live(posting.doc))
        .map(|posting| (posting.doc, (posting.freq as f32).sqrt() * idf))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::index::writer::SegmentWriter;
    use crate::query::BooleanClause;

    fn segment() -> Segment {
        let mut writer = SegmentWriter::new();
        for status in ["C", "A", "C", "X"] {
            writer.add_document(
                Document::builder()
                    .add_text("status", status)
                    .add_text("kind", if status == "C" { "ct" } else { "mr" })
                    .build(),
            );
        }
        writer.delete_document(3).unwrap();
        writer.finish().unwrap()
    }

    fn docs(matches: &BTreeMap<u32, f32>) -> Vec<u32> {
        matches.keys().copied().collect()
    }

    #[test]
    fn test_term_and_match_all() {
        let segment = segment();
        let query = Query::term("status", "C");
        let stats = CollectionStats::for_query(&query, [&segment]);

        assert_eq!(docs(&evaluate(&segment, &query, &stats)), vec![0, 2]);
        assert_eq!(
            docs(&evaluate(&segment, &Query::MatchAll, &stats)),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_deleted_documents_never_match() {
        let segment = segment();
        let query = Query::term("status", "X");
        let stats = CollectionStats::for_query(&query, [&segment]);

        assert!(evaluate(&segment, &query, &stats).is_empty());
    }

    #[test]
    fn test_boolean_semantics() {
        let segment = segment();
        let query = Query::Boolean(vec![
            BooleanClause {
                occur: Occur::Should,
                query: Query::term("status", "C"),
            },
            BooleanClause {
                occur: Occur::Should,
                query: Query::term("status", "A"),
            },
            BooleanClause {
                occur: Occur::MustNot,
                query: Query::term("kind", "mr"),
            },
        ]);
        let stats = CollectionStats::for_query(&query, [&segment]);

        assert_eq!(docs(&evaluate(&segment, &query, &stats)), vec![0, 2]);
    }

    #[test]
    fn test_pure_negative_query_matches_nothing() {
        let segment = segment();
        let query = Query::Boolean(vec![BooleanClause {
            occur: Occur::MustNot,
            query: Query::term("status", "C"),
        }]);
        let stats = CollectionStats::for_query(&query, [&segment]);

        assert!(evaluate(&segment, &query, &stats).is_empty());
    }

    #[test]
    fn test_rarer_terms_score_higher() {
        let segment = segment();
        let common = Query::term("status", "C");
        let rare = Query::term("status", "A");
        let query = Query::Boolean(vec![
            BooleanClause {
                occur: Occur::Should,
                query: common,
            },
            BooleanClause {
                occur: Occur::Should,
                query: rare,
            },
        ]);
        let stats = CollectionStats::for_query(&query, [&segment]);
        let scores = evaluate(&segment, &query, &stats);

        assert!(scores[&1] > scores[&0]);
    }
}
