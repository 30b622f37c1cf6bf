//! Query parser for converting query strings to [`Query`] trees.
//!
//! Supported syntax:
//! - Field-qualified terms: `status:C`
//! - Bare terms, searched in the default field: `hello`
//! - Phrases: `"hello world"`, `body:"hello world"`
//! - Prefix operators: `+required -forbidden optional`, `NOT forbidden`
//! - Infix operators: `a AND b`, `a OR b`
//! - Grouping: `(title:a OR title:b)`, `title:(a b)`
//! - Match all: `*:*`
//! - Backslash escapes: `path:C\:\\temp`
//!
//! Adjacent clauses without an operator are optional (`Should`), so
//! `title:a title:b` matches documents with either term.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;
use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::error::{LexprobeError, Result};
use crate::query::query::{BooleanClause, Occur, Query};

/// Parses query strings using an analyzer for term normalization.
#[derive(Debug, Clone)]
pub struct QueryParser {
    /// Field searched when a term has no `field:` prefix.
    default_field: Option<String>,
    analyzer: Arc<dyn Analyzer>,
}

impl QueryParser {
    /// Create a new query parser with no default field.
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        QueryParser {
            default_field: None,
            analyzer,
        }
    }

    /// Set the default field to search in when no field is specified.
    pub fn with_default_field<S: Into<String>>(mut self, field: S) -> Self {
        self.default_field = Some(field.into());
        self
    }

    /// Get the default field.
    pub fn default_field(&self) -> Option<&str> {
        self.default_field.as_deref()
    }

    /// Parse a query string.
    ///
    /// A bare term without a default field fails with
    /// [`LexprobeError::AmbiguousField`]; every other syntax problem is a
    /// [`LexprobeError::QueryParse`].
    pub fn parse(&self, query_str: &str) -> Result<Query> {
        let trimmed = query_str.trim();
        if trimmed.is_empty() {
            return Err(LexprobeError::parse("empty query"));
        }

        let mut parser =
            QueryStringParser::new(trimmed, self.default_field.as_deref(), self.analyzer.as_ref());
        parser.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conjunction {
    And,
    Or,
}

impl Conjunction {
    fn as_str(self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Internal recursive-descent parser over one query string.
struct QueryStringParser<'a> {
    chars: Peekable<Chars<'a>>,
    default_field: Option<&'a str>,
    analyzer: &'a dyn Analyzer,
}

impl<'a> QueryStringParser<'a> {
    fn new(query_str: &'a str, default_field: Option<&'a str>, analyzer: &'a dyn Analyzer) -> Self {
        QueryStringParser {
            chars: query_str.chars().peekable(),
            default_field,
            analyzer,
        }
    }

    fn parse(&mut self) -> Result<Query> {
        let query = self.parse_sequence(self.default_field, false)?;
        self.skip_whitespace();
        if self.chars.peek().is_some() {
            return Err(LexprobeError::parse("unbalanced parentheses: unexpected ')'"));
        }
        Ok(query)
    }

    /// Parse clauses until end of input, or until `)` when `nested`.
    fn parse_sequence(&mut self, field: Option<&str>, nested: bool) -> Result<Query> {
        let mut clauses: Vec<BooleanClause> = Vec::new();
        let mut pending: Option<Conjunction> = None;

        loop {
            self.skip_whitespace();
            match self.chars.peek().copied() {
                None if nested => {
                    return Err(LexprobeError::parse("unbalanced parentheses: missing ')'"));
                }
                None => break,
                Some(')') if nested => break,
                Some(')') => {
                    return Err(LexprobeError::parse("unbalanced parentheses: unexpected ')'"));
                }
                _ => {}
            }

            if let Some(conjunction) = self.peek_conjunction() {
                if clauses.is_empty() || pending.is_some() {
                    return Err(LexprobeError::parse(format!(
                        "operator {conjunction} has no left operand"
                    )));
                }
                self.consume_word(conjunction.as_str());
                pending = Some(conjunction);
                continue;
            }

            let prefix = self.parse_prefix();
            let parsed = self.parse_primary(field)?;

            let occur = match (prefix, pending) {
                (Some(occur), _) => occur,
                (None, Some(Conjunction::And)) => Occur::Must,
                (None, _) => Occur::Should,
            };
            if pending == Some(Conjunction::And) {
                if let Some(last) = clauses.last_mut() {
                    if last.occur == Occur::Should {
                        last.occur = Occur::Must;
                    }
                }
            }
            pending = None;

            if let Some(query) = parsed {
                clauses.push(BooleanClause { occur, query });
            }
        }

        if let Some(conjunction) = pending {
            return Err(LexprobeError::parse(format!(
                "operator {conjunction} has no right operand"
            )));
        }

        if clauses.len() == 1 && clauses[0].occur == Occur::Should {
            if let Some(clause) = clauses.pop() {
                return Ok(clause.query);
            }
        }
        Ok(Query::Boolean(clauses))
    }

    fn parse_prefix(&mut self) -> Option<Occur> {
        match self.chars.peek().copied() {
            Some('+') => {
                self.chars.next();
                Some(Occur::Must)
            }
            Some('-') => {
                self.chars.next();
                Some(Occur::MustNot)
            }
            _ if self.peek_keyword("NOT") => {
                self.consume_word("NOT");
                Some(Occur::MustNot)
            }
            _ => None,
        }
    }

    /// Parse one group, phrase or term. `None` means the analyzer removed
    /// every token of the clause.
    fn parse_primary(&mut self, field: Option<&str>) -> Result<Option<Query>> {
        match self.chars.peek().copied() {
            None | Some(')') => Err(LexprobeError::parse("expected a term")),
            Some(c) if c.is_whitespace() => Err(LexprobeError::parse("expected a term")),
            Some('(') => {
                self.chars.next();
                let inner = self.parse_group(field)?;
                Ok(Some(inner))
            }
            Some('"') => self.parse_phrase(field),
            _ => {
                let word = self.read_word()?;
                if self.chars.peek() != Some(&':') {
                    let field = field.ok_or_else(|| LexprobeError::AmbiguousField(word.clone()))?;
                    return self.term_query(field, &word);
                }

                self.chars.next();
                if word == "*" && self.chars.peek() == Some(&'*') {
                    self.chars.next();
                    return Ok(Some(Query::MatchAll));
                }
                if word.is_empty() {
                    return Err(LexprobeError::parse("missing field name before ':'"));
                }

                match self.chars.peek().copied() {
                    Some('(') => {
                        self.chars.next();
                        let inner = self.parse_group(Some(&word))?;
                        Ok(Some(inner))
                    }
                    Some('"') => self.parse_phrase(Some(&word)),
                    Some(c) if !c.is_whitespace() && c != ')' => {
                        let term = self.read_word()?;
                        if term.is_empty() {
                            return Err(LexprobeError::parse(format!(
                                "missing term after '{word}:'"
                            )));
                        }
                        self.term_query(&word, &term)
                    }
                    _ => Err(LexprobeError::parse(format!(
                        "missing term after '{word}:'"
                    ))),
                }
            }
        }
    }

    /// Parse the rest of a parenthesized group; the `(` is already consumed.
    fn parse_group(&mut self, field: Option<&str>) -> Result<Query> {
        let inner = self.parse_sequence(field, true)?;
        match self.chars.next() {
            Some(')') => Ok(inner),
            _ => Err(LexprobeError::parse("unbalanced parentheses: missing ')'")),
        }
    }

    fn parse_phrase(&mut self, field: Option<&str>) -> Result<Option<Query>> {
        // Consume opening quote
        self.chars.next();

        let mut phrase = String::new();
        let mut closed = false;
        while let Some(ch) = self.chars.next() {
            match ch {
                '"' => {
                    closed = true;
                    break;
                }
                '\\' => match self.chars.next() {
                    Some(escaped) => phrase.push(escaped),
                    None => break,
                },
                other => phrase.push(other),
            }
        }
        if !closed {
            return Err(LexprobeError::parse("unterminated phrase"));
        }

        let field = field.ok_or_else(|| LexprobeError::AmbiguousField(phrase.clone()))?;
        let mut terms = self.analyzer.analyze(&phrase)?;
        Ok(match terms.len() {
            0 => None,
            1 => terms.pop().map(|term| Query::term(field, term)),
            _ => Some(Query::Phrase {
                field: field.to_string(),
                terms,
            }),
        })
    }

    fn term_query(&self, field: &str, text: &str) -> Result<Option<Query>> {
        let mut terms = self.analyzer.analyze(text)?;
        Ok(match terms.len() {
            0 => None,
            1 => terms.pop().map(|term| Query::term(field, term)),
            _ => Some(Query::Boolean(
                terms
                    .into_iter()
                    .map(|term| BooleanClause {
                        occur: Occur::Should,
                        query: Query::term(field, term),
                    })
                    .collect(),
            )),
        })
    }

    /// Read a bare word up to whitespace, a grouping character, a quote or
    /// an unescaped `:`.
    fn read_word(&mut self) -> Result<String> {
        let mut word = String::new();

        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || matches!(ch, '(' | ')' | '"' | ':') {
                break;
            }
            self.chars.next();
            if ch == '\\' {
                match self.chars.next() {
                    Some(escaped) => word.push(escaped),
                    None => return Err(LexprobeError::parse("dangling escape character")),
                }
            } else {
                word.push(ch);
            }
        }

        Ok(word)
    }

    fn consume_word(&mut self, expected: &str) {
        for _ in 0..expected.len() {
            self.chars.next();
        }
        self.skip_whitespace();
    }

    fn peek_conjunction(&self) -> Option<Conjunction> {
        if self.peek_keyword("AND") {
            Some(Conjunction::And)
        } else if self.peek_keyword("OR") {
            Some(Conjunction::Or)
        } else {
            None
        }
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        let mut lookahead = self.chars.clone();
        for expected in keyword.chars() {
            if lookahead.next() != Some(expected) {
                return false;
            }
        }
        matches!(lookahead.next(), None | Some('(') | Some(' ' | '\t' | '\n' | '\r'))
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }
    }
}
