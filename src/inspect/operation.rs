//! Operation kinds and their token syntax.
//!
//! | Tokens                    | Operation                 |
//! |---------------------------|---------------------------|
//! | `%all`                    | every document            |
//! | `%ids 1 2 3`              | documents by id           |
//! | `%id-file ids.txt`        | ids read from a file      |
//! | `%enumerate-fields`       | field names               |
//! | `%count-fields`           | documents per field       |
//! | `%enumerate-terms field`  | terms of one field        |
//! | anything else             | free-text query           |

use std::fmt;
use std::path::PathBuf;

use crate::error::{LexprobeError, Result};

/// One logical operation of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Free-text query; `None` matches every document.
    Search(Option<String>),
    /// Documents by explicit id tokens.
    Ids(Vec<String>),
    /// Documents by ids listed one per line in a file.
    IdFile(PathBuf),
    EnumerateFields,
    CountFields,
    /// Terms of one field with their document frequency.
    EnumerateTerms(String),
}

impl Operation {
    /// Parse operation tokens. Query tokens are joined by a single space.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        let Some((first, rest)) = tokens.split_first() else {
            return Err(LexprobeError::invalid_argument("no query given"));
        };
        let rest: Vec<&str> = rest.iter().map(AsRef::as_ref).collect();

        match first.as_ref() {
            "%all" => {
                expect_args("%all", &rest, 0)?;
                Ok(Operation::Search(None))
            }
            "%ids" => {
                if rest.is_empty() {
                    return Err(LexprobeError::invalid_argument(
                        "%ids requires at least one document id",
                    ));
                }
                Ok(Operation::Ids(rest.iter().map(|s| s.to_string()).collect()))
            }
            "%id-file" => {
                expect_args("%id-file", &rest, 1)?;
                Ok(Operation::IdFile(PathBuf::from(rest[0])))
            }
            "%enumerate-fields" => {
                expect_args("%enumerate-fields", &rest, 0)?;
                Ok(Operation::EnumerateFields)
            }
            "%count-fields" => {
                expect_args("%count-fields", &rest, 0)?;
                Ok(Operation::CountFields)
            }
            "%enumerate-terms" => {
                if rest.len() != 1 {
                    return Err(LexprobeError::invalid_argument(
                        "%enumerate-terms requires exactly one field",
                    ));
                }
                Ok(Operation::EnumerateTerms(rest[0].to_string()))
            }
            _ => {
                let text = tokens
                    .iter()
                    .map(AsRef::as_ref)
                    .collect::<Vec<&str>>()
                    .join(" ");
                Ok(Operation::Search(Some(text)))
            }
        }
    }

    /// Whether this operation prints documents.
    pub fn prints_documents(&self) -> bool {
        matches!(
            self,
            Operation::Search(_) | Operation::Ids(_) | Operation::IdFile(_)
        )
    }
}

fn expect_args(name: &str, args: &[&str], count: usize) -> Result<()> {
    if args.len() == count {
        Ok(())
    } else {
        Err(LexprobeError::invalid_argument(format!(
            "{name} takes {count} argument(s), got {}",
            args.len()
        )))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Search(None) => write!(f, "%all"),
            Operation::Search(Some(query)) => write!(f, "query {query}"),
            Operation::Ids(ids) => write!(f, "%ids {}", ids.join(" ")),
            Operation::IdFile(path) => write!(f, "%id-file {}", path.display()),
            Operation::EnumerateFields => write!(f, "%enumerate-fields"),
            Operation::CountFields => write!(f, "%count-fields"),
            Operation::EnumerateTerms(field) => write!(f, "%enumerate-terms {field}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_tokens() {
        assert_eq!(Operation::parse(&["%all"]).unwrap(), Operation::Search(None));
        assert_eq!(
            Operation::parse(&["%ids", "3", "1"]).unwrap(),
            Operation::Ids(vec!["3".to_string(), "1".to_string()])
        );
        assert_eq!(
            Operation::parse(&["%id-file", "ids.txt"]).unwrap(),
            Operation::IdFile(PathBuf::from("ids.txt"))
        );
        assert_eq!(
            Operation::parse(&["%enumerate-terms", "status"]).unwrap(),
            Operation::EnumerateTerms("status".to_string())
        );
        assert_eq!(
            Operation::parse(&["%count-fields"]).unwrap(),
            Operation::CountFields
        );
    }

    #[test]
    fn test_query_tokens_are_joined() {
        assert_eq!(
            Operation::parse(&["status:C", "AND", "kind:ct"]).unwrap(),
            Operation::Search(Some("status:C AND kind:ct".to_string()))
        );
    }

    #[test]
    fn test_arity_errors() {
        for tokens in [
            &["%enumerate-terms"][..],
            &["%enumerate-terms", "a", "b"][..],
            &["%ids"][..],
            &["%id-file"][..],
            &["%all", "extra"][..],
        ] {
            assert!(matches!(
                Operation::parse(tokens),
                Err(LexprobeError::InvalidArgument(_))
            ));
        }
        assert!(Operation::parse::<&str>(&[]).is_err());
    }
}
