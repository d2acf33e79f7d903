use winnow::error::{ContextError, StrContext, StrContextValue};

/// Failure to parse a template
///
/// Positions are byte offsets into the parsed text plus the 1-based line and column (in
/// characters) derived from them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("syntax error at line {line}, column {column}: expected {expected}")]
    Syntax {
        offset: usize,
        line: usize,
        column: usize,
        expected: String,
    },
    #[error("unterminated {construct} at line {line}, column {column}")]
    Unterminated {
        offset: usize,
        line: usize,
        column: usize,
        construct: String,
    },
}

impl ParseError {
    pub(crate) fn new(source: &str, offset: usize, error: &ContextError) -> Self {
        let (line, column) = position(source, offset);

        let label = error.context().find_map(|context| match context {
            StrContext::Label(label) => Some(*label),
            _ => None,
        });
        let expects_brace = error.context().any(|context| {
            matches!(
                context,
                StrContext::Expected(StrContextValue::CharLiteral('}'))
            )
        });
        let expected: Vec<String> = error
            .context()
            .filter_map(|context| match context {
                StrContext::Expected(value) => Some(value.to_string()),
                _ => None,
            })
            .collect();

        match label {
            Some(construct) => ParseError::Unterminated {
                offset,
                line,
                column,
                construct: construct.to_string(),
            },
            None if offset == source.len() && expects_brace => {
                ParseError::Unterminated {
                    offset,
                    line,
                    column,
                    construct: "block".to_string(),
                }
            }
            None if expected.is_empty() => ParseError::Syntax {
                offset,
                line,
                column,
                expected: "valid syntax".to_string(),
            },
            None => ParseError::Syntax {
                offset,
                line,
                column,
                expected: expected.join(" or "),
            },
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            ParseError::Syntax { offset, .. } | ParseError::Unterminated { offset, .. } => *offset,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ParseError::Syntax { line, .. } | ParseError::Unterminated { line, .. } => *line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            ParseError::Syntax { column, .. } | ParseError::Unterminated { column, .. } => *column,
        }
    }
}

/// 1-based line and column of `offset`
fn position(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset.min(source.len())];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map(|line| line.chars().count())
        .unwrap_or_default()
        + 1;

    (line, column)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn positions() {
        assert_eq!(position("abc", 0), (1, 1));
        assert_eq!(position("abc", 2), (1, 3));
        assert_eq!(position("a\nbc", 3), (2, 2));
        assert_eq!(position("ä\nö", 5), (2, 2));
        assert_eq!(position("a\n", 2), (2, 1));
    }
}
