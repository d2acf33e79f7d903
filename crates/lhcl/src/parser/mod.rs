//! Template grammar
//!
//! The grammar is layered bottom-up:
//! - [lexical]: character classes, identifiers, numbers, comments, bracket matching
//! - [string]: quoted strings and heredocs
//! - [expr]: unquoted expressions as flat term sequences
//! - [value]: lists, maps, calls, for expressions, type declarations
//! - [structure]: blocks, properties and comments
//!
//! All productions are plain functions over `&mut &str` and hold no state.
mod expr;
mod lexical;
mod string;
mod structure;
mod value;

use crate::error::ParseError;
use crate::node::{Document, Node};
use winnow::combinator::{eof, terminated};
use winnow::error::{ContextError, ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;

fn document(input: &mut &str) -> ModalResult<Vec<Node>> {
    terminated(
        structure::properties,
        (
            lexical::ws,
            eof.context(StrContext::Expected(StrContextValue::Description(
                "a property, block or comment",
            ))),
        ),
    )
    .parse_next(input)
}

fn single_value(input: &mut &str) -> ModalResult<Node> {
    terminated(
        (lexical::ws, expr::element_value).map(|(_, value)| value),
        (
            lexical::ws,
            eof.context(StrContext::Expected(StrContextValue::Description(
                "end of value",
            ))),
        ),
    )
    .parse_next(input)
}

fn run<'s, O>(
    text: &'s str,
    mut parser: impl Parser<&'s str, O, ContextError>,
) -> Result<O, ParseError> {
    let mut input = text;

    parser.parse_next(&mut input).map_err(|error| {
        let error = match error {
            ErrMode::Backtrack(error) | ErrMode::Cut(error) => error,
            ErrMode::Incomplete(_) => ContextError::new(),
        };
        ParseError::new(text, text.len() - input.len(), &error)
    })
}

/// Parse a complete template.
///
/// The text is expected to use `\n` line endings, see [crate::normalize_line_endings].
#[tracing::instrument(level = "trace", skip_all)]
pub fn parse(text: &str) -> Result<Document, ParseError> {
    tracing::debug!(length = text.len(), "parsing document");

    run(text, document).map(Document::new).inspect_err(|error| {
        tracing::debug!(line = error.line(), column = error.column(), %error, "parsing failed");
    })
}

/// Parse a single value such as a list element or the right hand side of a property
pub fn parse_value(text: &str) -> Result<Node, ParseError> {
    run(text, single_value)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Kind;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document() {
        let document = parse("").unwrap();
        assert!(document.children().is_empty());
        assert_eq!(document.to_string(), "");

        assert!(parse("\n  \n").unwrap().children().is_empty());
    }

    #[test]
    fn trailing_garbage_is_a_syntax_error() {
        let error = parse("a = 1\n= 2").unwrap_err();
        assert_eq!(error.offset(), 6);
        assert_eq!((error.line(), error.column()), (2, 1));
        assert!(matches!(
            &error,
            ParseError::Syntax { expected, .. } if expected == "a property, block or comment"
        ));
    }

    #[test]
    fn unterminated_constructs() {
        for (text, expected) in [
            ("a = \"open", "quoted string"),
            ("a = <<EOF\nbody\n", "heredoc"),
            ("/* never closed", "comment"),
            ("locals {\n  a = 1\n", "block"),
            ("x = [1, 2", "list"),
            ("x = {a = 1", "map"),
            ("x = f(1", "function call"),
            ("x = (1 + 2", "parenthesized expression"),
            ("x = [for a in b", "for expression"),
            ("x = {for k, v in m : k => v", "for expression"),
        ] {
            match parse(text) {
                Err(ParseError::Unterminated { construct, .. }) => {
                    assert_eq!(construct, expected, "{text:?}")
                }
                other => panic!("{text:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn unclosed_brackets_are_reported_at_the_end() {
        let text = "locals {\n  ids = [\n    a,\n    b,\n";
        let error = parse(text).unwrap_err();
        assert_eq!(error.offset(), text.len());
        assert_eq!((error.line(), error.column()), (5, 1));

        let error = parse_value("merge(a, {b = 1}").unwrap_err();
        assert!(matches!(
            &error,
            ParseError::Unterminated { construct, offset, .. } if construct == "function call" && *offset == 16
        ));
    }

    #[test]
    fn error_inside_block_points_into_the_body() {
        let error = parse("locals {\n  a = 1\n  ] \n}").unwrap_err();
        assert_eq!((error.line(), error.column()), (3, 3));
    }

    #[test]
    fn single_values() {
        assert_eq!(parse_value("[1, 2]").unwrap().kind(), Kind::List);
        assert_eq!(
            parse_value(" a ? b : c ").unwrap().kind(),
            Kind::UnquotedExpression
        );
        assert!(parse_value("a b").is_err());
    }
}
