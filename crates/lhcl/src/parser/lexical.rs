//! Character classes and the small token parsers everything else is built from
use crate::escape::quoted_length;
use crate::node::{Comment, CommentStyle};
use winnow::ascii::{digit0, digit1, hex_digit1, Caseless};
use winnow::combinator::{alt, cut_err, fail, not, opt, peek, preceded, terminated};
use winnow::error::{ContextError, ErrMode, ModalResult, StrContext};
use winnow::prelude::*;
use winnow::token::{literal, one_of, take_till, take_until, take_while};

/// Characters that can never be part of unquoted text
const EXCLUDED: &[char] = &[
    '"', '/', '%', '-', '+', '=', '|', '>', '<', '!', '&', '~', '^', ';', '\\', '\'', ',', ')',
    '(', '}', '{', ']', '[', '?', ':', '\n',
];

/// Characters allowed in unquoted text, this includes `.` and `*` so traversals and splats
/// (`a.b`, `foo.*.bar`) stay one piece.
pub(crate) fn is_special(c: char) -> bool {
    !EXCLUDED.contains(&c)
}

pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

pub(crate) fn backtrack<O>() -> ModalResult<O> {
    Err(ErrMode::Backtrack(ContextError::new()))
}

/// Commit to a failure caused by running out of input inside `construct`
pub(crate) fn unterminated<O>(input: &mut &str, construct: &'static str) -> ModalResult<O> {
    cut_err(fail::<_, O, _>)
        .context(StrContext::Label(construct))
        .parse_next(input)
}

/// Any whitespace including line breaks
pub(crate) fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., char::is_whitespace)
        .void()
        .parse_next(input)
}

/// Whitespace up to the end of the current line
pub(crate) fn inline_ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_whitespace() && c != '\n')
        .void()
        .parse_next(input)
}

/// `p` with leading whitespace skipped
pub(crate) fn token<'s, O, P>(p: P) -> impl Parser<&'s str, O, ContextError>
where
    P: Parser<&'s str, O, ContextError>,
{
    preceded(ws, p)
}

/// `p` with leading whitespace on the same line skipped
pub(crate) fn inline_token<'s, O, P>(p: P) -> impl Parser<&'s str, O, ContextError>
where
    P: Parser<&'s str, O, ContextError>,
{
    preceded(inline_ws, p)
}

/// A keyword that has to be followed by whitespace
pub(crate) fn keyword<'s>(word: &'static str) -> impl Parser<&'s str, &'s str, ContextError> {
    terminated(literal(word), peek(one_of(char::is_whitespace)))
}

/// `name`, `name-with.dots` or the computed form `(name)`
pub(crate) fn identifier<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    alt((
        take_while(1.., is_ident_char),
        ('(', take_while(1.., is_ident_char), ')').take(),
    ))
    .parse_next(input)
}

fn exponent(input: &mut &str) -> ModalResult<()> {
    (one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)
        .void()
        .parse_next(input)
}

/// `42`, `-1`, `0x1F`, `1e10`, `3.14`, `2.5e-3`
pub(crate) fn number<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        opt('-'),
        alt((
            (literal("0x"), hex_digit1).void(),
            (digit1, opt(exponent), opt(('.', digit0, opt(exponent)))).void(),
        )),
        not(one_of(|c: char| c.is_alphanumeric() || c == '_' || c == '.')),
    )
        .take()
        .parse_next(input)
}

/// `true` or `false` in any case
pub(crate) fn boolean<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    terminated(
        alt((literal(Caseless("true")), literal(Caseless("false")))),
        not(one_of(is_ident_char)),
    )
    .parse_next(input)
}

/// `# ...` or `// ...` up to the end of the line
pub(crate) fn line_comment(input: &mut &str) -> ModalResult<Comment> {
    (
        alt((
            literal("#").value(CommentStyle::Hash),
            literal("//").value(CommentStyle::DoubleSlash),
        )),
        take_till(0.., '\n'),
    )
        .map(|(style, text): (CommentStyle, &str)| Comment {
            style,
            text: text.to_string(),
        })
        .parse_next(input)
}

/// `/* ... */`, returns the text between the markers
pub(crate) fn block_comment<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    preceded(
        "/*",
        cut_err(terminated(take_until(0.., "*/"), "*/")).context(StrContext::Label("comment")),
    )
    .parse_next(input)
}

/// Text up to the first top level position where `stop` matches or up to an unmatched closing
/// bracket, whichever comes first. Brackets are tracked and quoted strings skipped.
///
/// Fails when the end of input is reached before either.
pub(crate) fn balanced<'s>(input: &mut &'s str, stop: impl Fn(&str) -> bool) -> ModalResult<&'s str> {
    let text = *input;
    let mut depth = 0usize;
    let mut index = 0;

    while index < text.len() {
        let rest = &text[index..];
        if depth == 0 && stop(rest) {
            break;
        }

        let Some(c) = rest.chars().next() else {
            break;
        };
        match c {
            '"' => {
                let Some(length) = quoted_length(rest) else {
                    return backtrack();
                };
                index += length;
                continue;
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' if depth == 0 => break,
            ')' | ']' | '}' => depth -= 1,
            _ => {}
        }
        index += c.len_utf8();
    }

    if index == text.len() {
        return backtrack();
    }

    *input = &text[index..];
    Ok(&text[..index])
}

/// `[` non-blank balanced content `]`
pub(crate) fn list_index<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    let start = *input;
    '['.parse_next(input)?;
    let content = balanced(input, |_| false)?;
    if content.trim().is_empty() {
        *input = start;
        return backtrack();
    }
    ']'.parse_next(input)?;

    Ok(&start[..start.len() - input.len()])
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn complete<'s, O>(parser: impl Parser<&'s str, O, ContextError>, text: &'s str) -> Option<O> {
        terminated(parser, winnow::combinator::eof).parse(text).ok()
    }

    #[test]
    fn special_characters() {
        for c in ['a', 'Z', '0', '_', '.', '*', '$', '@', ' ', 'ä'] {
            assert!(is_special(c), "{c:?}");
        }
        for c in ['"', '=', '{', '[', '(', ',', ':', '?', '\n', '-', '/'] {
            assert!(!is_special(c), "{c:?}");
        }
    }

    #[test]
    fn identifiers() {
        assert_eq!(complete(identifier, "aws_instance"), Some("aws_instance"));
        assert_eq!(complete(identifier, "my-name.v2"), Some("my-name.v2"));
        assert_eq!(complete(identifier, "(var.key)"), Some("(var.key)"));
        assert_eq!(complete(identifier, "a b"), None);
        assert_eq!(complete(identifier, ""), None);
    }

    #[test]
    fn numbers() {
        for text in ["0", "42", "-7", "0x1F", "1e10", "3.14", "2.5e-3", "1E+2", "5."] {
            assert_eq!(complete(number, text), Some(text));
        }
        for text in ["1abc", "1.2.3", "-", "0x", "1_000", "e5"] {
            assert_eq!(complete(number, text), None, "{text}");
        }
    }

    #[test]
    fn booleans() {
        assert_eq!(complete(boolean, "true"), Some("true"));
        assert_eq!(complete(boolean, "FALSE"), Some("FALSE"));
        assert_eq!(complete(boolean, "True"), Some("True"));

        let mut input = "true_value";
        assert!(boolean(&mut input).is_err());
    }

    #[test]
    fn comments() {
        let mut input = "# hello\nnext";
        let comment = line_comment(&mut input).unwrap();
        assert_eq!(comment.style, CommentStyle::Hash);
        assert_eq!(comment.text, " hello");
        assert_eq!(input, "\nnext");

        let mut input = "//x";
        assert_eq!(line_comment(&mut input).unwrap().style, CommentStyle::DoubleSlash);

        let mut input = "/* a\n b */rest";
        assert_eq!(block_comment(&mut input).unwrap(), " a\n b ");
        assert_eq!(input, "rest");

        let mut input = "/* open";
        assert!(matches!(block_comment(&mut input), Err(ErrMode::Cut(_))));
    }

    #[test]
    fn list_indices() {
        for text in ["[0]", "[*]", "[99]", "[a.b]", "[f(x)[1]]", "[\"]\"]"] {
            assert_eq!(complete(list_index, text), Some(text));
        }
        for text in ["[", "]", "[]", "[ ]"] {
            assert_eq!(complete(list_index, text), None, "{text}");
        }
    }

    #[test]
    fn balanced_stops_at_top_level() {
        let mut input = "a[\":\"] : rest}";
        let scanned = balanced(&mut input, |rest| rest.starts_with(':')).unwrap();
        assert_eq!(scanned, "a[\":\"] ");
        assert_eq!(input, ": rest}");

        let mut input = "f(x, y)) tail";
        assert_eq!(balanced(&mut input, |_| false).unwrap(), "f(x, y)");

        let mut input = "no end";
        assert!(balanced(&mut input, |_| false).is_err());
    }

    #[test]
    fn keywords_need_whitespace() {
        assert!(keyword("for").parse_peek("for x").is_ok());
        assert!(keyword("for").parse_peek("format").is_err());
    }
}
