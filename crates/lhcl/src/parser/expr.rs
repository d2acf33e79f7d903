//! Unquoted expressions
//!
//! Expressions are not evaluated, they are read as a flat sequence of terms separated by
//! operator symbols. `a == "" ? b.c : d[0]` becomes
//! `[a, ==, "", ?, b.c, :, d[0]]`.
use super::lexical::{boolean, inline_ws, is_special, list_index, number, ws};
use super::string::{heredoc, quoted_string};
use super::value::{for_list, for_object, function_call, list_value, map_value, parenthesized};
use crate::node::Node;
use winnow::combinator::{alt, not, opt, peek, repeat};
use winnow::error::{ErrMode, ModalResult};
use winnow::prelude::*;
use winnow::token::{literal, one_of, take_while};

/// Binary and ternary operator symbols, longest first
fn operator<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    alt((
        alt((
            literal(">="),
            literal("<="),
            literal("!="),
            literal("=="),
            literal("&&"),
            literal("||"),
        )),
        // `//` and `/*` start comments
        (literal("/"), not(one_of(['/', '*']))).take(),
        alt((
            literal("*"),
            literal("%"),
            literal("+"),
            literal("-"),
            literal("<"),
            literal(">"),
            literal("?"),
            literal(":"),
        )),
    ))
    .parse_next(input)
}

fn is_text_char(c: char) -> bool {
    is_special(c) && !c.is_whitespace() && c != '#'
}

/// Unquoted text like `var.name`, `null`, `aws_instance.web[*].id` or `each.value["k"]`
pub(crate) fn unquoted_text<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        one_of(|c: char| is_text_char(c) && c != '.' && c != '*'),
        repeat(0.., alt((list_index, take_while(1.., is_text_char))))
            .map(|()| ()),
    )
        .take()
        .parse_next(input)
}

/// `[0]`, `.id`, `...` and chains of these following a call or literal
fn accessor<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    repeat(
        1..,
        alt((list_index, ('.', take_while(0.., is_text_char)).take())),
    )
    .map(|()| ())
    .take()
    .parse_next(input)
}

fn literal_value(input: &mut &str) -> ModalResult<Node> {
    alt((
        quoted_string.map(Node::String),
        alt((number, boolean)).map(|text: &str| Node::NumberOrBool(text.to_string())),
    ))
    .parse_next(input)
}

/// A single term of an expression
fn operand(input: &mut &str) -> ModalResult<Node> {
    alt((
        function_call.map(Node::Function),
        parenthesized.map(Node::Function),
        for_object.map(Node::ForLoop),
        for_list.map(Node::ForLoop),
        list_value.map(Node::List),
        map_value.map(Node::Map),
        heredoc.map(Node::HereDoc),
        literal_value,
        unquoted_text.map(|text: &str| Node::UnquotedString(text.to_string())),
    ))
    .parse_next(input)
}

/// A term followed by its accessors
fn operand_with_accessors(input: &mut &str) -> ModalResult<Vec<Node>> {
    let term = operand(input)?;
    let mut terms = vec![];

    let accessor = match term {
        Node::UnquotedString(_) | Node::HereDoc(_) => None,
        _ => opt(accessor).parse_next(input)?,
    };
    terms.push(term);
    if let Some(accessor) = accessor {
        terms.push(Node::UnquotedString(accessor.to_string()));
    }

    Ok(terms)
}

/// A term with any number of `!` / `-` prefixes
fn unary_operand(input: &mut &str) -> ModalResult<Vec<Node>> {
    let start = *input;
    match operand_with_accessors(input) {
        Err(ErrMode::Backtrack(_)) => *input = start,
        result => return result,
    }

    let symbol = one_of(['!', '-']).parse_next(input)?;
    ws(input)?;

    let mut terms = vec![Node::MathSymbol(symbol.to_string())];
    terms.extend(unary_operand(input)?);
    Ok(terms)
}

/// Terms joined by operators.
///
/// With `multiline` unset an operator has to be on the same line as the term before it, inside
/// brackets line breaks do not matter.
pub(crate) fn expression_terms(input: &mut &str, multiline: bool) -> ModalResult<Vec<Node>> {
    let mut terms = unary_operand(input)?;

    loop {
        let checkpoint = *input;
        if multiline {
            ws(input)?;
        } else {
            inline_ws(input)?;
        }

        let Ok(symbol) = operator(input) else {
            *input = checkpoint;
            break;
        };
        ws(input)?;

        match unary_operand(input) {
            Ok(operand) => {
                terms.push(Node::MathSymbol(symbol.to_string()));
                terms.extend(operand);
            }
            Err(ErrMode::Backtrack(_)) => {
                *input = checkpoint;
                break;
            }
            Err(error) => return Err(error),
        }
    }

    Ok(terms)
}

/// A complete value inside brackets: a single term stands for itself, anything longer
/// becomes an [Node::UnquotedExpression]
pub(crate) fn element_value(input: &mut &str) -> ModalResult<Node> {
    let mut terms = expression_terms(input, true)?;
    if terms.len() == 1 {
        if let Some(term) = terms.pop() {
            return Ok(term);
        }
    }
    Ok(Node::UnquotedExpression(terms))
}

/// `for` followed by whitespace, after optional leading whitespace
pub(crate) fn for_keyword(input: &mut &str) -> ModalResult<()> {
    (ws, literal("for"), peek(one_of(char::is_whitespace)))
        .void()
        .parse_next(input)
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn terms(text: &str) -> Vec<String> {
        let mut input = text;
        let terms = expression_terms(&mut input, false).unwrap();
        assert_eq!(input, "", "unparsed input");
        terms.iter().map(|term| term.to_string()).collect()
    }

    #[test]
    fn unquoted_traversals() {
        assert_eq!(terms("var.name"), ["var.name"]);
        assert_eq!(terms("aws_instance.web[*].id"), ["aws_instance.web[*].id"]);
        assert_eq!(terms("each.value[\"k\"]"), ["each.value[\"k\"]"]);
        assert_eq!(terms("module.vpc.*.id"), ["module.vpc.*.id"]);
    }

    #[test]
    fn ternary() {
        assert_eq!(
            terms(r#"var.region == "" ? data.aws_region.this.name : var.region"#),
            [
                "var.region",
                "==",
                "\"\"",
                "?",
                "data.aws_region.this.name",
                ":",
                "var.region"
            ]
        );
    }

    #[test]
    fn unary_and_math() {
        assert_eq!(terms("!var.enabled"), ["!", "var.enabled"]);
        assert_eq!(terms("var.a*2"), ["var.a*2"]);
        assert_eq!(terms("var.a * -2"), ["var.a", "*", "-2"]);
        assert_eq!(terms("- var.offset"), ["-", "var.offset"]);
    }

    #[test]
    fn accessors_attach_to_calls() {
        assert_eq!(terms("f(x)[0]"), ["f(x)", "[0]"]);
        assert_eq!(terms("g(y).id"), ["g(y)", ".id"]);
        assert_eq!(terms("concat(a, b...)"), ["concat(a, b...)"]);
        assert_eq!(terms("[a, b][1]"), ["[\n  a,\n  b\n]", "[1]"]);
    }

    #[test]
    fn operators_stay_on_the_line() {
        let mut input = "a\n+ b";
        assert_eq!(expression_terms(&mut input, false).unwrap().len(), 1);
        assert_eq!(input, "\n+ b");

        let mut input = "a\n+ b";
        assert_eq!(expression_terms(&mut input, true).unwrap().len(), 3);
    }

    #[test]
    fn comments_are_not_division() {
        let mut input = "a // note";
        assert_eq!(expression_terms(&mut input, false).unwrap().len(), 1);
        assert_eq!(input, " // note");

        assert_eq!(terms("a / b"), ["a", "/", "b"]);
    }

    #[test]
    fn dangling_operator_is_left_alone() {
        let mut input = "a ? ";
        assert_eq!(expression_terms(&mut input, false).unwrap().len(), 1);
        assert_eq!(input, " ? ");
    }

    #[test]
    fn single_element_collapses() {
        let mut input = "\"x\"";
        assert_eq!(element_value(&mut input).unwrap(), Node::String("x".into()));

        let mut input = "a + 1";
        assert!(matches!(
            element_value(&mut input).unwrap(),
            Node::UnquotedExpression(terms) if terms.len() == 3
        ));
    }
}
