//! Collection literals, calls, for expressions and type declarations
use super::expr::{element_value, for_keyword};
use super::lexical::{
    balanced, block_comment, identifier, inline_ws, is_ident_char, line_comment, token,
    unterminated, ws,
};
use super::string::quoted_string;
use super::structure::{equals, properties, property_name};
use crate::node::{ForLoop, Function, Node, PrimitiveType, Property};
use winnow::combinator::{alt, delimited, not, opt, peek, preceded, repeat, terminated};
use winnow::error::{ContextError, ErrMode, ModalResult};
use winnow::prelude::*;
use winnow::token::{literal, one_of, take_while};

/// `close` after optional whitespace; reaching the end of input first commits to an
/// unterminated `construct`
fn closing(input: &mut &str, close: char, construct: &'static str) -> ModalResult<()> {
    ws(input)?;
    if input.is_empty() {
        return unterminated(input, construct);
    }
    close.void().parse_next(input)
}

/// [balanced] inside an open `construct`, where the only way to fail is running out of input
fn balanced_within<'s>(
    input: &mut &'s str,
    stop: impl Fn(&str) -> bool,
    construct: &'static str,
) -> ModalResult<&'s str> {
    match balanced(input, stop) {
        Err(ErrMode::Backtrack(_)) => {
            let rest: &'s str = *input;
            *input = &rest[rest.len()..];
            unterminated(input, construct)
        }
        result => result,
    }
}

/// Comments and values separated by optional commas, up to and including `close`
fn elements(input: &mut &str, close: char, construct: &'static str) -> ModalResult<Vec<Node>> {
    let elements = repeat(
        0..,
        terminated(
            preceded(ws, alt((comment_node, element_value))),
            opt((ws, ',')),
        ),
    )
    .parse_next(input)?;
    closing(input, close, construct)?;

    Ok(elements)
}

pub(crate) fn comment_node(input: &mut &str) -> ModalResult<Node> {
    alt((
        line_comment.map(Node::Comment),
        block_comment.map(|text: &str| Node::MultilineComment(text.to_string())),
    ))
    .parse_next(input)
}

fn name_segment<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        one_of(|c: char| c.is_alphabetic()),
        take_while(0.., |c: char| c.is_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

fn function_name<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (name_segment, repeat(0.., ("::", name_segment)).map(|()| ()))
        .take()
        .parse_next(input)
}

/// Succeeds without consuming when a function call starts here
pub(crate) fn call_start(input: &mut &str) -> ModalResult<()> {
    peek((function_name, inline_ws, '(')).void().parse_next(input)
}

/// `name(arg, ...)`, provider functions (`provider::ns::name(...)`) included
pub(crate) fn function_call(input: &mut &str) -> ModalResult<Function> {
    let name = terminated(function_name, (inline_ws, '(')).parse_next(input)?;
    let args = elements(input, ')', "function call")?;

    Ok(Function {
        name: Some(name.to_string()),
        args,
    })
}

/// `( ... )` grouping, kept as a call without a name
pub(crate) fn parenthesized(input: &mut &str) -> ModalResult<Function> {
    '('.parse_next(input)?;
    let args = elements(input, ')', "parenthesized expression")?;

    Ok(Function { name: None, args })
}

/// `[ ... ]`, but not a `[for ...]` expression
pub(crate) fn list_value(input: &mut &str) -> ModalResult<Vec<Node>> {
    ('[', not(for_keyword)).parse_next(input)?;
    elements(input, ']', "list")
}

/// `{ ... }` holding `key = value` or `key: value` entries, but not a `{for ...}` expression
pub(crate) fn map_value(input: &mut &str) -> ModalResult<Vec<Node>> {
    ('{', not(for_keyword)).parse_next(input)?;
    let entries = properties(input)?;
    closing(input, '}', "map")?;

    Ok(entries)
}

fn starts_condition(rest: &str) -> bool {
    let trimmed = rest.trim_start();
    trimmed.len() < rest.len()
        && trimmed
            .strip_prefix("if")
            .is_some_and(|after| after.starts_with(|c: char| c.is_whitespace() || c == '('))
}

fn condition<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    balanced(input, |_| false)
}

fn for_expression(input: &mut &str, open: char, close: char) -> ModalResult<ForLoop> {
    (open, for_keyword, ws).parse_next(input)?;

    let variable = (
        identifier,
        opt(preceded((ws, ',', ws), identifier)),
    )
        .map(|(key, value)| match value {
            Some(value) => format!("{key}, {value}"),
            None => key.to_string(),
        })
        .parse_next(input)?;

    (token(literal("in")), one_of(char::is_whitespace), ws).parse_next(input)?;
    let collection = balanced_within(input, |rest| rest.starts_with(':'), "for expression")?;
    (':', ws).parse_next(input)?;

    let statements = balanced_within(input, starts_condition, "for expression")?;
    let if_statement = opt(preceded((ws, literal("if")), condition)).parse_next(input)?;
    closing(input, close, "for expression")?;

    Ok(ForLoop::new(
        open,
        close,
        variable,
        collection.trim().to_string(),
        statements.trim().to_string(),
        if_statement
            .map(|condition| format!("if {}", condition.trim()))
            .unwrap_or_default(),
    ))
}

/// `{for k, v in collection : key => value if condition}`
pub(crate) fn for_object(input: &mut &str) -> ModalResult<ForLoop> {
    for_expression(input, '{', '}')
}

/// `[for v in collection : value if condition]`
pub(crate) fn for_list(input: &mut &str) -> ModalResult<ForLoop> {
    for_expression(input, '[', ']')
}

fn primitive_name<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    terminated(
        alt((
            literal("string"),
            literal("number"),
            literal("bool"),
            literal("any"),
        )),
        not(one_of(is_ident_char)),
    )
    .parse_next(input)
}

fn primitive_type(input: &mut &str) -> ModalResult<PrimitiveType> {
    alt((
        primitive_name.map(|name: &str| PrimitiveType {
            name: name.to_string(),
            quoted: false,
        }),
        delimited('"', primitive_name, '"').map(|name: &str| PrimitiveType {
            name: name.to_string(),
            quoted: true,
        }),
    ))
    .parse_next(input)
}

/// `keyword(T)`
fn wrapped_type<'s>(keyword: &'static str) -> impl Parser<&'s str, Node, ContextError> {
    delimited((literal(keyword), ws, '(', ws), type_expr, (ws, ')'))
}

fn type_member(input: &mut &str) -> ModalResult<Node> {
    (property_name, equals, type_expr)
        .map(|(name, _, value)| Node::TypeProperty(Property::new(name, value)))
        .parse_next(input)
}

fn object_type(input: &mut &str) -> ModalResult<Vec<Node>> {
    delimited(
        (literal("object"), ws, '(', ws, '{'),
        repeat(
            0..,
            terminated(
                preceded(ws, alt((comment_node, type_member))),
                opt((inline_ws, ',')),
            ),
        ),
        (ws, '}', ws, ')'),
    )
    .parse_next(input)
}

fn tuple_type(input: &mut &str) -> ModalResult<Vec<Node>> {
    delimited(
        (literal("tuple"), ws, '(', ws, '['),
        repeat(0.., terminated(preceded(ws, type_expr), opt((ws, ',')))),
        (ws, ']', ws, ')'),
    )
    .parse_next(input)
}

/// Type constraint such as `string`, `list(number)` or `object({ name = string })`
pub(crate) fn type_expr(input: &mut &str) -> ModalResult<Node> {
    alt((
        wrapped_type("map").map(|inner| Node::MapType(Box::new(inner))),
        object_type.map(Node::ObjectType),
        wrapped_type("list").map(|inner| Node::ListType(Box::new(inner))),
        wrapped_type("set").map(|inner| Node::SetType(Box::new(inner))),
        tuple_type.map(Node::TupleType),
        primitive_type.map(Node::PrimitiveType),
    ))
    .parse_next(input)
}

/// Block label, quoted or bare
pub(crate) fn label(input: &mut &str) -> ModalResult<String> {
    alt((
        quoted_string,
        identifier.map(|text: &str| text.to_string()),
    ))
    .parse_next(input)
}
