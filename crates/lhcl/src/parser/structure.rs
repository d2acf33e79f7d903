//! Declarations
//!
//! A body is a sequence of declarations. Each declaration is tried against an ordered list of
//! alternatives and the first one that matches wins, so more specific forms come first.
use super::expr::{expression_terms, for_keyword};
use super::lexical::{boolean, identifier, inline_token, inline_ws, keyword, number, token, ws};
use super::string::{heredoc, quoted_string};
use super::value::{call_start, comment_node, for_list, label, list_value, map_value, type_expr};
use crate::node::{Block, Name, Node, Property};
use winnow::combinator::{alt, cut_err, eof, not, opt, peek, preceded, repeat, terminated};
use winnow::error::{ContextError, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{literal, one_of};

/// `=` or `:` with the surrounding whitespace
pub(crate) fn equals(input: &mut &str) -> ModalResult<()> {
    (
        inline_token(alt((terminated('=', not('=')).void(), ':'.void()))),
        ws,
    )
        .void()
        .parse_next(input)
}

/// Bare or quoted name of a property or block
pub(crate) fn property_name(input: &mut &str) -> ModalResult<Name> {
    alt((
        identifier.map(Name::plain),
        quoted_string.map(Name::quoted),
    ))
    .parse_next(input)
}

/// Succeeds without consuming when nothing but a separator, a comment or a closing bracket
/// follows on the current line
fn end_of_value(input: &mut &str) -> ModalResult<()> {
    peek((
        inline_ws,
        alt((
            eof.void(),
            one_of(['\n', ',', ';', '}', ']', ')', '#']).void(),
            literal("//").void(),
            literal("/*").void(),
        )),
    ))
    .void()
    .parse_next(input)
}

/// `{ declarations }`, committed once the opening brace is found
fn block_body(input: &mut &str) -> ModalResult<Vec<Node>> {
    token('{').parse_next(input)?;
    cut_err(terminated(properties, token('}')))
        .context(StrContext::Expected(StrContextValue::CharLiteral('}')))
        .parse_next(input)
}

/// Block name with its optional `dynamic` marker
fn block_name(input: &mut &str) -> ModalResult<(bool, Name)> {
    alt((
        preceded((keyword("dynamic"), ws), property_name).map(|name| (true, name)),
        property_name.map(|name| (false, name)),
    ))
    .parse_next(input)
}

/// `[dynamic] name {`
fn named_block(input: &mut &str) -> ModalResult<Node> {
    let (dynamic, name) = block_name(input)?;
    let children = block_body(input)?;

    Ok(Node::Block(Block {
        name,
        dynamic,
        value: None,
        type_label: None,
        children,
    }))
}

/// `[dynamic] name [=] label {`
fn value_block(input: &mut &str) -> ModalResult<Node> {
    let (dynamic, name) = block_name(input)?;
    let value = preceded((opt(equals), ws), label).parse_next(input)?;
    let children = block_body(input)?;

    Ok(Node::Block(Block {
        name,
        dynamic,
        value: Some(value),
        type_label: None,
        children,
    }))
}

/// `[dynamic] name label label {`
fn value_type_block(input: &mut &str) -> ModalResult<Node> {
    let (dynamic, name) = block_name(input)?;
    let value = preceded(ws, label).parse_next(input)?;
    let type_label = preceded(ws, label).parse_next(input)?;
    let children = block_body(input)?;

    Ok(Node::Block(Block {
        name,
        dynamic,
        value: Some(value),
        type_label: Some(type_label),
        children,
    }))
}

/// `function "name" { ... }`
fn function_declaration(input: &mut &str) -> ModalResult<Node> {
    let value = preceded((keyword("function"), ws), label).parse_next(input)?;
    let children = block_body(input)?;

    Ok(Node::Block(Block {
        name: Name::plain("function"),
        dynamic: false,
        value: Some(value),
        type_label: None,
        children,
    }))
}

/// `name =` followed by `value`, which has to end the line
fn assigned<'s, O>(
    value: impl Parser<&'s str, O, ContextError>,
) -> impl Parser<&'s str, (Name, O), ContextError> {
    (property_name, equals, value, end_of_value).map(|(name, _, value, _)| (name, value))
}

fn typed_property(input: &mut &str) -> ModalResult<Node> {
    assigned(type_expr)
        .map(|(name, value)| Node::TypeProperty(Property::new(name, value)))
        .parse_next(input)
}

/// `name = call(...)`, including any operators following the call
fn function_property(input: &mut &str) -> ModalResult<Node> {
    let name = terminated(property_name, (equals, call_start)).parse_next(input)?;
    let terms = expression_terms(input, false)?;

    Ok(property_from_terms(name, terms))
}

/// `name = {for ...}`, including any operators following the loop
fn for_object_property(input: &mut &str) -> ModalResult<Node> {
    let name = terminated(property_name, (equals, peek(('{', for_keyword))))
        .parse_next(input)?;
    let terms = expression_terms(input, false)?;

    Ok(property_from_terms(name, terms))
}

fn for_list_property(input: &mut &str) -> ModalResult<Node> {
    assigned(for_list)
        .map(|(name, value)| {
            Node::UnquotedExpressionProperty(Property::new(name, Node::ForLoop(value)))
        })
        .parse_next(input)
}

/// `name = "text"`, `name = 42` or `name = true`
fn scalar_property(input: &mut &str) -> ModalResult<Node> {
    let scalar = alt((
        quoted_string.map(Node::String),
        alt((number, boolean)).map(|text: &str| Node::NumberOrBool(text.to_string())),
    ));

    assigned(scalar)
        .map(|(name, value)| Node::StringProperty(Property::new(name, value)))
        .parse_next(input)
}

/// Property kind for an expression made of `terms`
fn property_from_terms(name: Name, mut terms: Vec<Node>) -> Node {
    if terms.len() == 1 {
        if let Some(term) = terms.pop() {
            return match term {
                Node::List(_) => Node::ListProperty(Property::new(name, term)),
                Node::Map(_) => Node::MapProperty(Property::new(name, term)),
                Node::HereDoc(_) => Node::HereDocProperty(Property::new(name, term)),
                Node::String(_) | Node::NumberOrBool(_) => {
                    Node::StringProperty(Property::new(name, term))
                }
                Node::Function(_) | Node::ForLoop(_) => {
                    Node::UnquotedExpressionProperty(Property::new(name, term))
                }
                term => Node::UnquotedExpressionProperty(Property::new(
                    name,
                    Node::UnquotedExpression(vec![term]),
                )),
            };
        }
    }

    Node::UnquotedExpressionProperty(Property::new(name, Node::UnquotedExpression(terms)))
}

/// `name = <expression>`
fn unquoted_property(input: &mut &str) -> ModalResult<Node> {
    let (name, _) = (property_name, equals).parse_next(input)?;
    let terms = expression_terms(input, false)?;

    Ok(property_from_terms(name, terms))
}

fn list_property(input: &mut &str) -> ModalResult<Node> {
    assigned(list_value)
        .map(|(name, value)| Node::ListProperty(Property::new(name, Node::List(value))))
        .parse_next(input)
}

fn map_property(input: &mut &str) -> ModalResult<Node> {
    assigned(map_value)
        .map(|(name, value)| Node::MapProperty(Property::new(name, Node::Map(value))))
        .parse_next(input)
}

fn heredoc_property(input: &mut &str) -> ModalResult<Node> {
    (property_name, equals, heredoc)
        .map(|(name, _, value)| Node::HereDocProperty(Property::new(name, Node::HereDoc(value))))
        .parse_next(input)
}

fn declaration(input: &mut &str) -> ModalResult<Node> {
    alt((
        alt((
            named_block,
            typed_property,
            function_property,
            for_object_property,
            function_declaration,
        )),
        alt((
            value_block,
            value_type_block,
            scalar_property,
            unquoted_property,
            list_property,
        )),
        alt((map_property, heredoc_property, comment_node, for_list_property)),
    ))
    .parse_next(input)
}

/// Declarations, each optionally followed by `,` or `;`
pub(crate) fn properties(input: &mut &str) -> ModalResult<Vec<Node>> {
    repeat(
        0..,
        terminated(preceded(ws, declaration), opt((ws, one_of([',', ';'])))),
    )
    .parse_next(input)
}
