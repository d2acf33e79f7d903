//! Printing of syntax trees back to template text
//!
//! Rendering is a pure function of the tree. The output of a rendered document parses back
//! into an equal tree which renders to the same text again.
use crate::escape::escape_string;
use crate::node::{Block, ForLoop, Function, HereDoc, Node, Property};

/// Render everything on a single line
pub const COMPACT: i32 = -1;

const INDENT: &str = "  ";

fn prefix(indent: i32) -> String {
    if indent > 0 {
        INDENT.repeat(indent as usize)
    } else {
        String::new()
    }
}

fn nested(indent: i32) -> i32 {
    if indent < 0 {
        COMPACT
    } else {
        indent + 1
    }
}

fn quoted(text: &str) -> String {
    format!("\"{}\"", escape_string(text))
}

impl Node {
    /// Print this node.
    ///
    /// `indent` is the nesting level, two spaces each, or [COMPACT]. With `naked` set a
    /// property prints only its value and a block only its body.
    pub fn render(&self, naked: bool, indent: i32) -> String {
        match self {
            Node::Root(children) => sequence(children, indent),
            _ if naked => format!("{}{}", prefix(indent), self.value_form(indent)),
            _ => format!("{}{}", prefix(indent), self.line_form(indent)),
        }
    }

    /// Declaration form without the leading indentation
    fn line_form(&self, indent: i32) -> String {
        match self {
            Node::Block(block) => format!("{} {}", block_header(block), self.value_form(indent)),
            Node::StringProperty(property)
            | Node::UnquotedExpressionProperty(property)
            | Node::ListProperty(property)
            | Node::MapProperty(property)
            | Node::HereDocProperty(property)
            | Node::TypeProperty(property) => assignment(property, indent),
            _ => self.value_form(indent),
        }
    }

    /// Value form; `indent` is the level of the line the value starts on
    fn value_form(&self, indent: i32) -> String {
        match self {
            Node::Root(children) => sequence(children, indent),
            Node::Block(block) => body(&block.children, indent),
            Node::StringProperty(property)
            | Node::UnquotedExpressionProperty(property)
            | Node::ListProperty(property)
            | Node::MapProperty(property)
            | Node::HereDocProperty(property)
            | Node::TypeProperty(property) => property.value.value_form(indent),
            Node::Comment(comment) if indent < 0 => format!("/*{}*/", comment.text),
            Node::Comment(comment) => format!("{}{}", comment.style.marker(), comment.text),
            Node::MultilineComment(text) => format!("/*{text}*/"),
            Node::String(text) => quoted(text),
            Node::UnquotedString(text) | Node::NumberOrBool(text) | Node::MathSymbol(text) => {
                text.clone()
            }
            Node::UnquotedExpression(terms) => expression(terms, indent),
            Node::List(elements) => list(elements, indent),
            Node::Map(properties) => body(properties, indent),
            Node::ForLoop(for_loop) => for_expression(for_loop),
            Node::Function(function) => call(function, indent),
            Node::HereDoc(heredoc) => heredoc_text(heredoc, indent),
            Node::PrimitiveType(primitive) if primitive.quoted => quoted(&primitive.name),
            Node::PrimitiveType(primitive) => primitive.name.clone(),
            Node::ObjectType(members) => format!("object({})", body(members, indent)),
            Node::MapType(inner) => format!("map({})", inner.value_form(indent)),
            Node::ListType(inner) => format!("list({})", inner.value_form(indent)),
            Node::SetType(inner) => format!("set({})", inner.value_form(indent)),
            Node::TupleType(types) => {
                let types: Vec<_> = types.iter().map(|t| t.value_form(indent)).collect();
                format!("tuple([{}])", types.join(", "))
            }
        }
    }
}

fn block_header(block: &Block) -> String {
    let mut header = String::new();
    if block.dynamic {
        header.push_str("dynamic ");
    }
    if block.name.quoted {
        header.push_str(&quoted(&block.name.text));
    } else {
        header.push_str(&block.name.text);
    }
    for label in [&block.value, &block.type_label].into_iter().flatten() {
        header.push(' ');
        header.push_str(&quoted(label));
    }
    header
}

fn assignment(property: &Property, indent: i32) -> String {
    let name = if property.name.quoted {
        quoted(&property.name.text)
    } else {
        property.name.text.clone()
    };
    format!("{name} = {}", property.value.value_form(indent))
}

/// Top level declarations, one per line
fn sequence(children: &[Node], indent: i32) -> String {
    let separator = if indent < 0 { ", " } else { "\n" };
    children
        .iter()
        .map(|child| child.render(false, indent))
        .collect::<Vec<_>>()
        .join(separator)
}

/// `{ ... }` holding declarations, used by blocks, maps and object types
fn body(children: &[Node], indent: i32) -> String {
    if children.is_empty() {
        return "{}".to_string();
    }

    if indent < 0 {
        return format!("{{{}}}", sequence(children, COMPACT));
    }

    format!(
        "{{\n{}\n{}}}",
        sequence(children, nested(indent)),
        prefix(indent)
    )
}

/// Elements separated by commas; comments do not take a comma and the last element drops its
/// comma.
fn elements(elements: &[Node], indent: i32) -> Vec<String> {
    let inner = nested(indent);
    let last = elements.len().saturating_sub(1);

    elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            let mut text = element.render(true, inner);
            if index != last && !element.is_comment() {
                text.push(',');
            }
            text
        })
        .collect()
}

fn list(items: &[Node], indent: i32) -> String {
    if items.is_empty() {
        return "[]".to_string();
    }

    let items = elements(items, indent);
    if indent < 0 {
        format!("[{}]", items.join(" "))
    } else {
        format!("[\n{}\n{}]", items.join("\n"), prefix(indent))
    }
}

fn is_accessor(term: &Node) -> bool {
    matches!(term, Node::UnquotedString(text) if text.starts_with('.') || text.starts_with('['))
}

fn expression(terms: &[Node], indent: i32) -> String {
    let mut text = String::new();

    for (index, term) in terms.iter().enumerate() {
        if index > 0 {
            let previous = &terms[index - 1];
            let previous_is_unary = matches!(previous, Node::MathSymbol(_))
                && (index == 1 || matches!(terms[index - 2], Node::MathSymbol(_)));

            if matches!(previous, Node::HereDoc(_)) && indent >= 0 {
                text.push('\n');
            } else if !previous_is_unary && !is_accessor(term) {
                text.push(' ');
            }
        }
        text.push_str(&term.value_form(indent));
    }

    text
}

fn for_expression(for_loop: &ForLoop) -> String {
    format!(
        "{}{}{}",
        for_loop.start_bracket,
        for_loop.header(),
        for_loop.end_bracket
    )
}

fn call(function: &Function, indent: i32) -> String {
    let name = function.name.as_deref().unwrap_or_default();
    let multiline = indent >= 0
        && function
            .args
            .iter()
            .any(|arg| arg.is_comment() || matches!(arg, Node::HereDoc(_)));

    if multiline {
        format!(
            "{name}(\n{}\n{})",
            elements(&function.args, indent).join("\n"),
            prefix(indent)
        )
    } else {
        let args: Vec<_> = function
            .args
            .iter()
            .map(|arg| arg.value_form(indent))
            .collect();
        format!("{name}({})", args.join(", "))
    }
}

/// The closing marker has to end its line, in compact mode the line break is part of the
/// heredoc
fn heredoc_text(heredoc: &HereDoc, indent: i32) -> String {
    format!(
        "<<{}{}\n{}{}{}",
        if heredoc.indented { "-" } else { "" },
        heredoc.marker,
        heredoc.body,
        heredoc.marker,
        if indent < 0 { "\n" } else { "" }
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::node::{Comment, CommentStyle, Name, PrimitiveType};
    use pretty_assertions::assert_eq;

    fn unquoted(text: &str) -> Node {
        Node::UnquotedString(text.into())
    }

    fn comment(text: &str) -> Node {
        Node::Comment(Comment {
            style: CommentStyle::Hash,
            text: text.into(),
        })
    }

    #[test]
    fn block_with_labels() {
        let block = Node::Block(Block {
            name: Name::plain("resource"),
            dynamic: false,
            value: Some("aws_instance".into()),
            type_label: Some("web".into()),
            children: vec![Node::StringProperty(Property::new(
                Name::plain("ami"),
                Node::String("ami-123".into()),
            ))],
        });

        assert_eq!(
            block.to_string(),
            "resource \"aws_instance\" \"web\" {\n  ami = \"ami-123\"\n}"
        );
        assert_eq!(block.render(true, 0), "{\n  ami = \"ami-123\"\n}");
        assert_eq!(
            block.render(false, COMPACT),
            "resource \"aws_instance\" \"web\" {ami = \"ami-123\"}"
        );
    }

    #[test]
    fn dynamic_block_keeps_quoted_name() {
        let block = Node::Block(Block {
            name: Name::quoted("ingress"),
            dynamic: true,
            value: None,
            type_label: None,
            children: vec![],
        });

        assert_eq!(block.to_string(), "dynamic \"ingress\" {}");
    }

    #[test]
    fn list_comma_rules() {
        let list = Node::List(vec![unquoted("a"), comment(" keep"), unquoted("b")]);
        assert_eq!(list.to_string(), "[\n  a,\n  # keep\n  b\n]");

        let trailing_comment = Node::List(vec![unquoted("a"), comment(" end")]);
        assert_eq!(trailing_comment.to_string(), "[\n  a,\n  # end\n]");

        assert_eq!(
            Node::List(vec![unquoted("a"), unquoted("b")]).render(false, COMPACT),
            "[a, b]"
        );
        assert_eq!(Node::List(vec![]).to_string(), "[]");
    }

    #[test]
    fn nested_indentation() {
        let property = Node::MapProperty(Property::new(
            Name::plain("tags"),
            Node::Map(vec![Node::ListProperty(Property::new(
                Name::plain("names"),
                Node::List(vec![Node::String("x".into())]),
            ))]),
        ));

        assert_eq!(
            property.render(false, 1),
            "  tags = {\n    names = [\n      \"x\"\n    ]\n  }"
        );
    }

    #[test]
    fn expression_spacing() {
        let expression = Node::UnquotedExpression(vec![
            Node::MathSymbol("!".into()),
            unquoted("var.enabled"),
            Node::MathSymbol("&&".into()),
            Node::Function(Function {
                name: Some("length".into()),
                args: vec![unquoted("var.list")],
            }),
            unquoted("[0]"),
            Node::MathSymbol(">".into()),
            Node::MathSymbol("-".into()),
            Node::NumberOrBool("1".into()),
        ]);

        assert_eq!(
            expression.to_string(),
            "!var.enabled && length(var.list)[0] > -1"
        );
    }

    #[test]
    fn compact_comments_become_inline() {
        let root = Node::Root(vec![comment(" note"), unquoted("x")]);
        assert_eq!(root.render(false, COMPACT), "/* note*/, x");
    }

    #[test]
    fn types() {
        let object = Node::ObjectType(vec![
            Node::TypeProperty(Property::new(
                Name::plain("name"),
                Node::PrimitiveType(PrimitiveType {
                    name: "string".into(),
                    quoted: false,
                }),
            )),
            Node::TypeProperty(Property::new(
                Name::plain("ports"),
                Node::ListType(Box::new(Node::PrimitiveType(PrimitiveType {
                    name: "number".into(),
                    quoted: true,
                }))),
            )),
        ]);

        assert_eq!(
            object.to_string(),
            "object({\n  name = string\n  ports = list(\"number\")\n})"
        );
        assert_eq!(
            object.render(false, COMPACT),
            "object({name = string, ports = list(\"number\")})"
        );
    }

    #[test]
    fn function_with_heredoc_argument() {
        let function = Node::Function(Function {
            name: Some("jsonencode".into()),
            args: vec![Node::HereDoc(HereDoc::new(
                "EOF".into(),
                false,
                "{}\n".into(),
            ))],
        });

        assert_eq!(function.to_string(), "jsonencode(\n  <<EOF\n{}\nEOF\n)");
    }

    #[test]
    fn heredoc_marker_ends_its_line() {
        let heredoc = Node::HereDoc(HereDoc::new("EOT".into(), true, "  x\n".into()));
        let block = Node::Block(Block {
            name: Name::plain("locals"),
            dynamic: false,
            value: None,
            type_label: None,
            children: vec![
                Node::HereDocProperty(Property::new(Name::plain("a"), heredoc.clone())),
                Node::StringProperty(Property::new(Name::plain("b"), Node::String("y".into()))),
            ],
        });
        assert_eq!(
            block.render(false, COMPACT),
            "locals {a = <<-EOT\n  x\nEOT\n, b = \"y\"}"
        );

        let expression = Node::UnquotedExpression(vec![
            heredoc,
            Node::MathSymbol("+".into()),
            unquoted("b"),
        ]);
        assert_eq!(expression.to_string(), "<<-EOT\n  x\nEOT\n+ b");
    }
}
