//! Syntax tree produced by [crate::parse]
//!
//! The tree is a closed set of node kinds. Values that terraform would treat as expressions
//! are kept as flat sequences of text fragments ([Node::UnquotedExpression]) instead of a typed
//! expression tree; the printer only has to reproduce them.
//!
//! Every node offers the same attribute view ([Node::kind], [Node::name], [Node::value],
//! [Node::children]) regardless of its variant. Equality is defined on that view.
use std::borrow::Cow;

/// A parsed template
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Node,
}

impl Document {
    pub(crate) fn new(children: Vec<Node>) -> Self {
        Self {
            root: Node::Root(children),
        }
    }

    /// The [Node::Root] of this document
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Top level declarations in source order
    pub fn children(&self) -> &[Node] {
        match &self.root {
            Node::Root(children) => children,
            _ => &[],
        }
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    /// Print the document.
    ///
    /// `indent >= 0` prints the block form, [crate::COMPACT] prints everything on one line.
    pub fn render(&self, naked: bool, indent: i32) -> String {
        self.root.render(naked, indent)
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(false, 0))
    }
}

/// All node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Root,
    Block,
    Comment,
    MultilineComment,
    String,
    StringProperty,
    UnquotedString,
    UnquotedExpression,
    UnquotedExpressionProperty,
    List,
    ListProperty,
    Map,
    MapProperty,
    ForLoop,
    Function,
    HereDoc,
    HereDocProperty,
    PrimitiveType,
    ObjectType,
    MapType,
    ListType,
    SetType,
    TupleType,
    TypeProperty,
    NumberOrBool,
    MathSymbol,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Kind::Root => "root",
            Kind::Block => "block",
            Kind::Comment => "comment",
            Kind::MultilineComment => "multiline_comment",
            Kind::String => "string",
            Kind::StringProperty => "string_property",
            Kind::UnquotedString => "unquoted_string",
            Kind::UnquotedExpression => "unquoted_expression",
            Kind::UnquotedExpressionProperty => "unquoted_expression_property",
            Kind::List => "list",
            Kind::ListProperty => "list_property",
            Kind::Map => "map",
            Kind::MapProperty => "map_property",
            Kind::ForLoop => "for_loop",
            Kind::Function => "function",
            Kind::HereDoc => "heredoc",
            Kind::HereDocProperty => "heredoc_property",
            Kind::PrimitiveType => "primitive_type",
            Kind::ObjectType => "object_type",
            Kind::MapType => "map_type",
            Kind::ListType => "list_type",
            Kind::SetType => "set_type",
            Kind::TupleType => "tuple_type",
            Kind::TypeProperty => "type_property",
            Kind::NumberOrBool => "number_or_bool",
            Kind::MathSymbol => "math_symbol",
        };
        f.write_str(name)
    }
}

/// Name of a block or property and whether it was written in quotes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub text: String,
    pub quoted: bool,
}

impl Name {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: true,
        }
    }
}

/// `name { ... }`, `name "value" { ... }` or `name "value" "type" { ... }`
#[derive(Debug, Clone)]
pub struct Block {
    pub name: Name,
    /// `dynamic` marker in front of the name
    pub dynamic: bool,
    pub value: Option<String>,
    pub type_label: Option<String>,
    pub children: Vec<Node>,
}

/// `name = <value>`
///
/// The variant wrapping the property decides how the value is printed, the value node itself
/// is always a complete value ([Node::List] for list properties and so on).
#[derive(Debug, Clone)]
pub struct Property {
    pub name: Name,
    pub value: Box<Node>,
}

impl Property {
    pub fn new(name: Name, value: Node) -> Self {
        Self {
            name,
            value: Box::new(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `# comment`
    Hash,
    /// `// comment`
    DoubleSlash,
}

impl CommentStyle {
    pub fn marker(self) -> &'static str {
        match self {
            CommentStyle::Hash => "#",
            CommentStyle::DoubleSlash => "//",
        }
    }
}

/// Single line comment; `text` is everything after the marker up to the line break
#[derive(Debug, Clone)]
pub struct Comment {
    pub style: CommentStyle,
    pub text: String,
}

/// `{for k, v in collection : statements if condition}` or the `[...]` form
#[derive(Debug, Clone, derive_new::new)]
pub struct ForLoop {
    pub start_bracket: char,
    pub end_bracket: char,
    pub variable: String,
    pub collection: String,
    pub statements: String,
    /// Includes the `if` keyword, empty when there is no condition
    pub if_statement: String,
}

impl ForLoop {
    /// Everything between the brackets
    pub fn header(&self) -> String {
        let mut header = format!(
            "for {} in {} : {}",
            self.variable, self.collection, self.statements
        );
        if !self.if_statement.is_empty() {
            header.push(' ');
            header.push_str(&self.if_statement);
        }
        header
    }
}

/// Function call `name(args...)`. A call without a name is a parenthesized group.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: Option<String>,
    pub args: Vec<Node>,
}

/// `<<MARKER` / `<<-MARKER` string; `body` is verbatim and ends with a line break unless empty
#[derive(Debug, Clone, derive_new::new)]
pub struct HereDoc {
    pub marker: String,
    pub indented: bool,
    pub body: String,
}

/// `string`, `number`, `bool` or `any`
#[derive(Debug, Clone)]
pub struct PrimitiveType {
    pub name: String,
    pub quoted: bool,
}

#[derive(Debug, Clone)]
pub enum Node {
    Root(Vec<Node>),
    Block(Block),
    Comment(Comment),
    /// Text between `/*` and `*/`
    MultilineComment(String),
    /// Unescaped string content, interpolations kept verbatim
    String(String),
    StringProperty(Property),
    UnquotedString(String),
    /// Flat sequence of terms and [Node::MathSymbol]s
    UnquotedExpression(Vec<Node>),
    UnquotedExpressionProperty(Property),
    List(Vec<Node>),
    ListProperty(Property),
    /// Children are properties
    Map(Vec<Node>),
    MapProperty(Property),
    ForLoop(ForLoop),
    Function(Function),
    HereDoc(HereDoc),
    HereDocProperty(Property),
    PrimitiveType(PrimitiveType),
    /// Children are [Node::TypeProperty]s and comments
    ObjectType(Vec<Node>),
    MapType(Box<Node>),
    ListType(Box<Node>),
    SetType(Box<Node>),
    TupleType(Vec<Node>),
    TypeProperty(Property),
    NumberOrBool(String),
    MathSymbol(String),
}

impl Node {
    pub fn kind(&self) -> Kind {
        match self {
            Node::Root(_) => Kind::Root,
            Node::Block(_) => Kind::Block,
            Node::Comment(_) => Kind::Comment,
            Node::MultilineComment(_) => Kind::MultilineComment,
            Node::String(_) => Kind::String,
            Node::StringProperty(_) => Kind::StringProperty,
            Node::UnquotedString(_) => Kind::UnquotedString,
            Node::UnquotedExpression(_) => Kind::UnquotedExpression,
            Node::UnquotedExpressionProperty(_) => Kind::UnquotedExpressionProperty,
            Node::List(_) => Kind::List,
            Node::ListProperty(_) => Kind::ListProperty,
            Node::Map(_) => Kind::Map,
            Node::MapProperty(_) => Kind::MapProperty,
            Node::ForLoop(_) => Kind::ForLoop,
            Node::Function(_) => Kind::Function,
            Node::HereDoc(_) => Kind::HereDoc,
            Node::HereDocProperty(_) => Kind::HereDocProperty,
            Node::PrimitiveType(_) => Kind::PrimitiveType,
            Node::ObjectType(_) => Kind::ObjectType,
            Node::MapType(_) => Kind::MapType,
            Node::ListType(_) => Kind::ListType,
            Node::SetType(_) => Kind::SetType,
            Node::TupleType(_) => Kind::TupleType,
            Node::TypeProperty(_) => Kind::TypeProperty,
            Node::NumberOrBool(_) => Kind::NumberOrBool,
            Node::MathSymbol(_) => Kind::MathSymbol,
        }
    }

    fn property(&self) -> Option<&Property> {
        match self {
            Node::StringProperty(property)
            | Node::UnquotedExpressionProperty(property)
            | Node::ListProperty(property)
            | Node::MapProperty(property)
            | Node::HereDocProperty(property)
            | Node::TypeProperty(property) => Some(property),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Block(block) => Some(&block.name.text),
            Node::Function(function) => function.name.as_deref(),
            _ => self.property().map(|property| property.name.text.as_str()),
        }
    }

    /// True if the name was written in quotes and must be printed that way
    pub fn name_quoted(&self) -> bool {
        match self {
            Node::Block(block) => block.name.quoted,
            _ => self
                .property()
                .map(|property| property.name.quoted)
                .unwrap_or(false),
        }
    }

    /// Scalar payload, or the processed value for kinds that compute one
    pub fn value(&self) -> Option<Cow<'_, str>> {
        match self {
            Node::Block(block) => block.value.as_deref().map(Cow::Borrowed),
            Node::Comment(comment) => Some(Cow::Borrowed(&comment.text)),
            Node::MultilineComment(text)
            | Node::String(text)
            | Node::UnquotedString(text)
            | Node::NumberOrBool(text)
            | Node::MathSymbol(text) => Some(Cow::Borrowed(text)),
            Node::ForLoop(for_loop) => Some(Cow::Owned(for_loop.header())),
            Node::HereDoc(heredoc) => Some(Cow::Borrowed(&heredoc.body)),
            Node::PrimitiveType(primitive) => Some(Cow::Borrowed(&primitive.name)),
            _ => None,
        }
    }

    /// Ordered children, `None` for leaf kinds
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Root(children)
            | Node::UnquotedExpression(children)
            | Node::List(children)
            | Node::Map(children)
            | Node::ObjectType(children)
            | Node::TupleType(children) => Some(children),
            Node::Block(block) => Some(&block.children),
            Node::Function(function) => Some(&function.args),
            Node::MapType(inner) | Node::ListType(inner) | Node::SetType(inner) => {
                Some(std::slice::from_ref(inner.as_ref()))
            }
            Node::ListProperty(property) | Node::MapProperty(property) => {
                property.value.children()
            }
            Node::StringProperty(property)
            | Node::UnquotedExpressionProperty(property)
            | Node::HereDocProperty(property)
            | Node::TypeProperty(property) => Some(std::slice::from_ref(property.value.as_ref())),
            Node::Comment(_)
            | Node::MultilineComment(_)
            | Node::String(_)
            | Node::UnquotedString(_)
            | Node::ForLoop(_)
            | Node::HereDoc(_)
            | Node::PrimitiveType(_)
            | Node::NumberOrBool(_)
            | Node::MathSymbol(_) => None,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Node::Comment(_) | Node::MultilineComment(_))
    }

    fn type_label(&self) -> Option<&str> {
        match self {
            Node::Block(block) => block.type_label.as_deref(),
            _ => None,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
            && self.name() == other.name()
            && self.value() == other.value()
            && self.type_label() == other.type_label()
            && self.children() == other.children()
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(false, 0))
    }
}
