//! # lhcl - lenient HCL
//!
//! A permissive parser and printer for terraform style HCL templates. Text goes in, a syntax
//! tree comes out, and the tree prints back to text.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `lhcl` works internally.
//!
//! ### Goals
//!
//! `lhcl` accepts every valid template, and some invalid ones. Whether a template is
//! meaningful is left to terraform, we only have to understand its shape. Printing a parsed
//! template and parsing the result again always yields the same text:
//!
//! ```
//! let document = lhcl::parse("tags = {foo: 2, bar:\"a\"}").unwrap();
//! let printed = document.render(false, lhcl::COMPACT);
//! assert_eq!(printed, "tags = {foo = 2, bar = \"a\"}");
//!
//! let reprinted = lhcl::parse(&printed).unwrap().render(false, lhcl::COMPACT);
//! assert_eq!(printed, reprinted);
//! ```
//!
//! The first print may normalize the input (spacing around operators, `:` becomes `=`,
//! indentation), after that the output is stable.
//!
//! ### Terms
//!
//! - a template is a sequence of `declarations`
//! - ...which are `blocks`, `properties` or comments
//! - a block has a name, up to two labels and a body of declarations:
//!   `resource "aws_instance" "web" { ... }`
//! - a property assigns a value to a name: `ami = "ami-123"`
//!
//! Values are strings, numbers, booleans, lists, maps, heredocs, for expressions, function
//! calls, type declarations and unquoted expressions. Expressions are never evaluated:
//! `var.count > 0 ? 1 : 0` is kept as a flat sequence of terms and operator symbols.
//!
//! ### Parsing
//!
//! see [parse]
//!
//! The grammar lives in `parser` and is layered bottom-up from character classes to
//! declarations. It is an ordered choice: each declaration is tried against a fixed list of
//! alternatives and the first match wins. Block bodies are committed once their opening brace
//! is found, so an error inside a block is reported where it happens.
//!
//! ### The tree
//!
//! see [Node]
//!
//! Every node answers [Node::kind], [Node::name], [Node::value] and [Node::children]. Two
//! trees are equal when these agree everywhere, regardless of the variant specific details
//! (for example whether a property name was quoted).
//!
//! ### Printing
//!
//! see [Node::render]
//!
//! Block form uses two spaces per nesting level. [COMPACT] prints everything on one line.
//!
//! ### Loading files
//!
//! [templates::Templates] collects the documents of multiple files and remembers where each
//! one came from, so errors can point to the file.
//!
mod error;
mod escape;
mod node;
mod parser;
mod render;
mod serialize;
pub mod templates;
pub mod visit;

pub use error::ParseError;
pub use escape::{escape_string, unescape_string};
pub use node::{
    Block, Comment, CommentStyle, Document, ForLoop, Function, HereDoc, Kind, Name, Node,
    PrimitiveType, Property,
};
pub use parser::{parse, parse_value};
pub use render::COMPACT;

/// Convert `\r\n` and lone `\r` line endings to `\n`
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
