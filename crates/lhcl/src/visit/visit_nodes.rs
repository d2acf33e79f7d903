use super::Visit;
use crate::node::{Document, Node};

/// Recursively visit all [Node]s, parents before their children, in source order
///
/// Children are the ones reported by [Node::children], so a property is followed by its value
/// (or the elements of its list or map).
pub trait VisitNodes {
    fn visit_nodes(&self, visitor: &mut dyn Visit<Node>);
}

fn walk(node: &Node, depth: usize, visitor: &mut dyn Visit<Node>) {
    visitor.visit(node, depth);
    for child in node.children().unwrap_or_default() {
        walk(child, depth + 1, visitor);
    }
}

impl VisitNodes for Node {
    fn visit_nodes(&self, visitor: &mut dyn Visit<Node>) {
        walk(self, 0, visitor);
    }
}

impl VisitNodes for Document {
    fn visit_nodes(&self, visitor: &mut dyn Visit<Node>) {
        self.root().visit_nodes(visitor);
    }
}
