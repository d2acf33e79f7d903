//! visitor pattern helpers
mod visit_nodes;
pub use visit_nodes::VisitNodes;

/// Visitor that is called with each subject and its nesting depth
pub trait Visit<T> {
    fn visit(&mut self, value: &T, depth: usize);
}

// blanket impl for FnMut
impl<T, F> Visit<T> for F
where
    F: FnMut(&T, usize),
{
    fn visit(&mut self, value: &T, depth: usize) {
        self(value, depth)
    }
}
