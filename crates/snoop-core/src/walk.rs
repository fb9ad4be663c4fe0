//! Depth-first pre-order traversal over [`Node`] trees.

use crate::syntax::{Node, NodeTag};

/// Lazy pre-order iterator: a node, then each child's subtree in source order.
///
/// Walking is side-effect free, so a new `Walk` over an unchanged tree always yields the same
/// sequence.
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Walk<'a> {
    pub fn new(root: &'a Node) -> Self {
        Self { stack: vec![root] }
    }

    /// Restrict the walk to nodes of one kind.
    pub fn of_kind(self, tag: NodeTag) -> impl Iterator<Item = &'a Node> {
        self.filter(move |node| node.tag() == tag)
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Children are pushed in reverse so the leftmost one is visited first.
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}

/// Walk `root` in pre-order.
pub fn walk(root: &Node) -> Walk<'_> {
    Walk::new(root)
}

/// Walk `root` in pre-order, yielding only nodes with the given tag.
pub fn walk_kind(root: &Node, tag: NodeTag) -> impl Iterator<Item = &Node> {
    Walk::new(root).of_kind(tag)
}
