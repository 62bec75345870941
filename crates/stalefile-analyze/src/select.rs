//! Predicate-driven subtree selection.

use std::iter::FusedIterator;

use stalefile_core::TreeNode;

/// Select the topmost subtrees of `root` that satisfy `predicate`.
///
/// Nodes are visited depth-first in pre-order. A node that matches is yielded
/// and its descendants are not visited, so no returned node is an ancestor of
/// another. The sequence is lazy and can be consumed once.
pub fn select<P>(root: &TreeNode, predicate: P) -> Select<'_, P>
where
    P: FnMut(&TreeNode) -> bool,
{
    Select {
        stack: vec![root],
        predicate,
    }
}

/// Iterator returned by [`select`].
pub struct Select<'t, P> {
    stack: Vec<&'t TreeNode>,
    predicate: P,
}

impl<'t, P> Iterator for Select<'t, P>
where
    P: FnMut(&TreeNode) -> bool,
{
    type Item = &'t TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if (self.predicate)(node) {
                return Some(node);
            }
            // Reversed so the first child is popped first.
            self.stack.extend(node.children.iter().rev());
        }
        None
    }
}

impl<P> FusedIterator for Select<'_, P> where P: FnMut(&TreeNode) -> bool {}
