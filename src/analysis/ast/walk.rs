/// Pre-order traversal over syntax nodes
use crate::analysis::ast::tree::{SyntaxNode, SyntaxTree};

/// Iterative pre-order walk with an explicit stack so deep trees cannot
/// overflow the call stack. A node is yielded before its children, and its
/// children before its body.
pub struct Walk<'a> {
    stack: Vec<&'a SyntaxNode>,
}

impl<'a> Walk<'a> {
    fn from_roots(roots: &'a [SyntaxNode]) -> Self {
        // Reverse to maintain left-to-right traversal order
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.body_statements().iter().rev());
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Walk the subtree rooted at `node`, the node itself included.
pub fn walk(node: &SyntaxNode) -> Walk<'_> {
    Walk::from_roots(std::slice::from_ref(node))
}

/// Walk every statement of a tree in source order.
pub fn walk_tree(tree: &SyntaxTree) -> Walk<'_> {
    Walk::from_roots(&tree.statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ast::tree::NodeKind;

    fn lines(it: Walk<'_>) -> Vec<usize> {
        it.map(|n| n.line).collect()
    }

    #[test]
    fn visits_node_then_children_then_body() {
        let node = SyntaxNode::for_loop(1, vec![SyntaxNode::other("expression_statement", 4)])
            .with_children(vec![SyntaxNode::other("identifier", 2), SyntaxNode::other("call", 3)]);
        assert_eq!(lines(walk(&node)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn tree_walk_keeps_statement_order() {
        let tree = SyntaxTree::new(vec![
            SyntaxNode::function("a", 1, vec![SyntaxNode::new(NodeKind::If, 2)]),
            SyntaxNode::function("b", 3, vec![]),
        ]);
        assert_eq!(lines(walk_tree(&tree)), vec![1, 2, 3]);
    }

    #[test]
    fn empty_tree_yields_nothing() {
        assert_eq!(walk_tree(&SyntaxTree::default()).count(), 0);
    }
}
