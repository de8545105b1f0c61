use super::{node::{Node, NodeId}, Tree};

/// A read-only borrow of a node, paired with its id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRef<'a> {
    /// The id of the node.
    pub id: NodeId,

    /// The node itself.
    pub node: &'a Node,
}

/// An iterator that traverses a subtree in left-to-right pre-order, visiting each node before
/// its children.
///
/// This iterator is created by [`Tree::pre_order_iter`].
pub struct PreOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl<'a> PreOrderIter<'a> {
    /// Creates a new iterator over the subtree rooted at `start`.
    pub fn new(tree: &'a Tree, start: Option<NodeId>) -> Self {
        Self { tree, stack: start.into_iter().collect() }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = self.stack.pop()?;

            // ids that no longer point at a live node are skipped
            let Some(node) = self.tree.get(id) else { continue };
            if let Some(right) = node.right() {
                self.stack.push(right);
            }
            if let Some(left) = node.left() {
                self.stack.push(left);
            }
            return Some(NodeRef { id, node });
        }
    }
}

/// An iterator that traverses a subtree in left-to-right post-order (i.e. depth-first), visiting
/// each node after its children.
///
/// This iterator is created by [`Tree::post_order_iter`].
pub struct PostOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
    last_visited: Option<NodeId>,
}

impl<'a> PostOrderIter<'a> {
    /// Creates a new iterator over the subtree rooted at `start`.
    pub fn new(tree: &'a Tree, start: Option<NodeId>) -> Self {
        Self {
            tree,
            stack: start.into_iter().filter(|&id| tree.get(id).is_some()).collect(),
            last_visited: None,
        }
    }

    /// Pops the current node in the stack and marks it as the last visited node.
    fn visit(&mut self, node: &'a Node) -> Option<NodeRef<'a>> {
        let id = self.stack.pop()?;
        self.last_visited = Some(id);
        Some(NodeRef { id, node })
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = *self.stack.last()?;
            let Some(node) = self.tree.get(id) else {
                self.stack.pop();
                continue;
            };

            // the right child is the last child visited, if there is one; a dangling right child
            // counts as visited so that corrupt trees cannot loop forever
            match node.right() {
                Some(right) if self.last_visited != Some(right) && self.tree.get(right).is_some() => {
                    self.stack.push(right);
                    if let Some(left) = node.left() {
                        self.stack.push(left);
                    }
                },
                _ => return self.visit(node),
            }
        }
    }
}
