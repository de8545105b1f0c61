//! The expression tree data model.
//!
//! A [`Tree`] is an arena of [`Node`]s addressed by [`NodeId`]s. Ownership is strictly
//! tree-shaped: a node is owned by the operator node whose child slot holds its id, or by the
//! tree itself if it is the root. Each node also records its parent; that link never owns
//! anything, and every operation here that relinks nodes keeps it consistent.
//!
//! Nodes removed from the tree are returned to a free list and their slots are reused by later
//! allocations, so a [`NodeId`] must not be used after the node it refers to has been destroyed.

pub mod error;
pub mod iter;
mod node;
mod op;
mod symbol;
pub mod visit;

use crate::config::Limits;
use deriv_error::Error;
use error::{AllocationFailure, CorruptTree, UnknownOperator};
use iter::{PostOrderIter, PreOrderIter};
use std::ops::Index;

pub use node::{Node, NodeData, NodeId};
pub use op::{Arity, OpCode, Precedence};
pub use symbol::{Symbol, SymbolId, SymbolTable};
pub use visit::Visitor;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An expression tree.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tree {
    /// The arena. Freed slots hold [`None`] until they are reused.
    slots: Vec<Option<Node>>,

    /// Freed slots, reused in LIFO order.
    free: Vec<NodeId>,

    /// The root of the tree, or [`None`] if the tree is empty.
    root: Option<NodeId>,

    /// Whether the most recent simplification pass rewrote anything.
    changed: bool,

    /// The number of live nodes.
    live: usize,

    /// The maximum number of live nodes.
    max_nodes: usize,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    /// Returns the node with the given id.
    ///
    /// Panics if the node has been destroyed. Use [`Tree::get`] for a fallible lookup.
    fn index(&self, id: NodeId) -> &Self::Output {
        match self.get(id) {
            Some(node) => node,
            None => panic!("node {} is not part of the tree", id.index()),
        }
    }
}

impl Tree {
    /// Creates an empty tree with the default node budget.
    pub fn new() -> Self {
        Self::with_limits(&Limits::default())
    }

    /// Creates an empty tree whose node budget is [`Limits::max_nodes`].
    pub fn with_limits(limits: &Limits) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: None,
            changed: false,
            live: 0,
            max_nodes: limits.max_nodes,
        }
    }

    /// Creates an empty tree with the same node budget as this one.
    pub fn empty_like(&self) -> Self {
        Self {
            max_nodes: self.max_nodes,
            ..Self::new()
        }
    }

    /// The root of the tree, or [`None`] if the tree is empty.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Makes the given node the root of the tree. The node's parent link is cleared.
    ///
    /// The previous root is not destroyed; pass it to [`Tree::destroy_subtree`] if it is no
    /// longer needed.
    pub fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
        if let Some(node) = root.and_then(|id| self.get_mut(id)) {
            node.parent = None;
        }
    }

    /// Returns the node with the given id, or [`None`] if it has been destroyed.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0)?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    /// Returns the node with the given id, or a [`CorruptTree`] error naming it.
    pub fn try_get(&self, id: NodeId) -> Result<&Node, Error> {
        self.get(id).ok_or_else(|| dangling(id))
    }

    /// The number of live nodes, including nodes not reachable from the root.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns true if the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// The maximum number of live nodes this tree may hold.
    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    /// Returns true if the most recent simplification pass rewrote anything.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Sets the changed flag.
    pub fn set_changed(&mut self, changed: bool) {
        self.changed = changed;
    }

    /// Allocates a node with the given parent and payload.
    ///
    /// The parent link of every child named by `data` is pointed at the new node, so a subtree
    /// built bottom-up with this method is consistent as soon as it is built. The parent's child
    /// slots are not touched.
    ///
    /// Fails with [`AllocationFailure`] if the tree's node budget is spent or the arena cannot
    /// grow.
    pub fn create_node(&mut self, parent: Option<NodeId>, data: NodeData) -> Result<NodeId, Error> {
        if self.live >= self.max_nodes {
            return Err(self.allocation_failure());
        }

        let node = Node { data, parent };
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = Some(node);
                id
            },
            None => {
                self.slots.try_reserve(1).map_err(|_| self.allocation_failure())?;
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            },
        };
        self.live += 1;

        for child in data.children() {
            if let Some(child) = self.get_mut(child) {
                child.parent = Some(id);
            }
        }

        Ok(id)
    }

    fn allocation_failure(&self) -> Error {
        Error::detached(AllocationFailure { live: self.live, limit: self.max_nodes })
    }

    /// Allocates a detached constant node.
    pub fn constant(&mut self, value: f64) -> Result<NodeId, Error> {
        self.create_node(None, NodeData::Constant(value))
    }

    /// Allocates a detached variable node.
    pub fn variable(&mut self, symbol: SymbolId) -> Result<NodeId, Error> {
        self.create_node(None, NodeData::Variable(symbol))
    }

    /// Allocates a detached unary operator node applied to `operand`.
    ///
    /// Fails with [`UnknownOperator`] if `op` is not unary.
    pub fn unary(&mut self, op: OpCode, operand: NodeId) -> Result<NodeId, Error> {
        if !op.is_unary() {
            return Err(Error::detached(UnknownOperator {
                operator: op.to_string(),
                operands: Some(1),
            }));
        }
        self.create_node(None, NodeData::Operator { op, left: None, right: operand })
    }

    /// Allocates a detached binary operator node applied to `lhs` and `rhs`.
    ///
    /// Fails with [`UnknownOperator`] if `op` is not binary.
    pub fn binary(&mut self, op: OpCode, lhs: NodeId, rhs: NodeId) -> Result<NodeId, Error> {
        if op.is_unary() {
            return Err(Error::detached(UnknownOperator {
                operator: op.to_string(),
                operands: Some(2),
            }));
        }
        self.create_node(None, NodeData::Operator { op, left: Some(lhs), right: rhs })
    }

    /// Deep-copies the subtree rooted at `id` within this tree, attaching the copy to `parent`.
    ///
    /// The copy shares no nodes with the original. Returns [`None`] if `id` is [`None`].
    pub fn copy_subtree(
        &mut self,
        id: Option<NodeId>,
        parent: Option<NodeId>,
    ) -> Result<Option<NodeId>, Error> {
        let Some(id) = id else { return Ok(None) };
        let copy = self.copy_node(id)?;
        if let Some(node) = self.get_mut(copy) {
            node.parent = parent;
        }
        Ok(Some(copy))
    }

    fn copy_node(&mut self, id: NodeId) -> Result<NodeId, Error> {
        let nodes = self.post_order_data(id)?;
        fold_nodes(id, nodes, |_, data, left, right| {
            self.create_node(None, relinked(data, left, right))
        })
    }

    /// Deep-copies the subtree rooted at `id` in `other` into this tree, attaching the copy to
    /// `parent`.
    ///
    /// Returns [`None`] if `id` is [`None`].
    pub fn copy_from(
        &mut self,
        other: &Tree,
        id: Option<NodeId>,
        parent: Option<NodeId>,
    ) -> Result<Option<NodeId>, Error> {
        let Some(id) = id else { return Ok(None) };
        let copy = self.import_subtree(other, id)?;
        if let Some(node) = self.get_mut(copy) {
            node.parent = parent;
        }
        Ok(Some(copy))
    }

    /// Deep-copies the subtree rooted at `id` in `other` into this tree as a detached subtree.
    pub fn import_subtree(&mut self, other: &Tree, id: NodeId) -> Result<NodeId, Error> {
        other.fold(id, |_, data, left, right| self.create_node(None, relinked(data, left, right)))
    }

    /// Destroys the subtree rooted at `id`, releasing children before their parents.
    ///
    /// Destroying [`None`] or an already-destroyed node does nothing. The child slot of the
    /// destroyed node's parent is not cleared; if the node was the root, the tree becomes empty.
    ///
    /// Returns the number of nodes destroyed.
    pub fn destroy_subtree(&mut self, id: Option<NodeId>) -> usize {
        self.destroy_except(id, None)
    }

    /// Destroys the subtree rooted at `id`, except for the subtree rooted at `keep`, which is not
    /// walked at all.
    ///
    /// Returns the number of nodes destroyed.
    fn destroy_except(&mut self, id: Option<NodeId>, keep: Option<NodeId>) -> usize {
        let mut doomed = Vec::new();
        let mut stack = id.into_iter().collect::<Vec<_>>();
        while let Some(id) = stack.pop() {
            if Some(id) == keep {
                continue;
            }
            let Some(node) = self.get(id) else { continue };

            // a subtree cannot hold more nodes than the tree; more means a cycle
            if doomed.len() >= self.live {
                break;
            }
            stack.extend(node.children());
            doomed.push(id);
        }

        // reversed pre-order releases every child before its parent
        let destroyed = doomed.len();
        for id in doomed.into_iter().rev() {
            if self.slots[id.0].take().is_none() {
                continue;
            }
            self.free.push(id);
            self.live -= 1;
            if self.root == Some(id) {
                self.root = None;
            }
        }
        destroyed
    }

    /// Rewrites the parent link of every node in the subtree rooted at `id` to match the node
    /// that actually holds it, walking top-down. If `id` is the root, its own parent link is
    /// cleared.
    pub fn set_parents(&mut self, id: Option<NodeId>) {
        let Some(id) = id else { return };
        if self.root == Some(id) {
            if let Some(node) = self.get_mut(id) {
                node.parent = None;
            }
        }

        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            let children = node.children().collect::<Vec<_>>();
            for child in children {
                if let Some(child_node) = self.get_mut(child) {
                    child_node.parent = Some(id);
                    stack.push(child);
                }
            }
        }
    }

    /// Puts `new` in the place of `old`, then destroys what remains of `old`'s subtree.
    ///
    /// `new` must either be detached or be a descendant of `old`; a descendant is skipped while
    /// `old`'s subtree is destroyed, so it survives. Returns the number of nodes destroyed.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<usize, Error> {
        if old == new {
            return Ok(0);
        }
        self.try_get(new)?;
        let parent = self.try_get(old)?.parent;

        match parent {
            Some(parent_id) => {
                let parent_node = self.get_mut(parent_id).ok_or_else(|| dangling(parent_id))?;
                match &mut parent_node.data {
                    NodeData::Operator { left, .. } if *left == Some(old) => *left = Some(new),
                    NodeData::Operator { right, .. } if *right == old => *right = new,
                    _ => return Err(Error::detached(CorruptTree {
                        node: parent_id,
                        problem: "parent does not hold its child",
                    })),
                }
            },
            None if self.root == Some(old) => self.root = Some(new),
            None => (),
        }

        if let Some(node) = self.get_mut(new) {
            node.parent = parent;
        }
        Ok(self.destroy_except(Some(old), Some(new)))
    }

    /// Overwrites the node with a constant, destroying its children.
    pub fn make_constant(&mut self, id: NodeId, value: f64) -> Result<(), Error> {
        let children = self.try_get(id)?.children().collect::<Vec<_>>();
        for child in children {
            self.destroy_subtree(Some(child));
        }
        if let Some(node) = self.get_mut(id) {
            node.data = NodeData::Constant(value);
        }
        Ok(())
    }

    /// Returns the number of nodes on the longest path from the root to a leaf. An empty tree has
    /// depth 0.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = self.root.into_iter().map(|id| (id, 1)).collect::<Vec<_>>();
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            deepest = deepest.max(depth);
            stack.extend(node.children().map(|child| (child, depth + 1)));
        }
        deepest
    }

    /// Iterates over the tree in left-to-right pre-order.
    pub fn pre_order_iter(&self) -> PreOrderIter {
        PreOrderIter::new(self, self.root)
    }

    /// Iterates over the subtree rooted at `start` in left-to-right pre-order.
    pub fn pre_order_iter_from(&self, start: Option<NodeId>) -> PreOrderIter {
        PreOrderIter::new(self, start)
    }

    /// Iterates over the tree in left-to-right post-order.
    pub fn post_order_iter(&self) -> PostOrderIter {
        PostOrderIter::new(self, self.root)
    }

    /// Iterates over the subtree rooted at `start` in left-to-right post-order.
    pub fn post_order_iter_from(&self, start: Option<NodeId>) -> PostOrderIter {
        PostOrderIter::new(self, start)
    }

    /// Returns the id and payload of every node in the subtree rooted at `id`, in left-to-right
    /// post-order.
    ///
    /// Fails with [`CorruptTree`] if `id` or any child id in the subtree does not refer to a live
    /// node, or if the walk visits more nodes than the tree holds.
    pub fn post_order_data(&self, id: NodeId) -> Result<Vec<(NodeId, NodeData)>, Error> {
        self.try_get(id)?;
        let mut nodes = Vec::new();
        for node_ref in PostOrderIter::new(self, Some(id)) {
            if nodes.len() == self.live {
                return Err(Error::detached(CorruptTree {
                    node: node_ref.id,
                    problem: "node is reachable more than once",
                }));
            }
            for child in node_ref.node.children() {
                self.try_get(child)?;
            }
            nodes.push((node_ref.id, node_ref.node.data));
        }
        Ok(nodes)
    }

    /// Folds the subtree rooted at `id` bottom-up. `f` is called once per node, in post-order,
    /// with the node's id and payload and the results already computed for its left and right
    /// operands ([`None`] where the node has no such operand).
    ///
    /// The walk keeps its own stack instead of recursing, so subtrees of any depth can be folded.
    pub fn fold<T>(
        &self,
        id: NodeId,
        f: impl FnMut(NodeId, NodeData, Option<T>, Option<T>) -> Result<T, Error>,
    ) -> Result<T, Error> {
        fold_nodes(id, self.post_order_data(id)?, f)
    }

    /// Checks the structural invariants of the tree:
    ///
    /// - the root has no parent,
    /// - every child id refers to a live node whose parent link points back at its holder,
    /// - every operator node has exactly the operands its arity requires,
    /// - every node is reachable from the root exactly once.
    pub fn verify(&self) -> Result<(), Error> {
        let corrupt = |node, problem| Err(Error::detached(CorruptTree { node, problem }));

        let Some(root) = self.root else {
            return match self.slots.iter().position(Option::is_some) {
                Some(index) => corrupt(NodeId(index), "live node in an empty tree"),
                None => Ok(()),
            };
        };
        if self.try_get(root)?.parent.is_some() {
            return corrupt(root, "the root has a parent");
        }

        let mut seen = vec![false; self.slots.len()];
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut seen[id.0], true) {
                return corrupt(id, "node is reachable more than once");
            }

            let node = self.try_get(id)?;
            if !node.data.is_well_formed() {
                return corrupt(id, "operator has the wrong number of operands");
            }
            for child in node.children() {
                let child_node = self.try_get(child)?;
                if child_node.parent != Some(id) {
                    return corrupt(child, "parent link does not match the holding node");
                }
                stack.push(child);
            }
        }

        match self.slots.iter().zip(&seen).position(|(slot, seen)| slot.is_some() && !seen) {
            Some(index) => corrupt(NodeId(index), "live node is unreachable from the root"),
            None => Ok(()),
        }
    }
}

/// Folds nodes listed in post-order, as returned by [`Tree::post_order_data`] for `root`.
fn fold_nodes<T>(
    root: NodeId,
    nodes: Vec<(NodeId, NodeData)>,
    mut f: impl FnMut(NodeId, NodeData, Option<T>, Option<T>) -> Result<T, Error>,
) -> Result<T, Error> {
    let mut results = Vec::new();
    for (id, data) in nodes {
        let (left, right) = match data {
            NodeData::Operator { left, .. } => {
                let right = results.pop();
                let left = if left.is_some() { results.pop() } else { None };
                (left, right)
            },
            NodeData::Constant(_) | NodeData::Variable(_) => (None, None),
        };
        results.push(f(id, data, left, right)?);
    }
    results.pop().ok_or_else(|| dangling(root))
}

/// Returns the payload with its operands replaced by the given ids.
fn relinked(data: NodeData, left: Option<NodeId>, right: Option<NodeId>) -> NodeData {
    match (data, right) {
        (NodeData::Operator { op, .. }, Some(right)) => NodeData::Operator { op, left, right },
        (data, _) => data,
    }
}

/// The error for an id that does not refer to a live node.
fn dangling(id: NodeId) -> Error {
    Error::detached(CorruptTree { node: id, problem: "id does not refer to a live node" })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Builds `(x + 2) * sin(x)` and returns the tree and the ids of `x + 2` and `sin(x)`.
    fn sample() -> (Tree, NodeId, NodeId) {
        let mut symbols = SymbolTable::new();
        let x = symbols.intern("x");

        let mut tree = Tree::new();
        let x1 = tree.variable(x).unwrap();
        let two = tree.constant(2.0).unwrap();
        let sum = tree.binary(OpCode::Add, x1, two).unwrap();
        let x2 = tree.variable(x).unwrap();
        let sin = tree.unary(OpCode::Sin, x2).unwrap();
        let mul = tree.binary(OpCode::Mul, sum, sin).unwrap();
        tree.set_root(Some(mul));
        (tree, sum, sin)
    }

    #[test]
    fn create_node_threads_parents() {
        let (tree, sum, sin) = sample();
        tree.verify().unwrap();
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree[sum].parent(), tree.root());
        assert_eq!(tree[sin].parent(), tree.root());
    }

    #[test]
    fn arity_is_checked() {
        let mut tree = Tree::new();
        let one = tree.constant(1.0).unwrap();
        assert!(tree.unary(OpCode::Add, one).unwrap_err().is::<UnknownOperator>());
        assert!(tree.binary(OpCode::Ln, one, one).unwrap_err().is::<UnknownOperator>());
    }

    #[test]
    fn node_budget() {
        let limits = Limits { max_nodes: 2, ..Limits::default() };
        let mut tree = Tree::with_limits(&limits);
        tree.constant(1.0).unwrap();
        let two = tree.constant(2.0).unwrap();

        let err = tree.constant(3.0).unwrap_err();
        assert_eq!(err.downcast_ref::<AllocationFailure>(), Some(&AllocationFailure {
            live: 2,
            limit: 2,
        }));

        // freeing a node makes room again, reusing its slot
        tree.destroy_subtree(Some(two));
        assert_eq!(tree.constant(3.0).unwrap(), two);
    }

    #[test]
    fn copy_is_independent() {
        let (mut tree, sum, _) = sample();
        let copy = tree.copy_subtree(Some(sum), None).unwrap().unwrap();
        assert_ne!(copy, sum);
        assert_eq!(tree.len(), 9);
        assert_eq!(tree[copy].parent(), None);

        // the copy's nodes are all new
        let original = tree.pre_order_iter_from(Some(sum)).map(|n| n.id).collect::<Vec<_>>();
        let copied = tree.pre_order_iter_from(Some(copy)).map(|n| n.id).collect::<Vec<_>>();
        assert_eq!(copied.len(), original.len());
        assert!(copied.iter().all(|id| !original.contains(id)));

        let data = |ids: &[NodeId]| ids.iter().map(|&id| tree[id].data).collect::<Vec<_>>();
        assert_eq!(data(&copied), data(&original));

        assert_eq!(tree.copy_subtree(None, None).unwrap(), None);
    }

    #[test]
    fn copy_from_other_tree() {
        let (source, _, sin) = sample();
        let mut target = Tree::new();
        let copy = target.copy_from(&source, Some(sin), None).unwrap();
        target.set_root(copy);
        target.verify().unwrap();
        assert_eq!(target.len(), 2);
        assert_eq!(target[copy.unwrap()].data.as_operator(), Some(OpCode::Sin));
    }

    #[test]
    fn destroy_is_idempotent() {
        let (mut tree, _, sin) = sample();
        tree.destroy_subtree(Some(sin));
        assert_eq!(tree.len(), 4);
        tree.destroy_subtree(Some(sin));
        tree.destroy_subtree(None);
        assert_eq!(tree.len(), 4);

        tree.destroy_subtree(tree.root());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.root(), None);
        tree.verify().unwrap();
    }

    #[test]
    fn replace_with_descendant() {
        // (x + 2) * sin(x) -> x + 2
        let (mut tree, sum, _) = sample();
        tree.replace(tree.root().unwrap(), sum).unwrap();
        assert_eq!(tree.root(), Some(sum));
        assert_eq!(tree.len(), 3);
        tree.verify().unwrap();
    }

    #[test]
    fn replace_with_detached() {
        // (x + 2) * sin(x) -> 5 * sin(x)
        let (mut tree, sum, _) = sample();
        let five = tree.constant(5.0).unwrap();
        tree.replace(sum, five).unwrap();
        assert_eq!(tree[five].parent(), tree.root());
        assert_eq!(tree.len(), 4);
        tree.verify().unwrap();
    }

    #[test]
    fn make_constant_frees_children() {
        let (mut tree, sum, _) = sample();
        tree.make_constant(sum, 7.0).unwrap();
        assert_eq!(tree[sum].data, NodeData::Constant(7.0));
        assert_eq!(tree.len(), 4);
        tree.verify().unwrap();
    }

    #[test]
    fn set_parents_repairs_links() {
        let (mut tree, sum, sin) = sample();
        for id in [sum, sin] {
            tree.get_mut(id).unwrap().parent = None;
        }
        assert!(tree.verify().unwrap_err().is::<CorruptTree>());

        tree.set_parents(tree.root());
        tree.verify().unwrap();
    }

    #[test]
    fn verify_finds_unreachable_nodes() {
        let (mut tree, _, _) = sample();
        tree.constant(1.0).unwrap();
        let err = tree.verify().unwrap_err();
        assert_eq!(
            err.downcast_ref::<CorruptTree>().map(|kind| kind.problem),
            Some("live node is unreachable from the root"),
        );
    }

    #[test]
    fn traversal_orders() {
        let (tree, _, _) = sample();
        let kinds = |refs: Vec<iter::NodeRef>| refs.into_iter()
            .map(|n| match n.node.data {
                NodeData::Constant(c) => c.to_string(),
                NodeData::Variable(_) => "x".to_string(),
                NodeData::Operator { op, .. } => op.to_string(),
            })
            .collect::<Vec<_>>();

        assert_eq!(
            kinds(tree.pre_order_iter().collect()),
            vec!["*", "+", "x", "2", "sin", "x"],
        );
        assert_eq!(
            kinds(tree.post_order_iter().collect()),
            vec!["x", "2", "+", "x", "sin", "*"],
        );
    }

    /// Builds the left-deep sum `x + x + ... + x` with `terms` terms.
    fn long_sum(terms: usize) -> Tree {
        let mut symbols = SymbolTable::new();
        let x = symbols.intern("x");

        let mut tree = Tree::new();
        let mut sum = tree.variable(x).unwrap();
        for _ in 1..terms {
            let term = tree.variable(x).unwrap();
            sum = tree.binary(OpCode::Add, sum, term).unwrap();
        }
        tree.set_root(Some(sum));
        tree
    }

    #[test]
    fn fold_counts_leaves() {
        let (tree, _, _) = sample();
        let leaves = tree.fold(tree.root().unwrap(), |_, data, left, right| {
            Ok(match data {
                NodeData::Operator { .. } => left.unwrap_or(0) + right.unwrap_or(0),
                _ => 1,
            })
        }).unwrap();
        assert_eq!(leaves, 3);
    }

    #[test]
    fn deep_chains_copy_and_destroy() {
        let mut tree = long_sum(20_000);
        assert_eq!(tree.depth(), 20_000);

        let copy = tree.copy_subtree(tree.root(), None).unwrap();
        assert_eq!(tree.len(), 2 * 39_999);

        let mut imported = Tree::new();
        let root = imported.copy_from(&tree, copy, None).unwrap();
        imported.set_root(root);
        imported.verify().unwrap();
        assert_eq!(imported.len(), 39_999);

        assert_eq!(tree.destroy_subtree(copy), 39_999);
        tree.verify().unwrap();
        assert_eq!(tree.destroy_subtree(tree.root()), 39_999);
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn replace_skips_kept_subtree() {
        // (x + ... + x) * 2 -> x + ... + x
        let mut tree = long_sum(20_000);
        let sum = tree.root().unwrap();
        let two = tree.constant(2.0).unwrap();
        let mul = tree.binary(OpCode::Mul, sum, two).unwrap();
        tree.set_root(Some(mul));

        assert_eq!(tree.replace(mul, sum).unwrap(), 2);
        assert_eq!(tree.root(), Some(sum));
        assert_eq!(tree.len(), 39_999);
        tree.verify().unwrap();
    }
}
