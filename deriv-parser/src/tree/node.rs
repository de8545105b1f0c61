use super::{op::OpCode, symbol::SymbolId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A handle to a node stored in a [`Tree`](super::Tree).
///
/// A [`NodeId`] does not own anything. It is only meaningful for the tree that produced it, and
/// only until that node is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The index of the node's slot in the tree's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// The payload of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeData {
    /// A numeric constant, such as `2` or `-0.5`.
    Constant(f64),

    /// A variable, referring to an entry of the symbol table.
    Variable(SymbolId),

    /// An operator applied to its children.
    ///
    /// Binary operators use both children. Unary operators, like `sin`, use only the `right`
    /// child and leave `left` empty.
    Operator {
        op: OpCode,
        left: Option<NodeId>,
        right: NodeId,
    },
}

impl NodeData {
    /// Returns the children of the node, left first.
    pub fn children(&self) -> impl Iterator<Item = NodeId> {
        let (left, right) = match *self {
            Self::Operator { left, right, .. } => (left, Some(right)),
            Self::Constant(_) | Self::Variable(_) => (None, None),
        };
        left.into_iter().chain(right)
    }

    /// Returns true if the node is a constant or a variable.
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::Operator { .. })
    }

    /// If the node is a constant, returns its value.
    pub fn as_constant(&self) -> Option<f64> {
        match *self {
            Self::Constant(value) => Some(value),
            _ => None,
        }
    }

    /// If the node is a variable, returns its symbol.
    pub fn as_variable(&self) -> Option<SymbolId> {
        match *self {
            Self::Variable(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// If the node is an operator, returns its code.
    pub fn as_operator(&self) -> Option<OpCode> {
        match *self {
            Self::Operator { op, .. } => Some(op),
            _ => None,
        }
    }

    /// Returns true if the node is the constant `value`.
    pub fn is_constant(&self, value: f64) -> bool {
        self.as_constant() == Some(value)
    }

    /// Returns true if the operator node has exactly the operands its arity requires.
    ///
    /// Leaves are always well-formed.
    pub fn is_well_formed(&self) -> bool {
        match *self {
            Self::Operator { op, left, .. } => left.is_some() != op.is_unary(),
            Self::Constant(_) | Self::Variable(_) => true,
        }
    }
}

/// A node of an expression tree: its payload plus a back-reference to its parent.
///
/// The parent link never owns anything; it is kept consistent by every [`Tree`](super::Tree)
/// operation that relinks nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    pub(crate) data: NodeData,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    /// The payload of the node.
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// The node's parent, or [`None`] for the root (or a detached subtree).
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The left child. Always [`None`] for leaves and unary operators.
    pub fn left(&self) -> Option<NodeId> {
        match self.data {
            NodeData::Operator { left, .. } => left,
            _ => None,
        }
    }

    /// The right child. Always [`None`] for leaves.
    pub fn right(&self) -> Option<NodeId> {
        match self.data {
            NodeData::Operator { right, .. } => Some(right),
            _ => None,
        }
    }

    /// Returns the children of the node, left first.
    pub fn children(&self) -> impl Iterator<Item = NodeId> {
        self.data.children()
    }
}
