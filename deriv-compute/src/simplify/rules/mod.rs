//! Implementation of the simplification rules.
//!
//! Each rule in this module is a function that takes a node of the tree to simplify, and returns
//! `Some(rewrite)` describing how to rewrite the node if the rule applies, or `None` if the rule
//! does not apply. Rules only inspect the tree; [`super::simplify_with`] performs the rewrite.

pub mod add;
pub mod fold;
pub mod multiply;
pub mod power;

use crate::step_collector::StepCollector;
use deriv_parser::{NodeData, NodeId, OpCode, Tree};
use super::step::Step;

/// The result of a rule that applies to a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rewrite {
    /// Replace the node with one of its operands, discarding the rest of the node.
    Operand(NodeId),

    /// Replace the node with a constant.
    Constant(f64),
}

/// If the node applies the given binary operator, calls the given transformation function with
/// the ids and payloads of the left and right operands.
///
/// Returns `Some(rewrite)` if the transformation applies.
pub(crate) fn do_binary(
    tree: &Tree,
    id: NodeId,
    op: OpCode,
    f: impl FnOnce((NodeId, NodeData), (NodeId, NodeData)) -> Option<Rewrite>,
) -> Option<Rewrite> {
    match *tree.get(id)?.data() {
        NodeData::Operator { op: node_op, left: Some(left), right } if node_op == op => {
            let lhs = *tree.get(left)?.data();
            let rhs = *tree.get(right)?.data();
            f((left, lhs), (right, rhs))
        },
        _ => None,
    }
}

/// Applies the constant folding rule.
pub fn fold(tree: &Tree, id: NodeId, step_collector: &mut dyn StepCollector<Step>) -> Option<Rewrite> {
    fold::fold_constant(tree, id, step_collector)
}

/// Applies all neutral-element elimination rules, returning the rewrite of the first that
/// applies.
pub fn neutral(tree: &Tree, id: NodeId, step_collector: &mut dyn StepCollector<Step>) -> Option<Rewrite> {
    add::all(tree, id, step_collector)
        .or_else(|| multiply::all(tree, id, step_collector))
        .or_else(|| power::all(tree, id, step_collector))
}
