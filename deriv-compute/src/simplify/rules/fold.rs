//! Constant folding.

use crate::{simplify::{rules::Rewrite, step::Step}, step_collector::StepCollector};
use deriv_parser::{NodeData, NodeId, Tree};

/// `2+3 = 5`, `2^3 = 8`, etc.
///
/// Only binary operators are folded; `sin(0)` and other unary operators applied to constants are
/// left as they are.
pub fn fold_constant(tree: &Tree, id: NodeId, step_collector: &mut dyn StepCollector<Step>) -> Option<Rewrite> {
    let NodeData::Operator { op, left: Some(left), right } = *tree.get(id)?.data() else {
        return None;
    };
    if op.is_unary() {
        return None;
    }

    let lhs = tree.get(left)?.data().as_constant()?;
    let rhs = tree.get(right)?.data().as_constant()?;

    step_collector.push(Step::FoldConstant);
    Some(Rewrite::Constant(op.apply(lhs, rhs)))
}
