//! Simplification rules for addition and subtraction.

use crate::{simplify::{rules::{do_binary, Rewrite}, step::Step}, step_collector::StepCollector};
use deriv_parser::{NodeId, OpCode, Tree};

/// `0+a = a`
/// `a+0 = a`
pub fn add_zero(tree: &Tree, id: NodeId, step_collector: &mut dyn StepCollector<Step>) -> Option<Rewrite> {
    let opt = do_binary(tree, id, OpCode::Add, |(left, lhs), (right, rhs)| {
        if lhs.is_constant(0.0) {
            Some(Rewrite::Operand(right))
        } else if rhs.is_constant(0.0) {
            Some(Rewrite::Operand(left))
        } else {
            None
        }
    })?;

    step_collector.push(Step::AddZero);
    Some(opt)
}

/// `a-0 = a`
pub fn subtract_zero(tree: &Tree, id: NodeId, step_collector: &mut dyn StepCollector<Step>) -> Option<Rewrite> {
    let opt = do_binary(tree, id, OpCode::Sub, |(left, _), (_, rhs)| {
        rhs.is_constant(0.0).then_some(Rewrite::Operand(left))
    })?;

    step_collector.push(Step::SubtractZero);
    Some(opt)
}

/// Applies all addition rules.
pub fn all(tree: &Tree, id: NodeId, step_collector: &mut dyn StepCollector<Step>) -> Option<Rewrite> {
    add_zero(tree, id, step_collector)
        .or_else(|| subtract_zero(tree, id, step_collector))
}
