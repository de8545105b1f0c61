//! Simplification rules for powers.

use crate::{simplify::{rules::{do_binary, Rewrite}, step::Step}, step_collector::StepCollector};
use deriv_parser::{NodeId, OpCode, Tree};

/// `a^0 = 1`
pub fn power_zero(tree: &Tree, id: NodeId, step_collector: &mut dyn StepCollector<Step>) -> Option<Rewrite> {
    let opt = do_binary(tree, id, OpCode::Pow, |_, (_, rhs)| {
        rhs.is_constant(0.0).then_some(Rewrite::Constant(1.0))
    })?;

    step_collector.push(Step::PowerZero);
    Some(opt)
}

/// `1^a = 1`
pub fn power_one_left(tree: &Tree, id: NodeId, step_collector: &mut dyn StepCollector<Step>) -> Option<Rewrite> {
    let opt = do_binary(tree, id, OpCode::Pow, |(_, lhs), _| {
        lhs.is_constant(1.0).then_some(Rewrite::Constant(1.0))
    })?;

    step_collector.push(Step::PowerOneLeft);
    Some(opt)
}

/// `a^1 = a`
pub fn power_one(tree: &Tree, id: NodeId, step_collector: &mut dyn StepCollector<Step>) -> Option<Rewrite> {
    let opt = do_binary(tree, id, OpCode::Pow, |(left, _), (_, rhs)| {
        rhs.is_constant(1.0).then_some(Rewrite::Operand(left))
    })?;

    step_collector.push(Step::PowerOne);
    Some(opt)
}

/// Applies all power rules.
pub fn all(tree: &Tree, id: NodeId, step_collector: &mut dyn StepCollector<Step>) -> Option<Rewrite> {
    power_zero(tree, id, step_collector)
        .or_else(|| power_one_left(tree, id, step_collector))
        .or_else(|| power_one(tree, id, step_collector))
}
