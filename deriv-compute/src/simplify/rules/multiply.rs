//! Simplification rules for multiplication and division.

use crate::{simplify::{rules::{do_binary, Rewrite}, step::Step}, step_collector::StepCollector};
use deriv_parser::{NodeId, OpCode, Tree};

/// `0*a = 0`
/// `a*0 = 0`
pub fn multiply_zero(tree: &Tree, id: NodeId, step_collector: &mut dyn StepCollector<Step>) -> Option<Rewrite> {
    let opt = do_binary(tree, id, OpCode::Mul, |(_, lhs), (_, rhs)| {
        (lhs.is_constant(0.0) || rhs.is_constant(0.0)).then_some(Rewrite::Constant(0.0))
    })?;

    // keep the step collection logic outside of the closure
    step_collector.push(Step::MultiplyZero);
    Some(opt)
}

/// `1*a = a`
/// `a*1 = a`
pub fn multiply_one(tree: &Tree, id: NodeId, step_collector: &mut dyn StepCollector<Step>) -> Option<Rewrite> {
    let opt = do_binary(tree, id, OpCode::Mul, |(left, lhs), (right, rhs)| {
        if lhs.is_constant(1.0) {
            Some(Rewrite::Operand(right))
        } else if rhs.is_constant(1.0) {
            Some(Rewrite::Operand(left))
        } else {
            None
        }
    })?;

    step_collector.push(Step::MultiplyOne);
    Some(opt)
}

/// `0/a = 0`
pub fn divide_zero(tree: &Tree, id: NodeId, step_collector: &mut dyn StepCollector<Step>) -> Option<Rewrite> {
    let opt = do_binary(tree, id, OpCode::Div, |(_, lhs), _| {
        lhs.is_constant(0.0).then_some(Rewrite::Constant(0.0))
    })?;

    step_collector.push(Step::DivideZero);
    Some(opt)
}

/// `a/1 = a`
pub fn divide_one(tree: &Tree, id: NodeId, step_collector: &mut dyn StepCollector<Step>) -> Option<Rewrite> {
    let opt = do_binary(tree, id, OpCode::Div, |(left, _), (_, rhs)| {
        rhs.is_constant(1.0).then_some(Rewrite::Operand(left))
    })?;

    step_collector.push(Step::DivideOne);
    Some(opt)
}

/// Applies all multiplication and division rules.
pub fn all(tree: &Tree, id: NodeId, step_collector: &mut dyn StepCollector<Step>) -> Option<Rewrite> {
    multiply_zero(tree, id, step_collector)
        .or_else(|| multiply_one(tree, id, step_collector))
        .or_else(|| divide_zero(tree, id, step_collector))
        .or_else(|| divide_one(tree, id, step_collector))
}
