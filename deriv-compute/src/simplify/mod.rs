//! Module to simplify expression trees.
//!
//! This module provides the [`simplify()`] function, which rewrites a tree in place into a form
//! with fewer nodes. It alternates between two passes until neither finds anything to rewrite:
//!
//! - **constant folding** replaces a binary operator applied to two constants with the result,
//! - **neutral-element elimination** applies identities such as `a*1 = a` and `a^0 = 1`.
//!
//! Each pass walks the tree in pre-order (a node before its children, left before right) and
//! rewrites at most one node, the first one it finds. The rules are listed in [`rules`].
//!
//! The number of passes is bounded by [`Limits::max_simplify_passes`]. If the bound is hit, the
//! tree is left valid but possibly not fully simplified, and [`Simplified::converged`] is false.

pub mod rules;
pub mod step;

use crate::step_collector::StepCollector;
use deriv_error::Error;
use deriv_parser::{Limits, NodeId, Tree};
use log::{debug, warn};
use rules::Rewrite;
use step::Step;

/// The outcome of a simplification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Simplified {
    /// The number of passes run, including the final pass that found nothing to rewrite.
    pub passes: usize,

    /// The number of rewrites applied.
    pub rewrites: usize,

    /// Whether the tree reached a fixpoint before the pass budget ran out.
    pub converged: bool,
}

/// Signature shared by the rule sets.
type RuleSet = fn(&Tree, NodeId, &mut dyn StepCollector<Step>) -> Option<Rewrite>;

/// Finds the first node in pre-order that the rule set applies to, and rewrites it.
///
/// Returns true if a node was rewritten.
fn rewrite_first(
    tree: &mut Tree,
    rule_set: RuleSet,
    step_collector: &mut dyn StepCollector<Step>,
) -> Result<bool, Error> {
    let found = tree.pre_order_iter()
        .find_map(|node_ref| Some((node_ref.id, rule_set(tree, node_ref.id, step_collector)?)));
    let Some((id, rewrite)) = found else {
        return Ok(false);
    };

    debug!("rewriting node {}: {:?}", id.index(), rewrite);
    match rewrite {
        Rewrite::Operand(operand) => {
            tree.replace(id, operand)?;
        },
        Rewrite::Constant(value) => tree.make_constant(id, value)?,
    }
    Ok(true)
}

/// Base implementation of the simplification algorithm.
pub fn simplify_with(
    tree: &mut Tree,
    limits: &Limits,
    step_collector: &mut dyn StepCollector<Step>,
) -> Result<Simplified, Error> {
    let mut outcome = Simplified { passes: 0, rewrites: 0, converged: false };

    while outcome.passes < limits.max_simplify_passes {
        outcome.passes += 1;

        let folded = rewrite_first(tree, rules::fold, step_collector)?;
        let eliminated = rewrite_first(tree, rules::neutral, step_collector)?;
        outcome.rewrites += usize::from(folded) + usize::from(eliminated);

        let changed = folded || eliminated;
        tree.set_changed(changed);
        if !changed {
            outcome.converged = true;
            return Ok(outcome);
        }
    }

    warn!(
        "simplification stopped after {} pass(es) without reaching a fixpoint",
        outcome.passes,
    );
    Ok(outcome)
}

/// Simplify the given tree in place, with the default pass budget.
pub fn simplify(tree: &mut Tree) -> Result<Simplified, Error> {
    simplify_with(tree, &Limits::default(), &mut ())
}

/// Simplify the given tree in place, with the default pass budget. The steps taken by the
/// simplifier will also be collected and returned. This is useful for debugging, and also for
/// displaying the steps taken to the user.
pub fn simplify_with_steps(tree: &mut Tree) -> Result<(Simplified, Vec<Step>), Error> {
    let mut steps = Vec::new();
    let outcome = simplify_with(tree, &Limits::default(), &mut steps)?;
    Ok((outcome, steps))
}
