//! Symbolic differentiation.
//!
//! [`derivative`] walks the input tree and builds the derivative as a brand-new tree. The input
//! is never modified, and no node is shared between the two: wherever a rule needs an operand of
//! the input verbatim (such as `g` in `(f*g)' = f'*g + f*g'`), the operand is deep-copied into the
//! output.
//!
//! The walk is a bottom-up [`Tree::fold`]: the derivatives of a node's operands are built before
//! the rule for the node itself runs, so trees of any depth can be differentiated.
//!
//! The output is not simplified, and is usually much larger than it needs to be. Pass it to
//! [`simplify`](crate::simplify()) to clean it up.

mod function;

use crate::{error::EmptyTree, simplify::simplify_with};
use deriv_error::Error;
use deriv_parser::{
    tree::error::{CorruptTree, UnknownOperator},
    Limits,
    NodeData,
    NodeId,
    OpCode,
    SymbolId,
    Tree,
};
use log::debug;

/// An operand of the input, paired with the root of its derivative in the output.
#[derive(Debug, Clone, Copy)]
struct Operand {
    /// The operand in the input.
    id: NodeId,

    /// Its derivative in the output.
    deriv: NodeId,
}

/// Builds the derivative of one tree into another.
struct Differentiator<'a> {
    /// The tree being differentiated.
    source: &'a Tree,

    /// The variable to differentiate with respect to.
    var: SymbolId,

    /// The tree the derivative is built in.
    out: &'a mut Tree,
}

impl Differentiator<'_> {
    /// Allocates a constant in the output.
    fn num(&mut self, value: f64) -> Result<NodeId, Error> {
        self.out.constant(value)
    }

    /// Copies an operand of the input into the output.
    fn copy(&mut self, id: NodeId) -> Result<NodeId, Error> {
        self.out.import_subtree(self.source, id)
    }

    fn unary(&mut self, op: OpCode, operand: NodeId) -> Result<NodeId, Error> {
        self.out.unary(op, operand)
    }

    fn binary(&mut self, op: OpCode, lhs: NodeId, rhs: NodeId) -> Result<NodeId, Error> {
        self.out.binary(op, lhs, rhs)
    }

    /// Differentiates the subtree rooted at `id`, returning the root of its derivative in the
    /// output.
    fn derive(&mut self, id: NodeId) -> Result<NodeId, Error> {
        let source = self.source;
        source.fold(id, |id, data, left, right| self.rule(id, data, left, right))
    }

    /// Builds the derivative of a single node, given the derivatives of its operands.
    fn rule(
        &mut self,
        id: NodeId,
        data: NodeData,
        left: Option<NodeId>,
        right: Option<NodeId>,
    ) -> Result<NodeId, Error> {
        match data {
            // c' = 0
            NodeData::Constant(_) => self.num(0.0),

            // x' = 1, and any other variable is held constant
            NodeData::Variable(symbol) => self.num(if symbol == self.var { 1.0 } else { 0.0 }),

            NodeData::Operator { op, left: Some(f), right: g } if !op.is_unary() => {
                let f = Operand { id: f, deriv: derived(id, left)? };
                let g = Operand { id: g, deriv: derived(id, right)? };
                self.binary_rule(op, f, g)
            },
            NodeData::Operator { op, left: None, right: u } if op.is_unary() => {
                let u = Operand { id: u, deriv: derived(id, right)? };
                function::function_derivative(self, op, u)
            },
            NodeData::Operator { op, .. } => Err(Error::detached(UnknownOperator {
                operator: op.to_string(),
                operands: Some(data.children().count()),
            })),
        }
    }

    /// Differentiates a binary operator applied to `f` and `g`.
    fn binary_rule(&mut self, op: OpCode, f: Operand, g: Operand) -> Result<NodeId, Error> {
        match op {
            // (f ± g)' = f' ± g'
            OpCode::Add | OpCode::Sub => self.binary(op, f.deriv, g.deriv),
            OpCode::Mul => self.product_rule(f, g),
            OpCode::Div => self.quotient_rule(f, g),
            OpCode::Pow => match self.monomial_exponent(f.id, g.id) {
                Some(exponent) => {
                    // the exponent is constant, so its derivative is not needed
                    self.out.destroy_subtree(Some(g.deriv));
                    self.power_rule(f, exponent)
                },
                None => self.general_power_rule(f, g),
            },
            OpCode::Sqrt | OpCode::Sin | OpCode::Cos | OpCode::Tan | OpCode::Ln => {
                Err(Error::detached(UnknownOperator {
                    operator: op.to_string(),
                    operands: Some(2),
                }))
            },
        }
    }

    /// `(f * g)' = f' * g + f * g'`
    fn product_rule(&mut self, f: Operand, g: Operand) -> Result<NodeId, Error> {
        let g_copy = self.copy(g.id)?;
        let lhs = self.binary(OpCode::Mul, f.deriv, g_copy)?;

        let f_copy = self.copy(f.id)?;
        let rhs = self.binary(OpCode::Mul, f_copy, g.deriv)?;

        self.binary(OpCode::Add, lhs, rhs)
    }

    /// `(f / g)' = (f' * g - f * g') / g^2`
    fn quotient_rule(&mut self, f: Operand, g: Operand) -> Result<NodeId, Error> {
        let g_copy = self.copy(g.id)?;
        let lhs = self.binary(OpCode::Mul, f.deriv, g_copy)?;

        let f_copy = self.copy(f.id)?;
        let rhs = self.binary(OpCode::Mul, f_copy, g.deriv)?;

        let numerator = self.binary(OpCode::Sub, lhs, rhs)?;
        let g_copy = self.copy(g.id)?;
        let two = self.num(2.0)?;
        let denominator = self.binary(OpCode::Pow, g_copy, two)?;
        self.binary(OpCode::Div, numerator, denominator)
    }

    /// Returns the exponent of `base^exponent` if it is a monomial: a variable raised to a
    /// nonzero constant.
    fn monomial_exponent(&self, base: NodeId, exponent: NodeId) -> Option<f64> {
        let base = self.source.get(base)?.data();
        let exponent = self.source.get(exponent)?.data().as_constant()?;
        (base.as_variable().is_some() && exponent != 0.0).then_some(exponent)
    }

    /// `(x^c)' = (c * x^(c - 1)) * x'`, for a variable `x` and a constant `c`
    fn power_rule(&mut self, base: Operand, exponent: f64) -> Result<NodeId, Error> {
        let coefficient = self.num(exponent)?;
        let base_copy = self.copy(base.id)?;
        let lowered = self.num(exponent - 1.0)?;
        let power = self.binary(OpCode::Pow, base_copy, lowered)?;
        let scaled = self.binary(OpCode::Mul, coefficient, power)?;
        self.binary(OpCode::Mul, scaled, base.deriv)
    }

    /// `(f^g)' = f^g * ((g / f) * f' + g' * ln(f))`
    fn general_power_rule(&mut self, f: Operand, g: Operand) -> Result<NodeId, Error> {
        let f_copy = self.copy(f.id)?;
        let g_copy = self.copy(g.id)?;
        let power = self.binary(OpCode::Pow, f_copy, g_copy)?;

        let g_copy = self.copy(g.id)?;
        let f_copy = self.copy(f.id)?;
        let ratio = self.binary(OpCode::Div, g_copy, f_copy)?;
        let base_term = self.binary(OpCode::Mul, ratio, f.deriv)?;

        let f_copy = self.copy(f.id)?;
        let ln = self.unary(OpCode::Ln, f_copy)?;
        let exponent_term = self.binary(OpCode::Mul, g.deriv, ln)?;

        let sum = self.binary(OpCode::Add, base_term, exponent_term)?;
        self.binary(OpCode::Mul, power, sum)
    }
}

/// Unwraps the derivative of an operand of `id`, which the fold supplies for every operand the
/// node holds.
fn derived(id: NodeId, deriv: Option<NodeId>) -> Result<NodeId, Error> {
    deriv.ok_or_else(|| Error::detached(CorruptTree {
        node: id,
        problem: "operand was not differentiated",
    }))
}

/// Differentiates the subtree of `source` rooted at `id` with respect to `var`, building the
/// derivative into `out` as a detached subtree. Returns the root of the derivative.
///
/// Fails with [`UnknownOperator`] if an operator node does not hold the operands its operator
/// requires. The subtree may be of any depth.
pub fn derivative_node(
    source: &Tree,
    id: NodeId,
    var: SymbolId,
    out: &mut Tree,
) -> Result<NodeId, Error> {
    let mut differentiator = Differentiator { source, var, out };
    differentiator.derive(id)
}

/// Computes the derivative of the tree with respect to the given variable, as a new tree with the
/// same node budget.
///
/// Any variable other than `var` is treated as a constant.
pub fn derivative(tree: &Tree, var: SymbolId) -> Result<Tree, Error> {
    let root = tree.root().ok_or_else(|| Error::detached(EmptyTree))?;

    let mut out = tree.empty_like();
    let deriv = derivative_node(tree, root, var, &mut out)?;
    out.set_root(Some(deriv));
    out.set_parents(Some(deriv));

    debug!(
        "derivative with respect to symbol #{}: {} node(s) in, {} node(s) out",
        var.index(),
        tree.len(),
        out.len(),
    );
    Ok(out)
}

/// Computes the `order`-th derivative of the tree, simplifying after each differentiation.
///
/// The zeroth derivative is a copy of the tree itself.
pub fn nth_derivative(
    tree: &Tree,
    var: SymbolId,
    order: usize,
    limits: &Limits,
) -> Result<Tree, Error> {
    let mut current = tree.clone();
    for n in 1..=order {
        current = derivative(&current, var)?;
        let outcome = simplify_with(&mut current, limits, &mut ())?;
        debug!("derivative of order {}: {:?}", n, outcome);
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{assert_float_absolute_eq, assert_float_relative_eq};
    use crate::{eval::evaluate, simplify::simplify};
    use deriv_parser::{parse, SymbolTable};
    use pretty_assertions::assert_eq;
    use super::*;

    /// Evaluates the tree with `x` bound to the given value.
    fn eval_x(tree: &Tree, symbols: &SymbolTable, x: f64) -> f64 {
        let mut symbols = symbols.clone();
        symbols.bind("x", x);
        evaluate(tree, &symbols).unwrap()
    }

    /// Performs a central finite difference to approximate the derivative of the tree.
    fn finite_difference(tree: &Tree, symbols: &SymbolTable, x: f64) -> f64 {
        const DX: f64 = 1e-6;
        (eval_x(tree, symbols, x + DX) - eval_x(tree, symbols, x - DX)) / (2.0 * DX)
    }

    /// Checks the symbolic derivative of the function against a numerical one at every point.
    fn test_for_function(function: &'static str, points: impl IntoIterator<Item = f64>) {
        const TOL: f64 = 1e-4;

        let (tree, mut symbols) = parse(function).unwrap();
        let x = symbols.intern("x");
        let symbolic = derivative(&tree, x).unwrap();
        symbolic.verify().unwrap();

        for point in points {
            let symbolically_computed = eval_x(&symbolic, &symbols, point);
            let numerically_computed = finite_difference(&tree, &symbols, point);

            assert!(
                (symbolically_computed - numerically_computed).abs() < TOL,
                "For \"{function}\" at x={point}, symbolically computed derivative was {symbolically_computed} but numerically computed derivative was {numerically_computed}",
            );
        }
    }

    /// Differentiates and simplifies the source, returning the result as infix text.
    fn simplified_derivative(source: &str) -> String {
        let (tree, mut symbols) = parse(source).unwrap();
        let x = symbols.intern("x");
        let mut deriv = derivative(&tree, x).unwrap();
        simplify(&mut deriv).unwrap();
        deriv.view(&symbols).to_string()
    }

    #[test]
    fn power_rule() {
        test_for_function("x^2 + x + 1", [0., 1., 2., 5., 8.]);
        test_for_function("x^-2 - 3 * x^0.5", [0.5, 1., 2., 7.]);
    }

    #[test]
    fn product_and_quotient_rules() {
        test_for_function("x * sin(x)", [-2., 0., 1., 3.]);
        test_for_function("(x^2 + 1) / (x - 3)", [-1., 0., 2., 5.]);
    }

    #[test]
    fn functions() {
        test_for_function("sin(x) + cos(x)", [-1., 0., 0.5, 2.]);
        test_for_function("tg(x)", [-1., 0., 0.3, 1.]);
        test_for_function("ln(x^2 + 1)", [-3., 0., 1., 4.]);
        test_for_function("sqrt(x + 4)", [-2., 0., 5.]);
        test_for_function("sin(cos(x))^2", [0., 0.5, 1.]);
    }

    #[test]
    fn general_power_rule() {
        test_for_function("2^x", [-1., 0., 1., 3.]);
        test_for_function("x^x", [0.5, 1., 2.]);
        test_for_function("(x + 1)^3", [0., 1., 2.]);
    }

    #[test]
    fn end_to_end() {
        let (tree, mut symbols) = parse("x^2").unwrap();
        let x = symbols.intern("x");
        let mut deriv = derivative(&tree, x).unwrap();
        simplify(&mut deriv).unwrap();
        assert_float_absolute_eq!(eval_x(&deriv, &symbols, 5.0), 10.0);

        let (tree, mut symbols) = parse("sin(x)").unwrap();
        let x = symbols.intern("x");
        let mut deriv = derivative(&tree, x).unwrap();
        simplify(&mut deriv).unwrap();
        assert_float_absolute_eq!(eval_x(&deriv, &symbols, 0.0), 1.0);
    }

    #[test]
    fn simplified_forms() {
        assert_eq!(simplified_derivative("x^3"), "3 * x^2");
        assert_eq!(simplified_derivative("x^2"), "2 * x");
        assert_eq!(simplified_derivative("5 * x"), "5");
        assert_eq!(simplified_derivative("sin(x)"), "cos(x)");
        assert_eq!(simplified_derivative("cos(x)"), "-1 * sin(x)");
        assert_eq!(simplified_derivative("ln(x)"), "1 / x");
        assert_eq!(simplified_derivative("7"), "0");
    }

    #[test]
    fn other_variables_are_constant() {
        assert_eq!(simplified_derivative("y"), "0");
        assert_eq!(simplified_derivative("y * x"), "y");
        assert_eq!(simplified_derivative("y^2 + x"), "1");
    }

    #[test]
    fn input_is_untouched() {
        let (tree, mut symbols) = parse("x * sin(x)").unwrap();
        let before = tree.view(&symbols).to_string();
        let x = symbols.intern("x");

        let deriv = derivative(&tree, x).unwrap();
        assert_eq!(tree.view(&symbols).to_string(), before);
        assert_eq!(deriv.view(&symbols).to_string(), "1 * sin(x) + x * (cos(x) * 1)");
    }

    #[test]
    fn malformed_operator() {
        let mut tree = Tree::new();
        let one = tree.constant(1.0).unwrap();
        let bad = tree.create_node(None, NodeData::Operator {
            op: OpCode::Add,
            left: None,
            right: one,
        }).unwrap();
        tree.set_root(Some(bad));

        let x = SymbolTable::new().intern("x");
        let err = derivative(&tree, x).unwrap_err();
        assert_eq!(err.downcast_ref::<UnknownOperator>(), Some(&UnknownOperator {
            operator: "+".to_string(),
            operands: Some(1),
        }));
    }

    #[test]
    fn empty_tree() {
        let x = SymbolTable::new().intern("x");
        let err = derivative(&Tree::new(), x).unwrap_err();
        assert!(err.is::<EmptyTree>());
    }

    #[test]
    fn long_chain_under_function() {
        // sin(x + x + ... + x) with 20000 terms
        let source = format!("sin({}x)", "x+".repeat(19_999));
        let (tree, mut symbols) = parse(&source).unwrap();
        let x = symbols.intern("x");

        let deriv = derivative(&tree, x).unwrap();
        deriv.verify().unwrap();

        let printed = deriv.view(&symbols).to_string();
        assert!(printed.starts_with("cos(x + x + x"));
        assert!(printed.ends_with("1 + 1 + 1)"));
        assert_float_relative_eq!(eval_x(&deriv, &symbols, 0.5), 10_000f64.cos() * 20_000.0, 1e-6);
    }

    #[test]
    fn deep_nesting() {
        // sin(sin(...sin(x)...)), deeper than the parser allows
        let mut tree = Tree::new();
        let x = SymbolTable::new().intern("x");
        let mut node = tree.variable(x).unwrap();
        for _ in 0..1_200 {
            node = tree.unary(OpCode::Sin, node).unwrap();
        }
        tree.set_root(Some(node));

        let deriv = derivative(&tree, x).unwrap();
        deriv.verify().unwrap();
        assert_eq!(deriv.depth(), 1_202);
    }

    #[test]
    fn higher_orders() {
        let (tree, mut symbols) = parse("x^4").unwrap();
        let x = symbols.intern("x");
        let limits = Limits::default();

        let second = nth_derivative(&tree, x, 2, &limits).unwrap();
        assert_eq!(second.view(&symbols).to_string(), "4 * (3 * x^2)");

        let zeroth = nth_derivative(&tree, x, 0, &limits).unwrap();
        assert_eq!(zeroth.view(&symbols).to_string(), "x^4");

        let fifth = nth_derivative(&tree, x, 5, &limits).unwrap();
        assert_eq!(fifth.view(&symbols).to_string(), "0");
    }
}
