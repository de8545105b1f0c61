//! Numeric evaluation of expression trees.

use crate::error::{EmptyTree, UndefinedVariable};
use deriv_error::Error;
use deriv_parser::{NodeData, NodeId, SymbolTable, Tree};
use log::warn;

/// Evaluates the tree, looking up the value of each variable in the symbol table.
///
/// Fails with [`EmptyTree`] if the tree has no root, and with [`UndefinedVariable`] if a variable
/// has no value bound to it.
pub fn evaluate(tree: &Tree, symbols: &SymbolTable) -> Result<f64, Error> {
    let root = tree.root().ok_or_else(|| Error::detached(EmptyTree))?;
    evaluate_node(tree, root, symbols)
}

/// Evaluates the subtree rooted at `id`, operands first.
///
/// An operator node that does not hold the operands its operator requires evaluates to NaN
/// instead of failing; the problem is logged as a warning.
pub fn evaluate_node(tree: &Tree, id: NodeId, symbols: &SymbolTable) -> Result<f64, Error> {
    tree.fold(id, |id, data, lhs, rhs| match data {
        NodeData::Constant(value) => Ok(value),
        NodeData::Variable(symbol) => symbols.value(symbol).ok_or_else(|| {
            Error::detached(UndefinedVariable {
                symbol,
                name: symbols.name(symbol).map(str::to_string),
            })
        }),
        NodeData::Operator { op, .. } if !data.is_well_formed() => {
            warn!(
                "operator `{}` at node {} has {} operand(s); evaluating to NaN",
                op,
                id.index(),
                data.children().count(),
            );
            Ok(f64::NAN)
        },
        NodeData::Operator { op, .. } => {
            Ok(op.apply(lhs.unwrap_or(f64::NAN), rhs.unwrap_or(f64::NAN)))
        },
    })
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{assert_float_absolute_eq, assert_float_relative_eq};
    use deriv_parser::{parse, OpCode};
    use pretty_assertions::assert_eq;
    use super::*;

    /// Parses the source and evaluates it with the given bindings.
    fn eval_with(source: &str, bindings: &[(&str, f64)]) -> Result<f64, Error> {
        let (tree, mut symbols) = parse(source).unwrap();
        for (name, value) in bindings {
            symbols.bind(name, *value);
        }
        evaluate(&tree, &symbols)
    }

    fn eval(source: &str) -> f64 {
        eval_with(source, &[]).unwrap()
    }

    #[test]
    fn precedence() {
        assert_eq!(eval("2+3*4"), 14.0);
        assert_eq!(eval("(2+3)*4"), 20.0);
        assert_eq!(eval("2*3^2"), 18.0);
        assert_eq!(eval("2^3^2"), 64.0);
        assert_eq!(eval("10 - 4 - 3"), 3.0);
        assert_eq!(eval("8 / 4 / 2"), 1.0);
    }

    #[test]
    fn functions() {
        assert_float_absolute_eq!(eval("sin(0)"), 0.0);
        assert_float_absolute_eq!(eval("cos(0)"), 1.0);
        assert_float_absolute_eq!(eval("tg(1)"), 1.0f64.tan());
        assert_float_absolute_eq!(eval("ln(1)"), 0.0);
        assert_float_absolute_eq!(eval("sqrt(16)"), 4.0);
    }

    #[test]
    fn variables() {
        let value = eval_with("x^2 + y", &[("x", 3.0), ("y", 0.5)]).unwrap();
        assert_float_relative_eq!(value, 9.5);
    }

    #[test]
    fn unbound_variable() {
        let err = eval_with("x + y", &[("x", 1.0)]).unwrap_err();
        let kind = err.downcast_ref::<UndefinedVariable>().unwrap();
        assert_eq!(kind.name.as_deref(), Some("y"));
        assert_eq!(err.to_string(), "the variable `y` has no value");
    }

    #[test]
    fn symbol_missing_from_table() {
        let (tree, symbols) = parse("x").unwrap();
        let err = evaluate(&tree, &SymbolTable::new()).unwrap_err();
        assert_eq!(err.downcast_ref::<UndefinedVariable>(), Some(&UndefinedVariable {
            symbol: symbols.lookup("x").unwrap(),
            name: None,
        }));
    }

    #[test]
    fn domain_errors_are_nan() {
        assert!(eval("ln(0 - 1)").is_nan());
        assert!(eval("sqrt(0 - 4)").is_nan());
        assert_eq!(eval("1 / 0"), f64::INFINITY);
    }

    #[test]
    fn malformed_operator_is_nan() {
        let mut tree = Tree::new();
        let one = tree.constant(1.0).unwrap();
        let two = tree.constant(2.0).unwrap();
        let bad = tree.create_node(None, NodeData::Operator {
            op: OpCode::Sin,
            left: Some(one),
            right: two,
        }).unwrap();
        tree.set_root(Some(bad));

        assert!(evaluate(&tree, &SymbolTable::new()).unwrap().is_nan());
    }

    #[test]
    fn empty_tree() {
        let err = evaluate(&Tree::new(), &SymbolTable::new()).unwrap_err();
        assert!(err.is::<EmptyTree>());
    }

    #[test]
    fn long_sum() {
        let source = vec!["x"; 20_000].join(" + ");
        assert_eq!(eval_with(&source, &[("x", 0.5)]).unwrap(), 10_000.0);
    }
}
