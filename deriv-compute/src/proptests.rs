//! Property-based tests for the differentiator and the simplifier.

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_relative_eq;
    use deriv_parser::{parse, SymbolTable, Tree};
    use proptest::prelude::*;

    use crate::{derivative, evaluate, simplify};

    // Strategy for generating expressions in `x` and `y` as source text
    fn expr() -> impl Strategy<Value = String> {
        let leaf = prop_oneof![
            Just("x".to_string()),
            Just("y".to_string()),
            (1u8..10).prop_map(|n| n.to_string()),
        ];
        leaf.prop_recursive(4, 24, 2, |inner| {
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({} + {})", a, b)),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({} - {})", a, b)),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({} * {})", a, b)),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({} / {})", a, b)),
                (inner.clone(), 0u8..4).prop_map(|(a, n)| format!("({})^{}", a, n)),
                inner.clone().prop_map(|a| format!("sin({})", a)),
                inner.clone().prop_map(|a| format!("cos({})", a)),
                inner.prop_map(|a| format!("ln({})", a)),
            ]
        })
    }

    // Strategy for generating expressions made only of small integer constants, without division
    fn constant_expr() -> impl Strategy<Value = String> {
        let leaf = (-5i8..=5).prop_map(|n| n.to_string());
        leaf.prop_recursive(4, 16, 2, |inner| {
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({} + {})", a, b)),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({} - {})", a, b)),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({} * {})", a, b)),
                (inner, 0u8..3).prop_map(|(a, n)| format!("({})^{}", a, n)),
            ]
        })
    }

    // Strategy for generating non-zero exponents
    fn non_zero_exponent() -> impl Strategy<Value = f64> {
        prop_oneof![(-4i32..=-1).prop_map(f64::from), (1i32..=4).prop_map(f64::from), 0.25f64..3.0]
    }

    /// Binds `x` and `y` in the table and evaluates the tree.
    fn eval_at(tree: &Tree, symbols: &SymbolTable, x: f64, y: f64) -> f64 {
        let mut symbols = symbols.clone();
        symbols.bind("x", x);
        symbols.bind("y", y);
        evaluate(tree, &symbols).unwrap()
    }

    /// Compares two results bit for bit, treating every NaN as equal.
    fn same_value(a: f64, b: f64) -> bool {
        (a.is_nan() && b.is_nan()) || a == b
    }

    proptest! {
        #[test]
        fn differentiation_is_linear(a in expr(), b in expr(), x in -3.0f64..3.0, y in -3.0f64..3.0) {
            let (sum, mut symbols) = parse(&format!("{} + {}", a, b)).unwrap();
            let var = symbols.intern("x");
            symbols.intern("y");
            let (a, symbols) = deriv_parser::Parser::with_symbols(&a, symbols).parse_full().unwrap();
            let (b, symbols) = deriv_parser::Parser::with_symbols(&b, symbols).parse_full().unwrap();

            let d_sum = derivative(&sum, var).unwrap();
            let d_a = derivative(&a, var).unwrap();
            let d_b = derivative(&b, var).unwrap();

            let lhs = eval_at(&d_sum, &symbols, x, y);
            let rhs = eval_at(&d_a, &symbols, x, y) + eval_at(&d_b, &symbols, x, y);
            prop_assert!(same_value(lhs, rhs), "{} != {}", lhs, rhs);
        }

        #[test]
        fn folding_preserves_value(source in constant_expr()) {
            let (mut tree, symbols) = parse(&source).unwrap();
            let before = evaluate(&tree, &symbols).unwrap();
            let nodes_before = tree.len();

            let outcome = simplify(&mut tree).unwrap();
            prop_assert!(outcome.converged);
            prop_assert_eq!(tree.len(), 1);
            prop_assert!(tree.len() <= nodes_before);
            prop_assert_eq!(evaluate(&tree, &symbols).unwrap(), before);
        }

        #[test]
        fn simplify_is_idempotent(source in expr()) {
            let (mut tree, symbols) = parse(&source).unwrap();
            simplify(&mut tree).unwrap();
            tree.verify().unwrap();
            let once = tree.view(&symbols).to_string();

            let second = simplify(&mut tree).unwrap();
            prop_assert_eq!(second.rewrites, 0);
            prop_assert_eq!(second.passes, 1);
            prop_assert_eq!(tree.view(&symbols).to_string(), once);
        }

        #[test]
        fn simplify_keeps_value(source in expr(), x in 0.5f64..3.0, y in 0.5f64..3.0) {
            let (tree, symbols) = parse(&source).unwrap();
            let mut simplified = tree.clone();
            simplify(&mut simplified).unwrap();

            let before = eval_at(&tree, &symbols, x, y);
            let after = eval_at(&simplified, &symbols, x, y);
            if before.is_finite() && after.is_finite() {
                prop_assert!((before - after).abs() <= 1e-9 * before.abs().max(1.0), "{} != {}", before, after);
            }
        }

        #[test]
        fn power_rule(n in non_zero_exponent(), x in 0.5f64..4.0) {
            let (tree, mut symbols) = parse(&format!("x^{}", n)).unwrap();
            let var = symbols.intern("x");
            let mut deriv = derivative(&tree, var).unwrap();
            simplify(&mut deriv).unwrap();

            symbols.bind("x", x);
            let expected = n * x.powf(n - 1.0);
            assert_float_relative_eq!(evaluate(&deriv, &symbols).unwrap(), expected, 1e-12);
        }
    }
}
