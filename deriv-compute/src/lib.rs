//! Symbolic differentiation, simplification and numeric evaluation of the expression trees built
//! by [`deriv_parser`].
//!
//! A typical pipeline parses an expression, differentiates it, simplifies the result and
//! evaluates it at a point:
//!
//! ```
//! use deriv_compute::{derivative, evaluate, simplify};
//! use deriv_parser::parse;
//!
//! let (tree, mut symbols) = parse("x^3").unwrap();
//! let x = symbols.lookup("x").unwrap();
//!
//! let mut deriv = derivative(&tree, x).unwrap();
//! simplify(&mut deriv).unwrap();
//! assert_eq!(deriv.view(&symbols).to_string(), "3 * x^2");
//!
//! symbols.bind("x", 2.0);
//! assert_eq!(evaluate(&deriv, &symbols).unwrap(), 12.0);
//! ```

pub mod derivative;
pub mod error;
pub mod eval;
pub mod simplify;
pub mod step_collector;

#[cfg(test)]
mod proptests;

pub use derivative::{derivative, derivative_node, nth_derivative};
pub use eval::{evaluate, evaluate_node};
pub use simplify::{simplify, simplify_with, simplify_with_steps, Simplified};

