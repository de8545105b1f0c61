//! Parsing of arithmetic expressions into an arena-backed expression tree.
//!
//! The entry point is [`parse`], which turns source text such as `x^2 + sin(x)` into a
//! [`Tree`] and the [`SymbolTable`] holding the variables it mentions:
//!
//! ```
//! use deriv_parser::parse;
//!
//! let (tree, symbols) = parse("x^2 + sin(x)").unwrap();
//! assert_eq!(symbols.len(), 1);
//! assert_eq!(tree.view(&symbols).to_string(), "x^2 + sin(x)");
//! ```
//!
//! The tree itself is described in the [`tree`] module; the grammar accepted by the parser is
//! described in the [`parser`] module.

pub mod config;
pub mod fmt;
pub mod parser;
pub mod tokenizer;
pub mod tree;

pub use config::{Limits, LimitsBuilder};
pub use fmt::{ExprView, Latex, LatexFormatter};
pub use parser::{parse, Parser};
pub use tree::{Node, NodeData, NodeId, OpCode, SymbolId, SymbolTable, Tree};
