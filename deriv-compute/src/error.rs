use ariadne::Fmt;
use deriv_attrs::ErrorKind;
use deriv_error::EXPR;
use deriv_parser::SymbolId;

/// A variable has no value to evaluate to.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = match &self.name {
        Some(name) => format!("the variable `{}` has no value", name),
        None => format!("symbol #{} is not in the symbol table", self.symbol.index()),
    },
    help = format!("bind a value to it, for example with {}", "--at x=1".fg(EXPR)),
)]
pub struct UndefinedVariable {
    /// The symbol that was looked up.
    pub symbol: SymbolId,

    /// The name of the symbol, if it is in the table at all.
    pub name: Option<String>,
}

/// An operation that needs an expression was given an empty tree.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "the expression tree is empty")]
pub struct EmptyTree;
