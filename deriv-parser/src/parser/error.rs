use ariadne::Fmt;
use deriv_attrs::ErrorKind;
use deriv_error::EXPR;

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of input",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("expected end of input, but found `{}`", self.remaining),
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
    help = "did you forget an operator between two operands?",
)]
pub struct ExpectedEof {
    /// The unconsumed source text, starting at the first token that could not be parsed.
    pub remaining: String,
}

/// A token that cannot start an operand was found where an operand was expected.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unexpected token `{}`", self.found),
    labels = ["I expected to see an operand here"],
    help = format!(
        "an operand is a {}, a {}, a function call such as {}, or a parenthesized expression",
        "number".fg(EXPR),
        "variable".fg(EXPR),
        "sin(x)".fg(EXPR),
    ),
)]
pub struct UnexpectedToken {
    /// The text of the token that was found.
    pub found: String,
}

/// A parenthesis was opened but never closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed parenthesis",
    labels = ["this parenthesis is never closed".to_string(), format!("add a {} here", ")".fg(EXPR))],
)]
pub struct UnclosedParenthesis;

/// A `-` was not immediately followed by a number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected a number after `-`",
    labels = ["this minus sign must be directly followed by digits"],
    help = format!(
        "only numbers can be negated; to negate an expression, multiply it by {}",
        "-1".fg(EXPR),
    ),
)]
pub struct ExpectedNumber;

/// A numeric literal could not be converted to a number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a valid number", self.lexeme),
    labels = ["this literal"],
)]
pub struct InvalidNumber {
    /// The text of the literal.
    pub lexeme: String,
}

/// Parentheses or function calls are nested more deeply than allowed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expression is nested too deeply",
    labels = [format!("this group exceeds the nesting limit of {}", self.limit)],
    help = "split the expression up, or raise the limit with `--max-depth`",
)]
pub struct NestingTooDeep {
    /// The maximum nesting depth.
    pub limit: usize,
}
