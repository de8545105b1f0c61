use deriv_error::Error;
use std::{fmt, str::FromStr};
use super::error::UnknownOperator;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The number of operands an operator takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// The operator uses only the right child of its node, such as `sin(x)`.
    Unary,

    /// The operator uses both children of its node, such as `a + b`.
    Binary,
}

/// The precedence of a binary operator, in order from lowest precedence (evaluated last) to
/// highest precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`) and division (`/`), which separate factors.
    Factor,

    /// Precedence of exponentiation (`^`).
    Exp,
}

/// An operator stored in an operator node.
///
/// The discriminants are the stable numeric codes of the operators, accepted by
/// [`OpCode::try_from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum OpCode {
    /// `a + b`
    Add = 0,

    /// `a - b`
    Sub = 1,

    /// `a * b`
    Mul = 2,

    /// `a / b`
    Div = 3,

    /// `sqrt(a)`
    Sqrt = 4,

    /// `sin(a)`
    Sin = 5,

    /// `cos(a)`
    Cos = 6,

    /// `tg(a)`, the tangent.
    Tan = 7,

    /// `ln(a)`
    Ln = 8,

    /// `a ^ b`
    Pow = 9,
}

impl OpCode {
    /// Every operator, in code order.
    pub const ALL: [OpCode; 10] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Sqrt,
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Ln,
        Self::Pow,
    ];

    /// Returns the number of operands the operator takes.
    pub fn arity(self) -> Arity {
        match self {
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Pow => Arity::Binary,
            Self::Sqrt | Self::Sin | Self::Cos | Self::Tan | Self::Ln => Arity::Unary,
        }
    }

    /// Returns true if the operator takes a single operand.
    pub fn is_unary(self) -> bool {
        self.arity() == Arity::Unary
    }

    /// Returns the precedence of a binary operator, or [`None`] for function-like operators.
    pub fn precedence(self) -> Option<Precedence> {
        match self {
            Self::Add | Self::Sub => Some(Precedence::Term),
            Self::Mul | Self::Div => Some(Precedence::Factor),
            Self::Pow => Some(Precedence::Exp),
            Self::Sqrt | Self::Sin | Self::Cos | Self::Tan | Self::Ln => None,
        }
    }

    /// The text of the operator in infix notation: the operator symbol for binary operators, and
    /// the function name for unary operators.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Sqrt => "sqrt",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tg",
            Self::Ln => "ln",
            Self::Pow => "^",
        }
    }

    /// The LaTeX command or symbol for the operator.
    pub fn latex(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "\\cdot",
            Self::Div => "\\frac",
            Self::Sqrt => "\\sqrt",
            Self::Sin => "\\sin",
            Self::Cos => "\\cos",
            Self::Tan => "\\operatorname{tg}",
            Self::Ln => "\\ln",
            Self::Pow => "^",
        }
    }

    /// Returns the unary operator called by the given function name, as written in source code.
    pub fn from_function_name(name: &str) -> Option<Self> {
        match name {
            "sqrt" => Some(Self::Sqrt),
            "sin" => Some(Self::Sin),
            "cos" => Some(Self::Cos),
            "tg" => Some(Self::Tan),
            "ln" => Some(Self::Ln),
            _ => None,
        }
    }

    /// Applies a binary operator to two numbers. Unary operators ignore `lhs`.
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => lhs / rhs,
            Self::Pow => lhs.powf(rhs),
            Self::Sqrt => rhs.sqrt(),
            Self::Sin => rhs.sin(),
            Self::Cos => rhs.cos(),
            Self::Tan => rhs.tan(),
            Self::Ln => rhs.ln(),
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl TryFrom<u8> for OpCode {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL.get(code as usize)
            .copied()
            .ok_or_else(|| Error::detached(UnknownOperator {
                operator: code.to_string(),
                operands: None,
            }))
    }
}

impl FromStr for OpCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Self::Add),
            "-" => Ok(Self::Sub),
            "*" => Ok(Self::Mul),
            "/" => Ok(Self::Div),
            "^" => Ok(Self::Pow),
            "tan" => Ok(Self::Tan),
            name => Self::from_function_name(name).ok_or_else(|| Error::detached(UnknownOperator {
                operator: name.to_string(),
                operands: None,
            })),
        }
    }
}
