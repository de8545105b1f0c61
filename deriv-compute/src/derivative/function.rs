//! Symbolic derivatives of the unary functions.

use deriv_error::Error;
use deriv_parser::{tree::error::UnknownOperator, NodeId, OpCode};
use super::{Differentiator, Operand};

/// Computes the derivative of a unary function applied to `u`, and applies the chain rule with
/// the already computed derivative of `u`.
pub(super) fn function_derivative(
    d: &mut Differentiator,
    op: OpCode,
    u: Operand,
) -> Result<NodeId, Error> {
    let Operand { id: u, deriv: inner } = u;
    let outer = match op {
        // sin(u)' = cos(u) * u'
        OpCode::Sin => {
            let u_copy = d.copy(u)?;
            d.unary(OpCode::Cos, u_copy)?
        },

        // cos(u)' = -1 * sin(u) * u'
        OpCode::Cos => {
            let minus_one = d.num(-1.0)?;
            let u_copy = d.copy(u)?;
            let sin = d.unary(OpCode::Sin, u_copy)?;
            d.binary(OpCode::Mul, minus_one, sin)?
        },

        // tg(u)' = (1 / cos(u)^2) * u'
        OpCode::Tan => {
            let one = d.num(1.0)?;
            let u_copy = d.copy(u)?;
            let cos = d.unary(OpCode::Cos, u_copy)?;
            let two = d.num(2.0)?;
            let cos_squared = d.binary(OpCode::Pow, cos, two)?;
            d.binary(OpCode::Div, one, cos_squared)?
        },

        // ln(u)' = (1 / u) * u'
        OpCode::Ln => {
            let one = d.num(1.0)?;
            let u_copy = d.copy(u)?;
            d.binary(OpCode::Div, one, u_copy)?
        },

        // sqrt(u)' = (1 / (2 * sqrt(u))) * u'
        OpCode::Sqrt => {
            let one = d.num(1.0)?;
            let two = d.num(2.0)?;
            let u_copy = d.copy(u)?;
            let sqrt = d.unary(OpCode::Sqrt, u_copy)?;
            let denominator = d.binary(OpCode::Mul, two, sqrt)?;
            d.binary(OpCode::Div, one, denominator)?
        },

        OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div | OpCode::Pow => {
            return Err(Error::detached(UnknownOperator {
                operator: op.to_string(),
                operands: Some(1),
            }));
        },
    };

    d.binary(OpCode::Mul, outer, inner)
}
