use ariadne::Fmt;
use deriv_attrs::ErrorKind;
use deriv_error::EXPR;
use super::node::NodeId;

/// An operator has no rule defined for it.
///
/// Either the operator code itself is unknown (`operands` is [`None`]), or an operator node holds
/// a number of operands for which that operator has no rule, such as a `+` node missing its left
/// operand.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = match self.operands {
        Some(operands) => format!("no rule for `{}` applied to {} operand(s)", self.operator, operands),
        None => format!("unknown operator `{}`", self.operator),
    },
    labels = ["this operator"],
    help = format!(
        "the known operators are: {}",
        "+ - * / ^ sqrt sin cos tg ln".fg(EXPR),
    ),
)]
pub struct UnknownOperator {
    /// The operator, as written or as its numeric code.
    pub operator: String,

    /// The number of operands the node held, if the operator itself is known.
    pub operands: Option<usize>,
}

/// A tree ran out of room for new nodes.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("could not allocate a node: the tree already holds {} node(s)", self.live),
    labels = ["while building this expression"],
    help = if self.live >= self.limit {
        format!("the node limit is {}; raise it to work with larger expressions", self.limit)
    } else {
        "the system is out of memory".to_string()
    },
)]
pub struct AllocationFailure {
    /// The number of live nodes at the time of the failure.
    pub live: usize,

    /// The node budget of the tree.
    pub limit: usize,
}

/// A structural invariant of a tree does not hold.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("node {} is corrupt: {}", self.node.index(), self.problem),
    help = "this indicates a bug in the code that edited the tree",
)]
pub struct CorruptTree {
    /// The node where the problem was found.
    pub node: NodeId,

    /// A description of the broken invariant.
    pub problem: &'static str,
}
