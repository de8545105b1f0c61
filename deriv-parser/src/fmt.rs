//! Infix and LaTeX formatting of expression trees.
//!
//! A [`Tree`] only stores symbol ids, so it is formatted through an [`ExprView`], which pairs the
//! tree with the [`SymbolTable`] that names its variables.

use crate::tree::{NodeData, NodeId, OpCode, Precedence, SymbolId, SymbolTable, Tree};
use std::fmt::{self, Display, Formatter};

/// A trait for types that can be formatted as LaTeX.
pub trait Latex {
    /// Format the value as LaTeX.
    fn fmt_latex(&self, f: &mut Formatter) -> fmt::Result;

    /// Wraps the value in a [`LatexFormatter`], which implements [`Display`].
    fn as_display(&self) -> LatexFormatter<'_, Self> {
        LatexFormatter(self)
    }
}

/// A wrapper type that implements [`Display`] for any type that implements [`Latex`].
pub struct LatexFormatter<'a, T: ?Sized>(&'a T);

impl<T: ?Sized> Display for LatexFormatter<'_, T>
where
    T: Latex,
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.fmt_latex(f)
    }
}

/// A subtree of a [`Tree`], paired with the symbol table naming its variables.
///
/// The [`Display`] implementation prints infix notation that [`parse`](crate::parse) accepts:
/// re-parsing the output against the same symbol table produces a tree of the same shape.
#[derive(Debug, Clone, Copy)]
pub struct ExprView<'a> {
    tree: &'a Tree,
    symbols: &'a SymbolTable,
    root: Option<NodeId>,
}

impl Tree {
    /// Returns a formattable view of the whole tree.
    pub fn view<'a>(&'a self, symbols: &'a SymbolTable) -> ExprView<'a> {
        self.view_node(self.root(), symbols)
    }

    /// Returns a formattable view of the subtree rooted at `id`.
    pub fn view_node<'a>(&'a self, id: Option<NodeId>, symbols: &'a SymbolTable) -> ExprView<'a> {
        ExprView { tree: self, symbols, root: id }
    }
}

/// The side of a binary operator an operand sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// The notation a view is printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notation {
    Infix,
    Latex,
}

/// A unit of output waiting on the formatting stack.
#[derive(Debug, Clone, Copy)]
enum Piece {
    /// A subtree to format.
    Node(NodeId),

    /// Literal text.
    Text(&'static str),
}

impl<'a> ExprView<'a> {
    /// Returns the view of a child node.
    fn child(&self, id: NodeId) -> Self {
        Self { root: Some(id), ..*self }
    }

    fn data(&self) -> Option<NodeData> {
        self.root.and_then(|id| self.tree.get(id)).map(|node| node.data)
    }

    /// Returns true if this node must be parenthesized as the given operand of `parent`.
    ///
    /// Operands of lower precedence than their operator need parentheses. A right operand of
    /// equal precedence does too, since every operator associates to the left.
    fn needs_parens(&self, parent: Precedence, side: Side) -> bool {
        match self.data().and_then(|data| data.as_operator()).and_then(OpCode::precedence) {
            Some(own) => own < parent || (own == parent && side == Side::Right),
            None => false,
        }
    }

    fn fmt_symbol(&self, f: &mut Formatter, symbol: SymbolId) -> fmt::Result {
        match self.symbols.name(symbol) {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "<unknown symbol {}>", symbol.index()),
        }
    }

    /// Returns true if the node is a binary operator, or a negative constant.
    fn is_compound(&self) -> bool {
        match self.data() {
            Some(NodeData::Operator { op, .. }) => !op.is_unary(),
            Some(NodeData::Constant(value)) => value.is_sign_negative(),
            _ => false,
        }
    }

    /// Returns true if the node must be parenthesized as a LaTeX factor: a sum, a difference or a
    /// negative constant.
    fn is_latex_term(&self) -> bool {
        match self.data() {
            Some(NodeData::Operator { op, .. }) => matches!(op, OpCode::Add | OpCode::Sub),
            Some(NodeData::Constant(value)) => value.is_sign_negative(),
            _ => false,
        }
    }

    /// Formats the view in the given notation.
    ///
    /// Pending output is kept on an explicit stack, so trees of any depth can be printed. Leaves
    /// are written directly; an operator node is expanded into the pieces it prints as.
    fn write(&self, f: &mut Formatter, notation: Notation) -> fmt::Result {
        let mut stack = self.root.map(Piece::Node).into_iter().collect::<Vec<_>>();
        let mut pieces = Vec::new();
        while let Some(piece) = stack.pop() {
            let id = match piece {
                Piece::Text(text) => {
                    f.write_str(text)?;
                    continue;
                },
                Piece::Node(id) => id,
            };
            match self.tree.get(id).map(|node| node.data) {
                None => (),
                Some(NodeData::Constant(value)) => write!(f, "{}", value)?,
                Some(NodeData::Variable(symbol)) => self.fmt_symbol(f, symbol)?,
                Some(NodeData::Operator { op, left, right }) => {
                    match notation {
                        Notation::Infix => self.expand_infix(op, left, right, &mut pieces),
                        Notation::Latex => self.expand_latex(op, left, right, &mut pieces),
                    }
                    stack.extend(pieces.drain(..).rev());
                },
            }
        }
        Ok(())
    }

    /// Pushes the pieces of an operator node in infix notation, in output order.
    fn expand_infix(&self, op: OpCode, left: Option<NodeId>, right: NodeId, out: &mut Vec<Piece>) {
        match (op.precedence(), left) {
            (Some(precedence), Some(left)) => {
                let paren = self.child(left).needs_parens(precedence, Side::Left);
                wrap(out, left, paren, "(", ")");
                match op {
                    OpCode::Pow => out.push(Piece::Text("^")),
                    _ => out.extend([Piece::Text(" "), Piece::Text(op.symbol()), Piece::Text(" ")]),
                }
                let paren = self.child(right).needs_parens(precedence, Side::Right);
                wrap(out, right, paren, "(", ")");
            },
            // malformed nodes print their operands in prefix form
            _ => {
                out.extend([Piece::Text(op.symbol()), Piece::Text("(")]);
                if let Some(left) = left {
                    out.extend([Piece::Node(left), Piece::Text(", ")]);
                }
                out.extend([Piece::Node(right), Piece::Text(")")]);
            },
        }
    }

    /// Pushes the pieces of an operator node in LaTeX, in output order.
    fn expand_latex(&self, op: OpCode, left: Option<NodeId>, right: NodeId, out: &mut Vec<Piece>) {
        let Some(left) = left else {
            match op {
                OpCode::Sqrt => out.extend([
                    Piece::Text("\\sqrt{"),
                    Piece::Node(right),
                    Piece::Text("}"),
                ]),
                _ => {
                    out.extend([Piece::Text(op.latex()), Piece::Text("{")]);
                    wrap(out, right, true, "\\left(", "\\right)");
                    out.push(Piece::Text("}"));
                },
            }
            return;
        };

        let (left_view, right_view) = (self.child(left), self.child(right));
        match op {
            OpCode::Add | OpCode::Sub => {
                out.extend([
                    Piece::Node(left),
                    Piece::Text(" "),
                    Piece::Text(op.latex()),
                    Piece::Text(" "),
                ]);
                let paren = right_view.needs_parens(Precedence::Term, Side::Right)
                    || right_view.data().is_some_and(|data| data.as_constant().is_some_and(f64::is_sign_negative));
                wrap(out, right, paren, "\\left(", "\\right)");
            },
            OpCode::Mul => {
                wrap(out, left, left_view.is_latex_term(), "\\left(", "\\right)");
                out.push(Piece::Text(" \\cdot "));
                wrap(out, right, right_view.is_latex_term(), "\\left(", "\\right)");
            },
            OpCode::Div => out.extend([
                Piece::Text("\\frac{"),
                Piece::Node(left),
                Piece::Text("}{"),
                Piece::Node(right),
                Piece::Text("}"),
            ]),
            OpCode::Pow => {
                out.push(Piece::Text("{"));
                wrap(out, left, left_view.is_compound(), "\\left(", "\\right)");
                out.extend([Piece::Text("}^{"), Piece::Node(right), Piece::Text("}")]);
            },
            _ => out.extend([
                Piece::Text(op.latex()),
                Piece::Text("{"),
                Piece::Node(left),
                Piece::Text(", "),
                Piece::Node(right),
                Piece::Text("}"),
            ]),
        }
    }
}

/// Pushes the node, between `open` and `close` if `paren` is true.
fn wrap(out: &mut Vec<Piece>, id: NodeId, paren: bool, open: &'static str, close: &'static str) {
    if paren {
        out.extend([Piece::Text(open), Piece::Node(id), Piece::Text(close)]);
    } else {
        out.push(Piece::Node(id));
    }
}

impl Display for ExprView<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.write(f, Notation::Infix)
    }
}

impl Latex for ExprView<'_> {
    fn fmt_latex(&self, f: &mut Formatter) -> fmt::Result {
        self.write(f, Notation::Latex)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::parser::{parse, Parser};
    use super::*;

    /// Parses the source and prints it back out in infix notation.
    fn infix(source: &str) -> String {
        let (tree, symbols) = parse(source).unwrap();
        tree.view(&symbols).to_string()
    }

    /// Parses the source and prints it as LaTeX.
    fn latex(source: &str) -> String {
        let (tree, symbols) = parse(source).unwrap();
        tree.view(&symbols).as_display().to_string()
    }

    #[test]
    fn fmt_display() {
        assert_eq!(infix("x^2+sin(x)"), "x^2 + sin(x)");
        assert_eq!(infix("(1 + 2) * 3"), "(1 + 2) * 3");
        assert_eq!(infix("1 + (2 * 3)"), "1 + 2 * 3");
        assert_eq!(infix("tg(x) / ln(y)"), "tg(x) / ln(y)");
        assert_eq!(infix("sqrt(x * -1.5)"), "sqrt(x * -1.5)");
    }

    #[test]
    fn right_operands_of_equal_precedence() {
        assert_eq!(infix("a - (b - c)"), "a - (b - c)");
        assert_eq!(infix("(a - b) - c"), "a - b - c");
        assert_eq!(infix("a / (b * c)"), "a / (b * c)");
        assert_eq!(infix("a^(b^c)"), "a^(b^c)");
        assert_eq!(infix("(a^b)^c"), "a^b^c");
    }

    #[test]
    fn output_reparses_to_same_shape() {
        for source in [
            "x^2 + sin(x)",
            "a - (b - (c - d))",
            "(x + 1)^(y - 2) / -3",
            "ln(cos(x)^2) * (2 - x^-1)",
            "sqrt(sqrt(x)) - tg(x / 2)",
        ] {
            let (tree, symbols) = parse(source).unwrap();
            let printed = tree.view(&symbols).to_string();
            let (reparsed, symbols) = Parser::with_symbols(&printed, symbols).parse_full().unwrap();
            assert_eq!(reparsed.view(&symbols).to_string(), printed);
            assert_eq!(reparsed.len(), tree.len());
        }
    }

    #[test]
    fn empty_tree_prints_nothing() {
        let tree = Tree::new();
        let symbols = SymbolTable::new();
        assert_eq!(tree.view(&symbols).to_string(), "");
    }

    #[test]
    fn fmt_latex() {
        assert_eq!(latex("x^2 + 1"), "{x}^{2} + 1");
        assert_eq!(latex("(x + 1)^2"), "{\\left(x + 1\\right)}^{2}");
        assert_eq!(latex("(a + b) * c"), "\\left(a + b\\right) \\cdot c");
        assert_eq!(latex("a / (b + c)"), "\\frac{a}{b + c}");
        assert_eq!(latex("sin(x) * -2"), "\\sin{\\left(x\\right)} \\cdot \\left(-2\\right)");
        assert_eq!(latex("sqrt(x) - tg(x)"), "\\sqrt{x} - \\operatorname{tg}{\\left(x\\right)}");
        assert_eq!(latex("a - (b - c)"), "a - \\left(b - c\\right)");
        assert_eq!(latex("ln(y)"), "\\ln{\\left(y\\right)}");
        assert_eq!(latex("3 * x^2"), "3 \\cdot {x}^{2}");
        assert_eq!(latex("(a - b) * (c / d)"), "\\left(a - b\\right) \\cdot \\frac{c}{d}");
    }

    #[test]
    fn long_sums_print_without_recursion() {
        let source = vec!["x"; 200_000].join(" + ");
        assert_eq!(infix(&source), source);
    }

    #[test]
    fn deep_latex() {
        let source = format!("{}x{}", "sin(".repeat(200), ")".repeat(200));
        let expected = format!(
            "{}x{}",
            "\\sin{\\left(".repeat(200),
            "\\right)}".repeat(200),
        );
        assert_eq!(latex(&source), expected);

        let source = vec!["x"; 20_000].join(" * ");
        let expected = vec!["x"; 20_000].join(" \\cdot ");
        assert_eq!(latex(&source), expected);
    }
}
