//! A recursive-descent parser for arithmetic expressions.
//!
//! The grammar, from lowest to highest precedence:
//!
//! ```text
//! expr    = term { ("+" | "-") term }
//! term    = power { ("*" | "/") power }
//! power   = primary { "^" primary }
//! primary = "(" expr ")" | call | number | variable
//! call    = ("sqrt" | "sin" | "cos" | "tg" | "ln") "(" expr ")"
//! number  = [ "-" ] digits [ "." [ digits ] ]
//! ```
//!
//! Every binary operator is left-associative, including `^`: `2^3^2` is `(2^3)^2`.
//!
//! Whitespace may appear between any two tokens, with two exceptions: the `-` of a negative
//! number must directly precede its digits, and a function name must directly precede its `(`.
//! A name not directly followed by `(` is a variable, even if it is also a function name.

pub mod error;

use crate::{
    config::Limits,
    tokenizer::{tokenize_complete, Token, TokenKind},
    tree::{NodeData, NodeId, OpCode, SymbolTable, Tree},
};
use deriv_error::{Error, ErrorKind};
use error::{
    ExpectedEof,
    ExpectedNumber,
    InvalidNumber,
    NestingTooDeep,
    UnclosedParenthesis,
    UnexpectedEof,
    UnexpectedToken,
};
use log::trace;
use std::ops::Range;

/// Parses the given source into a tree, along with a symbol table holding every variable the
/// source mentions.
pub fn parse(source: &str) -> Result<(Tree, SymbolTable), Error> {
    Parser::new(source).parse_full()
}

/// A parser for a single expression.
///
/// The parser owns the tree and symbol table it builds; [`Parser::parse_full`] hands them over
/// once the whole source has been consumed.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The source code being parsed.
    source: &'source str,

    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,

    /// The number of parenthesized groups the cursor is currently inside.
    depth: usize,

    limits: Limits,

    /// The tree being built.
    tree: Tree,

    /// The variables seen so far.
    symbols: SymbolTable,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self::with_symbols(source, SymbolTable::new())
    }

    /// Create a new parser that interns variables into an existing symbol table.
    ///
    /// Variables already present in the table keep their ids and bindings, so a tree printed with
    /// a table can be parsed back against the same table.
    pub fn with_symbols(source: &'source str, symbols: SymbolTable) -> Self {
        Self {
            source,
            tokens: tokenize_complete(source),
            cursor: 0,
            depth: 0,
            limits: Limits::default(),
            tree: Tree::new(),
            symbols,
        }
    }

    /// Sets the nesting limit of the parser and the node budget of the tree it builds.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.tree = Tree::with_limits(&limits);
        self.limits = limits;
        self
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    fn eof_span(&self) -> Range<usize> {
        self.source.len()..self.source.len()
    }

    /// Returns the span of the next non-whitespace token, or the end of the source code if there
    /// is none.
    fn span(&self) -> Range<usize> {
        self.peek().map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the next non-whitespace token without moving the cursor.
    fn peek(&self) -> Option<&Token<'source>> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .find(|token| !token.is_whitespace())
    }

    /// Returns the token directly at the cursor, whitespace included.
    fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if !token.is_whitespace() {
                // cloning is cheap: only Range<_> is cloned
                return Ok(token.clone());
            }
        }

        Err(self.error(UnexpectedEof))
    }

    /// Advances past the next non-whitespace token if it is of the given kind.
    fn eat(&mut self, kind: TokenKind) -> Option<Token<'source>> {
        match self.peek() {
            Some(token) if token.kind == kind => self.next_token().ok(),
            _ => None,
        }
    }

    /// Advances past the next non-whitespace token if it is one of the given binary operators.
    fn eat_op(&mut self, ops: &[(TokenKind, OpCode)]) -> Option<OpCode> {
        let kind = self.peek()?.kind;
        let (_, op) = ops.iter().find(|(candidate, _)| *candidate == kind)?;
        self.cursor_past_whitespace();
        self.cursor += 1;
        Some(*op)
    }

    fn cursor_past_whitespace(&mut self) {
        while self.current_token().is_some_and(|token| token.is_whitespace()) {
            self.cursor += 1;
        }
    }

    /// Runs the parsing function one nesting level deeper.
    fn nested<T>(
        &mut self,
        opening: Range<usize>,
        f: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        if self.depth >= self.limits.max_depth {
            return Err(Error::new(vec![opening], NestingTooDeep { limit: self.limits.max_depth }));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Parses the whole source as a single expression, then returns the finished tree and the
    /// symbol table.
    ///
    /// Fails if the source is empty, or if anything but whitespace follows the expression.
    pub fn parse_full(mut self) -> Result<(Tree, SymbolTable), Error> {
        let root = self.parse_expr()?;

        if let Some(token) = self.peek() {
            let start = token.span.start;
            return Err(Error::new(
                vec![start..self.source.len()],
                ExpectedEof { remaining: self.source[start..].trim_end().to_string() },
            ));
        }

        self.tree.set_root(Some(root));
        self.tree.set_parents(Some(root));
        trace!("parsed `{}` into {} node(s)", self.source, self.tree.len());
        Ok((self.tree, self.symbols))
    }

    /// Applies the operator to the operands, allocating the node in the tree.
    fn binary(&mut self, op: OpCode, lhs: NodeId, rhs: NodeId) -> Result<NodeId, Error> {
        self.tree.create_node(None, NodeData::Operator { op, left: Some(lhs), right: rhs })
    }

    /// `expr = term { ("+" | "-") term }`
    fn parse_expr(&mut self) -> Result<NodeId, Error> {
        trace!("parse_expr at {:?}", self.span());
        let mut lhs = self.parse_term()?;
        while let Some(op) = self.eat_op(&[(TokenKind::Add, OpCode::Add), (TokenKind::Sub, OpCode::Sub)]) {
            let rhs = self.parse_term()?;
            lhs = self.binary(op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    /// `term = power { ("*" | "/") power }`
    fn parse_term(&mut self) -> Result<NodeId, Error> {
        trace!("parse_term at {:?}", self.span());
        let mut lhs = self.parse_power()?;
        while let Some(op) = self.eat_op(&[(TokenKind::Mul, OpCode::Mul), (TokenKind::Div, OpCode::Div)]) {
            let rhs = self.parse_power()?;
            lhs = self.binary(op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    /// `power = primary { "^" primary }`
    fn parse_power(&mut self) -> Result<NodeId, Error> {
        trace!("parse_power at {:?}", self.span());
        let mut lhs = self.parse_primary()?;
        while self.eat(TokenKind::Exp).is_some() {
            let rhs = self.parse_primary()?;
            lhs = self.binary(OpCode::Pow, lhs, rhs)?;
        }
        Ok(lhs)
    }

    /// `primary = "(" expr ")" | call | number | variable`
    fn parse_primary(&mut self) -> Result<NodeId, Error> {
        trace!("parse_primary at {:?}", self.span());
        let token = self.next_token()?;
        match token.kind {
            TokenKind::OpenParen => self.parse_group(token.span),
            TokenKind::Number => self.parse_number(token.span),
            TokenKind::Sub => match self.current_token() {
                Some(digits) if digits.kind == TokenKind::Number => {
                    let span = token.span.start..digits.span.end;
                    self.cursor += 1;
                    self.parse_number(span)
                },
                _ => Err(Error::new(vec![token.span], ExpectedNumber)),
            },
            TokenKind::Name => self.parse_name(token),
            TokenKind::Whitespace
                | TokenKind::Add
                | TokenKind::Mul
                | TokenKind::Div
                | TokenKind::Exp
                | TokenKind::CloseParen
                | TokenKind::Symbol => Err(Error::new(
                    vec![token.span],
                    UnexpectedToken { found: token.lexeme.to_string() },
                )),
        }
    }

    /// Parses the rest of a parenthesized expression, after the opening parenthesis.
    fn parse_group(&mut self, opening: Range<usize>) -> Result<NodeId, Error> {
        let inner = self.nested(opening.clone(), Self::parse_expr)?;
        match self.eat(TokenKind::CloseParen) {
            Some(_) => Ok(inner),
            None => Err(Error::new(vec![opening, self.span()], UnclosedParenthesis)),
        }
    }

    /// Converts the literal covering the given span to a constant node.
    fn parse_number(&mut self, span: Range<usize>) -> Result<NodeId, Error> {
        let source = self.source;
        let lexeme = &source[span.clone()];
        trace!("number literal `{}`", lexeme);
        match lexeme.parse::<f64>() {
            Ok(value) => self.tree.constant(value),
            Err(_) => Err(Error::new(vec![span], InvalidNumber { lexeme: lexeme.to_string() })),
        }
    }

    /// Parses a function call or a variable, starting from its name.
    fn parse_name(&mut self, name: Token<'source>) -> Result<NodeId, Error> {
        let call = OpCode::from_function_name(name.lexeme)
            .filter(|_| self.current_token().is_some_and(|token| token.kind == TokenKind::OpenParen));

        match call {
            Some(op) => {
                trace!("call to `{}`", name.lexeme);
                let opening = self.next_token()?.span;
                let argument = self.parse_group(opening)?;
                self.tree.create_node(None, NodeData::Operator { op, left: None, right: argument })
            },
            None => {
                trace!("variable `{}`", name.lexeme);
                let symbol = self.symbols.intern(name.lexeme);
                self.tree.variable(symbol)
            },
        }
    }
}
