//! Parser for superscope scripts.
//!
//! Pratt parsing over the token stream. The parser never fails: missing
//! closing parentheses are assumed, and a token that cannot start an
//! expression yields `Expr::Const(0.0)`. Each repair is recorded as a
//! [`Diagnostic`].

use std::sync::Arc;

use super::ast::*;
use super::builtin::Builtin;
use super::diagnostic::Diagnostic;
use super::token::{Operator, Token, TokenKind, PREFIX_POWER};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            tokens.push(Token {
                kind: TokenKind::Eof,
                text: String::new(),
                line: 0,
                col: 0,
            });
        }
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn parse(&mut self) -> Program {
        let mut statements = Vec::new();

        loop {
            self.skip_separators();
            if self.is_at_end() {
                break;
            }

            // Tokens that can neither start a statement nor be repaired into one.
            if matches!(
                self.peek().kind,
                TokenKind::RParen | TokenKind::Comma | TokenKind::Assign
            ) {
                self.report(format!("unexpected '{}'", self.peek().text));
                self.advance();
                continue;
            }

            statements.push(self.parse_statement());
        }

        Program::from_statements(statements)
    }

    /// Diagnostics collected by the last [`parse`](Parser::parse) call.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn parse_statement(&mut self) -> Statement {
        if self.check(TokenKind::Ident) && self.peek_at(1) == TokenKind::Assign {
            let name = lowercase_name(&self.advance().text);
            self.advance(); // consume '='
            let value = self.parse_expr(0);
            Statement::Assign(name, value)
        } else {
            Statement::Expr(self.parse_expr(0))
        }
    }

    /// Parse an expression whose operators all bind tighter than `min_power`.
    /// Operators of equal power group left to right.
    fn parse_expr(&mut self, min_power: u8) -> Expr {
        let mut lhs = self.parse_prefix();

        while let TokenKind::Operator(op) = self.peek().kind {
            let Some(power) = op.infix_power() else {
                break;
            };
            if power <= min_power {
                break;
            }
            self.advance();
            let rhs = self.parse_expr(power);
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }

        lhs
    }

    fn parse_prefix(&mut self) -> Expr {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Number => {
                self.advance();
                Expr::Const(token.text.parse().unwrap_or(0.0))
            }
            TokenKind::Ident => {
                self.advance();
                let name = lowercase_name(&token.text);
                if self.check(TokenKind::LParen) {
                    self.parse_call(name)
                } else {
                    Expr::Var(name)
                }
            }
            TokenKind::Operator(op @ (Operator::Minus | Operator::Plus | Operator::Not)) => {
                self.advance();
                let unary = match op {
                    Operator::Minus => UnaryOp::Neg,
                    Operator::Plus => UnaryOp::Plus,
                    _ => UnaryOp::Not,
                };
                Expr::Unary(unary, Box::new(self.parse_expr(PREFIX_POWER)))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr(0);
                self.expect_rparen();
                inner
            }
            TokenKind::Operator(_) => {
                self.advance();
                self.report(format!("operator '{}' cannot start an expression", token.text));
                Expr::Const(0.0)
            }
            TokenKind::Assign
            | TokenKind::RParen
            | TokenKind::Comma
            | TokenKind::Separator
            | TokenKind::Eof => {
                self.report("expected expression");
                Expr::Const(0.0)
            }
        }
    }

    fn parse_call(&mut self, name: Name) -> Expr {
        self.advance(); // consume '('
        let mut args = Vec::new();

        if self.check(TokenKind::RParen) {
            self.advance();
        } else {
            loop {
                args.push(self.parse_expr(0));
                if self.check(TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                self.expect_rparen();
                break;
            }
        }

        if &*name == "assign" {
            return self.build_assign(args);
        }

        let func = Builtin::from_name(&name);
        if func.is_none() {
            self.report(format!("unknown function '{name}' evaluates to 0"));
        }
        Expr::Call(Call { name, func, args })
    }

    /// Resolve `assign`'s first argument into an explicit write target.
    fn build_assign(&mut self, args: Vec<Expr>) -> Expr {
        if args.len() > 2 {
            self.report("assign takes two arguments; extras ignored");
        }
        let mut args = args.into_iter();
        let Some(target) = args.next() else {
            self.report("assign without a target");
            return Expr::Const(0.0);
        };
        let value = args.next().unwrap_or(Expr::Const(0.0));

        let target = match target {
            Expr::Var(name) => LValue::Var(name),
            Expr::Call(Call {
                func: Some(func @ (Builtin::Megabuf | Builtin::Gmegabuf)),
                args,
                ..
            }) => {
                let index = args.into_iter().next().unwrap_or(Expr::Const(0.0));
                if func == Builtin::Megabuf {
                    LValue::Megabuf(index)
                } else {
                    LValue::Gmegabuf(index)
                }
            }
            other => {
                self.report("assign target is not writable; value is discarded");
                LValue::Discard(other)
            }
        };

        Expr::Assign(Box::new(target), Box::new(value))
    }

    fn expect_rparen(&mut self) {
        if self.check(TokenKind::RParen) {
            self.advance();
        } else {
            self.report("missing ')'");
        }
    }

    fn skip_separators(&mut self) {
        while self.check(TokenKind::Separator) {
            self.advance();
        }
    }

    fn report(&mut self, message: impl Into<String>) {
        let t = self.peek();
        let diagnostic = Diagnostic::parse(message, t.line, t.col);
        self.diagnostics.push(diagnostic);
    }

    fn peek(&self) -> &Token {
        // The lexer always terminates the stream with Eof; stay on it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_at(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    fn advance(&mut self) -> &Token {
        let current = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[current]
    }
}

fn lowercase_name(text: &str) -> Name {
    Arc::from(text.to_ascii_lowercase())
}
