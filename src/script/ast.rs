//! Abstract syntax tree for superscope scripts.
//!
//! Nodes are built once by the parser and never mutated. Identifier names
//! are stored lowercased and shared, so evaluation never allocates.

use std::fmt;
use std::sync::Arc;

use super::builtin::Builtin;
use super::token::Operator;

/// A variable name, already lowercased.
pub type Name = Arc<str>;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(f64),
    Var(Name),
    Unary(UnaryOp, Box<Expr>),
    Binary(Operator, Box<Expr>, Box<Expr>),
    Call(Call),
    /// `assign(target, value)`, with the target resolved when parsing.
    Assign(Box<LValue>, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

/// A function call. `func` is `None` for names that are not built-ins;
/// such calls evaluate to `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: Name,
    pub func: Option<Builtin>,
    pub args: Vec<Expr>,
}

/// Where `assign` writes.
#[derive(Debug, Clone, PartialEq)]
pub enum LValue {
    Var(Name),
    Megabuf(Expr),
    Gmegabuf(Expr),
    /// Not addressable: evaluated for its side effects, nothing is stored.
    Discard(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assign(Name, Expr),
    Expr(Expr),
}

/// A compiled script: the unit of caching and re-execution.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Program {
    #[default]
    Empty,
    Statements(Vec<Statement>),
}

impl Program {
    pub fn from_statements(statements: Vec<Statement>) -> Self {
        if statements.is_empty() {
            Program::Empty
        } else {
            Program::Statements(statements)
        }
    }

    pub fn statements(&self) -> &[Statement] {
        match self {
            Program::Empty => &[],
            Program::Statements(s) => s,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Program::Empty)
    }

    pub fn len(&self) -> usize {
        self.statements().len()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(v) => write!(f, "{v}"),
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Unary(op, e) => {
                let sym = match op {
                    UnaryOp::Neg => "-",
                    UnaryOp::Plus => "+",
                    UnaryOp::Not => "!",
                };
                write!(f, "({sym}{e})")
            }
            Expr::Binary(op, l, r) => write!(f, "({l} {} {r})", op.symbol()),
            Expr::Call(call) => {
                write!(f, "{}(", call.name)?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Expr::Assign(target, value) => write!(f, "assign({target}, {value})"),
        }
    }
}

impl fmt::Display for LValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LValue::Var(name) => write!(f, "{name}"),
            LValue::Megabuf(e) => write!(f, "megabuf({e})"),
            LValue::Gmegabuf(e) => write!(f, "gmegabuf({e})"),
            LValue::Discard(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Assign(name, e) => write!(f, "{name} = {e}"),
            Statement::Expr(e) => write!(f, "{e}"),
        }
    }
}
