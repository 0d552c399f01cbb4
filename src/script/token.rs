//! Token types for the superscope script lexer.

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub col: usize,
}

/// The kind of token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    Number,
    Ident,
    Operator(Operator),
    Assign,
    LParen,
    RParen,
    Comma,
    /// `;` or a line break.
    Separator,
    Eof,
}

/// Every operator symbol the lexer recognises.
///
/// `Not` is prefix-only; `Plus` and `Minus` are both prefix and infix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Not,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    And,
    Or,
}

/// Binding power of unary prefix operators.
pub const PREFIX_POWER: u8 = 70;

impl Operator {
    /// Longest-match symbol table, two-character symbols first.
    pub const SYMBOLS: [(&'static str, Operator); 15] = [
        ("==", Operator::Eq),
        ("!=", Operator::NotEq),
        ("<=", Operator::LessEq),
        (">=", Operator::GreaterEq),
        ("&&", Operator::And),
        ("||", Operator::Or),
        ("+", Operator::Plus),
        ("-", Operator::Minus),
        ("*", Operator::Star),
        ("/", Operator::Slash),
        ("%", Operator::Percent),
        ("^", Operator::Caret),
        ("!", Operator::Not),
        ("<", Operator::Less),
        (">", Operator::Greater),
    ];

    /// Infix binding power, or `None` for prefix-only operators.
    pub fn infix_power(self) -> Option<u8> {
        use Operator::*;
        match self {
            Caret => Some(60),
            Star | Slash | Percent => Some(50),
            Plus | Minus => Some(40),
            Less | LessEq | Greater | GreaterEq => Some(30),
            Eq | NotEq => Some(20),
            And => Some(15),
            Or => Some(10),
            Not => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        use Operator::*;
        match self {
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            Caret => "^",
            Not => "!",
            Eq => "==",
            NotEq => "!=",
            Less => "<",
            LessEq => "<=",
            Greater => ">",
            GreaterEq => ">=",
            And => "&&",
            Or => "||",
        }
    }
}
