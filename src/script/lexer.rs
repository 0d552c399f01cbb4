//! Lexer for superscope scripts.
//!
//! Converts source text into a stream of [`Token`]s. Lexing is tolerant:
//! unknown characters are skipped and malformed numbers become `0`, with a
//! [`Diagnostic`] recorded for each.

use super::diagnostic::Diagnostic;
use super::token::{Operator, Token, TokenKind};

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    diagnostics: Vec<Diagnostic>,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the whole source. The last token is always [`TokenKind::Eof`].
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            self.skip_blanks();

            if self.is_at_end() {
                tokens.push(self.token(TokenKind::Eof, String::new()));
                break;
            }

            let ch = self.peek();

            if ch == '\n' || ch == '\r' {
                tokens.push(self.token(TokenKind::Separator, ch.to_string()));
                self.advance();
                continue;
            }

            let token = match ch {
                '0'..='9' => self.lex_number(),
                '.' if self.peek_next().is_some_and(|c| c.is_ascii_digit()) => self.lex_number(),
                c if is_ident_start(c) => self.lex_ident(),
                '(' => self.single_char(TokenKind::LParen),
                ')' => self.single_char(TokenKind::RParen),
                ',' => self.single_char(TokenKind::Comma),
                ';' => self.single_char(TokenKind::Separator),
                '=' if self.peek_next() != Some('=') => self.single_char(TokenKind::Assign),
                _ => match self.lex_operator() {
                    Some(token) => token,
                    None => {
                        self.diagnostics.push(Diagnostic::lex(
                            format!("skipped unexpected character '{ch}'"),
                            self.line,
                            self.col,
                        ));
                        self.advance();
                        continue;
                    }
                },
            };

            tokens.push(token);
        }

        tokens
    }

    /// Diagnostics collected by the last [`tokenize`](Lexer::tokenize) call.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn peek(&self) -> char {
        self.chars[self.pos]
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.pos];
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        ch
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn token(&self, kind: TokenKind, text: String) -> Token {
        Token {
            kind,
            text,
            line: self.line,
            col: self.col,
        }
    }

    fn skip_blanks(&mut self) {
        while !self.is_at_end() {
            let ch = self.peek();
            if ch.is_whitespace() && ch != '\n' && ch != '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn single_char(&mut self, kind: TokenKind) -> Token {
        let token = self.token(kind, self.peek().to_string());
        self.advance();
        token
    }

    fn lex_number(&mut self) -> Token {
        let line = self.line;
        let col = self.col;
        let mut text = String::new();

        while !self.is_at_end() && (self.peek().is_ascii_digit() || self.peek() == '.') {
            text.push(self.advance());
        }

        if text.parse::<f64>().is_err() {
            self.diagnostics.push(Diagnostic::lex(
                format!("malformed number '{text}' read as 0"),
                line,
                col,
            ));
            text = "0".to_string();
        }

        Token {
            kind: TokenKind::Number,
            text,
            line,
            col,
        }
    }

    fn lex_ident(&mut self) -> Token {
        let line = self.line;
        let col = self.col;
        let mut text = String::new();

        while !self.is_at_end() && is_ident_continue(self.peek()) {
            text.push(self.advance());
        }

        Token {
            kind: TokenKind::Ident,
            text,
            line,
            col,
        }
    }

    fn lex_operator(&mut self) -> Option<Token> {
        let line = self.line;
        let col = self.col;
        let (symbol, op) = Operator::SYMBOLS.iter().copied().find(|(symbol, _)| {
            symbol
                .chars()
                .enumerate()
                .all(|(i, c)| self.chars.get(self.pos + i) == Some(&c))
        })?;

        for _ in symbol.chars() {
            self.advance();
        }

        Some(Token {
            kind: TokenKind::Operator(op),
            text: symbol.to_string(),
            line,
            col,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).tokenize().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lex_assignment() {
        let tokens = Lexer::new("x = 1.5").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].text, "x");
        assert_eq!(tokens[1].kind, TokenKind::Assign);
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[2].text, "1.5");
        assert_eq!(tokens[3].kind, TokenKind::Eof);
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("   \t "), vec![TokenKind::Eof]);
    }

    #[test]
    fn lex_longest_match_operators() {
        assert_eq!(
            kinds("a==b != c<=d>=e&&f||g"),
            vec![
                TokenKind::Ident,
                TokenKind::Operator(Operator::Eq),
                TokenKind::Ident,
                TokenKind::Operator(Operator::NotEq),
                TokenKind::Ident,
                TokenKind::Operator(Operator::LessEq),
                TokenKind::Ident,
                TokenKind::Operator(Operator::GreaterEq),
                TokenKind::Ident,
                TokenKind::Operator(Operator::And),
                TokenKind::Ident,
                TokenKind::Operator(Operator::Or),
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_line_breaks_are_separators() {
        assert_eq!(
            kinds("a\nb;c\r\n"),
            vec![
                TokenKind::Ident,
                TokenKind::Separator,
                TokenKind::Ident,
                TokenKind::Separator,
                TokenKind::Ident,
                TokenKind::Separator,
                TokenKind::Separator,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_line_tracking() {
        let tokens = Lexer::new("a\n  b").tokenize();
        assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
        assert_eq!((tokens[2].line, tokens[2].col), (2, 3));
    }

    #[test]
    fn lex_identifier_charset() {
        let tokens = Lexer::new("$reg_01 _tmp").tokenize();
        assert_eq!(tokens[0].text, "$reg_01");
        assert_eq!(tokens[1].text, "_tmp");
    }

    #[test]
    fn lex_leading_dot_number() {
        let tokens = Lexer::new(".25").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].text, ".25");
    }

    #[test]
    fn lex_malformed_number_becomes_zero() {
        let mut lexer = Lexer::new("1.2.3");
        let tokens = lexer.tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].text, "0");
        assert_eq!(lexer.take_diagnostics().len(), 1);
    }

    #[test]
    fn lex_skips_unknown_characters() {
        let mut lexer = Lexer::new("a @ # b");
        let tokens = lexer.tokenize();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].text, "b");
        assert_eq!(lexer.take_diagnostics().len(), 2);
    }

    #[test]
    fn lex_lone_ampersand_is_skipped() {
        assert_eq!(
            kinds("a & b"),
            vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
        );
    }
}
