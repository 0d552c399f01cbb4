//! Superscope script language — source → tokens → AST → evaluation.

pub mod ast;
pub mod builtin;
pub mod diagnostic;
pub mod env;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{Expr, LValue, Program, Statement};
pub use builtin::Builtin;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use env::Environment;

use lexer::Lexer;
use parser::Parser;

/// The result of compiling one script.
#[derive(Debug, Clone, Default)]
pub struct Compiled {
    pub program: Program,
    /// Everything the lexer and parser had to repair, in source order per stage.
    pub diagnostics: Vec<Diagnostic>,
}

/// The script compiler.
///
/// Compilation cannot fail; see [`Compiled::diagnostics`] for what was
/// repaired along the way.
pub struct Compiler;

impl Compiler {
    pub fn compile(source: &str) -> Compiled {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize();
        let mut diagnostics = lexer.take_diagnostics();

        let mut parser = Parser::new(tokens);
        let program = parser.parse();
        diagnostics.extend(parser.take_diagnostics());

        Compiled {
            program,
            diagnostics,
        }
    }
}
