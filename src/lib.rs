//! Parseon - an English-keyword scripting language
//!
//! Source text goes through the lexer and parser into an AST, which a
//! tree-walking interpreter executes against a flat environment, producing
//! output lines and consuming input values on demand.

pub mod token;
pub mod lexer;
pub mod parser;
pub mod ast;
pub mod value;
pub mod environment;
pub mod builtins;
pub mod interpreter;
pub mod error;

pub use error::{ParseonError, Result, Stage};
pub use interpreter::{CancelFlag, InputSource, Interpreter, QueueInput, StdinInput};
pub use lexer::Lexer;
pub use parser::Parser;
pub use value::Value;

/// Run a Parseon program: lex, parse, and execute. Returns the output lines
/// produced by say/show, or the first error with its source line attached.
pub fn run<I: InputSource>(
    source: &str,
    input: I,
    cancel: CancelFlag,
) -> Result<Vec<String>> {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize().map_err(|e| e.with_source(source))?;

    let mut parser = Parser::new(tokens);
    let program = parser.parse().map_err(|e| e.with_source(source))?;

    let mut interpreter = Interpreter::new(input, cancel);
    interpreter
        .execute(&program)
        .map_err(|e| e.with_source(source))?;

    Ok(interpreter.take_output())
}

/// Version of the Parseon language
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
