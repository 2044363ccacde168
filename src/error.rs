//! Error types for the Parseon language
//!
//! Provides structured error handling with source locations.

use crate::token::Span;
use std::fmt;

/// Error kinds in Parseon
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    // Lexer errors
    UnexpectedCharacter(char),
    UnterminatedText,
    InvalidNumber(String),

    // Parser errors
    UnexpectedToken(String),
    ExpectedToken(String, String),
    ExpectedExpression,

    // Runtime errors
    UndefinedVariable(String),
    RedeclareImmutable(String),
    AssignImmutable(String),
    TypeMismatch(String, String),
    ConditionNotBoolean(String),
    DivisionByZero,
    UnknownBuiltin(String),
    WrongArity(String, usize, usize),
    DomainError(String),
    BreakOutsideLoop,
    ContinueOutsideLoop,
    InputExhausted,
    Interrupted,
}

/// Which stage of the pipeline an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
    Runtime,
}

impl ErrorKind {
    pub fn stage(&self) -> Stage {
        match self {
            ErrorKind::UnexpectedCharacter(_)
            | ErrorKind::UnterminatedText
            | ErrorKind::InvalidNumber(_) => Stage::Lex,

            ErrorKind::UnexpectedToken(_)
            | ErrorKind::ExpectedToken(_, _)
            | ErrorKind::ExpectedExpression => Stage::Parse,

            _ => Stage::Runtime,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnexpectedCharacter(c) => write!(f, "unexpected character '{}'", c),
            ErrorKind::UnterminatedText => write!(f, "unterminated text literal"),
            ErrorKind::InvalidNumber(s) => write!(f, "invalid number '{}'", s),
            ErrorKind::UnexpectedToken(t) => write!(f, "unexpected token '{}'", t),
            ErrorKind::ExpectedToken(expected, got) => {
                write!(f, "{}, got '{}'", expected, got)
            }
            ErrorKind::ExpectedExpression => write!(f, "expected expression"),
            ErrorKind::UndefinedVariable(name) => write!(f, "undefined variable '{}'", name),
            ErrorKind::RedeclareImmutable(name) => {
                write!(f, "cannot redeclare immutable binding '{}'", name)
            }
            ErrorKind::AssignImmutable(name) => {
                write!(f, "cannot change immutable binding '{}'", name)
            }
            ErrorKind::TypeMismatch(expected, got) => {
                write!(f, "type mismatch: expected {}, got {}", expected, got)
            }
            ErrorKind::ConditionNotBoolean(got) => {
                write!(f, "condition must be boolean, got {}", got)
            }
            ErrorKind::DivisionByZero => write!(f, "division by zero"),
            ErrorKind::UnknownBuiltin(name) => write!(f, "unknown function '{}'", name),
            ErrorKind::WrongArity(name, expected, got) => {
                write!(f, "{} expects {} arguments, got {}", name, expected, got)
            }
            ErrorKind::DomainError(name) => write!(f, "domain error in {}", name),
            ErrorKind::BreakOutsideLoop => write!(f, "break outside of loop"),
            ErrorKind::ContinueOutsideLoop => write!(f, "continue outside of loop"),
            ErrorKind::InputExhausted => write!(f, "no input available"),
            ErrorKind::Interrupted => write!(f, "execution interrupted"),
        }
    }
}

/// A Parseon error with location information
#[derive(Debug, Clone)]
pub struct ParseonError {
    pub kind: ErrorKind,
    pub span: Option<Span>,
    pub source_line: Option<String>,
}

impl ParseonError {
    pub fn new(kind: ErrorKind, span: Option<Span>) -> Self {
        Self {
            kind,
            span,
            source_line: None,
        }
    }

    /// The pipeline stage this error belongs to.
    pub fn stage(&self) -> Stage {
        self.kind.stage()
    }

    /// Attach a span if the error does not carry one yet.
    pub fn at(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    /// The 1-based source line, when known.
    pub fn line(&self) -> Option<usize> {
        self.span.map(|s| s.line)
    }

    pub fn with_source(mut self, source: &str) -> Self {
        if let Some(span) = &self.span {
            let lines: Vec<&str> = source.lines().collect();
            if span.line > 0 && span.line <= lines.len() {
                self.source_line = Some(lines[span.line - 1].to_string());
            }
        }
        self
    }
}

impl fmt::Display for ParseonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(span) = &self.span {
            write!(f, "[line {}:{}] Error: {}", span.line, span.column, self.kind)?;

            if let Some(ref line) = self.source_line {
                write!(f, "\n  | {}", line)?;
                write!(f, "\n  | {}^", " ".repeat(span.column.saturating_sub(1)))?;
            }
        } else {
            write!(f, "Error: {}", self.kind)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseonError {}

/// Result type for Parseon operations
pub type Result<T> = std::result::Result<T, ParseonError>;
