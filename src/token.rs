//! Token definitions for the Parseon language
//!
//! Tokens represent the atomic units of meaning in source code.

use std::fmt;

/// Location in source code for error reporting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self { start, end, line, column }
    }
}

/// Token types in Parseon
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals (number lexemes are kept textual until AST construction)
    Number(String),
    Text(String),
    True,
    False,

    // Identifiers
    Ident(String),

    // Keywords
    Set,        // mutable (re)declaration
    Change,     // assignment to an existing binding
    Keep,       // immutable declaration
    Say,        // print a value
    Show,       // print a value (synonym of say)
    Ask,        // read one input value
    When,       // conditional
    Check,      // conditional (synonym of when)
    Otherwise,  // else / else-if branch
    Do,         // block opener
    End,        // block terminator
    Loop,       // range loop
    Repeat,     // while loop
    To,         // range loop upper bound
    Break,      // break out of loop
    Continue,   // continue to next iteration

    // Operators
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %

    // Comparison
    Equal,        // =
    EqualEqual,   // ==
    BangEqual,    // !=
    Less,         // <
    LessEqual,    // <=
    Greater,      // >
    GreaterEqual, // >=

    // Logical
    And,        // and
    Or,         // or
    Not,        // not

    // Delimiters
    LeftParen,  // (
    RightParen, // )
    Comma,      // ,

    // Special tokens
    Eof,        // end of file
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Text(s) => write!(f, "\"{}\"", s),
            TokenKind::Ident(s) => write!(f, "{}", s),
            TokenKind::True => write!(f, "true"),
            TokenKind::False => write!(f, "false"),
            TokenKind::Set => write!(f, "set"),
            TokenKind::Change => write!(f, "change"),
            TokenKind::Keep => write!(f, "keep"),
            TokenKind::Say => write!(f, "say"),
            TokenKind::Show => write!(f, "show"),
            TokenKind::Ask => write!(f, "ask"),
            TokenKind::When => write!(f, "when"),
            TokenKind::Check => write!(f, "check"),
            TokenKind::Otherwise => write!(f, "otherwise"),
            TokenKind::Do => write!(f, "do"),
            TokenKind::End => write!(f, "end"),
            TokenKind::Loop => write!(f, "loop"),
            TokenKind::Repeat => write!(f, "repeat"),
            TokenKind::To => write!(f, "to"),
            TokenKind::Break => write!(f, "break"),
            TokenKind::Continue => write!(f, "continue"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Equal => write!(f, "="),
            TokenKind::EqualEqual => write!(f, "=="),
            TokenKind::BangEqual => write!(f, "!="),
            TokenKind::Less => write!(f, "<"),
            TokenKind::LessEqual => write!(f, "<="),
            TokenKind::Greater => write!(f, ">"),
            TokenKind::GreaterEqual => write!(f, ">="),
            TokenKind::And => write!(f, "and"),
            TokenKind::Or => write!(f, "or"),
            TokenKind::Not => write!(f, "not"),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

/// A token with its kind and location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub lexeme: String,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, lexeme: String) -> Self {
        Self { kind, span, lexeme }
    }
}

/// Check if a string is a keyword and return the corresponding token kind
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    match ident {
        "set" => Some(TokenKind::Set),
        "change" => Some(TokenKind::Change),
        "keep" => Some(TokenKind::Keep),
        "say" => Some(TokenKind::Say),
        "show" => Some(TokenKind::Show),
        "ask" => Some(TokenKind::Ask),
        "when" => Some(TokenKind::When),
        "check" => Some(TokenKind::Check),
        "otherwise" => Some(TokenKind::Otherwise),
        "do" => Some(TokenKind::Do),
        "end" => Some(TokenKind::End),
        "loop" => Some(TokenKind::Loop),
        "repeat" => Some(TokenKind::Repeat),
        "to" => Some(TokenKind::To),
        "break" => Some(TokenKind::Break),
        "continue" => Some(TokenKind::Continue),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "and" => Some(TokenKind::And),
        "or" => Some(TokenKind::Or),
        "not" => Some(TokenKind::Not),
        _ => None,
    }
}
