//! Abstract Syntax Tree definitions for Parseon
//!
//! Represents the structure of programs after parsing. Nodes are immutable
//! once built; the tree is owned from the root `Program` down.

use crate::token::Span;

/// Whether a binding may be reassigned after declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    /// `set` declarations
    Mutable,
    /// `keep` declarations
    Immutable,
}

/// Expression nodes
#[derive(Debug, Clone)]
pub enum Expr {
    /// Number literal: 42, 3.14
    Number { value: f64, span: Span },

    /// Text literal: "hello"
    Text { value: String, span: Span },

    /// Boolean literal: true, false
    Bool { value: bool, span: Span },

    /// Variable reference: foo
    Ident { name: String, span: Span },

    /// Binary operation: a + b, x < y
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
        span: Span,
    },

    /// Logical and/or: a and b, x or y
    Logical {
        left: Box<Expr>,
        op: LogicalOp,
        right: Box<Expr>,
        span: Span,
    },

    /// Unary operation: -x, not y
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },

    /// Builtin call: sqrt(x), pow(a, b)
    Call {
        name: String,
        args: Vec<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Number { span, .. } => *span,
            Expr::Text { span, .. } => *span,
            Expr::Bool { span, .. } => *span,
            Expr::Ident { span, .. } => *span,
            Expr::Binary { span, .. } => *span,
            Expr::Logical { span, .. } => *span,
            Expr::Unary { span, .. } => *span,
            Expr::Call { span, .. } => *span,
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOp {
    Add,      // +
    Sub,      // -
    Mul,      // *
    Div,      // /
    Mod,      // %
    Eq,       // ==
    Ne,       // !=
    Lt,       // <
    Le,       // <=
    Gt,       // >
    Ge,       // >=
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Sub => write!(f, "-"),
            BinaryOp::Mul => write!(f, "*"),
            BinaryOp::Div => write!(f, "/"),
            BinaryOp::Mod => write!(f, "%"),
            BinaryOp::Eq => write!(f, "=="),
            BinaryOp::Ne => write!(f, "!="),
            BinaryOp::Lt => write!(f, "<"),
            BinaryOp::Le => write!(f, "<="),
            BinaryOp::Gt => write!(f, ">"),
            BinaryOp::Ge => write!(f, ">="),
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Neg,  // -
    Not,  // not
}

/// Logical operators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogicalOp {
    And,
    Or,
}

/// One `when`/`otherwise when` arm of a conditional
#[derive(Debug, Clone)]
pub struct Branch {
    pub condition: Expr,
    pub body: Vec<Stmt>,
}

/// Statement nodes
#[derive(Debug, Clone)]
pub enum Stmt {
    /// Declaration: set x = expr (mutable) or keep x = expr (immutable).
    /// Always a (re)declaration, never a mere update.
    Declare {
        name: String,
        mutability: Mutability,
        value: Expr,
        span: Span,
    },

    /// Assignment to an existing binding: change x = expr, or bare x = expr
    Assign {
        name: String,
        value: Expr,
        span: Span,
    },

    /// Output: say expr / show expr (identical semantics)
    Say { value: Expr, span: Span },

    /// Input: ask name
    Ask { name: String, span: Span },

    /// Conditional: when/check, chained otherwise-when arms, optional
    /// otherwise block. One variant serves both keywords.
    Conditional {
        branches: Vec<Branch>,
        else_body: Option<Vec<Stmt>>,
        span: Span,
    },

    /// Range loop: loop i = start to end do ... end (ascending inclusive)
    RangeLoop {
        var: String,
        start: Expr,
        end: Expr,
        body: Vec<Stmt>,
        span: Span,
    },

    /// While loop: repeat (cond) do ... end
    WhileLoop {
        condition: Expr,
        body: Vec<Stmt>,
        span: Span,
    },

    /// Break statement
    Break { span: Span },

    /// Continue statement
    Continue { span: Span },
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Declare { span, .. } => *span,
            Stmt::Assign { span, .. } => *span,
            Stmt::Say { span, .. } => *span,
            Stmt::Ask { span, .. } => *span,
            Stmt::Conditional { span, .. } => *span,
            Stmt::RangeLoop { span, .. } => *span,
            Stmt::WhileLoop { span, .. } => *span,
            Stmt::Break { span } => *span,
            Stmt::Continue { span } => *span,
        }
    }
}

/// A complete program
#[derive(Debug, Clone)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }
}
