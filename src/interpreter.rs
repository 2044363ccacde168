//! Tree-walking evaluator for Parseon
//!
//! Walks the AST, executing statements against a single flat environment.
//! Break and continue are modeled as an explicit `Flow` result tag returned
//! up the call stack rather than as exceptions, so propagation through
//! nested blocks is plain data flow. The evaluator never mutates the AST;
//! it mutates only the environment and the output/input channels.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::ast::{BinaryOp, Expr, LogicalOp, Mutability, Program, Stmt, UnaryOp};
use crate::builtins::Builtin;
use crate::environment::Environment;
use crate::error::{ErrorKind, ParseonError, Result};
use crate::token::Span;
use crate::value::Value;

/// Source of input lines for `ask`, pulled lazily, one line per request.
pub trait InputSource {
    /// The next input line, or None when input is exhausted.
    fn next_line(&mut self) -> Option<String>;
}

/// A fixed queue of input lines. The service layer and tests use this.
#[derive(Debug, Default)]
pub struct QueueInput {
    lines: VecDeque<String>,
}

impl QueueInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// An input source with no lines at all.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl InputSource for QueueInput {
    fn next_line(&mut self) -> Option<String> {
        self.lines.pop_front()
    }
}

/// Input source backed by standard input, for the CLI.
#[derive(Debug, Default)]
pub struct StdinInput;

impl InputSource for StdinInput {
    fn next_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                Some(line)
            }
        }
    }
}

/// A poll-able cancellation flag. The caller sets it; the evaluator checks
/// it before every statement and once per loop iteration.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// How a statement or block finished.
enum Flow {
    Normal,
    Break(Span),
    Continue(Span),
}

/// The evaluator state: one environment, one output sink, one input source.
pub struct Interpreter<I: InputSource> {
    env: Environment,
    input: I,
    cancel: CancelFlag,
    output: Vec<String>,
}

impl<I: InputSource> Interpreter<I> {
    pub fn new(input: I, cancel: CancelFlag) -> Self {
        Self {
            env: Environment::new(),
            input,
            cancel,
            output: Vec::new(),
        }
    }

    /// Execute a program to completion or the first runtime error.
    /// Output produced before a failure stays accessible via `output()`.
    pub fn execute(&mut self, program: &Program) -> Result<()> {
        match self.exec_block(&program.statements)? {
            Flow::Normal => Ok(()),
            Flow::Break(span) => Err(ParseonError::new(ErrorKind::BreakOutsideLoop, Some(span))),
            Flow::Continue(span) => {
                Err(ParseonError::new(ErrorKind::ContinueOutsideLoop, Some(span)))
            }
        }
    }

    /// Lines produced by say/show so far.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Take the produced output, leaving the sink empty.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    // ==================== Statements ====================

    fn exec_block(&mut self, stmts: &[Stmt]) -> Result<Flow> {
        for stmt in stmts {
            match self.exec_stmt(stmt)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<Flow> {
        self.check_cancelled(stmt.span())?;

        match stmt {
            Stmt::Declare { name, mutability, value, span } => {
                let value = self.eval_expr(value)?;
                self.env
                    .declare(name, value, *mutability)
                    .map_err(|e| e.at(*span))?;
                Ok(Flow::Normal)
            }

            Stmt::Assign { name, value, span } => {
                let value = self.eval_expr(value)?;
                self.env.assign(name, value).map_err(|e| e.at(*span))?;
                Ok(Flow::Normal)
            }

            Stmt::Say { value, .. } => {
                let value = self.eval_expr(value)?;
                self.output.push(value.to_string());
                Ok(Flow::Normal)
            }

            Stmt::Ask { name, span } => {
                let line = self
                    .input
                    .next_line()
                    .ok_or_else(|| ParseonError::new(ErrorKind::InputExhausted, Some(*span)))?;

                // Numeric parse first; fall back to text
                let value = match line.trim().parse::<f64>() {
                    Ok(n) => Value::Number(n),
                    Err(_) => Value::Text(line),
                };
                self.env
                    .declare(name, value, Mutability::Mutable)
                    .map_err(|e| e.at(*span))?;
                Ok(Flow::Normal)
            }

            Stmt::Conditional { branches, else_body, .. } => {
                for branch in branches {
                    if self.eval_condition(&branch.condition)? {
                        return self.exec_block(&branch.body);
                    }
                }
                if let Some(body) = else_body {
                    return self.exec_block(body);
                }
                Ok(Flow::Normal)
            }

            Stmt::RangeLoop { var, start, end, body, span } => {
                // Both bounds are evaluated once, before the loop begins
                let start = self.eval_number(start)?;
                let end = self.eval_number(end)?;

                let mut i = start;
                while i <= end {
                    self.check_cancelled(*span)?;

                    // The loop variable is rebound mutable before every
                    // iteration and stays visible after the loop ends
                    self.env
                        .declare(var, Value::Number(i), Mutability::Mutable)
                        .map_err(|e| e.at(*span))?;

                    match self.exec_block(body)? {
                        Flow::Break(_) => break,
                        Flow::Continue(_) | Flow::Normal => {}
                    }

                    i += 1.0;
                }
                Ok(Flow::Normal)
            }

            Stmt::WhileLoop { condition, body, span } => {
                loop {
                    self.check_cancelled(*span)?;

                    if !self.eval_condition(condition)? {
                        break;
                    }

                    match self.exec_block(body)? {
                        Flow::Break(_) => break,
                        Flow::Continue(_) | Flow::Normal => {}
                    }
                }
                Ok(Flow::Normal)
            }

            Stmt::Break { span } => Ok(Flow::Break(*span)),
            Stmt::Continue { span } => Ok(Flow::Continue(*span)),
        }
    }

    fn check_cancelled(&self, span: Span) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(ParseonError::new(ErrorKind::Interrupted, Some(span)))
        } else {
            Ok(())
        }
    }

    // ==================== Expressions ====================

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Number { value, .. } => Ok(Value::Number(*value)),
            Expr::Text { value, .. } => Ok(Value::Text(value.clone())),
            Expr::Bool { value, .. } => Ok(Value::Bool(*value)),

            Expr::Ident { name, span } => self.env.get(name).map_err(|e| e.at(*span)),

            Expr::Binary { left, op, right, span } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                self.eval_binary(left, *op, right, *span)
            }

            Expr::Logical { left, op, right, .. } => {
                let left = self.eval_bool(left)?;

                // Short-circuit; the right operand is only evaluated (and
                // type-checked) when it can still decide the result
                let result = match op {
                    LogicalOp::And => left && self.eval_bool(right)?,
                    LogicalOp::Or => left || self.eval_bool(right)?,
                };
                Ok(Value::Bool(result))
            }

            Expr::Unary { op, operand, span } => {
                let value = self.eval_expr(operand)?;
                match (op, value) {
                    (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
                    (UnaryOp::Neg, other) => Err(ParseonError::new(
                        ErrorKind::TypeMismatch("number".to_string(), other.type_name().to_string()),
                        Some(*span),
                    )),
                    (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                    (UnaryOp::Not, other) => Err(ParseonError::new(
                        ErrorKind::TypeMismatch("boolean".to_string(), other.type_name().to_string()),
                        Some(*span),
                    )),
                }
            }

            Expr::Call { name, args, span } => {
                let builtin = Builtin::from_name(name).ok_or_else(|| {
                    ParseonError::new(ErrorKind::UnknownBuiltin(name.clone()), Some(*span))
                })?;

                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval_expr(arg)?);
                }

                builtin.call(&values).map_err(|e| e.at(*span))
            }
        }
    }

    fn eval_binary(&self, left: Value, op: BinaryOp, right: Value, span: Span) -> Result<Value> {
        use BinaryOp::*;

        match op {
            Add | Sub | Mul | Div | Mod => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => {
                    if matches!(op, Div | Mod) && *b == 0.0 {
                        return Err(ParseonError::new(ErrorKind::DivisionByZero, Some(span)));
                    }
                    let n = match op {
                        Add => a + b,
                        Sub => a - b,
                        Mul => a * b,
                        Div => a / b,
                        Mod => a % b,
                        _ => unreachable!(),
                    };
                    Ok(Value::Number(n))
                }
                // Text concatenation; mixed number + text stays an error
                (Value::Text(a), Value::Text(b)) if op == Add => {
                    Ok(Value::Text(format!("{}{}", a, b)))
                }
                _ => Err(ParseonError::new(
                    ErrorKind::TypeMismatch(
                        "numbers".to_string(),
                        format!("{} and {}", left.type_name(), right.type_name()),
                    ),
                    Some(span),
                )),
            },

            Eq | Ne => {
                if std::mem::discriminant(&left) != std::mem::discriminant(&right) {
                    return Err(ParseonError::new(
                        ErrorKind::TypeMismatch(
                            format!("matching kinds, left is {}", left.type_name()),
                            right.type_name().to_string(),
                        ),
                        Some(span),
                    ));
                }
                let equal = left == right;
                Ok(Value::Bool(if op == Eq { equal } else { !equal }))
            }

            Lt | Le | Gt | Ge => {
                let ordering = match (&left, &right) {
                    (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                    (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
                    _ => {
                        return Err(ParseonError::new(
                            ErrorKind::TypeMismatch(
                                format!("matching kinds, left is {}", left.type_name()),
                                right.type_name().to_string(),
                            ),
                            Some(span),
                        ));
                    }
                };
                let Some(ordering) = ordering else {
                    // NaN comparisons never hold
                    return Ok(Value::Bool(false));
                };
                let result = match op {
                    Lt => ordering.is_lt(),
                    Le => ordering.is_le(),
                    Gt => ordering.is_gt(),
                    Ge => ordering.is_ge(),
                    _ => unreachable!(),
                };
                Ok(Value::Bool(result))
            }
        }
    }

    /// Evaluate an expression that must yield a boolean (conditions, logical
    /// operands).
    fn eval_bool(&mut self, expr: &Expr) -> Result<bool> {
        match self.eval_expr(expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(ParseonError::new(
                ErrorKind::TypeMismatch("boolean".to_string(), other.type_name().to_string()),
                Some(expr.span()),
            )),
        }
    }

    /// Evaluate a branch/loop condition, reporting non-booleans with the
    /// condition-specific message.
    fn eval_condition(&mut self, expr: &Expr) -> Result<bool> {
        match self.eval_expr(expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(ParseonError::new(
                ErrorKind::ConditionNotBoolean(other.type_name().to_string()),
                Some(expr.span()),
            )),
        }
    }

    /// Evaluate an expression that must yield a number (range loop bounds).
    fn eval_number(&mut self, expr: &Expr) -> Result<f64> {
        match self.eval_expr(expr)? {
            Value::Number(n) => Ok(n),
            other => Err(ParseonError::new(
                ErrorKind::TypeMismatch("number".to_string(), other.type_name().to_string()),
                Some(expr.span()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn eval(source: &str) -> Result<Vec<String>> {
        eval_with_input(source, QueueInput::empty())
    }

    fn eval_with_input(source: &str, input: QueueInput) -> Result<Vec<String>> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        let mut parser = Parser::new(tokens);
        let program = parser.parse()?;

        let mut interpreter = Interpreter::new(input, CancelFlag::new());
        interpreter.execute(&program)?;
        Ok(interpreter.take_output())
    }

    #[test]
    fn test_say_and_show_both_print() {
        let output = eval("say \"hello\"\nshow 42").unwrap();
        assert_eq!(output, vec!["hello", "42"]);
    }

    #[test]
    fn test_text_concatenation() {
        let output = eval("set name = \"Alice\"\nsay \"Hello \" + name").unwrap();
        assert_eq!(output, vec!["Hello Alice"]);
    }

    #[test]
    fn test_mixed_concat_is_type_error() {
        let err = eval("show \"n = \" + 3").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::TypeMismatch(_, _)));
    }

    #[test]
    fn test_ask_parses_numbers_first() {
        let output = eval_with_input(
            "ask a\nask b\nshow a + 1\nshow b",
            QueueInput::new(["41", "not a number"]),
        )
        .unwrap();
        assert_eq!(output, vec!["42", "not a number"]);
    }

    #[test]
    fn test_ask_exhausted_input() {
        let err = eval_with_input("ask x", QueueInput::empty()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InputExhausted);
    }

    #[test]
    fn test_logical_short_circuit() {
        // The right operand of 'or' is not reached, so the undefined
        // variable in it never trips
        let output = eval("set safe = true\nwhen safe or missing do say \"ok\" end").unwrap();
        assert_eq!(output, vec!["ok"]);
    }

    #[test]
    fn test_condition_must_be_boolean() {
        let err = eval("when 1 do say \"a\" end").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ConditionNotBoolean("number".to_string()));
    }

    #[test]
    fn test_break_outside_loop_is_error() {
        let err = eval("break").unwrap_err();
        assert_eq!(err.kind, ErrorKind::BreakOutsideLoop);
    }

    #[test]
    fn test_continue_outside_loop_is_error() {
        // Even when the continue escapes through a conditional
        let err = eval("when true do continue end").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ContinueOutsideLoop);
    }

    #[test]
    fn test_loop_variable_survives_loop() {
        let output = eval("loop i = 1 to 3 do say \"x\" end\nshow i").unwrap();
        assert_eq!(output, vec!["x", "x", "x", "3"]);
    }

    #[test]
    fn test_continue_skips_rest_of_iteration() {
        let output = eval(
            "loop i = 1 to 5 do when i % 2 == 0 do continue end show i end",
        )
        .unwrap();
        assert_eq!(output, vec!["1", "3", "5"]);
    }

    #[test]
    fn test_range_bounds_evaluated_once() {
        // Mutating the bound variable inside the body must not extend the loop
        let output = eval("set n = 3\nloop i = 1 to n do set n = 100 show i end").unwrap();
        assert_eq!(output, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_cancellation_stops_loops() {
        let source = "repeat (true) do set x = 1 end";
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize().unwrap();
        let program = Parser::new(tokens).parse().unwrap();

        let cancel = CancelFlag::new();
        cancel.cancel();
        let mut interpreter = Interpreter::new(QueueInput::empty(), cancel);
        let err = interpreter.execute(&program).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Interrupted);
    }

    #[test]
    fn test_partial_output_survives_failure() {
        let source = "say \"before\"\nshow 10 / 0\nsay \"after\"";
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize().unwrap();
        let program = Parser::new(tokens).parse().unwrap();

        let mut interpreter = Interpreter::new(QueueInput::empty(), CancelFlag::new());
        let err = interpreter.execute(&program).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
        assert_eq!(interpreter.output(), &["before".to_string()]);
    }

    #[test]
    fn test_unary_minus_and_not() {
        let output = eval("show -5\nshow not false").unwrap();
        assert_eq!(output, vec!["-5", "true"]);
    }

    #[test]
    fn test_text_ordering() {
        let output = eval("show \"apple\" < \"banana\"").unwrap();
        assert_eq!(output, vec!["true"]);
    }

    #[test]
    fn test_cross_kind_comparison_is_error() {
        let err = eval("show 1 == \"1\"").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::TypeMismatch(_, _)));
    }

    #[test]
    fn test_modulo_by_zero() {
        let err = eval("show 7 % 0").unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
    }
}
