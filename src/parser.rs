//! Parser for the Parseon language
//!
//! Converts tokens into an Abstract Syntax Tree. Recursive descent with
//! precedence climbing for expressions; the first malformed construct
//! aborts parsing with no recovery.

use crate::ast::{BinaryOp, Branch, Expr, LogicalOp, Mutability, Program, Stmt, UnaryOp};
use crate::error::{ErrorKind, ParseonError, Result};
use crate::token::{Span, Token, TokenKind};

/// The parser state
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    /// Create a new parser from tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    /// Parse the tokens into a program
    pub fn parse(&mut self) -> Result<Program> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            statements.push(self.statement()?);
        }

        Ok(Program::new(statements))
    }

    // ==================== Statements ====================

    fn statement(&mut self) -> Result<Stmt> {
        if self.check(&TokenKind::Set) {
            self.declaration(Mutability::Mutable)
        } else if self.check(&TokenKind::Keep) {
            self.declaration(Mutability::Immutable)
        } else if self.check(&TokenKind::Change) {
            self.change_statement()
        } else if self.check(&TokenKind::Say) || self.check(&TokenKind::Show) {
            self.say_statement()
        } else if self.check(&TokenKind::Ask) {
            self.ask_statement()
        } else if self.check(&TokenKind::When) || self.check(&TokenKind::Check) {
            self.conditional()
        } else if self.check(&TokenKind::Loop) {
            self.range_loop()
        } else if self.check(&TokenKind::Repeat) {
            self.while_loop()
        } else if self.check(&TokenKind::Break) {
            let span = self.advance().span;
            Ok(Stmt::Break { span })
        } else if self.check(&TokenKind::Continue) {
            let span = self.advance().span;
            Ok(Stmt::Continue { span })
        } else if matches!(self.peek().kind, TokenKind::Ident(_))
            && self.peek_next().map(|t| &t.kind) == Some(&TokenKind::Equal)
        {
            // Bare assignment: name = expr
            self.bare_assignment()
        } else {
            Err(ParseonError::new(
                ErrorKind::UnexpectedToken(format!("{}", self.peek().kind)),
                Some(self.peek().span),
            ))
        }
    }

    fn declaration(&mut self, mutability: Mutability) -> Result<Stmt> {
        let span = self.advance().span; // consume 'set' / 'keep'

        let name = self.expect_ident("expected variable name")?;

        self.expect(&TokenKind::Equal, "expected '=' after variable name")?;

        let value = self.expression()?;

        Ok(Stmt::Declare { name, mutability, value, span })
    }

    fn change_statement(&mut self) -> Result<Stmt> {
        let span = self.advance().span; // consume 'change'

        let name = self.expect_ident("expected variable name after 'change'")?;

        self.expect(&TokenKind::Equal, "expected '=' after variable name")?;

        let value = self.expression()?;

        Ok(Stmt::Assign { name, value, span })
    }

    fn bare_assignment(&mut self) -> Result<Stmt> {
        let span = self.peek().span;
        let name = self.expect_ident("expected variable name")?;

        self.expect(&TokenKind::Equal, "expected '=' after variable name")?;

        let value = self.expression()?;

        Ok(Stmt::Assign { name, value, span })
    }

    fn say_statement(&mut self) -> Result<Stmt> {
        let span = self.advance().span; // consume 'say' / 'show'

        let value = self.expression()?;

        Ok(Stmt::Say { value, span })
    }

    fn ask_statement(&mut self) -> Result<Stmt> {
        let span = self.advance().span; // consume 'ask'

        let name = self.expect_ident("expected variable name after 'ask'")?;

        Ok(Stmt::Ask { name, span })
    }

    /// Parse a conditional:
    /// (when|check) expr do block (otherwise when expr do block)* (otherwise block)? end
    fn conditional(&mut self) -> Result<Stmt> {
        let span = self.advance().span; // consume 'when' / 'check'

        let condition = self.expression()?;
        self.expect(&TokenKind::Do, "expected 'do' after condition")?;
        let body = self.block()?;

        let mut branches = vec![Branch { condition, body }];
        let mut else_body = None;

        while self.match_token(&TokenKind::Otherwise) {
            if self.check(&TokenKind::When) || self.check(&TokenKind::Check) {
                self.advance();
                let condition = self.expression()?;
                self.expect(&TokenKind::Do, "expected 'do' after condition")?;
                let body = self.block()?;
                branches.push(Branch { condition, body });
            } else {
                else_body = Some(self.block()?);
                break;
            }
        }

        self.expect(&TokenKind::End, "expected 'end' to close conditional")?;

        Ok(Stmt::Conditional { branches, else_body, span })
    }

    /// Parse a range loop: loop name = start to end do block end
    fn range_loop(&mut self) -> Result<Stmt> {
        let span = self.advance().span; // consume 'loop'

        let var = self.expect_ident("expected loop variable name")?;

        self.expect(&TokenKind::Equal, "expected '=' after loop variable")?;
        let start = self.expression()?;

        self.expect(&TokenKind::To, "expected 'to' after loop start value")?;
        let end = self.expression()?;

        self.expect(&TokenKind::Do, "expected 'do' after loop range")?;
        let body = self.block()?;
        self.expect(&TokenKind::End, "expected 'end' to close loop")?;

        Ok(Stmt::RangeLoop { var, start, end, body, span })
    }

    /// Parse a while loop: repeat (cond) do block end
    fn while_loop(&mut self) -> Result<Stmt> {
        let span = self.advance().span; // consume 'repeat'

        let condition = self.expression()?;

        self.expect(&TokenKind::Do, "expected 'do' after repeat condition")?;
        let body = self.block()?;
        self.expect(&TokenKind::End, "expected 'end' to close repeat")?;

        Ok(Stmt::WhileLoop { condition, body, span })
    }

    /// Parse statements up to (not consuming) a block terminator.
    /// An EOF here means an unclosed block; the caller's expect on the
    /// terminator reports it.
    fn block(&mut self) -> Result<Vec<Stmt>> {
        let mut stmts = Vec::new();

        while !self.check(&TokenKind::End)
            && !self.check(&TokenKind::Otherwise)
            && !self.is_at_end()
        {
            stmts.push(self.statement()?);
        }

        Ok(stmts)
    }

    // ==================== Expressions ====================

    fn expression(&mut self) -> Result<Expr> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> Result<Expr> {
        let mut left = self.and_expr()?;

        while self.match_token(&TokenKind::Or) {
            let right = self.and_expr()?;
            let span = Span::new(
                left.span().start,
                right.span().end,
                left.span().line,
                left.span().column,
            );
            left = Expr::Logical {
                left: Box::new(left),
                op: LogicalOp::Or,
                right: Box::new(right),
                span,
            };
        }

        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Expr> {
        let mut left = self.not_expr()?;

        while self.match_token(&TokenKind::And) {
            let right = self.not_expr()?;
            let span = Span::new(
                left.span().start,
                right.span().end,
                left.span().line,
                left.span().column,
            );
            left = Expr::Logical {
                left: Box::new(left),
                op: LogicalOp::And,
                right: Box::new(right),
                span,
            };
        }

        Ok(left)
    }

    /// 'not' binds tighter than 'and' but looser than '==' so that
    /// `not a == b` reads as `not (a == b)`.
    fn not_expr(&mut self) -> Result<Expr> {
        if self.match_token(&TokenKind::Not) {
            let span = self.previous().span;
            let operand = self.not_expr()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
                span,
            });
        }

        self.equality()
    }

    fn equality(&mut self) -> Result<Expr> {
        let mut left = self.comparison()?;

        loop {
            let op = if self.match_token(&TokenKind::EqualEqual) {
                BinaryOp::Eq
            } else if self.match_token(&TokenKind::BangEqual) {
                BinaryOp::Ne
            } else {
                break;
            };

            let right = self.comparison()?;
            let span = Span::new(
                left.span().start,
                right.span().end,
                left.span().line,
                left.span().column,
            );
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            };
        }

        Ok(left)
    }

    fn comparison(&mut self) -> Result<Expr> {
        let mut left = self.term()?;

        loop {
            let op = if self.match_token(&TokenKind::Less) {
                BinaryOp::Lt
            } else if self.match_token(&TokenKind::LessEqual) {
                BinaryOp::Le
            } else if self.match_token(&TokenKind::Greater) {
                BinaryOp::Gt
            } else if self.match_token(&TokenKind::GreaterEqual) {
                BinaryOp::Ge
            } else {
                break;
            };

            let right = self.term()?;
            let span = Span::new(
                left.span().start,
                right.span().end,
                left.span().line,
                left.span().column,
            );
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            };
        }

        Ok(left)
    }

    fn term(&mut self) -> Result<Expr> {
        let mut left = self.factor()?;

        loop {
            let op = if self.match_token(&TokenKind::Plus) {
                BinaryOp::Add
            } else if self.match_token(&TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };

            let right = self.factor()?;
            let span = Span::new(
                left.span().start,
                right.span().end,
                left.span().line,
                left.span().column,
            );
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            };
        }

        Ok(left)
    }

    fn factor(&mut self) -> Result<Expr> {
        let mut left = self.unary()?;

        loop {
            let op = if self.match_token(&TokenKind::Star) {
                BinaryOp::Mul
            } else if self.match_token(&TokenKind::Slash) {
                BinaryOp::Div
            } else if self.match_token(&TokenKind::Percent) {
                BinaryOp::Mod
            } else {
                break;
            };

            let right = self.unary()?;
            let span = Span::new(
                left.span().start,
                right.span().end,
                left.span().line,
                left.span().column,
            );
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            };
        }

        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.match_token(&TokenKind::Minus) {
            let span = self.previous().span;
            let operand = self.unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
                span,
            });
        }

        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        let token = self.peek().clone();

        match &token.kind {
            TokenKind::Number(lexeme) => {
                let value = lexeme.parse::<f64>().map_err(|_| {
                    ParseonError::new(
                        ErrorKind::InvalidNumber(lexeme.clone()),
                        Some(token.span),
                    )
                })?;
                self.advance();
                Ok(Expr::Number { value, span: token.span })
            }
            TokenKind::Text(s) => {
                let value = s.clone();
                self.advance();
                Ok(Expr::Text { value, span: token.span })
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Bool { value: true, span: token.span })
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Bool { value: false, span: token.span })
            }
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();

                // Builtin call: name(args)
                if self.match_token(&TokenKind::LeftParen) {
                    return self.finish_call(name, token.span);
                }

                Ok(Expr::Ident { name, span: token.span })
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.expect(&TokenKind::RightParen, "expected ')' after expression")?;
                Ok(expr)
            }
            _ => Err(ParseonError::new(
                ErrorKind::ExpectedExpression,
                Some(token.span),
            )),
        }
    }

    fn finish_call(&mut self, name: String, name_span: Span) -> Result<Expr> {
        let mut args = Vec::new();

        if !self.check(&TokenKind::RightParen) {
            loop {
                args.push(self.expression()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let end_span = self.peek().span;
        self.expect(&TokenKind::RightParen, "expected ')' after arguments")?;

        let span = Span::new(
            name_span.start,
            end_span.end,
            name_span.line,
            name_span.column,
        );

        Ok(Expr::Call { name, args, span })
    }

    // ==================== Helpers ====================

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek_next(&self) -> Option<&Token> {
        self.tokens.get(self.current + 1)
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, message: &str) -> Result<&Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseonError::new(
                ErrorKind::ExpectedToken(message.to_string(), format!("{}", self.peek().kind)),
                Some(self.peek().span),
            ))
        }
    }

    fn expect_ident(&mut self, message: &str) -> Result<String> {
        if let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(ParseonError::new(
                ErrorKind::ExpectedToken(message.to_string(), format!("{}", self.peek().kind)),
                Some(self.peek().span),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(source: &str) -> Program {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize().unwrap();
        let mut parser = Parser::new(tokens);
        parser.parse().unwrap()
    }

    fn parse_err(source: &str) -> ParseonError {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize().unwrap();
        let mut parser = Parser::new(tokens);
        parser.parse().unwrap_err()
    }

    #[test]
    fn test_set_declaration() {
        let program = parse("set x = 42");
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Stmt::Declare { name, mutability, .. } => {
                assert_eq!(name, "x");
                assert_eq!(*mutability, Mutability::Mutable);
            }
            _ => panic!("expected declaration"),
        }
    }

    #[test]
    fn test_keep_declaration() {
        let program = parse("keep limit = 100");
        match &program.statements[0] {
            Stmt::Declare { name, mutability, .. } => {
                assert_eq!(name, "limit");
                assert_eq!(*mutability, Mutability::Immutable);
            }
            _ => panic!("expected declaration"),
        }
    }

    #[test]
    fn test_change_and_bare_assignment() {
        let program = parse("change x = 1\nx = 2");
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(&program.statements[0], Stmt::Assign { name, .. } if name == "x"));
        assert!(matches!(&program.statements[1], Stmt::Assign { name, .. } if name == "x"));
    }

    #[test]
    fn test_say_show() {
        let program = parse("say \"hi\"\nshow x + 1");
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(&program.statements[0], Stmt::Say { .. }));
        assert!(matches!(&program.statements[1], Stmt::Say { .. }));
    }

    #[test]
    fn test_ask() {
        let program = parse("ask age");
        assert!(matches!(&program.statements[0], Stmt::Ask { name, .. } if name == "age"));
    }

    #[test]
    fn test_single_branch_conditional() {
        let program = parse("when x > 5 do say \"big\" end");
        match &program.statements[0] {
            Stmt::Conditional { branches, else_body, .. } => {
                assert_eq!(branches.len(), 1);
                assert!(else_body.is_none());
            }
            _ => panic!("expected conditional"),
        }
    }

    #[test]
    fn test_otherwise_chain() {
        let program = parse(
            "check x == 1 do say \"a\" otherwise when x == 2 do say \"b\" otherwise say \"c\" end",
        );
        match &program.statements[0] {
            Stmt::Conditional { branches, else_body, .. } => {
                assert_eq!(branches.len(), 2);
                assert!(else_body.is_some());
            }
            _ => panic!("expected conditional"),
        }
    }

    #[test]
    fn test_range_loop() {
        let program = parse("loop i = 1 to 10 do show i end");
        match &program.statements[0] {
            Stmt::RangeLoop { var, body, .. } => {
                assert_eq!(var, "i");
                assert_eq!(body.len(), 1);
            }
            _ => panic!("expected range loop"),
        }
    }

    #[test]
    fn test_while_loop() {
        let program = parse("repeat (x < 3) do x = x + 1 end");
        match &program.statements[0] {
            Stmt::WhileLoop { body, .. } => assert_eq!(body.len(), 1),
            _ => panic!("expected while loop"),
        }
    }

    #[test]
    fn test_break_continue() {
        let program = parse("loop i = 1 to 5 do break continue end");
        match &program.statements[0] {
            Stmt::RangeLoop { body, .. } => {
                assert!(matches!(body[0], Stmt::Break { .. }));
                assert!(matches!(body[1], Stmt::Continue { .. }));
            }
            _ => panic!("expected range loop"),
        }
    }

    #[test]
    fn test_builtin_call() {
        let program = parse("show pow(2, 8)");
        match &program.statements[0] {
            Stmt::Say { value: Expr::Call { name, args, .. }, .. } => {
                assert_eq!(name, "pow");
                assert_eq!(args.len(), 2);
            }
            _ => panic!("expected call"),
        }
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let program = parse("show 1 + 2 * 3");
        match &program.statements[0] {
            Stmt::Say { value: Expr::Binary { op, right, .. }, .. } => {
                assert_eq!(*op, BinaryOp::Add);
                assert!(matches!(**right, Expr::Binary { op: BinaryOp::Mul, .. }));
            }
            _ => panic!("expected binary expression"),
        }
    }

    #[test]
    fn test_not_binds_over_and() {
        // a and not b parses as a and (not b)
        let program = parse("show a and not b");
        match &program.statements[0] {
            Stmt::Say { value: Expr::Logical { op, right, .. }, .. } => {
                assert_eq!(*op, LogicalOp::And);
                assert!(matches!(**right, Expr::Unary { op: UnaryOp::Not, .. }));
            }
            _ => panic!("expected logical expression"),
        }
    }

    #[test]
    fn test_missing_end() {
        let err = parse_err("when x > 1 do say \"a\"");
        assert_eq!(err.stage(), crate::error::Stage::Parse);
    }

    #[test]
    fn test_unexpected_token_reports_line() {
        let err = parse_err("say 1\nend");
        assert_eq!(err.line(), Some(2));
    }
}
