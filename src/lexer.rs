//! Lexer for the Parseon language
//!
//! Converts source code into a stream of tokens.

use crate::error::{ErrorKind, ParseonError, Result};
use crate::token::{lookup_keyword, Span, Token, TokenKind};

/// The lexer state
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer from source code
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire source
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }

        // Add EOF token
        tokens.push(Token::new(
            TokenKind::Eof,
            Span::new(self.current_pos, self.current_pos, self.line, self.column),
            String::new(),
        ));

        Ok(tokens)
    }

    /// Get the next token
    fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace_and_comments();

        let Some(&(start_pos, ch)) = self.chars.peek() else {
            return Ok(None);
        };

        let start_line = self.line;
        let start_column = self.column;

        let kind = match ch {
            // Single character tokens
            '(' => { self.advance(); TokenKind::LeftParen }
            ')' => { self.advance(); TokenKind::RightParen }
            ',' => { self.advance(); TokenKind::Comma }
            '+' => { self.advance(); TokenKind::Plus }
            '-' => { self.advance(); TokenKind::Minus }
            '*' => { self.advance(); TokenKind::Star }
            '/' => { self.advance(); TokenKind::Slash }
            '%' => { self.advance(); TokenKind::Percent }

            // Potentially two-character tokens (greedy: '==' before '=')
            '=' => {
                self.advance();
                if self.peek_char() == Some('=') {
                    self.advance();
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                }
            }
            '!' => {
                self.advance();
                if self.peek_char() == Some('=') {
                    self.advance();
                    TokenKind::BangEqual
                } else {
                    return Err(ParseonError::new(
                        ErrorKind::UnexpectedCharacter('!'),
                        Some(Span::new(start_pos, self.current_pos, start_line, start_column)),
                    ));
                }
            }
            '<' => {
                self.advance();
                if self.peek_char() == Some('=') {
                    self.advance();
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                self.advance();
                if self.peek_char() == Some('=') {
                    self.advance();
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                }
            }

            // Text literals
            '"' => self.scan_text()?,

            // Number literals
            c if c.is_ascii_digit() => self.scan_number(),

            // Identifiers and keywords
            c if c.is_alphabetic() || c == '_' => self.scan_identifier(),

            // Unknown character
            _ => {
                self.advance();
                return Err(ParseonError::new(
                    ErrorKind::UnexpectedCharacter(ch),
                    Some(Span::new(start_pos, self.current_pos, start_line, start_column)),
                ));
            }
        };

        let lexeme = self.source[start_pos..self.current_pos].to_string();

        Ok(Some(Token::new(
            kind,
            Span::new(start_pos, self.current_pos, start_line, start_column),
            lexeme,
        )))
    }

    /// Advance and return the current character
    fn advance(&mut self) -> Option<char> {
        if let Some((pos, ch)) = self.chars.next() {
            self.current_pos = pos + ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            Some(ch)
        } else {
            None
        }
    }

    /// Peek at the next character without advancing
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, ch)| ch)
    }

    /// Skip whitespace and '#' line comments
    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&(_, ch)) = self.chars.peek() {
            match ch {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                }

                // '#' comments run to the end of the line
                '#' => {
                    while let Some(&(_, c)) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }

                _ => break,
            }
        }
    }

    /// Scan a text literal. No escape processing: everything up to the
    /// closing quote is taken verbatim.
    fn scan_text(&mut self) -> Result<TokenKind> {
        let start_line = self.line;
        let start_column = self.column;
        let start_pos = self.current_pos;

        // Consume opening quote
        self.advance();

        let mut value = String::new();

        loop {
            match self.peek_char() {
                Some('"') => {
                    self.advance();
                    return Ok(TokenKind::Text(value));
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => break,
            }
        }

        Err(ParseonError::new(
            ErrorKind::UnterminatedText,
            Some(Span::new(start_pos, self.current_pos, start_line, start_column)),
        ))
    }

    /// Scan a number literal, keeping the textual lexeme. Parsing to f64
    /// happens when the AST literal is built.
    fn scan_number(&mut self) -> TokenKind {
        let start = self.current_pos;

        // Consume digits
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        // Check for decimal point followed by a digit
        if self.peek_char() == Some('.') {
            let remaining = &self.source[self.current_pos..];
            if remaining.chars().nth(1).map_or(false, |c| c.is_ascii_digit()) {
                self.advance(); // Consume the dot

                while let Some(c) = self.peek_char() {
                    if c.is_ascii_digit() {
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        TokenKind::Number(self.source[start..self.current_pos].to_string())
    }

    /// Scan an identifier or keyword
    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.current_pos;

        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.source[start..self.current_pos];

        // Check if it's a keyword
        if let Some(keyword) = lookup_keyword(text) {
            keyword
        } else {
            TokenKind::Ident(text.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        lexer.tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !matches!(k, TokenKind::Eof))
            .collect()
    }

    #[test]
    fn test_keywords() {
        let tokens = tokenize("set change keep say show ask when check otherwise do end");
        assert_eq!(tokens, vec![
            TokenKind::Set,
            TokenKind::Change,
            TokenKind::Keep,
            TokenKind::Say,
            TokenKind::Show,
            TokenKind::Ask,
            TokenKind::When,
            TokenKind::Check,
            TokenKind::Otherwise,
            TokenKind::Do,
            TokenKind::End,
        ]);
    }

    #[test]
    fn test_loop_keywords() {
        let tokens = tokenize("loop repeat to break continue");
        assert_eq!(tokens, vec![
            TokenKind::Loop,
            TokenKind::Repeat,
            TokenKind::To,
            TokenKind::Break,
            TokenKind::Continue,
        ]);
    }

    #[test]
    fn test_operators() {
        let tokens = tokenize("+ - * / % = == != < <= > >=");
        assert_eq!(tokens, vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Equal,
            TokenKind::EqualEqual,
            TokenKind::BangEqual,
            TokenKind::Less,
            TokenKind::LessEqual,
            TokenKind::Greater,
            TokenKind::GreaterEqual,
        ]);
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("42 3.14 0 100.0");
        assert_eq!(tokens, vec![
            TokenKind::Number("42".to_string()),
            TokenKind::Number("3.14".to_string()),
            TokenKind::Number("0".to_string()),
            TokenKind::Number("100.0".to_string()),
        ]);
    }

    #[test]
    fn test_text_literals() {
        let tokens = tokenize(r#""hello" "two words""#);
        assert_eq!(tokens, vec![
            TokenKind::Text("hello".to_string()),
            TokenKind::Text("two words".to_string()),
        ]);
    }

    #[test]
    fn test_no_escape_processing() {
        // Backslashes are ordinary characters inside text literals
        let tokens = tokenize(r#""a\nb""#);
        assert_eq!(tokens, vec![TokenKind::Text("a\\nb".to_string())]);
    }

    #[test]
    fn test_identifiers() {
        let tokens = tokenize("foo bar_baz x1 _private");
        assert_eq!(tokens, vec![
            TokenKind::Ident("foo".to_string()),
            TokenKind::Ident("bar_baz".to_string()),
            TokenKind::Ident("x1".to_string()),
            TokenKind::Ident("_private".to_string()),
        ]);
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = tokenize("set x = 1 # trailing comment\n# whole line\nshow x");
        assert_eq!(tokens, vec![
            TokenKind::Set,
            TokenKind::Ident("x".to_string()),
            TokenKind::Equal,
            TokenKind::Number("1".to_string()),
            TokenKind::Show,
            TokenKind::Ident("x".to_string()),
        ]);
    }

    #[test]
    fn test_line_tracking() {
        let mut lexer = Lexer::new("say 1\nsay 2\nsay 3");
        let tokens = lexer.tokenize().unwrap();
        let lines: Vec<usize> = tokens.iter()
            .filter(|t| matches!(t.kind, TokenKind::Say))
            .map(|t| t.span.line)
            .collect();
        assert_eq!(lines, vec![1, 2, 3]);
    }

    #[test]
    fn test_unterminated_text() {
        let mut lexer = Lexer::new("say \"oops");
        let err = lexer.tokenize().unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnterminatedText);
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn test_unexpected_character() {
        let mut lexer = Lexer::new("set x = 1\nset y = @");
        let err = lexer.tokenize().unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedCharacter('@'));
        assert_eq!(err.line(), Some(2));
    }
}
