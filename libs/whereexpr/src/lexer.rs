//! `$where` lexer - tokenizes expression strings

use crate::error::{Error, Result};
use crate::token::{Token, TokenType};

/// The `$where` lexer
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    current_char: Option<char>,
}

impl Lexer {
    /// Create a new lexer for the given input
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Self {
            chars,
            position: 0,
            current_char,
        }
    }

    /// Advance to the next character
    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.chars.get(self.position).copied();
    }

    /// Peek at the next character without advancing
    fn peek(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current_char {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Read an identifier or keyword
    fn read_identifier(&mut self) -> String {
        let start_pos = self.position;

        while let Some(c) = self.current_char {
            if c.is_alphanumeric() || c == '_' || c == '$' {
                self.advance();
            } else {
                break;
            }
        }

        self.chars[start_pos..self.position].iter().collect()
    }

    /// Read a string literal delimited by `quote` (either `"` or `'`)
    fn read_string(&mut self, quote: char) -> Result<String> {
        self.advance(); // Skip opening quote

        let mut value = String::new();

        while let Some(c) = self.current_char {
            if c == quote {
                self.advance(); // Skip closing quote
                return Ok(value);
            }

            if c != '\\' {
                value.push(c);
                self.advance();
                continue;
            }

            self.advance(); // Skip backslash
            let Some(escaped) = self.current_char else {
                return Err(Error::ParseError(
                    "Incomplete escape sequence in string literal".into(),
                ));
            };

            match escaped {
                'n' => value.push('\n'),
                'r' => value.push('\r'),
                't' => value.push('\t'),
                'b' => value.push('\x08'),
                'f' => value.push('\x0C'),
                '0' => value.push('\0'),
                'u' => {
                    self.advance(); // Skip 'u'
                    let mut hex = String::new();
                    for _ in 0..4 {
                        match self.current_char {
                            Some(h) if h.is_ascii_hexdigit() => {
                                hex.push(h);
                                self.advance();
                            }
                            _ => {
                                return Err(Error::ParseError(
                                    "Invalid unicode escape sequence".into(),
                                ))
                            }
                        }
                    }
                    let code = u32::from_str_radix(&hex, 16)
                        .map_err(|_| Error::ParseError("Invalid unicode code point".into()))?;
                    value.push(char::from_u32(code).ok_or_else(|| {
                        Error::ParseError("Invalid unicode character".into())
                    })?);
                    continue; // Already positioned after the escape
                }
                // \" \' \\ \/ and any unknown escape yield the character itself
                other => value.push(other),
            }
            self.advance();
        }

        Err(Error::ParseError(format!(
            "Unterminated string literal (missing closing {quote})"
        )))
    }

    /// Read an unsigned decimal number
    fn read_number(&mut self) -> String {
        let start_pos = self.position;

        while matches!(self.current_char, Some(c) if c.is_ascii_digit()) {
            self.advance();
        }

        // Only consume the dot when digits follow it
        if self.current_char == Some('.') && matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
            while matches!(self.current_char, Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }

        self.chars[start_pos..self.position].iter().collect()
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let position = self.position;
        let Some(c) = self.current_char else {
            return Token::eof(position);
        };

        match c {
            '.' => {
                self.advance();
                Token::new(TokenType::Dot, ".", position)
            }
            '[' => {
                self.advance();
                Token::new(TokenType::OpenBracket, "[", position)
            }
            ']' => {
                self.advance();
                Token::new(TokenType::CloseBracket, "]", position)
            }
            '(' => {
                self.advance();
                Token::new(TokenType::OpenParen, "(", position)
            }
            ')' => {
                self.advance();
                Token::new(TokenType::CloseParen, ")", position)
            }
            '"' | '\'' => match self.read_string(c) {
                Ok(value) => Token::new(TokenType::StringLiteral, value, position),
                Err(e) => Token::error(format!("String error: {e}"), position),
            },
            '=' => {
                self.advance();
                if self.current_char != Some('=') {
                    return Token::error("Assignment '=' is not supported", position);
                }
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::new(TokenType::StrictEqual, "===", position)
                } else {
                    Token::new(TokenType::Equal, "==", position)
                }
            }
            '!' => {
                self.advance();
                if self.current_char != Some('=') {
                    return Token::new(TokenType::Bang, "!", position);
                }
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::new(TokenType::StrictNotEqual, "!==", position)
                } else {
                    Token::new(TokenType::NotEqual, "!=", position)
                }
            }
            '&' => {
                self.advance();
                if self.current_char == Some('&') {
                    self.advance();
                    Token::new(TokenType::And, "&&", position)
                } else {
                    Token::error("Unexpected '&' character (did you mean '&&'?)", position)
                }
            }
            '|' => {
                self.advance();
                if self.current_char == Some('|') {
                    self.advance();
                    Token::new(TokenType::Or, "||", position)
                } else {
                    Token::error("Unexpected '|' character (did you mean '||'?)", position)
                }
            }
            c if c.is_ascii_digit() => {
                let number = self.read_number();
                Token::new(TokenType::NumberLiteral, number, position)
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                let ident = self.read_identifier();
                let token_type = match ident.as_str() {
                    "true" => TokenType::True,
                    "false" => TokenType::False,
                    "null" => TokenType::Null,
                    "undefined" => TokenType::Undefined,
                    "this" => TokenType::This,
                    _ => TokenType::Identifier,
                };
                Token::new(token_type, ident, position)
            }
            other => {
                self.advance();
                Token::error(format!("Unexpected character '{other}'"), position)
            }
        }
    }

    /// Tokenize the whole input, stopping after `Eof` or the first `Error`
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = matches!(token.token_type, TokenType::Eof | TokenType::Error);
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }
}
