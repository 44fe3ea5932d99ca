//! Token types for the `$where` lexer

/// Token types for the `$where` lexer
#[derive(Debug, PartialEq, Clone, Copy, Eq)]
pub enum TokenType {
    // Literals
    StringLiteral,
    NumberLiteral,

    // Identifiers
    Identifier,

    // Keywords
    True,
    False,
    Null,
    Undefined,
    This,

    // Operators
    Dot,            // .
    OpenBracket,    // [
    CloseBracket,   // ]
    Bang,           // !
    Equal,          // ==
    StrictEqual,    // ===
    NotEqual,       // !=
    StrictNotEqual, // !==
    And,            // &&
    Or,             // ||

    // Delimiters
    OpenParen,  // (
    CloseParen, // )

    // End of input
    Eof,

    // Error
    Error,
}

/// A token in a `$where` expression
#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub value: String,
    /// Character offset of the first character of the token.
    pub position: usize,
}

impl Token {
    pub fn new(token_type: TokenType, value: impl Into<String>, position: usize) -> Self {
        Self {
            token_type,
            value: value.into(),
            position,
        }
    }

    pub fn eof(position: usize) -> Self {
        Self::new(TokenType::Eof, String::new(), position)
    }

    pub fn error(message: impl Into<String>, position: usize) -> Self {
        Self::new(TokenType::Error, message, position)
    }
}
