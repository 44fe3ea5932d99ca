//! `$where` parser - converts expression strings to AST
//!
//! Recursive descent parser. Precedence (lowest to highest):
//! 1. or (`||`)
//! 2. and (`&&`)
//! 3. equality (`==`, `!=`, `===`, `!==`)
//! 4. unary (`!`)
//! 5. member / index access
//! 6. primary (literal, `this`, identifier, parenthesized)

use crate::ast::{AstNode, EqualityOperator, Literal};
use crate::error::{Error, Result};
use crate::lexer::Lexer;
use crate::token::{Token, TokenType};

/// Parser for `$where` expressions
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    recursion_depth: usize,
    operator_count: usize,
}

const MAX_RECURSION_DEPTH: usize = 200;

/// Operator chains are parsed in loops, so they are bounded by count rather
/// than by recursion depth.
const MAX_OPERATOR_COUNT: usize = 256;

impl Parser {
    /// Create a new parser for the given input string
    pub fn new(input: &str) -> Self {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token();
        Self {
            lexer,
            current_token,
            recursion_depth: 0,
            operator_count: 0,
        }
    }

    fn advance(&mut self) {
        self.current_token = self.lexer.next_token();
    }

    fn current_token_is(&self, token_type: TokenType) -> bool {
        self.current_token.token_type == token_type
    }

    /// Error for the current token, surfacing lexer diagnostics verbatim
    fn unexpected(&self, context: &str) -> Error {
        let token = &self.current_token;
        match token.token_type {
            TokenType::Error => Error::ParseError(format!(
                "{} at position {}",
                token.value, token.position
            )),
            TokenType::Eof => Error::ParseError(format!(
                "Unexpected end of input {context} at position {}",
                token.position
            )),
            other => Error::ParseError(format!(
                "Unexpected token {other:?} ('{}') {context} at position {}",
                token.value, token.position
            )),
        }
    }

    fn expect(&mut self, token_type: TokenType, context: &str) -> Result<Token> {
        if self.current_token_is(token_type) {
            let token = self.current_token.clone();
            self.advance();
            Ok(token)
        } else {
            Err(self.unexpected(context))
        }
    }

    /// Parse the entire expression (top-level entry point)
    pub fn parse(&mut self) -> Result<AstNode> {
        let expr = self.parse_expression()?;

        if !self.current_token_is(TokenType::Eof) {
            return Err(self.unexpected("after expression"));
        }

        Ok(expr)
    }

    fn check_recursion_depth(&mut self) -> Result<()> {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            return Err(Error::ParseError(format!(
                "Expression too deeply nested (max depth: {MAX_RECURSION_DEPTH})"
            )));
        }
        Ok(())
    }

    fn check_operator_count(&mut self) -> Result<()> {
        self.operator_count += 1;
        if self.operator_count > MAX_OPERATOR_COUNT {
            return Err(Error::ParseError(format!(
                "Expression has too many operators (max: {MAX_OPERATOR_COUNT})"
            )));
        }
        Ok(())
    }

    fn parse_expression(&mut self) -> Result<AstNode> {
        self.check_recursion_depth()?;
        let expr = self.parse_or_expression()?;
        self.recursion_depth -= 1;
        Ok(expr)
    }

    fn parse_or_expression(&mut self) -> Result<AstNode> {
        let mut left = self.parse_and_expression()?;

        while self.current_token_is(TokenType::Or) {
            self.check_operator_count()?;
            self.advance();
            let right = self.parse_and_expression()?;
            left = AstNode::Or {
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_and_expression(&mut self) -> Result<AstNode> {
        let mut left = self.parse_equality_expression()?;

        while self.current_token_is(TokenType::And) {
            self.check_operator_count()?;
            self.advance();
            let right = self.parse_equality_expression()?;
            left = AstNode::And {
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_equality_expression(&mut self) -> Result<AstNode> {
        let mut left = self.parse_unary_expression()?;

        loop {
            let operator = match self.current_token.token_type {
                TokenType::Equal => EqualityOperator::Equal,
                TokenType::NotEqual => EqualityOperator::NotEqual,
                TokenType::StrictEqual => EqualityOperator::StrictEqual,
                TokenType::StrictNotEqual => EqualityOperator::StrictNotEqual,
                _ => break,
            };
            self.check_operator_count()?;
            self.advance();
            let right = self.parse_unary_expression()?;
            left = AstNode::Equality {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> Result<AstNode> {
        if self.current_token_is(TokenType::Bang) {
            self.check_recursion_depth()?;
            self.advance();
            let operand = self.parse_unary_expression()?;
            self.recursion_depth -= 1;
            return Ok(AstNode::Not(Box::new(operand)));
        }

        self.parse_postfix_expression()
    }

    fn parse_postfix_expression(&mut self) -> Result<AstNode> {
        let mut node = self.parse_primary()?;

        loop {
            if self.current_token_is(TokenType::Dot) {
                self.check_operator_count()?;
                self.advance();
                let property = self.expect(TokenType::Identifier, "after '.'")?;
                node = AstNode::Member {
                    object: Box::new(node),
                    property: property.value,
                };
            } else if self.current_token_is(TokenType::OpenBracket) {
                self.check_operator_count()?;
                self.advance();
                let index = self.parse_expression()?;
                self.expect(TokenType::CloseBracket, "closing '['")?;
                node = AstNode::Index {
                    object: Box::new(node),
                    index: Box::new(index),
                };
            } else {
                return Ok(node);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<AstNode> {
        let token = self.current_token.clone();
        let node = match token.token_type {
            TokenType::StringLiteral => AstNode::Literal(Literal::String(token.value)),
            TokenType::NumberLiteral => {
                let number = token.value.parse::<f64>().map_err(|_| {
                    Error::ParseError(format!(
                        "Invalid number '{}' at position {}",
                        token.value, token.position
                    ))
                })?;
                AstNode::Literal(Literal::Number(number))
            }
            TokenType::True => AstNode::Literal(Literal::Boolean(true)),
            TokenType::False => AstNode::Literal(Literal::Boolean(false)),
            TokenType::Null => AstNode::Literal(Literal::Null),
            TokenType::Undefined => AstNode::Literal(Literal::Undefined),
            TokenType::This => AstNode::This,
            TokenType::Identifier => AstNode::Identifier(token.value),
            TokenType::OpenParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenType::CloseParen, "closing '('")?;
                return Ok(inner);
            }
            _ => return Err(self.unexpected("where an operand was expected")),
        };
        self.advance();
        Ok(node)
    }
}

/// Parse `input` into an AST
pub fn parse(input: &str) -> Result<AstNode> {
    Parser::new(input).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_binds_tighter_than_or() {
        let ast = parse("a == b || c == d && e == f").unwrap();
        assert_eq!(ast.to_string(), "((a == b) || ((c == d) && (e == f)))");
    }

    #[test]
    fn test_left_associative_and() {
        let ast = parse("a && b && c").unwrap();
        assert_eq!(ast.to_string(), "((a && b) && c)");
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let ast = parse("(a || b) && c").unwrap();
        assert_eq!(ast.to_string(), "((a || b) && c)");
    }

    #[test]
    fn test_member_chain() {
        let ast = parse("this.address.city").unwrap();
        assert_eq!(ast.to_string(), "this.address.city");
    }

    #[test]
    fn test_dangling_operator() {
        let err = parse("this.email ==").unwrap_err();
        assert!(matches!(err, Error::ParseError(msg) if msg.contains("end of input")));
    }

    #[test]
    fn test_recursion_limit() {
        let deep = format!("{}true{}", "(".repeat(500), ")".repeat(500));
        assert!(parse(&deep).is_err());
    }

    #[test]
    fn test_operator_limit() {
        let at_limit = format!("true{}", " || true".repeat(MAX_OPERATOR_COUNT));
        assert!(parse(&at_limit).is_ok());

        let over = format!("true{}", " || true".repeat(MAX_OPERATOR_COUNT + 1));
        let err = parse(&over).unwrap_err();
        assert!(matches!(err, Error::ParseError(msg) if msg.contains("too many operators")));
    }
}
