//! Abstract Syntax Tree (AST) representation
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! expression : or
//! or         : and ('||' and)*
//! and        : equality ('&&' equality)*
//! equality   : unary (('==' | '!=' | '===' | '!==') unary)*
//! unary      : '!' unary | postfix
//! postfix    : primary ('.' IDENT | '[' expression ']')*
//! primary    : literal | 'this' | IDENT | '(' expression ')'
//! ```

use std::fmt;

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualityOperator {
    Equal,          // ==
    NotEqual,       // !=
    StrictEqual,    // ===
    StrictNotEqual, // !==
}

impl EqualityOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::StrictEqual => "===",
            Self::StrictNotEqual => "!==",
        }
    }
}

/// AST node representing a `$where` expression
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    Literal(Literal),

    /// The document under test
    This,

    /// Free identifier; only `obj` (an alias of `this`) resolves
    Identifier(String),

    /// `object.property`
    Member {
        object: Box<AstNode>,
        property: String,
    },

    /// `object[index]`
    Index {
        object: Box<AstNode>,
        index: Box<AstNode>,
    },

    /// `!operand`
    Not(Box<AstNode>),

    Equality {
        left: Box<AstNode>,
        operator: EqualityOperator,
        right: Box<AstNode>,
    },

    And {
        left: Box<AstNode>,
        right: Box<AstNode>,
    },

    Or {
        left: Box<AstNode>,
        right: Box<AstNode>,
    },
}

impl AstNode {
    /// Number of `||` nodes in the tree.
    pub fn or_count(&self) -> usize {
        match self {
            Self::Or { left, right } => 1 + left.or_count() + right.or_count(),
            Self::And { left, right } | Self::Equality { left, right, .. } => {
                left.or_count() + right.or_count()
            }
            Self::Index { object, index } => object.or_count() + index.or_count(),
            Self::Member { object, .. } => object.or_count(),
            Self::Not(inner) => inner.or_count(),
            Self::Literal(_) | Self::This | Self::Identifier(_) => 0,
        }
    }
}

/// Renders the tree fully parenthesized, which makes the parse shape visible.
impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(Literal::String(s)) => write!(f, "{s:?}"),
            Self::Literal(Literal::Number(n)) => write!(f, "{n}"),
            Self::Literal(Literal::Boolean(b)) => write!(f, "{b}"),
            Self::Literal(Literal::Null) => f.write_str("null"),
            Self::Literal(Literal::Undefined) => f.write_str("undefined"),
            Self::This => f.write_str("this"),
            Self::Identifier(name) => f.write_str(name),
            Self::Member { object, property } => write!(f, "{object}.{property}"),
            Self::Index { object, index } => write!(f, "{object}[{index}]"),
            Self::Not(inner) => write!(f, "!{inner}"),
            Self::Equality {
                left,
                operator,
                right,
            } => write!(f, "({left} {} {right})", operator.as_str()),
            Self::And { left, right } => write!(f, "({left} && {right})"),
            Self::Or { left, right } => write!(f, "({left} || {right})"),
        }
    }
}
