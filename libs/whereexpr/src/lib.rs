//! `$where` expression engine
//!
//! Evaluates the small script dialect accepted by the document store's
//! `$where` operator against a single JSON document bound to `this`.
//!
//! ```text
//! Expression String
//!      |
//!   Lexer -> Tokens
//!      |
//!   Parser -> AST
//!      |
//! Evaluator (this = document) -> Value -> truthiness
//! ```
//!
//! The dialect covers what a stored-procedure style filter typically uses:
//! member access (`this.email`, `this["email"]`), string/number/boolean/null
//! literals, `==`, `!=`, `===`, `!==`, `!`, `&&`, `||` and parentheses.
//! `&&` binds tighter than `||` and both associate to the left.
//!
//! Text handed to [`Expression::parse`] is code. Whatever a caller splices
//! into it becomes part of the expression's structure.

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod value;

pub use ast::AstNode;
pub use error::{Error, Result};
pub use eval::Expression;
pub use value::Value;
