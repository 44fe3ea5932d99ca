//! Tree-walking evaluator
//!
//! An [`Expression`] is parsed once and can then be tested against any number
//! of documents. Evaluation never mutates the document.

use serde_json::Value as JsonValue;

use crate::ast::{AstNode, EqualityOperator, Literal};
use crate::error::{Error, Result};
use crate::parser::Parser;
use crate::value::Value;

/// Identifier that resolves to the current document, besides `this`.
const DOCUMENT_ALIAS: &str = "obj";

/// A parsed `$where` expression
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    ast: AstNode,
}

impl Expression {
    /// Parse `source` into an expression
    pub fn parse(source: &str) -> Result<Self> {
        let ast = Parser::new(source).parse()?;
        Ok(Self {
            source: source.to_string(),
            ast,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &AstNode {
        &self.ast
    }

    /// Evaluate with `this` bound to `document`
    pub fn evaluate(&self, document: &JsonValue) -> Result<Value> {
        eval_node(&self.ast, document)
    }

    /// Evaluate and reduce the result to its truthiness
    pub fn test(&self, document: &JsonValue) -> Result<bool> {
        Ok(self.evaluate(document)?.is_truthy())
    }
}

fn eval_node(node: &AstNode, document: &JsonValue) -> Result<Value> {
    match node {
        AstNode::Literal(literal) => Ok(match literal {
            Literal::String(s) => Value::String(s.clone()),
            Literal::Number(n) => Value::Number(*n),
            Literal::Boolean(b) => Value::Boolean(*b),
            Literal::Null => Value::Null,
            Literal::Undefined => Value::Undefined,
        }),
        AstNode::This => Ok(Value::from_json(document)),
        AstNode::Identifier(name) if name == DOCUMENT_ALIAS => Ok(Value::from_json(document)),
        AstNode::Identifier(name) => Err(Error::ReferenceError(name.clone())),
        AstNode::Member { object, property } => {
            let target = eval_node(object, document)?;
            read_property(&target, property)
        }
        AstNode::Index { object, index } => {
            let target = eval_node(object, document)?;
            let key = match eval_node(index, document)? {
                Value::String(s) => s,
                Value::Number(n) if n.fract() == 0.0 && n >= 0.0 => format!("{n}"),
                other => {
                    return Err(Error::TypeError(format!(
                        "cannot index with a {} key",
                        other.type_name()
                    )))
                }
            };
            read_property(&target, &key)
        }
        AstNode::Not(inner) => Ok(Value::Boolean(!eval_node(inner, document)?.is_truthy())),
        AstNode::Equality {
            left,
            operator,
            right,
        } => {
            let l = eval_node(left, document)?;
            let r = eval_node(right, document)?;
            let result = match operator {
                EqualityOperator::Equal => l.loose_equals(&r),
                EqualityOperator::NotEqual => !l.loose_equals(&r),
                EqualityOperator::StrictEqual => l.strict_equals(&r),
                EqualityOperator::StrictNotEqual => !l.strict_equals(&r),
            };
            Ok(Value::Boolean(result))
        }
        // Short-circuit: the right operand is not evaluated when the left decides.
        AstNode::And { left, right } => {
            let l = eval_node(left, document)?;
            if l.is_truthy() {
                eval_node(right, document)
            } else {
                Ok(l)
            }
        }
        AstNode::Or { left, right } => {
            let l = eval_node(left, document)?;
            if l.is_truthy() {
                Ok(l)
            } else {
                eval_node(right, document)
            }
        }
    }
}

fn read_property(target: &Value, property: &str) -> Result<Value> {
    match target {
        Value::Undefined | Value::Null => Err(Error::TypeError(format!(
            "cannot read property '{property}' of {}",
            target.type_name()
        ))),
        Value::Composite(JsonValue::Object(map)) => {
            Ok(map.get(property).map(Value::from_json).unwrap_or(Value::Undefined))
        }
        Value::Composite(JsonValue::Array(items)) => {
            if property == "length" {
                return Ok(Value::Number(items.len() as f64));
            }
            Ok(property
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i))
                .map(Value::from_json)
                .unwrap_or(Value::Undefined))
        }
        Value::String(s) if property == "length" => Ok(Value::Number(s.chars().count() as f64)),
        _ => Ok(Value::Undefined),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> JsonValue {
        json!({
            "email": "contact1@private.info",
            "sharedWith": "user1",
            "address": { "street": "123 Fake St" }
        })
    }

    #[test]
    fn test_field_equality() {
        let expr = Expression::parse(r#"this.sharedWith == "user1""#).unwrap();
        assert!(expr.test(&doc()).unwrap());
    }

    #[test]
    fn test_missing_field_is_undefined() {
        let expr = Expression::parse("this.phone").unwrap();
        assert_eq!(expr.evaluate(&doc()).unwrap(), Value::Undefined);
    }

    #[test]
    fn test_nested_field() {
        let expr = Expression::parse(r#"this.address.street == "123 Fake St""#).unwrap();
        assert!(expr.test(&doc()).unwrap());
    }

    #[test]
    fn test_property_of_undefined_is_type_error() {
        let expr = Expression::parse("this.phone.area").unwrap();
        assert!(matches!(expr.test(&doc()), Err(Error::TypeError(_))));
    }

    #[test]
    fn test_unknown_identifier_is_reference_error() {
        let expr = Expression::parse("sharedWith == 'user1'").unwrap();
        assert_eq!(
            expr.test(&doc()),
            Err(Error::ReferenceError("sharedWith".into()))
        );
    }

    #[test]
    fn test_short_circuit_skips_failing_operand() {
        let expr = Expression::parse("true || this.phone.area").unwrap();
        assert!(expr.test(&doc()).unwrap());
    }

    #[test]
    fn test_obj_alias() {
        let expr = Expression::parse(r#"obj["email"] === this.email"#).unwrap();
        assert!(expr.test(&doc()).unwrap());
    }
}
