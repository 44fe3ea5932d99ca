//! Runtime values produced while evaluating an expression

use serde_json::Value as JsonValue;

/// Runtime value
///
/// Arrays and objects read from the document stay as JSON so that member
/// access can keep walking into them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Composite(JsonValue),
}

impl Value {
    /// Convert a JSON document value into a runtime value
    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Boolean(*b),
            JsonValue::Number(n) => n.as_f64().map(Self::Number).unwrap_or(Self::Undefined),
            JsonValue::String(s) => Self::String(s.clone()),
            JsonValue::Array(_) | JsonValue::Object(_) => Self::Composite(json.clone()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Composite(_) => "object",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Boolean(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Composite(_) => true,
        }
    }

    /// `===`: same type and same value
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Composite(a), Self::Composite(b)) => a == b,
            _ => false,
        }
    }

    /// `==`: coerces numbers, numeric strings and booleans before comparing
    pub fn loose_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Undefined | Self::Null, Self::Undefined | Self::Null) => true,
            (Self::Undefined | Self::Null, _) | (_, Self::Undefined | Self::Null) => false,
            (Self::Number(a), Self::String(s)) | (Self::String(s), Self::Number(a)) => {
                string_to_number(s) == *a
            }
            (Self::Boolean(b), other) | (other, Self::Boolean(b))
                if !matches!(other, Self::Boolean(_)) =>
            {
                Self::Number(if *b { 1.0 } else { 0.0 }).loose_equals(other)
            }
            _ => self.strict_equals(other),
        }
    }
}

/// Numeric conversion of a string; blank strings are zero, garbage is NaN
fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}
