//! Declared policy parameters and the runtime types they are checked against.

use serde_json::Value;
use std::fmt;

/// Primitive type of a descriptor argument, as seen at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Number,
    String,
    Boolean,
    Object,
    Array,
    Null,
}

impl ParamType {
    /// Runtime type of a JSON-like argument value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Number(_) => ParamType::Number,
            Value::String(_) => ParamType::String,
            Value::Bool(_) => ParamType::Boolean,
            Value::Object(_) => ParamType::Object,
            Value::Array(_) => ParamType::Array,
            Value::Null => ParamType::Null,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParamType::Number => "number",
            ParamType::String => "string",
            ParamType::Boolean => "boolean",
            ParamType::Object => "object",
            ParamType::Array => "array",
            ParamType::Null => "null",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One required constructor parameter: its name in the descriptor's
/// argument object and the type its value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub expected: ParamType,
}

impl ParamSpec {
    pub const fn number(name: &'static str) -> Self {
        Self {
            name,
            expected: ParamType::Number,
        }
    }

    pub const fn new(name: &'static str, expected: ParamType) -> Self {
        Self { name, expected }
    }
}
