/*
 * Responsibility
 * - IAM から返る user-info payload (Identity)
 * - request の attribute scope (RequestAttributes) に載せて handler へ渡す
 */
use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

/// Gate が identity を格納する attribute key
pub const USER_ATTRIBUTE: &str = "user";

/// Opaque user-info payload. The gate only cares whether it is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Identity(Value);

impl Identity {
    /// falsy な payload (`null`, `false`, `0`, `""`, `"0"`, `[]`, `{}`) は identity なしとして扱う
    pub fn from_payload(payload: Value) -> Option<Self> {
        let empty = match &payload {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::String(s) => s.is_empty() || s == "0",
            Value::Array(arr) => arr.is_empty(),
            Value::Object(map) => map.is_empty(),
            Value::Number(n) => n.as_f64() == Some(0.0),
        };

        if empty { None } else { Some(Self(payload)) }
    }

    pub fn into_payload(self) -> Value {
        self.0
    }
}

/// Per-request attribute bag (request extensions に 1 つだけ入る)
#[derive(Debug, Clone, Default)]
pub struct RequestAttributes {
    values: HashMap<String, Value>,
}

impl RequestAttributes {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn user(&self) -> Option<&Value> {
        self.get(USER_ATTRIBUTE)
    }
}
