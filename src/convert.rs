//! Bridges between records as the transport hands them over and [`Value`].
//!
//! Key/value records arrive as `serde_json::Value`; typed records are any
//! `Serialize` type and go through `serde_json` on the way in.

use serde::Serialize;

use crate::Value;

/// Convert serde_json::Value to Value
pub fn json_to_value(v: serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map_or(Value::Null, Value::Float),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(json_to_value).collect()),
        serde_json::Value::Object(obj) => {
            Value::Object(obj.into_iter().map(|(k, v)| (k, json_to_value(v))).collect())
        }
    }
}

/// Convert Value to serde_json::Value.
///
/// `Unset`, functions and bound methods have no JSON form and become `null`.
pub fn value_to_json(v: Value) -> serde_json::Value {
    match v {
        Value::Null | Value::Unset | Value::Function(_) | Value::Method(_) => {
            serde_json::Value::Null
        }
        Value::Boolean(b) => serde_json::Value::Bool(b),
        Value::Integer(i) => serde_json::Value::Number(i.into()),
        Value::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s),
        Value::Array(arr) => serde_json::Value::Array(arr.into_iter().map(value_to_json).collect()),
        Value::Object(obj) => serde_json::Value::Object(
            obj.into_iter()
                .map(|(k, v)| (k, value_to_json(v)))
                .collect(),
        ),
    }
}

impl Value {
    /// Converts a typed record into a value by serializing its fields.
    ///
    /// ```
    /// use serde::Serialize;
    /// use stand_in::Value;
    ///
    /// #[derive(Serialize)]
    /// struct Activity { kind: String, text: Option<String> }
    ///
    /// let v = Value::from_serialize(&Activity { kind: "typing".into(), text: None }).unwrap();
    /// assert_eq!(v, Value::object([("kind", Value::from("typing")), ("text", Value::Null)]));
    /// ```
    pub fn from_serialize<T: Serialize + ?Sized>(record: &T) -> Result<Value, serde_json::Error> {
        serde_json::to_value(record).map(json_to_value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        json_to_value(v)
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        value_to_json(v)
    }
}
