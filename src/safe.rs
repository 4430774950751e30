//! Non-failing navigation over one record.
//!
//! Every access on a [`SafeObject`] returns another `SafeObject`: the real
//! value when it exists, `Unset` when it does not. Access on `Unset` stays
//! `Unset`, so a chain like `record.attr("from").attr("id")` never fails and
//! still tells "absent" apart from "present and null".
//!
//! ```
//! use stand_in::{SafeObject, Value};
//! use serde_json::json;
//!
//! let record = SafeObject::new(json!({"type": "typing", "text": null}));
//! assert!(record.attr("x").attr("y").attr("z").is_unset());
//! assert_eq!(record.attr("text"), Value::Null);
//! assert_ne!(record.attr("missing"), Value::Null);
//! assert_eq!(record.get("missing", "n/a"), Value::from("n/a"));
//! ```

use crate::{
    evaluator::{self, EvalError},
    value::{Named, Value},
};

#[derive(Debug, Clone, PartialEq)]
pub struct SafeObject {
    value: Value,
}

impl SafeObject {
    pub fn new(value: impl Into<Value>) -> Self {
        SafeObject {
            value: value.into(),
        }
    }

    pub fn unset() -> Self {
        SafeObject { value: Value::Unset }
    }

    pub fn is_unset(&self) -> bool {
        self.value.is_unset()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// `value.name`, or `Unset`.
    pub fn attr(&self, name: &str) -> SafeObject {
        SafeObject::new(evaluator::attribute(&self.value, name).unwrap_or(Value::Unset))
    }

    /// `value[key]`, or `Unset`.
    pub fn item(&self, key: impl Into<Value>) -> SafeObject {
        SafeObject::new(evaluator::item(&self.value, &key.into()).unwrap_or(Value::Unset))
    }

    /// Calls a wrapped function or bound method. Calling `Unset` yields
    /// `Unset`; errors raised by the callee propagate.
    pub fn call(&self, args: &[Value], named: &Named) -> Result<SafeObject, EvalError> {
        evaluator::call(&self.value, args, named).map(SafeObject::new)
    }

    /// Calls the built-in method `name`, or a function stored in the field
    /// `name`. A missing method is `Unset` rather than an error.
    pub fn method(&self, name: &str, args: &[Value], named: &Named) -> Result<SafeObject, EvalError> {
        let target = evaluator::method(&self.value, name).unwrap_or(Value::Unset);
        evaluator::call(&target, args, named).map(SafeObject::new)
    }

    /// Key lookup that answers `default` when the key is absent, without
    /// going through `Unset`.
    pub fn get(&self, key: &str, default: impl Into<Value>) -> Value {
        match &self.value {
            Value::Object(map) => map.get(key).cloned().unwrap_or_else(|| default.into()),
            _ => default.into(),
        }
    }

    /// Follows a separator-delimited path such as `from.id` or
    /// `attachments.0.contentType`. Segments that parse as integers also
    /// index arrays.
    pub fn path(&self, path: &str, separator: char) -> SafeObject {
        self.locate(path, separator).1
    }

    /// Returns `(parent, target)` for a path: the container holding the last
    /// segment, and the value at it.
    pub fn locate(&self, path: &str, separator: char) -> (SafeObject, SafeObject) {
        let mut parent = self.clone();
        let mut current = self.clone();
        for segment in path.split(separator) {
            let next = current.segment(segment);
            parent = std::mem::replace(&mut current, next);
        }
        (parent, current)
    }

    fn segment(&self, segment: &str) -> SafeObject {
        match (&self.value, segment.parse::<i64>()) {
            (Value::Array(_) | Value::String(_), Ok(index)) => self.item(index),
            _ => self.item(segment),
        }
    }
}

impl PartialEq<Value> for SafeObject {
    fn eq(&self, other: &Value) -> bool {
        self.value == *other
    }
}

impl From<SafeObject> for Value {
    fn from(s: SafeObject) -> Self {
        s.value
    }
}
