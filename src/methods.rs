//! Built-in methods reachable through attribute access.
//!
//! `_.text.contains("x")` records an attribute access followed by a call.
//! At resolution the attribute step binds `contains` to the string and the
//! call step lands here.

use std::collections::HashMap;

use regex::Regex;

use crate::{
    evaluator::EvalError,
    value::{Method, Named, Value},
};

const STRING_METHODS: &[&str] = &[
    "upper",
    "lower",
    "trim",
    "strip",
    "contains",
    "startswith",
    "endswith",
    "matches",
    "split",
    "len",
];

const ARRAY_METHODS: &[&str] = &["len", "count", "contains", "first", "last"];

const OBJECT_METHODS: &[&str] = &["keys", "values", "get", "len", "contains"];

pub(crate) fn is_builtin(receiver: &Value, name: &str) -> bool {
    let table = match receiver {
        Value::String(_) => STRING_METHODS,
        Value::Array(_) => ARRAY_METHODS,
        Value::Object(_) => OBJECT_METHODS,
        _ => return false,
    };
    table.contains(&name)
}

/// Dispatch method calls to their implementations
pub(crate) fn call(method: &Method, args: &[Value], named: &Named) -> Result<Value, EvalError> {
    let receiver = method.receiver.as_ref();
    match (receiver, method.name.as_str()) {
        (Value::String(s), "upper") => Ok(Value::String(s.to_uppercase())),
        (Value::String(s), "lower") => Ok(Value::String(s.to_lowercase())),
        (Value::String(s), "trim" | "strip") => Ok(Value::String(s.trim().to_string())),
        (Value::String(s), "contains") => {
            let needle = string_arg(".contains()", args)?;
            Ok(Value::Boolean(s.contains(needle)))
        }
        (Value::String(s), "startswith") => {
            let prefix = string_arg(".startswith()", args)?;
            Ok(Value::Boolean(s.starts_with(prefix)))
        }
        (Value::String(s), "endswith") => {
            let suffix = string_arg(".endswith()", args)?;
            Ok(Value::Boolean(s.ends_with(suffix)))
        }
        (Value::String(s), "matches") => {
            let pattern = string_arg(".matches()", args)?;
            let re = Regex::new(pattern)
                .map_err(|e| EvalError::TypeError(format!("invalid regex: {e}")))?;
            Ok(Value::Boolean(re.is_match(s)))
        }
        (Value::String(s), "split") => split(s, args),
        (Value::String(s), "len") => Ok(Value::Integer(s.chars().count() as i64)),

        (Value::Array(arr), "len") => Ok(Value::Integer(arr.len() as i64)),
        (Value::Array(arr), "count") => match args.first() {
            None => Ok(Value::Integer(arr.len() as i64)),
            Some(needle) => Ok(Value::Integer(
                arr.iter().filter(|item| *item == needle).count() as i64,
            )),
        },
        (Value::Array(arr), "contains") => {
            let needle = required_arg(".contains()", args)?;
            Ok(Value::Boolean(arr.contains(needle)))
        }
        (Value::Array(arr), "first") => Ok(arr.first().cloned().unwrap_or(Value::Null)),
        (Value::Array(arr), "last") => Ok(arr.last().cloned().unwrap_or(Value::Null)),

        (Value::Object(obj), "keys") => Ok(Value::Array(
            sorted_keys(obj).into_iter().map(|k| Value::String(k.clone())).collect(),
        )),
        (Value::Object(obj), "values") => Ok(Value::Array(
            sorted_keys(obj).into_iter().map(|k| obj[k].clone()).collect(),
        )),
        (Value::Object(obj), "get") => {
            let key = string_arg(".get()", args)?;
            let default = args
                .get(1)
                .or_else(|| named.get("default"))
                .cloned()
                .unwrap_or(Value::Null);
            Ok(obj.get(key).cloned().unwrap_or(default))
        }
        (Value::Object(obj), "len") => Ok(Value::Integer(obj.len() as i64)),
        (Value::Object(obj), "contains") => {
            let key = string_arg(".contains()", args)?;
            Ok(Value::Boolean(obj.contains_key(key)))
        }

        (other, name) => Err(EvalError::TypeError(format!(
            "Unknown method {} on {}",
            name,
            other.type_name()
        ))),
    }
}

fn required_arg<'a>(method: &str, args: &'a [Value]) -> Result<&'a Value, EvalError> {
    args.first()
        .ok_or_else(|| EvalError::TypeError(format!("{} requires an argument", method)))
}

fn string_arg<'a>(method: &str, args: &'a [Value]) -> Result<&'a str, EvalError> {
    let arg = required_arg(method, args)?;
    arg.as_str().ok_or_else(|| {
        EvalError::TypeError(format!(
            "{} argument must be string, got {}",
            method,
            arg.type_name()
        ))
    })
}

/// .split(delimiter?) - splits on whitespace when no delimiter is given
fn split(s: &str, args: &[Value]) -> Result<Value, EvalError> {
    let parts: Vec<Value> = match args.first() {
        None => s.split_whitespace().map(Value::from).collect(),
        Some(_) => {
            let delim = string_arg(".split()", args)?;
            if delim.is_empty() {
                s.chars().map(|c| Value::String(c.to_string())).collect()
            } else {
                s.split(delim).map(Value::from).collect()
            }
        }
    };
    Ok(Value::Array(parts))
}

fn sorted_keys(obj: &HashMap<String, Value>) -> Vec<&String> {
    let mut keys: Vec<&String> = obj.keys().collect();
    keys.sort();
    keys
}
