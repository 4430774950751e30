//! Deterministic rendering of values for diagnostics and `Display`.
//!
//! Output is compact JSON for every JSON-shaped value, with object keys sorted
//! so that failure messages are stable from run to run. Values that only exist
//! during evaluation render as angle-bracket markers:
//!
//! - `Unset` renders as `<unset>`
//! - functions render as `<fn name>`
//! - bound methods render as `<method name>`
//!
//! Floats always carry a fractional part (`1.0`, not `1`) so a diagnostic
//! shows which numeric type a record held.
//!
//! # Examples
//!
//! ```
//! use stand_in::Value;
//! use stand_in::output::to_json;
//!
//! assert_eq!(to_json(&Value::Integer(42)), "42");
//! assert_eq!(to_json(&Value::Float(2.0)), "2.0");
//! assert_eq!(to_json(&Value::Unset), "<unset>");
//! assert_eq!(to_json(&Value::from(vec!["a\n"])), r#"["a\n"]"#);
//! ```

use std::fmt::Write;

use crate::value::Value;

/// Renders a value on one line.
pub fn to_json(value: &Value) -> String {
    let mut out = String::new();
    render(&mut out, value);
    out
}

// Writing into a String cannot fail, so the write! results are dropped.
fn render(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Boolean(b) => {
            let _ = write!(out, "{}", b);
        }
        Value::Integer(n) => {
            let _ = write!(out, "{}", n);
        }
        Value::Float(n) if n.is_finite() && n.fract() == 0.0 => {
            let _ = write!(out, "{:.1}", n);
        }
        Value::Float(n) => {
            let _ = write!(out, "{}", n);
        }
        Value::String(s) => quote(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                render(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                quote(out, key);
                out.push(':');
                render(out, &map[key]);
            }
            out.push('}');
        }
        Value::Unset => out.push_str("<unset>"),
        Value::Function(f) => {
            let _ = write!(out, "<fn {}>", f.name());
        }
        Value::Method(m) => {
            let _ = write!(out, "<method {}>", m.name);
        }
    }
}

fn quote(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
