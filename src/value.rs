use std::{collections::HashMap, fmt, sync::Arc};

use crate::evaluator::EvalError;

/// Named arguments handed to resolution and to callable values.
pub type Named = HashMap<String, Value>;

type Callable = dyn Fn(&[Value], &Named) -> Result<Value, EvalError> + Send + Sync;

/// A value flowing through expression resolution and record matching.
///
/// Records arrive as JSON-like trees, so the scalar and container variants
/// mirror JSON with integers kept apart from floats. Three variants exist
/// only at evaluation time:
///
/// - [`Value::Unset`] marks a field or item that does not exist. It is not
///   `Null` and not `false`: `Unset == Unset` holds, `Unset == Null` does not.
/// - [`Value::Function`] is a host function that an expression can call.
/// - [`Value::Method`] is a built-in method bound to its receiver, produced by
///   attribute access such as `_.text.contains`.
///
/// # Examples
///
/// ```
/// use stand_in::Value;
///
/// assert_eq!(Value::Integer(1), Value::Float(1.0));
/// assert_eq!(Value::Unset, Value::Unset);
/// assert_ne!(Value::Unset, Value::Null);
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// JSON null
    Null,

    /// JSON boolean (true/false)
    Boolean(bool),

    /// Floating-point number
    Float(f64),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// UTF-8 string
    String(String),

    /// Array of values (homogeneous or heterogeneous)
    Array(Vec<Value>),

    /// Object with string keys
    Object(HashMap<String, Value>),

    /// The requested attribute or item does not exist
    Unset,

    /// Host function callable from an expression
    Function(Func),

    /// Built-in method bound to a receiver
    Method(Method),
}

/// The absent-field sentinel.
pub const UNSET: Value = Value::Unset;

/// A named host function.
///
/// Functions compare equal only to clones of themselves.
#[derive(Clone)]
pub struct Func {
    name: Arc<str>,
    inner: Arc<Callable>,
}

impl Func {
    pub fn new<F>(name: &str, f: F) -> Self
    where
        F: Fn(&[Value], &Named) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Func {
            name: Arc::from(name),
            inner: Arc::new(f),
        }
    }

    /// Wraps a single-argument function. Calls with no positional argument
    /// are type errors.
    pub fn unary<F>(name: &str, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        let label = name.to_string();
        Func::new(name, move |args, _| match args.first() {
            Some(value) => f(value),
            None => Err(EvalError::TypeError(format!(
                "{}() requires one argument",
                label
            ))),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(&self, args: &[Value], named: &Named) -> Result<Value, EvalError> {
        (self.inner)(args, named)
    }

    pub fn ptr_eq(&self, other: &Func) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Func({})", self.name)
    }
}

/// A built-in method together with the value it was looked up on.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub receiver: Box<Value>,
    pub name: String,
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) | (Unset, Unset) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Integer(a), Float(b)) | (Float(b), Integer(a)) => (*a as f64) == *b,
            (String(a), String(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            (Object(a), Object(b)) => a == b,
            (Function(a), Function(b)) => a.ptr_eq(b),
            (Method(a), Method(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Check if the value is truthy (for conditions)
    pub fn is_truthy(&self) -> bool {
        use Value::*;
        match self {
            Null | Unset => false,
            Boolean(b) => *b,
            Float(n) => *n != 0.0,
            Integer(n) => *n != 0,
            String(s) => !s.is_empty(),
            Array(arr) => !arr.is_empty(),
            Object(obj) => !obj.is_empty(),
            Function(_) | Method(_) => true,
        }
    }

    /// Convert to boolean for conditions
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            _ => self.is_truthy(),
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }

    /// Get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Float(n) => Some(n.round() as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as string (concatenation)
    pub fn as_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => crate::output::to_json(other),
        }
    }

    /// Returns a human-readable type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Unset => "unset",
            Value::Function(_) => "function",
            Value::Method(_) => "method",
        }
    }

    /// Builds an object value from key/value pairs.
    pub fn object<K, V, I>(pairs: I) -> Value
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::output::to_json(self))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Func> for Value {
    fn from(f: Func) -> Self {
        Value::Function(f)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
