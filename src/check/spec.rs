use std::{fmt, sync::Arc};

use crate::{
    ast::Expr,
    check::CheckOptions,
    evaluator::{self, EvalError, ResolutionContext, Resolved},
    output::to_json,
    safe::SafeObject,
    value::Value,
};

/// Named argument holding the whole record during an expression match.
pub const ROOT: &str = "root";

/// Named argument holding the container of the matched field.
pub const PARENT: &str = "parent";

type PredicateFn = dyn Fn(&Value) -> bool + Send + Sync;

/// A boolean function over a field value. The value is `Unset` when the
/// field is absent.
#[derive(Clone)]
pub struct Predicate {
    name: Arc<str>,
    test: Arc<PredicateFn>,
}

impl Predicate {
    pub fn new<F>(name: &str, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Predicate {
            name: Arc::from(name),
            test: Arc::new(test),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn test(&self, value: &Value) -> bool {
        (self.test)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({})", self.name)
    }
}

/// How one field is judged.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Equality, except a string carrying the substring marker (`"~Hello"`)
    /// matches fields containing the rest of the string.
    Literal(Value),

    /// Equality with no marker interpretation.
    Equals(Value),

    /// Substring containment on string fields.
    Contains(String),

    /// Resolved in safe navigation with the field value as positional
    /// argument 0 and the named arguments [`ROOT`] and [`PARENT`]; the
    /// result's truthiness decides.
    Expr(Expr),

    Predicate(Predicate),
}

macro_rules! matcher_from_literal {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Matcher {
                fn from(v: $ty) -> Self {
                    Matcher::Literal(Value::from(v))
                }
            }
        )*
    };
}

matcher_from_literal!(bool, i64, i32, u32, f64, &str, String, serde_json::Value);

impl From<Value> for Matcher {
    fn from(v: Value) -> Self {
        Matcher::Literal(v)
    }
}

impl From<Expr> for Matcher {
    fn from(e: Expr) -> Self {
        Matcher::Expr(e)
    }
}

impl From<Predicate> for Matcher {
    fn from(p: Predicate) -> Self {
        Matcher::Predicate(p)
    }
}

/// One field path and its matcher.
#[derive(Debug, Clone)]
pub struct FieldCheck {
    pub path: String,
    pub matcher: Matcher,
}

/// Per-field criteria a record must meet; fields are ANDed.
///
/// ```
/// use stand_in::{IT, check::Spec, spec};
///
/// let by_builder = Spec::new().field("type", "message").field("text", "~Hello");
/// let by_macro = spec! { "type" => "message", "text" => "~Hello" };
/// assert_eq!(by_builder.to_string(), by_macro.to_string());
///
/// let long = Spec::new().field("text", IT.method("len", [0; 0]).gt(3));
/// assert_eq!(long.to_string(), "{text: (_.len() > 3)}");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Spec {
    fields: Vec<FieldCheck>,
}

impl Spec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, path: impl Into<String>, matcher: impl Into<Matcher>) -> Self {
        self.fields.push(FieldCheck {
            path: path.into(),
            matcher: matcher.into(),
        });
        self
    }

    pub fn field_eq(self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.field(path, Matcher::Equals(value.into()))
    }

    pub fn field_contains(self, path: impl Into<String>, needle: impl Into<String>) -> Self {
        self.field(path, Matcher::Contains(needle.into()))
    }

    pub fn field_fn<F>(self, path: impl Into<String>, name: &str, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.field(path, Predicate::new(name, test))
    }

    pub fn fields(&self) -> &[FieldCheck] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether `record` meets every field. An empty spec matches anything.
    pub fn matches(&self, record: &Value, options: &CheckOptions) -> Result<bool, EvalError> {
        let root = SafeObject::new(record.clone());
        for check in &self.fields {
            if !check.matches(&root, options)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl FieldCheck {
    fn matches(&self, root: &SafeObject, options: &CheckOptions) -> Result<bool, EvalError> {
        let (parent, field) = root.locate(&self.path, options.path_separator);
        match &self.matcher {
            Matcher::Literal(Value::String(s)) => match s.strip_prefix(options.substring_marker) {
                Some(needle) => Ok(contains(field.value(), needle)),
                None => Ok(field.value().as_str() == Some(s.as_str())),
            },
            Matcher::Literal(expected) | Matcher::Equals(expected) => Ok(field == *expected),
            Matcher::Contains(needle) => Ok(contains(field.value(), needle)),
            Matcher::Predicate(p) => Ok(p.test(field.value())),
            Matcher::Expr(expr) => {
                let ctx = ResolutionContext::new(vec![field.into_value()])
                    .with_arg(ROOT, root.value().clone())
                    .with_arg(PARENT, parent.into_value())
                    .safe();
                match evaluator::resolve(expr, &ctx)? {
                    Resolved::Value(v) => Ok(v.as_bool()),
                    Resolved::Partial(rest) => Err(EvalError::Unresolved(rest.to_string())),
                }
            }
        }
    }
}

fn contains(field: &Value, needle: &str) -> bool {
    match field {
        Value::String(s) => s.contains(needle),
        Value::Array(items) => items.iter().any(|item| item.as_str() == Some(needle)),
        _ => false,
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .fields
            .iter()
            .map(|check| {
                let matcher = match &check.matcher {
                    Matcher::Literal(v) => to_json(v),
                    Matcher::Equals(v) => format!("== {}", to_json(v)),
                    Matcher::Contains(needle) => format!("contains {}", to_json(&Value::from(needle.as_str()))),
                    Matcher::Expr(e) => e.to_string(),
                    Matcher::Predicate(p) => format!("<fn {}>", p.name()),
                };
                format!("{}: {}", check.path, matcher)
            })
            .collect();
        write!(f, "{{{}}}", rendered.join(", "))
    }
}

/// Builds a [`Spec`] from `"path" => matcher` pairs.
#[macro_export]
macro_rules! spec {
    ($($path:expr => $matcher:expr),* $(,)?) => {
        $crate::check::Spec::new()$(.field($path, $matcher))*
    };
}
