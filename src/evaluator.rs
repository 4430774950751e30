use std::collections::HashMap;

use thiserror::Error;

use crate::{
    ast::{Expr, Operand, Operation, Origin, Placeholder},
    introspect::{self, Requirements},
    methods, ops,
    value::{Method, Named, Value},
};

/// How attribute and item access treat missing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Navigation {
    /// Missing keys, attributes and indices are access errors.
    #[default]
    Strict,
    /// Missing keys, attributes and indices yield `Unset`.
    Safe,
}

/// Arguments for one resolution call. Built fresh per call, never shared.
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    pub positional: Vec<Value>,
    pub named: Named,
    pub navigation: Navigation,
}

impl ResolutionContext {
    pub fn new(positional: Vec<Value>) -> Self {
        ResolutionContext {
            positional,
            named: HashMap::new(),
            navigation: Navigation::Strict,
        }
    }

    pub fn with_named(mut self, named: Named) -> Self {
        self.named.extend(named);
        self
    }

    pub fn with_arg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.named.insert(key.to_string(), value.into());
        self
    }

    pub fn safe(mut self) -> Self {
        self.navigation = Navigation::Safe;
        self
    }
}

/// Errors that can occur during resolution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Type mismatch or invalid operation for the given type
    #[error("Type error: {0}")]
    TypeError(String),

    /// Missing attribute, key or index under strict navigation
    #[error("Access error: {0}")]
    AccessError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Integer overflow: {0}")]
    Overflow(String),

    #[error("Value of type {0} is not callable")]
    NotCallable(&'static str),

    /// A placeholder had no argument at walk time
    #[error("Missing argument for placeholder {0}")]
    MissingArgument(String),

    /// A concrete value was required but arguments were still missing
    #[error("Expression {0} still requires arguments")]
    Unresolved(String),

    /// Raised by host functions
    #[error("{0}")]
    Failed(String),
}

/// Outcome of resolution: a value, or the expression that remains once the
/// supplied arguments are bound.
#[derive(Debug, Clone)]
pub enum Resolved {
    Value(Value),
    Partial(Expr),
}

impl Resolved {
    pub fn is_partial(&self) -> bool {
        matches!(self, Resolved::Partial(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Resolved::Value(v) => Some(v),
            Resolved::Partial(_) => None,
        }
    }

    pub fn into_value(self) -> Result<Value, EvalError> {
        match self {
            Resolved::Value(v) => Ok(v),
            Resolved::Partial(rest) => Err(EvalError::Unresolved(rest.to_string())),
        }
    }

    pub fn into_partial(self) -> Option<Expr> {
        match self {
            Resolved::Partial(rest) => Some(rest),
            Resolved::Value(_) => None,
        }
    }
}

/// Resolves `expr` against `ctx`.
///
/// When `ctx` satisfies every placeholder the chain is walked and its value
/// returned. Otherwise the supplied arguments are bound into a new expression
/// whose remaining positional slots are renumbered from zero.
///
/// # Examples
///
/// ```
/// use stand_in::{IT, Value, evaluator::{resolve, ResolutionContext}};
///
/// let sum3 = IT + IT + IT;
/// let rest = resolve(&sum3, &ResolutionContext::new(vec![Value::from(1)])).unwrap();
/// let rest = rest.into_partial().unwrap();
/// assert_eq!(rest.value(&[Value::from(2), Value::from(3)]).unwrap(), Value::from(6));
/// ```
pub fn resolve(expr: &Expr, ctx: &ResolutionContext) -> Result<Resolved, EvalError> {
    let requirements = introspect::describe(expr);
    if !requirements.is_satisfied_by(ctx.positional.len(), &ctx.named) {
        tracing::trace!(
            expr = %expr,
            required = requirements.total_positional_required,
            supplied = ctx.positional.len(),
            "binding partial application"
        );
        return Ok(Resolved::Partial(bind_partial(expr, ctx, &requirements)));
    }

    let mut cursor = 0;
    Evaluator { ctx }
        .eval_expr(expr, &mut cursor)
        .map(Resolved::Value)
}

/// Walks an expression chain against one context.
struct Evaluator<'a> {
    ctx: &'a ResolutionContext,
}

impl Evaluator<'_> {
    /// `cursor` counts anonymous placeholders consumed so far, shared across
    /// nested operands so numbering follows the walk order.
    fn eval_expr(&self, expr: &Expr, cursor: &mut usize) -> Result<Value, EvalError> {
        let mut current = match expr.origin() {
            Origin::Bound(v) => v.clone(),
            Origin::Placeholder(p) => self.lookup(p, cursor)?,
        };

        for op in expr.chain() {
            current = self.apply(op, current, cursor)?;
            tracing::trace!(value = %current, "chain step");
        }
        Ok(current)
    }

    fn lookup(&self, placeholder: &Placeholder, cursor: &mut usize) -> Result<Value, EvalError> {
        let found = match placeholder {
            Placeholder::Anonymous => {
                let slot = *cursor;
                *cursor += 1;
                self.ctx.positional.get(slot)
            }
            Placeholder::Indexed(i) => self.ctx.positional.get(*i),
            Placeholder::Named(key) => self.ctx.named.get(key),
        };
        found
            .cloned()
            .ok_or_else(|| EvalError::MissingArgument(placeholder.to_string()))
    }

    fn operand(&self, operand: &Operand, cursor: &mut usize) -> Result<Value, EvalError> {
        match operand {
            Operand::Literal(v) => Ok(v.clone()),
            Operand::Expr(e) => self.eval_expr(e, cursor),
        }
    }

    fn apply(&self, op: &Operation, current: Value, cursor: &mut usize) -> Result<Value, EvalError> {
        match op {
            Operation::Binary { op, right } => {
                let right = self.operand(right, cursor)?;
                ops::binary(*op, &current, &right)
            }
            Operation::ReverseBinary { op, left } => {
                let left = self.operand(left, cursor)?;
                ops::binary(*op, &left, &current)
            }
            Operation::Unary { op } => ops::unary(*op, &current),
            Operation::Attribute { name } => self.navigate(attribute(&current, name)),
            Operation::Item { key } => {
                let key = self.operand(key, cursor)?;
                self.navigate(item(&current, &key))
            }
            Operation::Call { args, kwargs } => {
                let (positional, named) = self.arguments(args, kwargs, cursor)?;
                call(&current, &positional, &named)
            }
            Operation::Method { name, args, kwargs } => {
                let target = self.navigate(method(&current, name))?;
                let (positional, named) = self.arguments(args, kwargs, cursor)?;
                call(&target, &positional, &named)
            }
            Operation::Custom { func } => func.invoke(std::slice::from_ref(&current), &HashMap::new()),
        }
    }

    fn arguments(
        &self,
        args: &[Operand],
        kwargs: &[(String, Operand)],
        cursor: &mut usize,
    ) -> Result<(Vec<Value>, Named), EvalError> {
        let mut positional = Vec::with_capacity(args.len());
        for arg in args {
            positional.push(self.operand(arg, cursor)?);
        }
        let mut named = HashMap::new();
        for (key, value) in kwargs {
            named.insert(key.clone(), self.operand(value, cursor)?);
        }
        Ok((positional, named))
    }

    fn navigate(&self, access: Result<Value, EvalError>) -> Result<Value, EvalError> {
        match self.ctx.navigation {
            Navigation::Strict => access,
            Navigation::Safe => Ok(access.unwrap_or(Value::Unset)),
        }
    }
}

/// `value.name`. Objects expose their fields only; strings and arrays expose
/// their built-in methods, bound to `value`. Access on `Unset` is `Unset`.
pub(crate) fn attribute(value: &Value, name: &str) -> Result<Value, EvalError> {
    match value {
        Value::Unset => Ok(Value::Unset),
        Value::Object(map) => map
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::AccessError(format!("Field '{}' not found", name))),
        _ if methods::is_builtin(value, name) => Ok(bind_method(value, name)),
        other => Err(EvalError::AccessError(format!(
            "{} has no attribute '{}'",
            other.type_name(),
            name
        ))),
    }
}

/// The callee of `value.name(...)`: a built-in method bound to `value`, else
/// an object field of that name.
pub(crate) fn method(value: &Value, name: &str) -> Result<Value, EvalError> {
    match value {
        Value::Unset => Ok(Value::Unset),
        _ if methods::is_builtin(value, name) => Ok(bind_method(value, name)),
        Value::Object(map) => map.get(name).cloned().ok_or_else(|| {
            EvalError::AccessError(format!("object has no method or field '{}'", name))
        }),
        other => Err(EvalError::AccessError(format!(
            "{} has no method '{}'",
            other.type_name(),
            name
        ))),
    }
}

fn bind_method(value: &Value, name: &str) -> Value {
    Value::Method(Method {
        receiver: Box::new(value.clone()),
        name: name.to_string(),
    })
}

/// `value[key]`. Integer keys index arrays and strings (negative indices
/// count from the end) and are looked up as strings on objects.
pub(crate) fn item(value: &Value, key: &Value) -> Result<Value, EvalError> {
    match (value, key) {
        (Value::Unset, _) => Ok(Value::Unset),
        (Value::Object(map), Value::String(k)) => map
            .get(k)
            .cloned()
            .ok_or_else(|| EvalError::AccessError(format!("Key '{}' not found", k))),
        (Value::Object(map), Value::Integer(_) | Value::Float(_) | Value::Boolean(_)) => {
            let k = key.as_string();
            map.get(&k)
                .cloned()
                .ok_or_else(|| EvalError::AccessError(format!("Key '{}' not found", k)))
        }
        (Value::Array(arr), Value::Integer(n)) => resolve_index(*n, arr.len())
            .and_then(|i| arr.get(i))
            .cloned()
            .ok_or_else(|| {
                EvalError::AccessError(format!(
                    "Array index {} out of bounds (length: {})",
                    n,
                    arr.len()
                ))
            }),
        (Value::String(s), Value::Integer(n)) => {
            let chars: Vec<char> = s.chars().collect();
            resolve_index(*n, chars.len())
                .and_then(|i| chars.get(i))
                .map(|c| Value::String(c.to_string()))
                .ok_or_else(|| {
                    EvalError::AccessError(format!(
                        "String index {} out of bounds (length: {})",
                        n,
                        chars.len()
                    ))
                })
        }
        (Value::Array(_), Value::String(k)) => Err(EvalError::TypeError(format!(
            "Cannot use string key '{}' on array; use integer index instead",
            k
        ))),
        _ => Err(EvalError::TypeError(format!(
            "Cannot access {} with {} key",
            value.type_name(),
            key.type_name()
        ))),
    }
}

/// Negative index: count from end (-1 = last, -2 = second to last)
pub(crate) fn resolve_index(n: i64, len: usize) -> Option<usize> {
    if n < 0 {
        let back = usize::try_from(n.unsigned_abs()).ok()?;
        len.checked_sub(back)
    } else {
        usize::try_from(n).ok()
    }
}

/// Calls a function or bound method. Calling `Unset` yields `Unset`.
pub(crate) fn call(callee: &Value, args: &[Value], named: &Named) -> Result<Value, EvalError> {
    match callee {
        Value::Unset => Ok(Value::Unset),
        Value::Function(f) => f.invoke(args, named),
        Value::Method(m) => methods::call(m, args, named),
        other => Err(EvalError::NotCallable(other.type_name())),
    }
}

/// Binds the supplied arguments into a copy of `expr`.
///
/// Positional slots below the number supplied become bound values; the rest
/// shift down by that number so they stay contiguous from zero. Anonymous
/// placeholders past the supplied count stay anonymous: they keep their
/// relative order, so their new ordinal is the old one minus the count.
fn bind_partial(expr: &Expr, ctx: &ResolutionContext, requirements: &Requirements) -> Expr {
    let supplied = ctx
        .positional
        .len()
        .min(requirements.total_positional_required);
    let mut cursor = 0;
    substitute(expr, ctx, supplied, &mut cursor)
}

fn substitute(expr: &Expr, ctx: &ResolutionContext, supplied: usize, cursor: &mut usize) -> Expr {
    let origin = match expr.origin() {
        Origin::Bound(v) => Origin::Bound(v.clone()),
        Origin::Placeholder(p) => bind_placeholder(p, ctx, supplied, cursor),
    };
    let chain = expr
        .chain()
        .iter()
        .map(|op| {
            op.map_operands(|operand| match operand {
                Operand::Expr(e) => Operand::Expr(substitute(e, ctx, supplied, cursor)),
                literal => literal.clone(),
            })
        })
        .collect();
    Expr::from_parts(origin, chain)
}

fn bind_placeholder(
    placeholder: &Placeholder,
    ctx: &ResolutionContext,
    supplied: usize,
    cursor: &mut usize,
) -> Origin {
    match placeholder {
        Placeholder::Anonymous => {
            let slot = *cursor;
            *cursor += 1;
            if slot < supplied {
                Origin::Bound(ctx.positional[slot].clone())
            } else {
                Origin::Placeholder(Placeholder::Anonymous)
            }
        }
        Placeholder::Indexed(i) if *i < supplied => Origin::Bound(ctx.positional[*i].clone()),
        Placeholder::Indexed(i) => Origin::Placeholder(Placeholder::Indexed(i - supplied)),
        Placeholder::Named(key) => match ctx.named.get(key) {
            Some(v) => Origin::Bound(v.clone()),
            None => Origin::Placeholder(placeholder.clone()),
        },
    }
}
