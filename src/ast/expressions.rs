use std::fmt;

use crate::{
    ast::{BinOp, Operand, Operation, Origin, Placeholder, UnaryOp},
    evaluator::{self, EvalError, ResolutionContext, Resolved},
    output::to_json,
    value::{Func, Named, Value},
};

/// Empty argument list for zero-argument calls: `IT.method("upper", NO_ARGS)`.
pub const NO_ARGS: [Value; 0] = [];

/// A deferred expression: a placeholder origin and the operations recorded
/// against it.
///
/// Building never evaluates anything. Every builder consumes `self` and
/// returns a new expression with one more operation, so an expression stored
/// in a variable is never changed by later building; clone it to derive
/// several expressions from one prefix.
///
/// # Examples
///
/// ```
/// use stand_in::{_0, _1, Value};
///
/// let expr = _0 + _1 * _0;
/// assert_eq!(expr.value(&[Value::from(2), Value::from(3)]).unwrap(), Value::from(8));
/// assert_eq!(expr.to_string(), "(_0 + (_1 * _0))");
/// ```
#[derive(Debug, Clone)]
pub struct Expr {
    origin: Origin,
    chain: Vec<Operation>,
}

impl Expr {
    pub const fn placeholder(placeholder: Placeholder) -> Self {
        Expr {
            origin: Origin::Placeholder(placeholder),
            chain: Vec::new(),
        }
    }

    /// An expression that starts from a known value.
    pub fn bound(value: impl Into<Value>) -> Self {
        Expr {
            origin: Origin::Bound(value.into()),
            chain: Vec::new(),
        }
    }

    pub(crate) fn from_parts(origin: Origin, chain: Vec<Operation>) -> Self {
        Expr { origin, chain }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn chain(&self) -> &[Operation] {
        &self.chain
    }

    fn then(mut self, op: Operation) -> Self {
        self.chain.push(op);
        self
    }

    pub fn binary(self, op: BinOp, right: impl Into<Operand>) -> Self {
        self.then(Operation::Binary {
            op,
            right: right.into(),
        })
    }

    /// Records `left <op> self`.
    pub fn reverse_binary(self, op: BinOp, left: impl Into<Operand>) -> Self {
        self.then(Operation::ReverseBinary {
            op,
            left: left.into(),
        })
    }

    pub fn unary(self, op: UnaryOp) -> Self {
        self.then(Operation::Unary { op })
    }

    pub fn attr(self, name: impl Into<String>) -> Self {
        self.then(Operation::Attribute { name: name.into() })
    }

    pub fn item(self, key: impl Into<Operand>) -> Self {
        self.then(Operation::Item { key: key.into() })
    }

    pub fn call<A, I>(self, args: I) -> Self
    where
        A: Into<Operand>,
        I: IntoIterator<Item = A>,
    {
        self.call_with(args, Vec::<(String, Operand)>::new())
    }

    pub fn call_with<A, I, K, V, KI>(self, args: I, kwargs: KI) -> Self
    where
        A: Into<Operand>,
        I: IntoIterator<Item = A>,
        K: Into<String>,
        V: Into<Operand>,
        KI: IntoIterator<Item = (K, V)>,
    {
        self.then(Operation::Call {
            args: args.into_iter().map(Into::into).collect(),
            kwargs: kwargs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        })
    }

    /// `self.name(args...)`. Built-in methods take precedence; on objects a
    /// field holding a function is called otherwise.
    pub fn method<A, I>(self, name: &str, args: I) -> Self
    where
        A: Into<Operand>,
        I: IntoIterator<Item = A>,
    {
        self.method_with(name, args, Vec::<(String, Operand)>::new())
    }

    pub fn method_with<A, I, K, V, KI>(self, name: &str, args: I, kwargs: KI) -> Self
    where
        A: Into<Operand>,
        I: IntoIterator<Item = A>,
        K: Into<String>,
        V: Into<Operand>,
        KI: IntoIterator<Item = (K, V)>,
    {
        self.then(Operation::Method {
            name: name.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            kwargs: kwargs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        })
    }

    /// Passes the running value through `func`.
    pub fn apply(self, func: Func) -> Self {
        self.then(Operation::Custom { func })
    }

    pub fn apply_fn<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        self.apply(Func::unary(name, f))
    }

    /// `self // right`
    pub fn floor_div(self, right: impl Into<Operand>) -> Self {
        self.binary(BinOp::FloorDivide, right)
    }

    /// `self ** right`
    pub fn pow(self, right: impl Into<Operand>) -> Self {
        self.binary(BinOp::Power, right)
    }

    /// `+self`
    pub fn pos(self) -> Self {
        self.unary(UnaryOp::Plus)
    }

    /// `~self`; the same operation as `!self`.
    pub fn invert(self) -> Self {
        self.unary(UnaryOp::Invert)
    }

    pub fn eq(self, right: impl Into<Operand>) -> Self {
        self.binary(BinOp::Equal, right)
    }

    pub fn ne(self, right: impl Into<Operand>) -> Self {
        self.binary(BinOp::NotEqual, right)
    }

    pub fn gt(self, right: impl Into<Operand>) -> Self {
        self.binary(BinOp::GreaterThan, right)
    }

    pub fn ge(self, right: impl Into<Operand>) -> Self {
        self.binary(BinOp::GreaterEqual, right)
    }

    pub fn lt(self, right: impl Into<Operand>) -> Self {
        self.binary(BinOp::LessThan, right)
    }

    pub fn le(self, right: impl Into<Operand>) -> Self {
        self.binary(BinOp::LessEqual, right)
    }

    /// Resolves against positional arguments only.
    pub fn resolve(&self, positional: &[Value]) -> Result<Resolved, EvalError> {
        evaluator::resolve(self, &ResolutionContext::new(positional.to_vec()))
    }

    pub fn resolve_with(&self, positional: &[Value], named: Named) -> Result<Resolved, EvalError> {
        let ctx = ResolutionContext::new(positional.to_vec()).with_named(named);
        evaluator::resolve(self, &ctx)
    }

    /// Resolves and requires a concrete value; a partial result is an
    /// [`EvalError::Unresolved`].
    pub fn value(&self, positional: &[Value]) -> Result<Value, EvalError> {
        self.resolve(positional)?.into_value()
    }
}

fn render_operand(operand: &Operand) -> String {
    match operand {
        Operand::Literal(v) => to_json(v),
        Operand::Expr(e) => e.to_string(),
    }
}

fn render_args(args: &[Operand], kwargs: &[(String, Operand)]) -> String {
    let rendered: Vec<String> = args
        .iter()
        .map(render_operand)
        .chain(kwargs.iter().map(|(k, v)| format!("{}={}", k, render_operand(v))))
        .collect();
    rendered.join(", ")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = match &self.origin {
            Origin::Placeholder(p) => p.to_string(),
            Origin::Bound(v) => to_json(v),
        };
        for op in &self.chain {
            text = match op {
                Operation::Binary { op, right } => {
                    format!("({} {} {})", text, op, render_operand(right))
                }
                Operation::ReverseBinary { op, left } => {
                    format!("({} {} {})", render_operand(left), op, text)
                }
                Operation::Unary { op } => format!("({}{})", op, text),
                Operation::Attribute { name } => format!("{}.{}", text, name),
                Operation::Item { key } => format!("{}[{}]", text, render_operand(key)),
                Operation::Call { args, kwargs } => {
                    format!("{}({})", text, render_args(args, kwargs))
                }
                Operation::Method { name, args, kwargs } => {
                    format!("{}.{}({})", text, name, render_args(args, kwargs))
                }
                Operation::Custom { func } => format!("{}({})", func.name(), text),
            };
        }
        f.write_str(&text)
    }
}
