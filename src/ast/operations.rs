use crate::{
    ast::{BinOp, Expr, UnaryOp},
    value::{Func, Value},
};

/// An operand recorded in the chain: a literal, or another expression that
/// resolves against the same arguments.
#[derive(Debug, Clone)]
pub enum Operand {
    Literal(Value),
    Expr(Expr),
}

macro_rules! operand_from_literal {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Operand {
                fn from(v: $ty) -> Self {
                    Operand::Literal(Value::from(v))
                }
            }
        )*
    };
}

operand_from_literal!(bool, i64, i32, u32, f64, &str, String, Func);

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Literal(v)
    }
}

impl From<Expr> for Operand {
    fn from(e: Expr) -> Self {
        Operand::Expr(e)
    }
}

impl From<&Expr> for Operand {
    fn from(e: &Expr) -> Self {
        Operand::Expr(e.clone())
    }
}

/// One primitive step applied to the running value.
#[derive(Debug, Clone)]
pub enum Operation {
    /// `value <op> right`
    Binary { op: BinOp, right: Operand },

    /// `left <op> value`, recorded when the expression was the right operand
    ReverseBinary { op: BinOp, left: Operand },

    /// `<op> value`
    Unary { op: UnaryOp },

    /// `value.name`
    Attribute { name: String },

    /// `value[key]`
    Item { key: Operand },

    /// `value(args..., kwargs...)`
    Call {
        args: Vec<Operand>,
        kwargs: Vec<(String, Operand)>,
    },

    /// `value.name(args..., kwargs...)`: a built-in method, or a callable
    /// field of an object
    Method {
        name: String,
        args: Vec<Operand>,
        kwargs: Vec<(String, Operand)>,
    },

    /// `func(value)`
    Custom { func: Func },
}

impl Operation {
    /// Operands in evaluation order: call arguments before keyword arguments.
    pub fn operands(&self) -> Vec<&Operand> {
        match self {
            Operation::Binary { right, .. } => vec![right],
            Operation::ReverseBinary { left, .. } => vec![left],
            Operation::Item { key } => vec![key],
            Operation::Call { args, kwargs } | Operation::Method { args, kwargs, .. } => {
                args.iter().chain(kwargs.iter().map(|(_, v)| v)).collect()
            }
            Operation::Unary { .. } | Operation::Attribute { .. } | Operation::Custom { .. } => {
                Vec::new()
            }
        }
    }

    /// Rebuilds the operation with every operand passed through `f`, in the
    /// same order as [`Operation::operands`].
    pub fn map_operands<F>(&self, mut f: F) -> Operation
    where
        F: FnMut(&Operand) -> Operand,
    {
        match self {
            Operation::Binary { op, right } => Operation::Binary {
                op: *op,
                right: f(right),
            },
            Operation::ReverseBinary { op, left } => Operation::ReverseBinary {
                op: *op,
                left: f(left),
            },
            Operation::Item { key } => Operation::Item { key: f(key) },
            Operation::Call { args, kwargs } => {
                let args = args.iter().map(&mut f).collect();
                let kwargs = kwargs.iter().map(|(k, v)| (k.clone(), f(v))).collect();
                Operation::Call { args, kwargs }
            }
            Operation::Method { name, args, kwargs } => {
                let args = args.iter().map(&mut f).collect();
                let kwargs = kwargs.iter().map(|(k, v)| (k.clone(), f(v))).collect();
                Operation::Method {
                    name: name.clone(),
                    args,
                    kwargs,
                }
            }
            other => other.clone(),
        }
    }
}
