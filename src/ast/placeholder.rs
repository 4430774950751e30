use std::fmt;

use crate::{
    ast::{Expr, PlaceholderError},
    value::Value,
};

/// Which argument a placeholder stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// Takes the next unclaimed positional argument, counted in order of
    /// appearance within the expression.
    Anonymous,

    /// Always positional argument `i`; repeated uses share the slot.
    Indexed(usize),

    /// The named argument `key`.
    Named(String),
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placeholder::Anonymous => f.write_str("_"),
            Placeholder::Indexed(i) => write!(f, "_{}", i),
            Placeholder::Named(key) => write!(f, "@{}", key),
        }
    }
}

/// Where an expression starts.
///
/// Expressions built by hand always start at a placeholder. Partial
/// application replaces placeholders whose arguments were supplied with the
/// bound value.
#[derive(Debug, Clone)]
pub enum Origin {
    Placeholder(Placeholder),
    Bound(Value),
}

/// Prefix kept for internal bookkeeping names.
pub const RESERVED_PREFIX: &str = "__";

/// The anonymous placeholder. Each occurrence consumes one positional
/// argument.
///
/// ```
/// use stand_in::{IT, Value};
///
/// let add = IT + IT;
/// assert_eq!(add.value(&[Value::from(2), Value::from(3)]).unwrap(), Value::from(5));
/// ```
pub const IT: Expr = Expr::placeholder(Placeholder::Anonymous);

pub const _0: Expr = Expr::placeholder(Placeholder::Indexed(0));
pub const _1: Expr = Expr::placeholder(Placeholder::Indexed(1));
pub const _2: Expr = Expr::placeholder(Placeholder::Indexed(2));
pub const _3: Expr = Expr::placeholder(Placeholder::Indexed(3));
pub const _4: Expr = Expr::placeholder(Placeholder::Indexed(4));

/// Indexed placeholder for positional argument `index`.
pub fn arg(index: i64) -> Result<Expr, PlaceholderError> {
    usize::try_from(index)
        .map(|i| Expr::placeholder(Placeholder::Indexed(i)))
        .map_err(|_| PlaceholderError::NegativeIndex(index))
}

/// Named placeholder bound to the keyword argument `key`.
pub fn named(key: &str) -> Result<Expr, PlaceholderError> {
    if key.is_empty() {
        return Err(PlaceholderError::EmptyName);
    }
    if key.starts_with(RESERVED_PREFIX) {
        return Err(PlaceholderError::ReservedName(key.to_string()));
    }
    Ok(Expr::placeholder(Placeholder::Named(key.to_string())))
}

/// Identifier shorthand for [`named`]: `var!(text)` is `named("text")`.
#[macro_export]
macro_rules! var {
    ($key:ident) => {
        $crate::ast::named(stringify!($key))
    };
}
