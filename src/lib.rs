pub mod ast;
pub mod check;
pub mod convert;
pub mod evaluator;
pub mod introspect;
mod methods;
pub mod ops;
pub mod output;
pub mod pipe;
pub mod safe;
pub mod value;

pub use ast::{
    BinOp, Expr, IT, NO_ARGS, Operand, Operation, Origin, Placeholder, PlaceholderError, UnaryOp,
    _0, _1, _2, _3, _4, arg, named,
};
pub use check::{AssertionFailure, Check, CheckError, CheckOptions, Matcher, Outcome, Quantifier, Spec};
pub use evaluator::{EvalError, Navigation, ResolutionContext, Resolved, resolve};
pub use introspect::{Requirements, describe};
pub use output::to_json;
pub use pipe::{Pipeline, Step, pipe};
pub use safe::SafeObject;
pub use value::{Func, Method, Named, UNSET, Value};
