//! Left-to-right composition.
//!
//! ```
//! use stand_in::{IT, Value, pipe::pipe};
//!
//! let twice_then_more = pipe([IT * 2, IT + 1]);
//! assert_eq!(twice_then_more.run(5).unwrap(), Value::from(11));
//!
//! let as_expr = twice_then_more.into_expr();
//! assert_eq!(as_expr.value(&[Value::from(1)]).unwrap(), Value::from(3));
//! ```

use crate::{
    ast::{Expr, IT},
    evaluator::EvalError,
    value::{Func, Named, Value},
};

/// One stage of a pipeline.
#[derive(Debug, Clone)]
pub enum Step {
    /// Resolved with the running value as its only positional argument
    Expr(Expr),
    /// Called with the running value as its only positional argument
    Func(Func),
}

impl From<Expr> for Step {
    fn from(e: Expr) -> Self {
        Step::Expr(e)
    }
}

impl From<Func> for Step {
    fn from(f: Func) -> Self {
        Step::Func(f)
    }
}

impl Step {
    fn run(&self, value: Value) -> Result<Value, EvalError> {
        match self {
            Step::Expr(expr) => expr.value(std::slice::from_ref(&value)),
            Step::Func(func) => func.invoke(std::slice::from_ref(&value), &Named::new()),
        }
    }
}

/// Threads a value through its steps in order.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    steps: Vec<Step>,
}

pub fn pipe<I, S>(steps: I) -> Pipeline
where
    I: IntoIterator<Item = S>,
    S: Into<Step>,
{
    Pipeline {
        steps: steps.into_iter().map(Into::into).collect(),
    }
}

impl Pipeline {
    pub fn then(mut self, step: impl Into<Step>) -> Self {
        self.steps.push(step.into());
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs every step; an empty pipeline returns its input.
    pub fn run(&self, value: impl Into<Value>) -> Result<Value, EvalError> {
        self.steps
            .iter()
            .try_fold(value.into(), |current, step| step.run(current))
    }

    /// A one-argument expression that runs the pipeline.
    pub fn into_expr(self) -> Expr {
        IT.apply(Func::unary("pipe", move |value| self.run(value.clone())))
    }
}
