//! # Deferred expressions
//!
//! An expression is a placeholder plus an ordered chain of operations
//! recorded against it. Nothing is evaluated while building; resolution
//! supplies arguments later and walks the chain.
//!
//! ## Architecture Overview
//!
//! - **[placeholder]** - placeholder identities and the factories `IT`,
//!   `_0`..`_4`, [`arg`] and [`named`]
//! - **[operators]** - binary and unary operators
//! - **[operations]** - the primitive operations and their operands
//! - **[expressions]** - the [`Expr`] value and its builder methods
//! - **[overload]** - `std::ops` overloads that build instead of compute
//! - **[errors]** - rejected placeholder construction
//!
//! ## Placeholders
//!
//! | Placeholder | Binds |
//! |-------------|-------|
//! | `IT` | next unclaimed positional argument |
//! | `_0`, `arg(7)` | positional argument 0, 7 |
//! | `named("text")`, `var!(text)` | named argument `text` |
//!
//! Anonymous placeholders are numbered in order of appearance: the root
//! first, then operands in the order they were recorded. Indexed
//! placeholders never shift that numbering.
//!
//! ```text
//! IT + IT        two arguments
//! _0 * _0        one argument, used twice
//! IT + _1        two arguments; IT takes 0, _1 takes 1
//! ```
//!
//! ## Examples
//!
//! ```
//! use stand_in::{IT, NO_ARGS, Value};
//!
//! let shout = IT.method("upper", NO_ARGS) + "!";
//! assert_eq!(shout.value(&[Value::from("hi")]).unwrap(), Value::from("HI!"));
//! ```
pub mod errors;
pub mod expressions;
pub mod operations;
pub mod operators;
pub mod overload;
pub mod placeholder;

pub use errors::PlaceholderError;
pub use expressions::{Expr, NO_ARGS};
pub use operations::{Operand, Operation};
pub use operators::{BinOp, UnaryOp};
pub use placeholder::{
    IT, Origin, Placeholder, RESERVED_PREFIX, _0, _1, _2, _3, _4, arg, named,
};
