//! Argument requirements of an expression, computed without evaluating it.
//!
//! The walk visits the origin, then each operation's operands in the order
//! they were recorded, descending into nested expressions. This is the same
//! order resolution uses, so anonymous placeholders are counted exactly the
//! way they will consume arguments.

use std::collections::BTreeSet;

use crate::{
    ast::{Expr, Operand, Origin, Placeholder},
    value::Named,
};

/// What an expression needs before it can resolve to a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirements {
    /// Occurrences of the anonymous placeholder
    pub anonymous_count: usize,
    /// Distinct indexed positions
    pub indexed_positions: BTreeSet<usize>,
    /// Distinct named keys
    pub named_keys: BTreeSet<String>,
    /// `max(anonymous_count, max(indexed_positions) + 1)`
    pub total_positional_required: usize,
}

impl Requirements {
    /// True when `positional` arguments and the `named` map cover every
    /// placeholder.
    pub fn is_satisfied_by(&self, positional: usize, named: &Named) -> bool {
        positional >= self.total_positional_required
            && self.named_keys.iter().all(|k| named.contains_key(k))
    }

    /// True when the expression needs no arguments at all.
    pub fn is_empty(&self) -> bool {
        self.total_positional_required == 0 && self.named_keys.is_empty()
    }
}

/// Structural requirements of `expr`.
///
/// ```
/// use stand_in::{IT, _2, named, introspect::describe};
///
/// let req = describe(&(IT + _2 * named("scale").unwrap()));
/// assert_eq!(req.anonymous_count, 1);
/// assert_eq!(req.total_positional_required, 3);
/// assert!(req.named_keys.contains("scale"));
/// ```
pub fn describe(expr: &Expr) -> Requirements {
    let mut req = Requirements::default();
    collect(expr, &mut req);
    let indexed = req.indexed_positions.last().map_or(0, |max| max + 1);
    req.total_positional_required = req.anonymous_count.max(indexed);
    req
}

fn collect(expr: &Expr, req: &mut Requirements) {
    match expr.origin() {
        Origin::Placeholder(Placeholder::Anonymous) => req.anonymous_count += 1,
        Origin::Placeholder(Placeholder::Indexed(i)) => {
            req.indexed_positions.insert(*i);
        }
        Origin::Placeholder(Placeholder::Named(key)) => {
            req.named_keys.insert(key.clone());
        }
        Origin::Bound(_) => {}
    }

    for op in expr.chain() {
        for operand in op.operands() {
            if let Operand::Expr(nested) = operand {
                collect(nested, req);
            }
        }
    }
}

/// Positional arguments needed for a full resolution.
pub fn arity(expr: &Expr) -> usize {
    describe(expr).total_positional_required
}

pub fn anonymous_count(expr: &Expr) -> usize {
    describe(expr).anonymous_count
}

pub fn indexed_positions(expr: &Expr) -> BTreeSet<usize> {
    describe(expr).indexed_positions
}

pub fn named_keys(expr: &Expr) -> BTreeSet<String> {
    describe(expr).named_keys
}

/// Whether resolving with these arguments yields a value rather than a
/// partial expression.
pub fn is_resolvable_with(expr: &Expr, positional: usize, named: &Named) -> bool {
    describe(expr).is_satisfied_by(positional, named)
}
