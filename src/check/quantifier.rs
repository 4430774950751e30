use std::fmt;

use thiserror::Error;

use crate::value::Value;

/// How many items of a view must satisfy a spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quantifier {
    /// Every item; an empty view passes.
    #[default]
    All,
    /// At least one item; an empty view fails.
    Any,
    /// No item; an empty view passes.
    None,
    /// Exactly one item.
    One,
    /// Exactly `n` items.
    Exactly(usize),
}

impl Quantifier {
    pub fn judge(self, matched: usize, total: usize) -> bool {
        match self {
            Quantifier::All => matched == total,
            Quantifier::Any => matched > 0,
            Quantifier::None => matched == 0,
            Quantifier::One => matched == 1,
            Quantifier::Exactly(n) => matched == n,
        }
    }

    /// The expected count, phrased for diagnostics.
    pub fn expectation(self, total: usize) -> String {
        match self {
            Quantifier::All => format!("all {}", total),
            Quantifier::Any => "at least 1".to_string(),
            Quantifier::None => "none".to_string(),
            Quantifier::One => "exactly 1".to_string(),
            Quantifier::Exactly(n) => format!("exactly {}", n),
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantifier::All => f.write_str("for_all"),
            Quantifier::Any => f.write_str("for_any"),
            Quantifier::None => f.write_str("for_none"),
            Quantifier::One => f.write_str("for_one"),
            Quantifier::Exactly(n) => write!(f, "exactly({})", n),
        }
    }
}

/// A failed quantified check.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{quantifier} check failed for {spec}: {detail}")]
pub struct AssertionFailure {
    pub quantifier: Quantifier,
    /// Rendered match specification
    pub spec: String,
    pub matched: usize,
    pub total: usize,
    /// First non-matching item under `All`
    pub offending: Option<Value>,
    pub detail: String,
}

/// Result of judging a view against a spec.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub quantifier: Quantifier,
    pub matched: usize,
    pub total: usize,
    pub failure: Option<AssertionFailure>,
}

impl Outcome {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}
