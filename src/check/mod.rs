//! Quantified structural checks over record collections.
//!
//! A [`Check`] is an immutable view over records. Filters and positional
//! selectors each return a new view; quantifier selectors set how many items
//! must satisfy the [`Spec`] given to the terminal [`Check::that`].
//!
//! ```text
//! records -> where_/where_not* -> first/last/at/cap* -> for_all/for_any/... -> that(spec)
//! ```
//!
//! ```
//! use serde_json::json;
//! use stand_in::{check::Check, spec};
//!
//! let replies = Check::new([
//!     json!({"type": "message", "text": "Hello there"}),
//!     json!({"type": "typing"}),
//! ]);
//!
//! replies.where_(&spec! { "type" => "message" }).unwrap()
//!     .that(&spec! { "text" => "~Hello" }).unwrap();
//! replies.for_any().that(&spec! { "type" => "typing" }).unwrap();
//! assert!(replies.for_all().that(&spec! { "type" => "message" }).is_err());
//! ```

mod quantifier;
mod spec;

pub use quantifier::{AssertionFailure, Outcome, Quantifier};
pub use spec::{FieldCheck, Matcher, PARENT, Predicate, ROOT, Spec};

use serde::Serialize;
use thiserror::Error;

use crate::{evaluator::EvalError, output::to_json, value::Value};

/// Errors from terminal check operations.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The quantifier condition was not met
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),

    /// A matcher expression or function failed
    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),

    /// A typed record could not be converted
    #[error("Invalid record: {0}")]
    Record(#[from] serde_json::Error),
}

/// Matching and reporting options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    /// Prefix that turns a string literal into a substring match
    pub substring_marker: char,
    /// Separator for nested field paths such as `from.id`
    pub path_separator: char,
    /// Records listed in a failure report
    pub diagnostic_limit: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        CheckOptions {
            substring_marker: '~',
            path_separator: '.',
            diagnostic_limit: 3,
        }
    }
}

/// An immutable, quantified view over records.
#[derive(Debug, Clone, Default)]
pub struct Check {
    items: Vec<Value>,
    quantifier: Quantifier,
    options: CheckOptions,
}

impl Check {
    pub fn new<I, V>(records: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Check {
            items: records.into_iter().map(Into::into).collect(),
            quantifier: Quantifier::All,
            options: CheckOptions::default(),
        }
    }

    /// A view over typed records, converted field by field.
    pub fn from_serialize<T: Serialize>(records: &[T]) -> Result<Self, CheckError> {
        let items = records
            .iter()
            .map(Value::from_serialize)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Check::new(items))
    }

    pub fn with_options(mut self, options: CheckOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    fn view(&self, items: Vec<Value>) -> Check {
        Check {
            items,
            quantifier: self.quantifier,
            options: self.options.clone(),
        }
    }

    fn quantified(&self, quantifier: Quantifier) -> Check {
        Check {
            quantifier,
            ..self.clone()
        }
    }

    // ========================================
    // Filters
    // ========================================

    /// Keeps items matching `spec`.
    pub fn where_(&self, spec: &Spec) -> Result<Check, EvalError> {
        self.filter(spec, true)
    }

    /// Drops items matching `spec`.
    pub fn where_not(&self, spec: &Spec) -> Result<Check, EvalError> {
        self.filter(spec, false)
    }

    fn filter(&self, spec: &Spec, keep: bool) -> Result<Check, EvalError> {
        let mut kept = Vec::new();
        for item in &self.items {
            if spec.matches(item, &self.options)? == keep {
                kept.push(item.clone());
            }
        }
        tracing::trace!(
            spec = %spec,
            keep,
            before = self.items.len(),
            after = kept.len(),
            "filtered view"
        );
        Ok(self.view(kept))
    }

    // ========================================
    // Positional selectors
    // ========================================

    pub fn first(&self) -> Check {
        self.view(self.items.first().cloned().into_iter().collect())
    }

    pub fn last(&self) -> Check {
        self.view(self.items.last().cloned().into_iter().collect())
    }

    /// The item at `index`; negative indices count from the end. Out of
    /// range gives an empty view.
    pub fn at(&self, index: i64) -> Check {
        let item = crate::evaluator::resolve_index(index, self.items.len())
            .and_then(|i| self.items.get(i))
            .cloned();
        self.view(item.into_iter().collect())
    }

    /// At most the first `n` items.
    pub fn cap(&self, n: usize) -> Check {
        self.view(self.items.iter().take(n).cloned().collect())
    }

    // ========================================
    // Quantifiers
    // ========================================

    pub fn for_all(&self) -> Check {
        self.quantified(Quantifier::All)
    }

    pub fn for_any(&self) -> Check {
        self.quantified(Quantifier::Any)
    }

    pub fn for_none(&self) -> Check {
        self.quantified(Quantifier::None)
    }

    pub fn for_one(&self) -> Check {
        self.quantified(Quantifier::One)
    }

    pub fn exactly(&self, n: usize) -> Check {
        self.quantified(Quantifier::Exactly(n))
    }

    // ========================================
    // Terminal operations
    // ========================================

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn exists(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn count_matching(&self, spec: &Spec) -> Result<usize, EvalError> {
        let mut matched = 0;
        for item in &self.items {
            if spec.matches(item, &self.options)? {
                matched += 1;
            }
        }
        Ok(matched)
    }

    /// Judges the view against `spec` under the active quantifier without
    /// failing on a mismatch.
    pub fn evaluate(&self, spec: &Spec) -> Result<Outcome, EvalError> {
        let mut matching = Vec::new();
        let mut first_miss = None;
        for (index, item) in self.items.iter().enumerate() {
            if spec.matches(item, &self.options)? {
                matching.push(item);
            } else if first_miss.is_none() {
                first_miss = Some((index, item));
            }
        }

        let total = self.items.len();
        let matched = matching.len();
        let passed = self.quantifier.judge(matched, total);
        tracing::debug!(
            quantifier = %self.quantifier,
            spec = %spec,
            matched,
            total,
            passed,
            "check evaluated"
        );

        let failure = (!passed).then(|| {
            let (offending, detail) = match (self.quantifier, first_miss) {
                (Quantifier::All, Some((index, item))) => (
                    Some(item.clone()),
                    format!(
                        "item {} of {} did not match: {}",
                        index,
                        total,
                        to_json(item)
                    ),
                ),
                _ => (None, self.count_detail(&matching, total)),
            };
            AssertionFailure {
                quantifier: self.quantifier,
                spec: spec.to_string(),
                matched,
                total,
                offending,
                detail,
            }
        });

        Ok(Outcome {
            quantifier: self.quantifier,
            matched,
            total,
            failure,
        })
    }

    fn count_detail(&self, matching: &[&Value], total: usize) -> String {
        let mut detail = format!(
            "expected {} matching, found {} of {}",
            self.quantifier.expectation(total),
            matching.len(),
            total
        );
        let shown: Vec<String> = matching
            .iter()
            .take(self.options.diagnostic_limit)
            .map(|item| to_json(item))
            .collect();
        if !shown.is_empty() {
            detail.push_str(&format!("; matching: [{}]", shown.join(", ")));
        }
        detail
    }

    /// Fails with an [`AssertionFailure`] unless the view satisfies `spec`
    /// under the active quantifier.
    pub fn that(&self, spec: &Spec) -> Result<(), CheckError> {
        match self.evaluate(spec)?.failure {
            Some(failure) => Err(CheckError::Assertion(failure)),
            None => Ok(()),
        }
    }
}
