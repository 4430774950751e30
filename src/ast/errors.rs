use thiserror::Error;

/// Rejected placeholder construction.
///
/// Kept apart from the placeholder constants: the derive binds tuple fields
/// as `_0`, which must not resolve to the `_0` expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
    #[error("placeholder index must be non-negative, got {0}")]
    NegativeIndex(i64),

    #[error("placeholder name must not be empty")]
    EmptyName,

    #[error("placeholder name `{0}` uses the reserved `__` prefix")]
    ReservedName(String),
}
