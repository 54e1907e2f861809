//! Error types for sqlfrag

use thiserror::Error;

/// Result type alias for fragment and statement rendering.
pub type SqlResult<T> = Result<T, SqlError>;

/// Errors raised while rendering fragments or statements.
///
/// Every error is a deterministic function of the input fragments: rendering
/// the same input again yields the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SqlError {
    /// A CASE expression was rendered without any WHEN/THEN pair.
    #[error("case expression must contain at least one WHEN clause")]
    MissingWhen,

    /// A predicate was rendered without any field.
    #[error("predicate must contain at least one field")]
    EmptyPredicate,

    /// Null or collection value used with an ordering/pattern comparison.
    #[error("unsupported value type for this comparison: {field} {op}")]
    UnsupportedValue { field: String, op: &'static str },

    /// An empty collection bound to a raw expression marker.
    #[error("empty collection passed where an argument was expected")]
    EmptyCollection,

    /// A nested fragment rendered no SQL in place of an argument.
    #[error("nested fragment rendered no SQL where an argument was expected")]
    EmptyFragment,

    /// Marker count in a raw expression does not match its argument count.
    #[error("wrong number of arguments: expected {expected}, got {actual}")]
    ArgCount { expected: usize, actual: usize },

    /// Marker count in a composed statement does not match the argument count.
    #[error("placeholder mismatch: statement has {markers} placeholders but {args} arguments")]
    PlaceholderMismatch { markers: usize, args: usize },

    /// Unknown placeholder format name.
    #[error("invalid placeholder format: {0}")]
    InvalidFormat(String),

    /// Statement-level structural error (missing table, missing columns, ...).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl SqlError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn unsupported(field: impl Into<String>, op: &'static str) -> Self {
        Self::UnsupportedValue {
            field: field.into(),
            op,
        }
    }

    /// Check if this is a marker/argument count error
    pub fn is_count_mismatch(&self) -> bool {
        matches!(
            self,
            Self::ArgCount { .. } | Self::PlaceholderMismatch { .. }
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
