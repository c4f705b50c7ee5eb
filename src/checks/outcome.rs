//! Three-valued inputs and results.

use crate::error::ValidationError;
use serde::Serialize;

/// An argument as supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<T> {
    /// Resolved value.
    Known(T),
    /// Explicit null.
    Null,
    /// Not resolved yet; any check reading it is indeterminate.
    Unknown,
}

impl<T> Value<T> {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    /// Resolve a required argument; null is a caller error.
    pub(crate) fn require(self, argument: &'static str) -> Result<T, Outcome> {
        match self {
            Value::Known(v) => Ok(v),
            Value::Null => Err(Outcome::Invalid(ValidationError::MissingInput { argument })),
            Value::Unknown => Err(Outcome::Indeterminate),
        }
    }
}

impl<T> From<Option<T>> for Value<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Value::Known(v),
            None => Value::Null,
        }
    }
}

/// Result of a check.
///
/// `Indeterminate` is neither success nor failure; callers must not treat it
/// as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum Outcome {
    Valid,
    Invalid(ValidationError),
    Indeterminate,
}

impl Outcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Outcome::Valid)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Outcome::Invalid(_))
    }

    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Outcome::Indeterminate)
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Outcome::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

impl<T> From<Result<T, ValidationError>> for Outcome {
    fn from(result: Result<T, ValidationError>) -> Self {
        match result {
            Ok(_) => Outcome::Valid,
            Err(e) => Outcome::Invalid(e),
        }
    }
}
