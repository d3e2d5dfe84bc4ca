//! Core error types.
//!
//! The analytics pipeline is total over sparse input: empty text, empty topic
//! lists and trackers with no attempts all have well-defined outputs. The only
//! failures surfaced here are contract violations by the caller.

use thiserror::Error;

/// Errors raised by `studyforge-core` operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// An argument was outside the range or type an operation accepts.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument or field.
        name: &'static str,
        /// Human-readable description of the violation.
        reason: String,
    },
}

impl CoreError {
    /// Shorthand for building an [`CoreError::InvalidArgument`].
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        CoreError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Returns the name of the argument that caused this error.
    pub fn argument(&self) -> &'static str {
        match self {
            CoreError::InvalidArgument { name, .. } => name,
        }
    }
}

/// Validate that `value` is a finite ratio in `[0.0, 1.0]`.
pub(crate) fn check_unit_interval(name: &'static str, value: f64) -> Result<f64, CoreError> {
    if !value.is_finite() {
        return Err(CoreError::invalid_argument(
            name,
            format!("expected a finite number, got {value}"),
        ));
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(CoreError::invalid_argument(
            name,
            format!("expected a value in [0.0, 1.0], got {value}"),
        ));
    }
    Ok(value)
}
