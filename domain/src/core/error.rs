//! Domain error types

use thiserror::Error;

/// Caller input that was rejected before any work was done.
///
/// Surfaced to the caller immediately; never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must be at most {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("{field} must be at least {min} (got {actual})")]
    BelowMinimum {
        field: &'static str,
        min: i64,
        actual: i64,
    },

    #[error("Invalid {field} '{value}'. Must be one of: {expected}")]
    InvalidChoice {
        field: &'static str,
        value: String,
        expected: String,
    },

    #[error("Brief ID must be a positive integer (got {0})")]
    InvalidBriefId(i64),
}

impl ValidationError {
    pub fn invalid_choice(field: &'static str, value: impl Into<String>, expected: &[&str]) -> Self {
        ValidationError::InvalidChoice {
            field,
            value: value.into(),
            expected: expected.join(", "),
        }
    }

    /// Name of the offending field, if the error is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::Missing { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::BelowMinimum { field, .. }
            | ValidationError::InvalidChoice { field, .. } => Some(field),
            ValidationError::InvalidBriefId(_) => Some("brief_id"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_choice_lists_options() {
        let err = ValidationError::invalid_choice("tone", "grumpy", &["casual", "formal"]);
        assert_eq!(
            err.to_string(),
            "Invalid tone 'grumpy'. Must be one of: casual, formal"
        );
        assert_eq!(err.field(), Some("tone"));
    }

    #[test]
    fn test_brief_id_error_display() {
        let err = ValidationError::InvalidBriefId(-3);
        assert_eq!(err.to_string(), "Brief ID must be a positive integer (got -3)");
        assert_eq!(err.field(), Some("brief_id"));
    }
}
