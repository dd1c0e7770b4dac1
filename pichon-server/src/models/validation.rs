//! Validation error types

use std::fmt;

/// Validation error for request bodies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is absent or null
    MissingField { field: &'static str },

    /// Field is not part of the allow-list for this operation
    UnknownField { field: String },

    /// Field is present but carries the wrong JSON type
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    /// Required string is present but empty
    Empty { field: &'static str },

    /// Field has the right type but an unusable value
    InvalidFormat { field: &'static str, reason: String },

    /// Update body contained nothing to update
    NoFields,

    /// Body is not a JSON object (or not JSON at all)
    MalformedBody { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "field '{}' is required", field),
            Self::UnknownField { field } => write!(f, "field '{}' cannot be updated", field),
            Self::InvalidType { field, expected } => {
                write!(f, "field '{}' must be {}", field, expected)
            }
            Self::Empty { field } => write!(f, "field '{}' cannot be empty", field),
            Self::InvalidFormat { field, reason } => {
                write!(f, "field '{}' is invalid: {}", field, reason)
            }
            Self::NoFields => write!(f, "no updatable fields supplied"),
            Self::MalformedBody { reason } => {
                write!(f, "request body must be a JSON object: {}", reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::MissingField { field: "title" };
        assert_eq!(err.to_string(), "field 'title' is required");

        let err = ValidationError::InvalidType {
            field: "prod",
            expected: "a boolean",
        };
        assert_eq!(err.to_string(), "field 'prod' must be a boolean");

        let err = ValidationError::Empty { field: "email" };
        assert_eq!(err.to_string(), "field 'email' cannot be empty");
    }
}
