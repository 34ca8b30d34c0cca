//! Schema validation errors.

use std::fmt;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur when building or validating a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A field was declared with an empty name.
    EmptyFieldName,

    /// Two fields share a name.
    DuplicateField { name: String },

    /// Numeric lower bound exceeds the upper bound.
    InvalidBounds { field: String, min: i64, max: i64 },

    /// Numeric default lies outside `[min, max]`.
    DefaultOutOfBounds { field: String, default: i64 },

    /// String default is not one of the declared options.
    DefaultNotInOptions { field: String, default: String },

    /// An options list was declared but is empty.
    EmptyOptions { field: String },

    /// A constraint was attached to a kind that does not support it.
    ConstraintNotApplicable {
        field: String,
        constraint: &'static str,
        kind: &'static str,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFieldName => write!(f, "field name must not be empty"),
            Self::DuplicateField { name } => write!(f, "duplicate field '{name}'"),
            Self::InvalidBounds { field, min, max } => {
                write!(f, "field '{field}': min {min} exceeds max {max}")
            }
            Self::DefaultOutOfBounds { field, default } => {
                write!(f, "field '{field}': default {default} is out of bounds")
            }
            Self::DefaultNotInOptions { field, default } => {
                write!(f, "field '{field}': default '{default}' is not an option")
            }
            Self::EmptyOptions { field } => {
                write!(f, "field '{field}': options list is empty")
            }
            Self::ConstraintNotApplicable {
                field,
                constraint,
                kind,
            } => {
                write!(f, "field '{field}': {constraint} does not apply to {kind} fields")
            }
        }
    }
}

impl std::error::Error for SchemaError {}
