//! Error types for codec operations.

use std::fmt;

use schema::SchemaError;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors surfaced by the codec.
///
/// Decoding never produces these: malformed URL values fall back to defaults.
/// Errors only come from misconfiguration or fail-fast lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Schema failed validation.
    Schema(SchemaError),

    /// A field name is not declared in the schema.
    UnknownField { name: String },

    /// A filter prefix is empty.
    EmptyPrefix { prefix: PrefixKind },

    /// The negation and ignore prefixes are identical.
    AmbiguousPrefixes { prefix: String },
}

/// Which filter prefix an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixKind {
    Not,
    Ignore,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(e) => write!(f, "schema error: {e}"),
            Self::UnknownField { name } => write!(f, "unknown field '{name}'"),
            Self::EmptyPrefix { prefix } => write!(f, "{prefix} prefix must not be empty"),
            Self::AmbiguousPrefixes { prefix } => {
                write!(f, "not and ignore prefixes are both '{prefix}'")
            }
        }
    }
}

impl fmt::Display for PrefixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Not => "not",
            Self::Ignore => "ignore",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Schema(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SchemaError> for CodecError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unknown_field() {
        let err = CodecError::UnknownField {
            name: "colour".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("colour"), "should mention field");
        assert!(msg.contains("unknown"), "should mention unknown");
    }

    #[test]
    fn error_display_prefixes() {
        let err = CodecError::EmptyPrefix {
            prefix: PrefixKind::Ignore,
        };
        assert_eq!(err.to_string(), "ignore prefix must not be empty");

        let err = CodecError::AmbiguousPrefixes {
            prefix: "-".to_string(),
        };
        assert!(err.to_string().contains("'-'"));
    }

    #[test]
    fn error_from_schema_error() {
        let err: CodecError = SchemaError::EmptyFieldName.into();
        assert!(matches!(err, CodecError::Schema(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn error_source_none_for_others() {
        let err = CodecError::UnknownField {
            name: "x".to_string(),
        };
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<CodecError>();
    }
}
