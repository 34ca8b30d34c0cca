//! Observable record of silent decode fallbacks.
//!
//! Decoding is permissive: a hand-edited or stale URL only ever resets the
//! affected field. Every such reset is logged through `tracing` and, when a
//! hook is installed, forwarded to it.

use std::fmt;
use std::sync::Arc;

/// Callback invoked for each [`Diagnostic`].
pub type DiagnosticHook = Arc<dyn Fn(&Diagnostic) + Send + Sync>;

/// One silent fallback taken while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Field (or unknown key) the fallback applies to.
    pub field: String,
    /// Raw URL value, when the fallback came from a URL.
    pub raw: Option<String>,
    pub reason: FallbackReason,
}

/// Why a value was replaced or dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Not an integer; the default was used.
    NotANumber,
    /// Not `true`/`false`; the default was used.
    NotABoolean,
    /// Not one of the declared options; the default was used.
    NotAnOption,
    /// Outside `[min, max]`; clamped to the bound.
    Clamped { value: i64 },
    /// A filter entry had no text after its prefix; dropped.
    EmptyFilter,
    /// An object value had the wrong type; the default was used.
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// The key is not in the schema; dropped.
    UnknownField,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => write!(f, "{} ('{raw}'): {}", self.field, self.reason),
            None => write!(f, "{}: {}", self.field, self.reason),
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber => write!(f, "not a number, using default"),
            Self::NotABoolean => write!(f, "not a boolean, using default"),
            Self::NotAnOption => write!(f, "not an allowed option, using default"),
            Self::Clamped { value } => write!(f, "out of bounds, clamped to {value}"),
            Self::EmptyFilter => write!(f, "empty filter entry dropped"),
            Self::TypeMismatch { expected, found } => {
                write!(f, "expected {expected} but got {found}, using default")
            }
            Self::UnknownField => write!(f, "unknown field dropped"),
        }
    }
}

/// Reporter shared by every codec of one parser.
#[derive(Clone, Default)]
pub(crate) struct Diagnostics {
    hook: Option<DiagnosticHook>,
}

impl Diagnostics {
    pub(crate) fn new(hook: Option<DiagnosticHook>) -> Self {
        Self { hook }
    }

    pub(crate) fn report(&self, field: &str, raw: Option<&str>, reason: FallbackReason) {
        let diagnostic = Diagnostic {
            field: field.to_string(),
            raw: raw.map(str::to_string),
            reason,
        };
        tracing::debug!(field, raw, "search parameter fallback: {}", diagnostic.reason);
        if let Some(hook) = &self.hook {
            hook(&diagnostic);
        }
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("hook", &self.hook.is_some())
            .finish()
    }
}
