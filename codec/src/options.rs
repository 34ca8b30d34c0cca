//! Parser configuration.

use std::fmt;

use crate::diagnostics::{Diagnostic, DiagnosticHook};
use crate::error::{CodecError, CodecResult, PrefixKind};

/// Prefixes that modify a filter entry without changing its text.
///
/// `not` marks an entry negated, `ignore` marks it excluded from deltas. An
/// entry carries at most one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefixes {
    pub not: Option<String>,
    pub ignore: Option<String>,
}

impl Prefixes {
    /// No prefixes: every entry is taken verbatim.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            not: None,
            ignore: None,
        }
    }

    /// Both prefixes.
    #[must_use]
    pub fn new(not: impl Into<String>, ignore: impl Into<String>) -> Self {
        Self {
            not: Some(not.into()),
            ignore: Some(ignore.into()),
        }
    }

    /// Only a negation prefix.
    #[must_use]
    pub fn not_only(not: impl Into<String>) -> Self {
        Self {
            not: Some(not.into()),
            ignore: None,
        }
    }

    pub(crate) fn validate(&self) -> CodecResult<()> {
        if self.not.as_deref() == Some("") {
            return Err(CodecError::EmptyPrefix {
                prefix: PrefixKind::Not,
            });
        }
        if self.ignore.as_deref() == Some("") {
            return Err(CodecError::EmptyPrefix {
                prefix: PrefixKind::Ignore,
            });
        }
        if let (Some(not), Some(ignore)) = (&self.not, &self.ignore) {
            if not == ignore {
                return Err(CodecError::AmbiguousPrefixes {
                    prefix: not.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Options applied when building a [`SearchParser`](crate::SearchParser).
#[derive(Clone, Default)]
pub struct ParserOptions {
    /// Field names to enforce in addition to those declared `.enforced()`.
    pub enforced: Vec<String>,
    pub prefixes: Prefixes,
    /// Receives every silent decode fallback.
    pub diagnostics: Option<DiagnosticHook>,
}

impl ParserOptions {
    /// Creates options with no prefixes, no extra enforced fields and no hook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds field names to enforce.
    #[must_use]
    pub fn enforced<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enforced.extend(names.into_iter().map(Into::into));
        self
    }

    /// Sets the filter prefixes.
    #[must_use]
    pub fn prefixes(mut self, prefixes: Prefixes) -> Self {
        self.prefixes = prefixes;
        self
    }

    /// Installs a diagnostic hook.
    #[must_use]
    pub fn on_diagnostic<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Diagnostic) + Send + Sync + 'static,
    {
        self.diagnostics = Some(std::sync::Arc::new(hook));
        self
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("enforced", &self.enforced)
            .field("prefixes", &self.prefixes)
            .field("diagnostics", &self.diagnostics.is_some())
            .finish()
    }
}
