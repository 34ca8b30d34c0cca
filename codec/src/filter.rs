//! Filter entries and their prefixes.

use crate::options::Prefixes;

/// A filter entry split into its bare text and modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterEntry {
    /// Text with any prefix removed.
    pub value: String,
    pub negated: bool,
    /// Excluded from delta output.
    pub ignored: bool,
}

impl FilterEntry {
    /// A plain entry.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            negated: false,
            ignored: false,
        }
    }

    /// A negated entry.
    #[must_use]
    pub fn negated(value: impl Into<String>) -> Self {
        Self {
            negated: true,
            ..Self::new(value)
        }
    }

    /// An entry excluded from deltas.
    #[must_use]
    pub fn ignored(value: impl Into<String>) -> Self {
        Self {
            ignored: true,
            ..Self::new(value)
        }
    }
}

#[derive(Clone, Copy)]
enum Marker {
    Not,
    Ignore,
}

impl Prefixes {
    /// Splits a raw entry into bare text and modifiers.
    #[must_use]
    pub fn classify(&self, raw: &str) -> FilterEntry {
        let (marker, bare) = self.strip(raw);
        FilterEntry {
            value: bare.to_string(),
            negated: matches!(marker, Some(Marker::Not)),
            ignored: matches!(marker, Some(Marker::Ignore)),
        }
    }

    /// Returns the entry text without its prefix.
    #[must_use]
    pub fn bare<'a>(&self, raw: &'a str) -> &'a str {
        self.strip(raw).1
    }

    /// Returns `true` if the entry carries the ignore prefix.
    #[must_use]
    pub fn is_ignored(&self, raw: &str) -> bool {
        matches!(self.strip(raw).0, Some(Marker::Ignore))
    }

    /// Renders an entry back to its raw form.
    ///
    /// A modifier without a configured prefix is dropped.
    #[must_use]
    pub fn render(&self, entry: &FilterEntry) -> String {
        let prefix = if entry.negated {
            self.not.as_deref()
        } else if entry.ignored {
            self.ignore.as_deref()
        } else {
            None
        };
        match prefix {
            Some(prefix) => format!("{prefix}{}", entry.value),
            None => entry.value.clone(),
        }
    }

    fn strip<'a>(&self, raw: &'a str) -> (Option<Marker>, &'a str) {
        let mut candidates = [
            (Marker::Not, self.not.as_deref()),
            (Marker::Ignore, self.ignore.as_deref()),
        ];
        // Longest prefix wins when one is a prefix of the other.
        candidates.sort_by_key(|(_, prefix)| std::cmp::Reverse(prefix.map_or(0, str::len)));
        for (marker, prefix) in candidates {
            if let Some(rest) = prefix.and_then(|prefix| raw.strip_prefix(prefix)) {
                return (Some(marker), rest);
            }
        }
        (None, raw)
    }
}
