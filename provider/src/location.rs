//! Location port: the provider's view of the browser location.

use std::fmt;

/// A page location split the way the browser splits it.
///
/// `search` keeps its leading `?` and `hash` its leading `#`; both are empty
/// when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    pub search: String,
    pub hash: String,
}

impl Location {
    /// Splits a path such as `/search?query=x#top`.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let (rest, hash) = match path.find('#') {
            Some(at) => path.split_at(at),
            None => (path, ""),
        };
        let (pathname, search) = match rest.find('?') {
            Some(at) => rest.split_at(at),
            None => (rest, ""),
        };
        Self {
            pathname: pathname.to_string(),
            search: normalize(search, '?'),
            hash: normalize(hash, '#'),
        }
    }

    /// Query string without its leading `?`.
    #[must_use]
    pub fn query(&self) -> &str {
        self.search.strip_prefix('?').unwrap_or(&self.search)
    }

    /// Same pathname and hash with a new query string.
    #[must_use]
    pub fn with_query(&self, query: &str) -> String {
        if query.is_empty() {
            format!("{}{}", self.pathname, self.hash)
        } else {
            format!("{}?{query}{}", self.pathname, self.hash)
        }
    }
}

/// A bare `?` or `#` is the same as none.
fn normalize(part: &str, marker: char) -> String {
    if part.len() == marker.len_utf8() {
        String::new()
    } else {
        part.to_string()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.pathname, self.search, self.hash)
    }
}

/// Navigation primitive supplied by the host.
///
/// `navigate` pushes a new location without a reload. The host reports every
/// location change, including those caused by `navigate`, through
/// [`SearchParamsProvider::handle_location_change`](crate::SearchParamsProvider::handle_location_change).
pub trait LocationPort {
    /// Current location.
    fn location(&self) -> Location;

    /// Pushes `path` (pathname, query and hash).
    fn navigate(&mut self, path: &str);
}

/// In-memory location with a navigation history.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocation {
    current: Location,
    history: Vec<String>,
}

impl MemoryLocation {
    #[must_use]
    pub fn new(path: &str) -> Self {
        Self {
            current: Location::parse(path),
            history: Vec::new(),
        }
    }

    /// Number of [`navigate`](LocationPort::navigate) calls so far.
    #[must_use]
    pub fn navigations(&self) -> usize {
        self.history.len()
    }

    /// Paths pushed through [`navigate`](LocationPort::navigate), oldest first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Moves to `path` as a user or another component would, without
    /// counting a navigation.
    pub fn visit(&mut self, path: &str) {
        self.current = Location::parse(path);
    }
}

impl LocationPort for MemoryLocation {
    fn location(&self) -> Location {
        self.current.clone()
    }

    fn navigate(&mut self, path: &str) {
        self.history.push(path.to_string());
        self.current = Location::parse(path);
    }
}
