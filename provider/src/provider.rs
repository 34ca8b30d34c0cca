//! Search state bound to a location port.

use codec::{MergeDecision, MergeInput, ParamValue, SearchObject, SearchParser, SearchResult};
use query::UrlParams;

use crate::location::{Location, LocationPort};

/// Lifecycle of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderState {
    /// No location has been read yet.
    Uninitialized,
    /// `search` is available.
    Ready,
}

/// What a mutation did outside the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationOutcome {
    /// The hidden store was replaced.
    pub hidden_changed: bool,
    /// A new location was pushed.
    pub navigated: bool,
}

impl NavigationOutcome {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        !self.hidden_changed && !self.navigated
    }
}

/// Keeps a [`SearchResult`] in step with the location and a hidden store.
///
/// Visible fields live in the location query, hidden and ignored fields in an
/// in-memory store. Every location change re-merges the two; every mutation
/// splits the new state back and pushes a location only when the visible
/// query actually changed.
pub struct SearchParamsProvider<L: LocationPort> {
    parser: SearchParser,
    port: L,
    hidden: UrlParams,
    search: Option<SearchResult>,
    /// Last visible query pushed or observed.
    prev_search: String,
    /// Last hidden store contents.
    prev_hidden: String,
}

impl<L: LocationPort> SearchParamsProvider<L> {
    /// Creates an uninitialized provider.
    pub fn new(parser: SearchParser, port: L) -> Self {
        Self {
            parser,
            port,
            hidden: UrlParams::new(),
            search: None,
            prev_search: String::new(),
            prev_hidden: String::new(),
        }
    }

    pub fn parser(&self) -> &SearchParser {
        &self.parser
    }

    pub fn port(&self) -> &L {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut L {
        &mut self.port
    }

    /// Current location as reported by the port.
    pub fn location(&self) -> Location {
        self.port.location()
    }

    pub fn state(&self) -> ProviderState {
        if self.search.is_some() {
            ProviderState::Ready
        } else {
            ProviderState::Uninitialized
        }
    }

    /// Current search state; `None` until mounted.
    pub fn search(&self) -> Option<&SearchResult> {
        self.search.as_ref()
    }

    /// Parameters kept out of the visible location.
    pub fn hidden_params(&self) -> &UrlParams {
        &self.hidden
    }

    /// Reads the location for the first time. Later calls return the
    /// current state unchanged.
    pub fn mount(&mut self) -> &SearchResult {
        let search = match self.search.take() {
            Some(search) => search,
            None => self.merge_location(),
        };
        self.search.insert(search)
    }

    /// Re-derives `search` after the location changed.
    ///
    /// A change that only echoes the provider's own last navigation keeps
    /// the current state. Returns `true` if `search` changed.
    pub fn handle_location_change(&mut self) -> bool {
        if self.search.is_some() && self.port.location().query() == self.prev_search {
            tracing::trace!(search = %self.prev_search, "location echo ignored");
            return false;
        }
        let merged = self.merge_location();
        let changed = self.search.as_ref() != Some(&merged);
        if changed {
            tracing::debug!(search = %merged, "search state re-derived from location");
        }
        self.search = Some(merged);
        changed
    }

    /// Replaces the state with `params`.
    pub fn set_search_params(&mut self, params: &UrlParams) -> NavigationOutcome {
        let full = self.parser.from_params(params);
        self.commit(full)
    }

    /// Replaces the state with `update` applied to the current params.
    pub fn update_search_params<F>(&mut self, update: F) -> NavigationOutcome
    where
        F: FnOnce(UrlParams) -> UrlParams,
    {
        let current = self.mount().params().clone();
        self.set_search_params(&update(current))
    }

    /// Replaces the state with `object`; missing fields reset to default.
    pub fn set_search_object(&mut self, object: &SearchObject) -> NavigationOutcome {
        let full = self.parser.from_object(object);
        self.commit(full)
    }

    /// Replaces the state with `update` applied to the current object.
    pub fn update_search_object<F>(&mut self, update: F) -> NavigationOutcome
    where
        F: FnOnce(SearchObject) -> SearchObject,
    {
        let current = self.mount().to_object();
        self.set_search_object(&update(current))
    }

    fn merge_location(&mut self) -> SearchResult {
        let location = self.port.location();
        let visible = UrlParams::parse(location.query());
        let parser = &self.parser;
        let merged = parser.merge_params(&visible, &self.hidden, |key, input| {
            visibility(parser, key, input)
        });
        let merged = self.restore_ignored_entries(merged);
        self.prev_search = location.query().to_string();
        merged
    }

    /// Re-adds stored ignore-prefixed filter entries that the location
    /// cannot carry.
    fn restore_ignored_entries(&self, merged: SearchResult) -> SearchResult {
        let prefixes = self.parser.prefixes();
        let stored: Vec<(&str, &str)> = self
            .hidden
            .iter()
            .filter(|&(key, raw)| {
                !self.parser.is_hidden(key)
                    && !self.parser.is_ignored(key)
                    && prefixes.is_ignored(raw)
            })
            .collect();
        if stored.is_empty() {
            return merged;
        }
        merged.update(|mut object| {
            for (key, raw) in stored {
                let Some(ParamValue::Filters(entries)) = object.get(key) else {
                    continue;
                };
                if entries.iter().any(|entry| entry == raw) {
                    continue;
                }
                let mut entries = entries.clone();
                entries.push(raw.to_string());
                object.insert(key, ParamValue::Filters(entries));
            }
            object
        })
    }

    fn commit(&mut self, full: SearchResult) -> NavigationOutcome {
        // Later mutations in the same tick must see this state.
        self.search = Some(full.clone());
        self.handle_navigate(&full)
    }

    fn handle_navigate(&mut self, full: &SearchResult) -> NavigationOutcome {
        let parser = &self.parser;
        let delta = parser.delta_params(full.params());
        let (visible, _) = delta.to_split_params(|key, _| !parser.is_hidden(key));
        let prefixes = parser.prefixes();
        let (retained, _) = full.to_split_params(|key, value| {
            parser.is_hidden(key)
                || parser.is_ignored(key)
                || matches!(value, ParamValue::Filters(entries)
                    if entries.iter().any(|raw| prefixes.is_ignored(raw)))
        });

        let mut outcome = NavigationOutcome::default();

        let hidden = retained.to_string();
        if hidden != self.prev_hidden {
            tracing::debug!(hidden = %hidden, "hidden parameters updated");
            self.hidden = retained;
            self.prev_hidden = hidden;
            outcome.hidden_changed = true;
        }

        let visible = visible.to_string();
        let location = self.port.location();
        if visible != self.prev_search && visible != location.query() {
            let path = location.with_query(&visible);
            tracing::debug!(path = %path, "navigating");
            self.port.navigate(&path);
            outcome.navigated = true;
        }
        self.prev_search = visible;

        outcome
    }
}

/// Visible fields come from the location, hidden ones from the store, and
/// ignored ones from the location when it has them.
fn visibility(parser: &SearchParser, key: &str, input: &MergeInput) -> MergeDecision {
    if parser.is_hidden(key) {
        MergeDecision::Right
    } else if parser.is_ignored(key) {
        MergeDecision::from(input.left.is_some())
    } else {
        MergeDecision::Left
    }
}

impl<L: LocationPort + std::fmt::Debug> std::fmt::Debug for SearchParamsProvider<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchParamsProvider")
            .field("port", &self.port)
            .field("hidden", &self.prev_hidden)
            .field("search", &self.search)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::MemoryLocation;
    use codec::ParserOptions;
    use schema::{boolean, create_search_params, number, string};

    fn parser() -> SearchParser {
        let schema = create_search_params(|p| {
            p.field("query", string(""))
                .field("rows", number(25).enforced())
                .field("sort", string("").ignored())
                .field("refresh", boolean(false).hidden().ignored())
        })
        .unwrap();
        SearchParser::new(schema, ParserOptions::default()).unwrap()
    }

    fn provider(path: &str) -> SearchParamsProvider<MemoryLocation> {
        SearchParamsProvider::new(parser(), MemoryLocation::new(path))
    }

    #[test]
    fn starts_uninitialized() {
        let mut provider = provider("/search?query=x");
        assert_eq!(provider.state(), ProviderState::Uninitialized);
        assert!(provider.search().is_none());

        let search = provider.mount();
        assert_eq!(search.get("query"), Some(ParamValue::from("x")));
        assert_eq!(provider.state(), ProviderState::Ready);
    }

    #[test]
    fn mount_is_idempotent() {
        let mut provider = provider("/search?query=x");
        provider.mount();
        provider.port_mut().visit("/search?query=y");
        assert_eq!(provider.mount().get("query"), Some(ParamValue::from("x")));
    }

    #[test]
    fn visibility_prefers_location_for_ignored_fields() {
        let parser = parser();
        let both = MergeInput {
            left: Some(ParamValue::from("a")),
            right: Some(ParamValue::from("b")),
        };
        let hidden_only = MergeInput {
            left: None,
            right: Some(ParamValue::from("b")),
        };
        assert_eq!(visibility(&parser, "query", &hidden_only), MergeDecision::Left);
        assert_eq!(visibility(&parser, "refresh", &both), MergeDecision::Right);
        assert_eq!(visibility(&parser, "sort", &both), MergeDecision::Left);
        assert_eq!(visibility(&parser, "sort", &hidden_only), MergeDecision::Right);
    }

    #[test]
    fn navigation_keeps_hash() {
        let mut provider = provider("/search?query=x#results");
        provider.mount();
        let outcome = provider.set_search_params(&UrlParams::parse("query=y"));
        assert!(outcome.navigated);
        assert_eq!(provider.port().history(), ["/search?query=y#results"]);
    }

    #[test]
    fn hidden_only_change_does_not_navigate() {
        let mut provider = provider("/search?query=x");
        provider.mount();
        let outcome =
            provider.update_search_object(|object| object.with("refresh", true));
        assert_eq!(
            outcome,
            NavigationOutcome {
                hidden_changed: true,
                navigated: false
            }
        );
        assert_eq!(provider.hidden_params().to_string(), "refresh=true");
        assert_eq!(provider.port().navigations(), 0);
    }

    #[test]
    fn echo_of_own_navigation_keeps_state() {
        let mut provider = provider("/search");
        provider.mount();
        provider.update_search_object(|object| object.with("query", "x"));
        assert!(!provider.handle_location_change());
        assert_eq!(
            provider.search().and_then(|s| s.get("query")),
            Some(ParamValue::from("x"))
        );
    }
}
