//! URL-synchronized search state for searchsync.
//!
//! [`SearchParamsProvider`] binds a [`codec::SearchParser`] to a
//! [`LocationPort`]. It reads the location into a [`codec::SearchResult`],
//! keeps hidden and ignored fields in a store of its own, and pushes a new
//! location only when the visible query changes.
//!
//! # Example
//!
//! ```
//! use codec::{ParserOptions, SearchParser};
//! use provider::{MemoryLocation, SearchParamsProvider};
//! use schema::{create_search_params, number, string};
//!
//! let schema = create_search_params(|p| {
//!     p.field("query", string("")).field("offset", number(0).min(0))
//! })
//! .unwrap();
//! let parser = SearchParser::new(schema, ParserOptions::default()).unwrap();
//! let mut provider = SearchParamsProvider::new(parser, MemoryLocation::new("/search"));
//!
//! provider.mount();
//! provider.update_search_object(|object| object.with("query", "x"));
//! assert_eq!(provider.location().to_string(), "/search?query=x");
//!
//! // Same state again: no second navigation.
//! provider.update_search_object(|object| object.with("query", "x"));
//! assert_eq!(provider.port().navigations(), 1);
//! ```

mod location;
mod provider;

pub use location::{Location, LocationPort, MemoryLocation};
pub use provider::{NavigationOutcome, ProviderState, SearchParamsProvider};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = Location::default();
        let _ = MemoryLocation::new("/");
        let _ = NavigationOutcome::default();
        let _ = ProviderState::Uninitialized;
    }
}
