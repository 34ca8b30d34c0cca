//! Ordered URL query-string multimap for searchsync.
//!
//! This crate provides [`UrlParams`], the single serialized form every other
//! searchsync layer reads from and writes to. It is isomorphic to a URL query
//! string: an ordered list of `(key, value)` pairs where keys may repeat.
//!
//! # Design Principles
//!
//! - **Order preserving** - Pairs keep insertion order; repeated keys stay repeated.
//! - **Infallible parsing** - Any input decodes to some multimap, never an error.
//! - **No domain knowledge** - This crate knows nothing about schemas or field types.
//!
//! # Example
//!
//! ```
//! use query::UrlParams;
//!
//! let mut params = UrlParams::parse("?query=foo&filters=a&filters=b");
//! assert_eq!(params.get("query"), Some("foo"));
//! assert_eq!(params.get_all("filters").collect::<Vec<_>>(), ["a", "b"]);
//!
//! params.set("query", "bar baz");
//! assert_eq!(params.to_string(), "query=bar+baz&filters=a&filters=b");
//! ```

mod params;

pub use params::{Iter, UrlParams};
