//! Typed search-parameter codecs for searchsync.
//!
//! This crate ties a [`schema::Schema`] to the [`query::UrlParams`] multimap:
//! a [`SearchParser`] decodes URLs into typed [`SearchObject`]s, encodes them
//! back, and computes the delta and merge forms used to keep application
//! state, the visible URL and a hidden parameter store in step.
//!
//! # Features
//!
//! - Per-field codecs for strings, numbers, booleans, filter lists and opaque values
//! - Enforced, hidden, ignored and nullable modifiers
//! - Negation and ignore prefixes on filter entries
//! - Deltas, full forms and per-field merges
//! - Immutable [`SearchResult`] snapshots
//!
//! # Design Principles
//!
//! - **Permissive decoding** - Malformed values reset the field, never fail.
//! - **Observable fallbacks** - Every reset is a [`Diagnostic`].
//! - **Deterministic** - Fields are always written in schema order.

mod diagnostics;
mod error;
mod filter;
mod merge;
mod options;
mod param;
mod parser;
mod result;
mod value;

pub use diagnostics::{Diagnostic, DiagnosticHook, FallbackReason};
pub use error::{CodecError, CodecResult, PrefixKind};
pub use filter::FilterEntry;
pub use merge::{MergeDecision, MergeInput};
pub use options::{ParserOptions, Prefixes};
pub use parser::SearchParser;
pub use query::UrlParams;
pub use result::SearchResult;
pub use value::{ParamValue, SearchObject};
