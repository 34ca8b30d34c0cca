//! Typed search-parameter schema declarations for searchsync.
//!
//! This crate defines how a screen's query state is declared:
//! - Field kinds (string, number, boolean, filters, opaque) with their defaults
//! - Declaration-time modifiers (enforced, hidden, ignored, nullable)
//! - Numeric bounds and string options
//! - Deterministic schema hashing
//!
//! # Design Principles
//!
//! - **Explicit kinds** - The codec for a field is picked by its declared kind, never by
//!   inspecting a default value at runtime.
//! - **Immutable after build** - Modifiers are fixed once the schema is validated.
//! - **Deterministic hashing** - Schema hash is stable given the same definition.

mod error;
mod field;
mod hash;
mod schema;

pub use error::{SchemaError, SchemaResult};
pub use field::{boolean, filters, number, opaque, string, Field, FieldDef, FieldKind, Modifiers};
pub use hash::schema_hash;
pub use schema::{create_search_params, Schema, SchemaBuilder};
