//! Whole-object conversions over one schema.

use std::sync::Arc;

use query::UrlParams;
use schema::Schema;

use crate::diagnostics::{Diagnostics, FallbackReason};
use crate::error::{CodecError, CodecResult};
use crate::merge::{MergeDecision, MergeInput};
use crate::options::{ParserOptions, Prefixes};
use crate::param::{Env, Param, Source};
use crate::result::SearchResult;
use crate::value::SearchObject;

/// Codecs for every field of a schema, in declaration order.
#[derive(Debug)]
pub(crate) struct ParamTable {
    schema: Schema,
    params: Vec<Param>,
    pub(crate) env: Env,
    hash: u64,
}

impl ParamTable {
    pub(crate) fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|param| param.name() == name)
    }

    pub(crate) fn params(&self) -> &[Param] {
        &self.params
    }

    pub(crate) const fn hash(&self) -> u64 {
        self.hash
    }

    fn report_unknown<'a>(&self, keys: impl Iterator<Item = (&'a str, Option<&'a str>)>) {
        for (key, raw) in keys {
            if self.param(key).is_none() {
                self.env
                    .diagnostics
                    .report(key, raw, FallbackReason::UnknownField);
            }
        }
    }

    fn report_unknown_params(&self, params: &UrlParams) {
        self.report_unknown(params.keys().into_iter().map(|key| (key, params.get(key))));
    }

    fn report_unknown_object(&self, object: &SearchObject) {
        self.report_unknown(object.iter().map(|(key, _)| (key, None)));
    }
}

/// Builds a result by running `write` for each field in order.
fn build<F>(table: &Arc<ParamTable>, mut write: F) -> SearchResult
where
    F: FnMut(&Param, &mut UrlParams),
{
    let mut out = UrlParams::new();
    for param in &table.params {
        write(param, &mut out);
    }
    SearchResult::new(Arc::clone(table), out)
}

/// Field-to-codec mapping for one schema.
///
/// Built once and immutable afterwards; clones share the mapping. Every
/// conversion processes fields in schema order, so the same state always
/// serializes to the same query string.
///
/// ```
/// use codec::{ParserOptions, SearchParser};
/// use schema::{create_search_params, number, string};
///
/// let schema = create_search_params(|p| {
///     p.field("query", string(""))
///         .field("offset", number(0))
///         .field("rows", number(25))
/// })
/// .unwrap();
/// let parser = SearchParser::new(schema, ParserOptions::default()).unwrap();
///
/// let delta = parser.delta_query("rows=25&query=x&offset=0");
/// assert_eq!(delta.to_string(), "query=x");
/// ```
#[derive(Debug, Clone)]
pub struct SearchParser {
    table: Arc<ParamTable>,
}

impl SearchParser {
    /// Builds a parser after validating the schema and options.
    pub fn new(schema: Schema, options: ParserOptions) -> CodecResult<Self> {
        schema.validate()?;
        options.prefixes.validate()?;
        for name in &options.enforced {
            if !schema.contains(name) {
                return Err(CodecError::UnknownField { name: name.clone() });
            }
        }

        let params = schema
            .fields
            .iter()
            .map(|field| Param::new(field, options.enforced.contains(&field.name)))
            .collect();
        let hash = schema::schema_hash(&schema);
        tracing::debug!(
            fields = schema.len(),
            hash,
            "search parser built"
        );

        Ok(Self {
            table: Arc::new(ParamTable {
                schema,
                params,
                env: Env {
                    prefixes: options.prefixes,
                    diagnostics: Diagnostics::new(options.diagnostics),
                },
                hash,
            }),
        })
    }

    pub(crate) fn from_table(table: Arc<ParamTable>) -> Self {
        Self { table }
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.table.schema
    }

    #[must_use]
    pub fn prefixes(&self) -> &Prefixes {
        &self.table.env.prefixes
    }

    /// Fingerprint of the schema this parser was built from.
    #[must_use]
    pub fn schema_hash(&self) -> u64 {
        self.table.hash
    }

    /// Returns `true` if `name` is a declared field.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.table.param(name).is_some()
    }

    #[must_use]
    pub fn is_hidden(&self, name: &str) -> bool {
        self.table.param(name).is_some_and(Param::is_hidden)
    }

    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        self.table.param(name).is_some_and(Param::is_ignored)
    }

    /// Enforced by the field modifier or by [`ParserOptions::enforced`].
    #[must_use]
    pub fn is_enforced(&self, name: &str) -> bool {
        self.table.param(name).is_some_and(Param::is_enforced)
    }

    /// The object every field decodes to when nothing is set.
    #[must_use]
    pub fn default_object(&self) -> SearchObject {
        self.table
            .params
            .iter()
            .fold(SearchObject::new(), |acc, param| {
                param.object(acc, &UrlParams::new(), &self.table.env)
            })
    }

    /// Parses a query string, then behaves as [`from_params`](Self::from_params).
    #[must_use]
    pub fn from_query(&self, query: &str) -> SearchResult {
        self.from_params(&UrlParams::parse(query))
    }

    /// Canonical result for a multimap: unknown keys and default values
    /// dropped, enforced fields at their default.
    #[must_use]
    pub fn from_params(&self, params: &UrlParams) -> SearchResult {
        self.table.report_unknown_params(params);
        build(&self.table, |param, out| {
            param.from(out, Source::Params(params), &self.table.env);
        })
    }

    /// Canonical result for an object, under the same rules as
    /// [`from_params`](Self::from_params).
    #[must_use]
    pub fn from_object(&self, object: &SearchObject) -> SearchResult {
        self.table.report_unknown_object(object);
        build(&self.table, |param, out| {
            param.set(out, object, &self.table.env);
        })
    }

    /// Every field written, defaults included.
    #[must_use]
    pub fn full_params(&self, params: &UrlParams) -> SearchResult {
        self.table.report_unknown_params(params);
        build(&self.table, |param, out| {
            param.full(out, Source::Params(params), &self.table.env);
        })
    }

    /// Every field written, defaults included.
    #[must_use]
    pub fn full_object(&self, object: &SearchObject) -> SearchResult {
        self.table.report_unknown_object(object);
        build(&self.table, |param, out| {
            param.full(out, Source::Object(object), &self.table.env);
        })
    }

    /// Shareable form: only fields that are neither default, enforced nor
    /// ignored.
    #[must_use]
    pub fn delta_params(&self, params: &UrlParams) -> SearchResult {
        self.table.report_unknown_params(params);
        build(&self.table, |param, out| {
            param.delta(out, Source::Params(params), &self.table.env);
        })
    }

    #[must_use]
    pub fn delta_query(&self, query: &str) -> SearchResult {
        self.delta_params(&UrlParams::parse(query))
    }

    /// Shareable form of an object.
    #[must_use]
    pub fn delta_object(&self, object: &SearchObject) -> SearchResult {
        self.table.report_unknown_object(object);
        build(&self.table, |param, out| {
            param.delta(out, Source::Object(object), &self.table.env);
        })
    }

    /// Merges two multimaps field by field.
    ///
    /// `decide` sees each field with its decoded value in both sources and
    /// picks one; returning `bool` maps `true` to the first source.
    ///
    /// ```
    /// use codec::{ParserOptions, SearchParser, UrlParams};
    /// use schema::{create_search_params, string};
    ///
    /// let schema = create_search_params(|p| p.field("a", string("")).field("b", string("")))
    ///     .unwrap();
    /// let parser = SearchParser::new(schema, ParserOptions::default()).unwrap();
    ///
    /// let left = UrlParams::parse("a=1");
    /// let right = UrlParams::parse("a=2&b=3");
    /// let merged = parser.merge_params(&left, &right, |key, _| key == "a");
    /// assert_eq!(merged.to_string(), "a=1&b=3");
    /// ```
    pub fn merge_params<F, D>(&self, first: &UrlParams, second: &UrlParams, mut decide: F) -> SearchResult
    where
        F: FnMut(&str, &MergeInput) -> D,
        D: Into<MergeDecision>,
    {
        let mut decide = |name: &str, input: &MergeInput| -> MergeDecision { decide(name, input).into() };
        build(&self.table, |param, out| {
            param.merge(
                out,
                Source::Params(first),
                Source::Params(second),
                &mut decide,
                &self.table.env,
            );
        })
    }
}

impl PartialEq for SearchParser {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.table, &other.table)
            || (self.table.hash == other.table.hash && self.table.schema == other.table.schema)
    }
}
