//! Immutable parsed-parameter snapshots.

use std::fmt;
use std::sync::Arc;

use query::UrlParams;

use crate::error::{CodecError, CodecResult};
use crate::filter::FilterEntry;
use crate::parser::{ParamTable, SearchParser};
use crate::value::{ParamValue, SearchObject};

/// One snapshot of search state: a canonical multimap plus the schema it was
/// built against.
///
/// Every transformation returns a new result; the backing multimap is never
/// mutated.
#[derive(Clone)]
pub struct SearchResult {
    table: Arc<ParamTable>,
    params: UrlParams,
}

impl SearchResult {
    pub(crate) fn new(table: Arc<ParamTable>, params: UrlParams) -> Self {
        Self { table, params }
    }

    /// The parser this result was built by.
    #[must_use]
    pub fn parser(&self) -> SearchParser {
        SearchParser::from_table(Arc::clone(&self.table))
    }

    /// Backing multimap.
    #[must_use]
    pub fn params(&self) -> &UrlParams {
        &self.params
    }

    /// Decoded value of a field, or `None` if `key` is not in the schema.
    ///
    /// Filter entries come back raw, prefixes included, so that the value
    /// can be passed to [`set`](Self::set) unchanged. Use
    /// [`entries`](Self::entries) for bare values and their modifiers.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<ParamValue> {
        self.table
            .param(key)
            .map(|param| param.get(&self.params, &self.table.env))
    }

    /// Like [`get`](Self::get) but fails on keys outside the schema.
    pub fn try_get(&self, key: &str) -> CodecResult<ParamValue> {
        self.get(key).ok_or_else(|| CodecError::UnknownField {
            name: key.to_string(),
        })
    }

    /// `true` if the field is present, or present with `value`.
    ///
    /// Filter entries match on bare text, so `has("filters", Some("a"))` is
    /// `true` for `-a`. Keys outside the schema are never present.
    #[must_use]
    pub fn has(&self, key: &str, value: Option<&str>) -> bool {
        self.table
            .param(key)
            .is_some_and(|param| param.has(&self.params, value, &self.table.env))
    }

    /// Classified entries of a filters field; empty for any other key.
    #[must_use]
    pub fn entries(&self, key: &str) -> Vec<FilterEntry> {
        let Some(param) = self.table.param(key).filter(|param| param.is_filters()) else {
            return Vec::new();
        };
        match param.get(&self.params, &self.table.env) {
            ParamValue::Filters(raws) => raws
                .iter()
                .map(|raw| self.table.env.prefixes.classify(raw))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Keeps the pairs for which `predicate` holds.
    ///
    /// Each pair is decoded on its own, so a filters entry is seen as a
    /// one-entry list.
    #[must_use]
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&str, &ParamValue) -> bool,
    {
        let params = self
            .params
            .iter()
            .filter(|&(key, raw)| predicate(key, &self.decode_pair(key, raw)))
            .collect();
        Self::new(Arc::clone(&self.table), params)
    }

    /// Overlays `changes` on the current object and re-encodes it.
    ///
    /// Fields missing from `changes` keep their current value.
    #[must_use]
    pub fn set(&self, changes: &SearchObject) -> Self {
        let mut object = self.to_object();
        object.extend(changes.iter().map(|(key, value)| (key, value.clone())));
        self.parser().from_object(&object)
    }

    /// Re-encodes the object returned by `update`.
    #[must_use]
    pub fn update<F>(&self, update: F) -> Self
    where
        F: FnOnce(SearchObject) -> SearchObject,
    {
        self.parser().from_object(&update(self.to_object()))
    }

    /// Fully populated typed object.
    #[must_use]
    pub fn to_object(&self) -> SearchObject {
        self.table
            .params()
            .iter()
            .fold(SearchObject::new(), |acc, param| {
                param.object(acc, &self.params, &self.table.env)
            })
    }

    /// Fresh multimap from the canonical string.
    #[must_use]
    pub fn to_params(&self) -> UrlParams {
        UrlParams::parse(&self.to_string())
    }

    /// Partitions the pairs into `(matching, rest)`.
    #[must_use]
    pub fn to_split_params<F>(&self, mut predicate: F) -> (UrlParams, UrlParams)
    where
        F: FnMut(&str, &ParamValue) -> bool,
    {
        let mut first = UrlParams::new();
        let mut second = UrlParams::new();
        for (key, raw) in &self.params {
            if predicate(key, &self.decode_pair(key, raw)) {
                first.append(key, raw);
            } else {
                second.append(key, raw);
            }
        }
        (first, second)
    }

    fn decode_pair(&self, key: &str, raw: &str) -> ParamValue {
        self.table
            .param(key)
            .map_or_else(|| ParamValue::from(raw), |param| param.parse(raw))
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.params, f)
    }
}

impl fmt::Debug for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchResult")
            .field("schema_hash", &format_args!("{:016x}", self.table.hash()))
            .field("params", &self.params.to_string())
            .finish()
    }
}

impl PartialEq for SearchResult {
    fn eq(&self, other: &Self) -> bool {
        self.table.hash() == other.table.hash() && self.params == other.params
    }
}

impl Eq for SearchResult {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ParserOptions, Prefixes};
    use schema::{boolean, create_search_params, filters, number, string};

    fn parser() -> SearchParser {
        let schema = create_search_params(|p| {
            p.field("query", string(""))
                .field("offset", number(0).min(0))
                .field("rows", number(25).enforced())
                .field("filters", filters(Vec::<String>::new()))
                .field("refresh", boolean(false).hidden().ignored())
        })
        .unwrap();
        SearchParser::new(schema, ParserOptions::new().prefixes(Prefixes::new("-", "~"))).unwrap()
    }

    #[test]
    fn get_and_try_get() {
        let result = parser().from_query("query=x&offset=5");
        assert_eq!(result.get("query"), Some(ParamValue::from("x")));
        assert_eq!(result.get("offset"), Some(ParamValue::Number(5)));
        assert_eq!(result.get("rows"), Some(ParamValue::Number(25)));
        assert_eq!(result.get("colour"), None);
        assert!(matches!(
            result.try_get("colour"),
            Err(CodecError::UnknownField { .. })
        ));
    }

    #[test]
    fn has_with_and_without_value() {
        let result = parser().from_query("filters=-status%3Abad&filters=type%3Agood&offset=5");
        assert!(result.has("filters", None));
        assert!(result.has("filters", Some("status:bad")));
        assert!(result.has("filters", Some("type:good")));
        assert!(result.has("offset", Some("5")));
        assert!(!result.has("offset", Some("6")));
        assert!(!result.has("query", None));
        assert!(!result.has("colour", None));
        assert!(result.to_string().contains("filters=-status%3Abad"));
    }

    #[test]
    fn entries_classify_prefixes() {
        let result = parser().from_query("filters=-a&filters=~b&filters=c");
        assert_eq!(
            result.entries("filters"),
            [
                FilterEntry::negated("a"),
                FilterEntry::ignored("b"),
                FilterEntry::new("c"),
            ]
        );
        assert!(result.entries("query").is_empty());
    }

    #[test]
    fn filter_keeps_matching_pairs() {
        let result = parser().from_query("query=x&filters=-a&filters=b");
        let kept = result.filter(|key, value| {
            key != "filters" || value != &ParamValue::from(vec!["-a"])
        });
        assert_eq!(kept.to_string(), "query=x&rows=25&filters=b");
        assert_eq!(result.to_string(), "query=x&rows=25&filters=-a&filters=b");
    }

    #[test]
    fn get_keeps_prefixes_entries_strip_them() {
        let result = parser().from_query("filters=-a&filters=b");
        assert_eq!(result.get("filters"), Some(ParamValue::from(vec!["-a", "b"])));
        let bare: Vec<String> = result.entries("filters").into_iter().map(|entry| entry.value).collect();
        assert_eq!(bare, ["a", "b"]);
        assert_eq!(
            result.set(&result.to_object()).to_string(),
            result.to_string()
        );
    }

    #[test]
    fn set_overlays_object() {
        let result = parser().from_query("query=x&offset=5");
        let next = result.set(&SearchObject::new().with("offset", 0).with("rows", 100));
        assert_eq!(next.to_string(), "query=x&rows=25");
        assert_eq!(result.get("offset"), Some(ParamValue::Number(5)));
    }

    #[test]
    fn update_applies_function() {
        let result = parser().from_query("query=x");
        let next = result.update(|object| object.with("query", "y").with("refresh", true));
        assert_eq!(next.get("query"), Some(ParamValue::from("y")));
        assert_eq!(next.get("refresh"), Some(ParamValue::Boolean(true)));
    }

    #[test]
    fn to_params_normalizes() {
        let result = parser().from_query("query=a+b");
        let params = result.to_params();
        assert_eq!(params.get("query"), Some("a b"));
        assert_eq!(&params, result.params());
    }

    #[test]
    fn split_partitions_without_loss() {
        let parser = parser();
        let result = parser.from_query("query=x&refresh=true&filters=a");
        let (visible, hidden) = result.to_split_params(|key, _| !parser.is_hidden(key));
        assert_eq!(visible.to_string(), "query=x&rows=25&filters=a");
        assert_eq!(hidden.to_string(), "refresh=true");
        assert_eq!(visible.len() + hidden.len(), result.params().len());
    }

    #[test]
    fn results_compare_by_schema_and_params() {
        let parser = parser();
        assert_eq!(parser.from_query("query=x"), parser.from_query("query=x&offset=0"));
        assert_ne!(parser.from_query("query=x"), parser.from_query("query=y"));
    }

    #[test]
    fn debug_shows_params() {
        let result = parser().from_query("query=x");
        let debug = format!("{result:?}");
        assert!(debug.contains("query=x"));
    }
}
