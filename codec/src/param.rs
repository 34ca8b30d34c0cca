//! Per-field codecs.
//!
//! A [`Param`] owns one field's default and modifiers and converts that field
//! between a [`UrlParams`] multimap and a [`SearchObject`].

use std::num::IntErrorKind;

use query::UrlParams;
use schema::{Field, FieldDef, FieldKind};

use crate::diagnostics::{Diagnostics, FallbackReason};
use crate::merge::{MergeDecision, MergeInput};
use crate::options::Prefixes;
use crate::value::{ParamValue, SearchObject};

/// State shared by every codec of one parser.
#[derive(Debug, Default)]
pub(crate) struct Env {
    pub(crate) prefixes: Prefixes,
    pub(crate) diagnostics: Diagnostics,
}

impl Env {
    fn report(&self, field: &str, raw: Option<&str>, reason: FallbackReason) {
        self.diagnostics.report(field, raw, reason);
    }
}

/// Where a field value is read from.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Source<'a> {
    Params(&'a UrlParams),
    Object(&'a SearchObject),
}

#[derive(Debug, Clone)]
pub(crate) struct Param {
    name: String,
    def: FieldDef,
    enforced: bool,
    default: ParamValue,
}

impl Param {
    /// `enforced` adds to the field's own modifier.
    pub(crate) fn new(field: &Field, enforced: bool) -> Self {
        let default = match &field.def.kind {
            FieldKind::String { default } | FieldKind::Opaque { default } => {
                ParamValue::String(default.clone())
            }
            FieldKind::Number { default } => ParamValue::Number(*default),
            FieldKind::Boolean { default } => ParamValue::Boolean(*default),
            FieldKind::Filters { default } => ParamValue::Filters(default.clone()),
        };
        Self {
            name: field.name.clone(),
            enforced: enforced || field.def.modifiers.enforced,
            def: field.def.clone(),
            default,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn def(&self) -> &FieldDef {
        &self.def
    }

    pub(crate) const fn is_enforced(&self) -> bool {
        self.enforced
    }

    pub(crate) const fn is_hidden(&self) -> bool {
        self.def.modifiers.hidden
    }

    pub(crate) const fn is_ignored(&self) -> bool {
        self.def.modifiers.ignored
    }

    pub(crate) const fn is_filters(&self) -> bool {
        matches!(self.def.kind, FieldKind::Filters { .. })
    }

    /// Value of the field when no source carries it.
    pub(crate) fn effective_default(&self) -> ParamValue {
        if self.def.modifiers.nullable && !self.enforced {
            ParamValue::Null
        } else {
            self.default.clone()
        }
    }

    /// Decodes a single raw value without reporting fallbacks.
    ///
    /// A filters field yields a one-entry list holding `raw` verbatim.
    pub(crate) fn parse(&self, raw: &str) -> ParamValue {
        self.decode_one(raw).0
    }

    /// Decoded value as seen by object consumers.
    pub(crate) fn get(&self, params: &UrlParams, env: &Env) -> ParamValue {
        if self.enforced {
            return self.default.clone();
        }
        self.read(Source::Params(params), env)
            .unwrap_or_else(|| self.effective_default())
    }

    /// Presence check, optionally for one value.
    ///
    /// Filter entries match on their raw or their bare text.
    pub(crate) fn has(&self, params: &UrlParams, value: Option<&str>, env: &Env) -> bool {
        let Some(expected) = value else {
            return params.has(&self.name);
        };
        match self.get(params, env) {
            ParamValue::Filters(entries) => entries
                .iter()
                .any(|raw| raw == expected || env.prefixes.bare(raw) == expected),
            other => self
                .encode(&other)
                .first()
                .is_some_and(|encoded| encoded == expected),
        }
    }

    /// Writes the field unless it equals its effective default.
    pub(crate) fn from(&self, out: &mut UrlParams, source: Source<'_>, env: &Env) {
        if self.enforced {
            self.write(out, &self.default);
            return;
        }
        let value = self.read(source, env);
        self.emit(out, value);
    }

    /// Writes the field unconditionally.
    pub(crate) fn full(&self, out: &mut UrlParams, source: Source<'_>, env: &Env) {
        let value = if self.enforced {
            self.default.clone()
        } else {
            self.read(source, env)
                .unwrap_or_else(|| self.effective_default())
        };
        self.write(out, &value);
    }

    /// Writes the shareable form of the field: nothing when ignored,
    /// enforced or default, and no ignore-prefixed filter entries.
    pub(crate) fn delta(&self, out: &mut UrlParams, source: Source<'_>, env: &Env) {
        if self.enforced || self.is_ignored() {
            return;
        }
        let Some(value) = self.read(source, env) else {
            return;
        };
        let value = match value {
            ParamValue::Filters(entries) => ParamValue::Filters(
                entries
                    .into_iter()
                    .filter(|raw| !env.prefixes.is_ignored(raw))
                    .collect(),
            ),
            other => other,
        };
        if value != self.effective_default() {
            self.write(out, &value);
        }
    }

    /// Writes the field from whichever source `decide` selects.
    pub(crate) fn merge<F>(
        &self,
        out: &mut UrlParams,
        left: Source<'_>,
        right: Source<'_>,
        decide: &mut F,
        env: &Env,
    ) where
        F: FnMut(&str, &MergeInput) -> MergeDecision,
    {
        let input = MergeInput {
            left: self.read(left, env),
            right: self.read(right, env),
        };
        let decision = decide(&self.name, &input);
        tracing::trace!(field = %self.name, ?decision, "merge decision");
        self.emit(out, input.pick(decision).cloned());
    }

    /// Folds the decoded field into an object.
    pub(crate) fn object(&self, mut acc: SearchObject, params: &UrlParams, env: &Env) -> SearchObject {
        acc.insert(self.name.as_str(), self.get(params, env));
        acc
    }

    /// Encodes the object's value for this field.
    pub(crate) fn set(&self, out: &mut UrlParams, object: &SearchObject, env: &Env) {
        self.from(out, Source::Object(object), env);
    }

    fn emit(&self, out: &mut UrlParams, value: Option<ParamValue>) {
        if self.enforced {
            self.write(out, &self.default);
            return;
        }
        if let Some(value) = value {
            if value != self.effective_default() {
                self.write(out, &value);
            }
        }
    }

    fn write(&self, out: &mut UrlParams, value: &ParamValue) {
        for raw in self.encode(value) {
            out.append(self.name.as_str(), raw);
        }
    }

    fn encode(&self, value: &ParamValue) -> Vec<String> {
        match value {
            ParamValue::Null => Vec::new(),
            ParamValue::Number(n) => vec![n.to_string()],
            ParamValue::Boolean(b) => vec![b.to_string()],
            ParamValue::String(s) => vec![s.clone()],
            // A lone empty entry keeps an empty list distinct from absence.
            ParamValue::Filters(entries) if entries.is_empty() => vec![String::new()],
            ParamValue::Filters(entries) => entries.clone(),
        }
    }

    fn read(&self, source: Source<'_>, env: &Env) -> Option<ParamValue> {
        match source {
            Source::Params(params) => {
                let raws: Vec<&str> = params.get_all(&self.name).collect();
                if raws.is_empty() {
                    None
                } else {
                    Some(self.decode(&raws, env))
                }
            }
            Source::Object(object) => object
                .get(&self.name)
                .map(|value| self.normalize(value, env)),
        }
    }

    fn decode(&self, raws: &[&str], env: &Env) -> ParamValue {
        if self.is_filters() {
            return ParamValue::Filters(self.clean_filters(raws.iter().copied(), env));
        }
        // Scalars: first value wins.
        let raw = raws[0];
        let (value, reason) = self.decode_one(raw);
        if let Some(reason) = reason {
            env.report(&self.name, Some(raw), reason);
        }
        value
    }

    fn decode_one(&self, raw: &str) -> (ParamValue, Option<FallbackReason>) {
        match &self.def.kind {
            FieldKind::Number { default } => match raw.trim().parse::<i64>() {
                Ok(value) => {
                    let clamped = self.clamp(value);
                    let reason =
                        (clamped != value).then_some(FallbackReason::Clamped { value: clamped });
                    (ParamValue::Number(clamped), reason)
                }
                Err(err) => match self.overflow_bound(err.kind()) {
                    Some(bound) => (
                        ParamValue::Number(bound),
                        Some(FallbackReason::Clamped { value: bound }),
                    ),
                    None => (
                        ParamValue::Number(*default),
                        Some(FallbackReason::NotANumber),
                    ),
                },
            },
            FieldKind::Boolean { default } => match raw {
                "true" => (ParamValue::Boolean(true), None),
                "false" => (ParamValue::Boolean(false), None),
                _ => (
                    ParamValue::Boolean(*default),
                    Some(FallbackReason::NotABoolean),
                ),
            },
            FieldKind::String { default } => {
                if self.allows(raw) {
                    (ParamValue::from(raw), None)
                } else {
                    (
                        ParamValue::String(default.clone()),
                        Some(FallbackReason::NotAnOption),
                    )
                }
            }
            FieldKind::Opaque { .. } => (ParamValue::from(raw), None),
            FieldKind::Filters { .. } => (ParamValue::Filters(vec![raw.to_string()]), None),
        }
    }

    fn normalize(&self, value: &ParamValue, env: &Env) -> ParamValue {
        match (&self.def.kind, value) {
            (_, ParamValue::Null) if self.def.modifiers.nullable => ParamValue::Null,
            (FieldKind::Number { .. }, ParamValue::Number(n)) => {
                let clamped = self.clamp(*n);
                if clamped != *n {
                    env.report(&self.name, None, FallbackReason::Clamped { value: clamped });
                }
                ParamValue::Number(clamped)
            }
            (FieldKind::Boolean { .. }, ParamValue::Boolean(b)) => ParamValue::Boolean(*b),
            (FieldKind::String { .. }, ParamValue::String(s)) => {
                if self.allows(s) {
                    ParamValue::String(s.clone())
                } else {
                    env.report(&self.name, Some(s), FallbackReason::NotAnOption);
                    self.default.clone()
                }
            }
            (FieldKind::Opaque { .. }, ParamValue::String(s)) => ParamValue::String(s.clone()),
            (FieldKind::Filters { .. }, ParamValue::Filters(entries)) => ParamValue::Filters(
                self.clean_filters(entries.iter().map(String::as_str), env),
            ),
            (kind, other) => {
                env.report(
                    &self.name,
                    None,
                    FallbackReason::TypeMismatch {
                        expected: kind.name(),
                        found: other.type_name(),
                    },
                );
                self.default.clone()
            }
        }
    }

    /// Drops empty entries. Entries that are only a prefix are reported.
    fn clean_filters<'a>(&self, entries: impl Iterator<Item = &'a str>, env: &Env) -> Vec<String> {
        let mut kept = Vec::new();
        for raw in entries {
            if raw.is_empty() {
                continue;
            }
            if env.prefixes.bare(raw).is_empty() {
                env.report(&self.name, Some(raw), FallbackReason::EmptyFilter);
                continue;
            }
            kept.push(raw.to_string());
        }
        kept
    }

    fn clamp(&self, value: i64) -> i64 {
        let value = self.def.min.map_or(value, |min| value.max(min));
        self.def.max.map_or(value, |max| value.min(max))
    }

    /// Bound an integer past the `i64` range clamps to, if one is declared.
    fn overflow_bound(&self, kind: &IntErrorKind) -> Option<i64> {
        match kind {
            IntErrorKind::PosOverflow => self.def.max,
            IntErrorKind::NegOverflow => self.def.min,
            _ => None,
        }
    }

    fn allows(&self, value: &str) -> bool {
        self.def
            .options
            .as_ref()
            .map_or(true, |options| options.iter().any(|option| option == value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{boolean, filters, number, opaque, string};

    fn param(name: &str, def: FieldDef) -> Param {
        Param::new(&Field::new(name, def), false)
    }

    fn env() -> Env {
        Env {
            prefixes: Prefixes::new("-", "~"),
            diagnostics: Diagnostics::default(),
        }
    }

    #[test]
    fn number_decode_falls_back_and_clamps() {
        let rows = param("rows", number(25).min(0).max(100));
        let env = env();
        assert_eq!(rows.get(&UrlParams::parse("rows=notanumber"), &env), ParamValue::from(25));
        assert_eq!(rows.get(&UrlParams::parse("rows=-4"), &env), ParamValue::from(0));
        assert_eq!(rows.get(&UrlParams::parse("rows=500"), &env), ParamValue::from(100));
        assert_eq!(rows.get(&UrlParams::parse("rows=%2042"), &env), ParamValue::from(42));
        assert_eq!(rows.get(&UrlParams::new(), &env), ParamValue::from(25));
    }

    #[test]
    fn number_overflow_clamps_to_declared_bound() {
        let rows = param("rows", number(25).min(0).max(500));
        let env = env();
        assert_eq!(
            rows.get(&UrlParams::parse("rows=99999999999999999999"), &env),
            ParamValue::from(500)
        );
        assert_eq!(
            rows.get(&UrlParams::parse("rows=-99999999999999999999"), &env),
            ParamValue::from(0)
        );

        let unbounded = param("offset", number(7));
        assert_eq!(
            unbounded.get(&UrlParams::parse("offset=99999999999999999999"), &env),
            ParamValue::from(7)
        );
        assert_eq!(
            rows.decode_one("99999999999999999999").1,
            Some(FallbackReason::Clamped { value: 500 })
        );
        assert_eq!(rows.decode_one("1e20").1, Some(FallbackReason::NotANumber));
    }

    #[test]
    fn boolean_is_case_sensitive() {
        let refresh = param("refresh", boolean(false));
        let env = env();
        assert_eq!(refresh.get(&UrlParams::parse("refresh=true"), &env), ParamValue::from(true));
        assert_eq!(refresh.get(&UrlParams::parse("refresh=TRUE"), &env), ParamValue::from(false));
    }

    #[test]
    fn string_options_reject_non_members() {
        let sort = param("sort", string("asc").options(["asc", "desc"]));
        let env = env();
        assert_eq!(sort.get(&UrlParams::parse("sort=desc"), &env), ParamValue::from("desc"));
        assert_eq!(sort.get(&UrlParams::parse("sort=up"), &env), ParamValue::from("asc"));
    }

    #[test]
    fn opaque_is_verbatim() {
        let cursor = param("cursor", opaque(""));
        assert_eq!(
            cursor.get(&UrlParams::parse("cursor=a%2Bb"), &env()),
            ParamValue::from("a+b")
        );
    }

    #[test]
    fn scalar_first_value_wins() {
        let query = param("query", string(""));
        assert_eq!(query.get(&UrlParams::parse("query=a&query=b"), &env()), ParamValue::from("a"));
    }

    #[test]
    fn enforced_reads_and_writes_default() {
        let rows = param("rows", number(25).enforced());
        let env = env();
        let params = UrlParams::parse("rows=999");
        assert_eq!(rows.get(&params, &env), ParamValue::from(25));

        let mut out = UrlParams::new();
        rows.from(&mut out, Source::Params(&params), &env);
        assert_eq!(out.to_string(), "rows=25");

        let mut out = UrlParams::new();
        rows.delta(&mut out, Source::Params(&params), &env);
        assert!(out.is_empty());
    }

    #[test]
    fn from_omits_default_full_keeps_it() {
        let offset = param("offset", number(0));
        let env = env();
        let params = UrlParams::parse("offset=0");

        let mut out = UrlParams::new();
        offset.from(&mut out, Source::Params(&params), &env);
        assert!(out.is_empty());

        offset.full(&mut out, Source::Params(&UrlParams::new()), &env);
        assert_eq!(out.to_string(), "offset=0");
    }

    #[test]
    fn nullable_absent_is_null() {
        let hits = param("track_total_hits", number(10000).nullable());
        let env = env();
        assert_eq!(hits.get(&UrlParams::new(), &env), ParamValue::Null);
        assert_eq!(
            hits.get(&UrlParams::parse("track_total_hits=10000"), &env),
            ParamValue::from(10000)
        );

        let object = SearchObject::new().with("track_total_hits", 10000);
        let mut out = UrlParams::new();
        hits.set(&mut out, &object, &env);
        assert_eq!(out.to_string(), "track_total_hits=10000");
    }

    #[test]
    fn filters_keep_prefixes_and_order() {
        let field = param("filters", filters(Vec::<String>::new()));
        let env = env();
        let params = UrlParams::parse("filters=-status%3Abad&filters=type%3Agood");
        assert_eq!(
            field.get(&params, &env),
            ParamValue::from(vec!["-status:bad", "type:good"])
        );
        assert!(field.has(&params, Some("status:bad"), &env));
        assert!(field.has(&params, Some("-status:bad"), &env));
        assert!(!field.has(&params, Some("status:good"), &env));
    }

    #[test]
    fn filters_drop_empty_entries() {
        let field = param("filters", filters(Vec::<String>::new()));
        let params = UrlParams::parse("filters=&filters=-&filters=a");
        assert_eq!(field.get(&params, &env()), ParamValue::from(vec!["a"]));
    }

    #[test]
    fn filters_delta_drops_ignored_entries() {
        let field = param("filters", filters(Vec::<String>::new()));
        let env = env();
        let params = UrlParams::parse("filters=~owner%3Ame&filters=a");
        let mut out = UrlParams::new();
        field.delta(&mut out, Source::Params(&params), &env);
        assert_eq!(out.to_string(), "filters=a");
    }

    #[test]
    fn empty_filters_differ_from_non_empty_default() {
        let field = param("filters", filters(["status:open"]));
        let env = env();
        let object = SearchObject::new().with("filters", Vec::<String>::new());
        let mut out = UrlParams::new();
        field.set(&mut out, &object, &env);
        assert_eq!(out.to_string(), "filters=");
        assert_eq!(field.get(&out, &env), ParamValue::Filters(Vec::new()));
    }

    #[test]
    fn object_type_mismatch_uses_default() {
        let rows = param("rows", number(25));
        let env = env();
        let object = SearchObject::new().with("rows", "many");
        let mut out = UrlParams::new();
        rows.full(&mut out, Source::Object(&object), &env);
        assert_eq!(out.to_string(), "rows=25");
    }

    #[test]
    fn merge_takes_selected_source() {
        let a = param("a", string(""));
        let env = env();
        let left = UrlParams::parse("a=1");
        let right = UrlParams::parse("a=2");
        let mut out = UrlParams::new();
        a.merge(
            &mut out,
            Source::Params(&left),
            Source::Params(&right),
            &mut |_, _| MergeDecision::Right,
            &env,
        );
        assert_eq!(out.to_string(), "a=2");

        let mut out = UrlParams::new();
        a.merge(
            &mut out,
            Source::Params(&left),
            Source::Params(&right),
            &mut |_, _| MergeDecision::Drop,
            &env,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn parse_is_single_value() {
        let field = param("filters", filters(Vec::<String>::new()));
        assert_eq!(field.parse("-a"), ParamValue::from(vec!["-a"]));
        let rows = param("rows", number(25));
        assert_eq!(rows.parse("x"), ParamValue::from(25));
    }
}
