//! Inspection and debugging tools for searchsync.
//!
//! This crate provides utilities for understanding what a schema does to a
//! query string:
//!
//! - Summarize a schema's fields, modifiers and hash
//! - Decode a query into its canonical, delta and typed forms
//! - Split a query into its visible and hidden parts
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see why a field was reset.

use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use codec::{CodecResult, ParserOptions, SearchObject, SearchParser};
use schema::{FieldKind, Schema};
use serde::Serialize;

/// One field of an [`InspectReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldReport {
    pub name: String,
    pub kind: &'static str,
    pub default: String,
    pub modifiers: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,
}

/// Schema summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub schema_hash: String,
    pub fields: Vec<FieldReport>,
}

/// Everything a parser derives from one query string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodeReport {
    pub canonical: String,
    pub delta: String,
    pub visible: String,
    pub hidden: String,
    pub object: SearchObject,
    pub diagnostics: Vec<String>,
}

/// Output form for [`normalize_query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryForm {
    /// Defaults dropped, enforced fields written.
    Canonical,
    /// Every field written.
    Full,
    /// Shareable link form.
    Delta,
}

pub fn inspect_schema(schema: &Schema) -> InspectReport {
    let fields = schema
        .fields
        .iter()
        .map(|field| {
            let def = &field.def;
            let default = match &def.kind {
                FieldKind::String { default } | FieldKind::Opaque { default } => {
                    format!("{default:?}")
                }
                FieldKind::Number { default } => default.to_string(),
                FieldKind::Boolean { default } => default.to_string(),
                FieldKind::Filters { default } => format!("{default:?}"),
            };
            let flags = [
                (def.modifiers.enforced, "enforced"),
                (def.modifiers.hidden, "hidden"),
                (def.modifiers.ignored, "ignored"),
                (def.modifiers.nullable, "nullable"),
            ];
            let mut constraints = Vec::new();
            if let Some(min) = def.min {
                constraints.push(format!("min={min}"));
            }
            if let Some(max) = def.max {
                constraints.push(format!("max={max}"));
            }
            if let Some(options) = &def.options {
                constraints.push(format!("options={}", options.join("|")));
            }
            FieldReport {
                name: field.name.clone(),
                kind: def.kind.name(),
                default,
                modifiers: flags
                    .into_iter()
                    .filter_map(|(set, name)| set.then_some(name))
                    .collect(),
                constraints: (!constraints.is_empty()).then(|| constraints.join(" ")),
            }
        })
        .collect();
    InspectReport {
        schema_hash: format!("0x{:016x}", schema::schema_hash(schema)),
        fields,
    }
}

pub fn format_inspect_pretty(report: &InspectReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "schema_hash: {}", report.schema_hash);
    let _ = writeln!(out, "fields:");
    for field in &report.fields {
        let _ = write!(
            out,
            "  {}: {} (default {})",
            field.name, field.kind, field.default
        );
        if !field.modifiers.is_empty() {
            let _ = write!(out, " [{}]", field.modifiers.join(", "));
        }
        if let Some(constraints) = &field.constraints {
            let _ = write!(out, " {constraints}");
        }
        out.push('\n');
    }
    out
}

/// Decodes `query`, collecting every fallback taken along the way.
pub fn decode_query(schema: Schema, options: ParserOptions, query: &str) -> CodecResult<DecodeReport> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let parser = SearchParser::new(
        schema,
        options.on_diagnostic(move |diagnostic| {
            if let Ok(mut seen) = sink.lock() {
                seen.push(diagnostic.to_string());
            }
        }),
    )?;

    let result = parser.from_query(query);
    let delta = parser.delta_params(result.params());
    let (visible, _) = delta.to_split_params(|key, _| !parser.is_hidden(key));
    let (hidden, _) =
        result.to_split_params(|key, _| parser.is_hidden(key) || parser.is_ignored(key));
    let object = result.to_object();
    let diagnostics = seen.lock().map(|seen| seen.clone()).unwrap_or_default();

    Ok(DecodeReport {
        canonical: result.to_string(),
        delta: delta.to_string(),
        visible: visible.to_string(),
        hidden: hidden.to_string(),
        object,
        diagnostics,
    })
}

pub fn format_decode_pretty(report: &DecodeReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "canonical: {}", report.canonical);
    let _ = writeln!(out, "delta:     {}", report.delta);
    let _ = writeln!(out, "visible:   {}", report.visible);
    let _ = writeln!(out, "hidden:    {}", report.hidden);
    let _ = writeln!(out, "object:");
    for (name, value) in report.object.iter() {
        let _ = writeln!(out, "  {name}: {value:?}");
    }
    if !report.diagnostics.is_empty() {
        let _ = writeln!(out, "fallbacks:");
        for diagnostic in &report.diagnostics {
            let _ = writeln!(out, "  {diagnostic}");
        }
    }
    out
}

/// Re-serializes `query` in the requested form.
pub fn normalize_query(parser: &SearchParser, query: &str, form: QueryForm) -> String {
    let params = query::UrlParams::parse(query);
    let result = match form {
        QueryForm::Canonical => parser.from_params(&params),
        QueryForm::Full => parser.full_params(&params),
        QueryForm::Delta => parser.delta_params(&params),
    };
    result.to_string()
}

/// Encodes a typed object, returning its canonical and delta forms.
pub fn encode_object(parser: &SearchParser, object: &SearchObject) -> (String, String) {
    (
        parser.from_object(object).to_string(),
        parser.delta_object(object).to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use demo_schema::{parser_options, DemoScreen};

    #[test]
    fn inspect_lists_fields_in_order() {
        let report = inspect_schema(&DemoScreen::Submissions.schema());
        let names: Vec<_> = report.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            ["query", "offset", "rows", "sort", "filters", "track_total_hits", "refresh"]
        );
        let rows = &report.fields[2];
        assert_eq!(rows.kind, "number");
        assert_eq!(rows.modifiers, ["enforced"]);
        assert_eq!(rows.constraints.as_deref(), Some("min=0 max=500"));
        assert!(report.schema_hash.starts_with("0x"));
    }

    #[test]
    fn inspect_pretty_mentions_modifiers() {
        let report = inspect_schema(&DemoScreen::Alerts.schema());
        let text = format_inspect_pretty(&report);
        assert!(text.contains("refresh: boolean (default false) [hidden, ignored]"));
        assert!(text.contains("options=24h|4d|7d|1m|1y|all"));
    }

    #[test]
    fn decode_reports_forms_and_fallbacks() {
        let report = decode_query(
            DemoScreen::Submissions.schema(),
            parser_options(),
            "query=x&rows=abc&refresh=true&colour=red",
        )
        .unwrap();
        assert_eq!(report.canonical, "query=x&rows=25&refresh=true");
        assert_eq!(report.delta, "query=x");
        assert_eq!(report.visible, "query=x");
        assert_eq!(report.hidden, "refresh=true");
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].contains("colour"));
    }

    #[test]
    fn decode_pretty_lists_object() {
        let report =
            decode_query(DemoScreen::Submissions.schema(), parser_options(), "offset=x").unwrap();
        let text = format_decode_pretty(&report);
        assert!(text.contains("offset: Number(0)"));
        assert!(text.contains("fallbacks:"));
    }

    #[test]
    fn normalize_forms() {
        let parser = DemoScreen::Submissions.parser();
        let query = "offset=0&query=x&sort=a";
        assert_eq!(
            normalize_query(&parser, query, QueryForm::Canonical),
            "query=x&rows=25&sort=a"
        );
        assert_eq!(normalize_query(&parser, query, QueryForm::Delta), "query=x");
        assert!(normalize_query(&parser, query, QueryForm::Full).starts_with("query=x&offset=0"));
    }

    #[test]
    fn encode_object_forms() {
        let parser = DemoScreen::Submissions.parser();
        let object: SearchObject =
            serde_json::from_str(r#"{"query": "x", "rows": 50, "track_total_hits": null}"#).unwrap();
        let (canonical, delta) = encode_object(&parser, &object);
        assert_eq!(canonical, "query=x&rows=25");
        assert_eq!(delta, "query=x");
    }

    #[test]
    fn decode_report_serializes() {
        let report =
            decode_query(DemoScreen::Submissions.schema(), parser_options(), "query=x").unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["object"]["query"], "x");
        assert_eq!(json["object"]["track_total_hits"], serde_json::Value::Null);
        assert_eq!(json["object"]["rows"], 25);
    }
}
