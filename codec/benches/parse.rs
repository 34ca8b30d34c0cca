use std::hint::black_box;

use codec::{ParserOptions, Prefixes, SearchParser, UrlParams};
use criterion::{criterion_group, criterion_main, Criterion};
use schema::{boolean, create_search_params, filters, number, string};

const QUERY: &str = "query=howler.id%3A*&offset=50&rows=100&sort=times.submitted+desc\
&filters=-status%3AMALICIOUS&filters=type%3Aexecutable&filters=~owner%3Aadmin\
&track_total_hits=10000&refresh=true&colour=red";

fn parser() -> SearchParser {
    let schema = create_search_params(|p| {
        p.field("query", string(""))
            .field("offset", number(0).min(0))
            .field("rows", number(25).min(0).enforced())
            .field("sort", string("").ignored())
            .field("filters", filters(Vec::<String>::new()))
            .field("track_total_hits", number(10000).nullable().ignored())
            .field("refresh", boolean(false).hidden().ignored())
    })
    .unwrap();
    SearchParser::new(schema, ParserOptions::new().prefixes(Prefixes::new("-", "~"))).unwrap()
}

fn bench_parse(c: &mut Criterion) {
    let parser = parser();
    let params = UrlParams::parse(QUERY);
    let hidden = UrlParams::parse("refresh=true&sort=name");

    c.bench_function("url_params_parse", |b| {
        b.iter(|| UrlParams::parse(black_box(QUERY)))
    });
    c.bench_function("from_params", |b| {
        b.iter(|| parser.from_params(black_box(&params)))
    });
    c.bench_function("to_object", |b| {
        let result = parser.from_params(&params);
        b.iter(|| black_box(&result).to_object())
    });
    c.bench_function("delta_params", |b| {
        b.iter(|| parser.delta_params(black_box(&params)).to_string())
    });
    c.bench_function("merge_params", |b| {
        b.iter(|| {
            parser.merge_params(black_box(&params), black_box(&hidden), |key, _| {
                !parser.is_hidden(key)
            })
        })
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
