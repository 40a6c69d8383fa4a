//! Benchmark – tokenization and the selective parse passes.
#![allow(missing_docs)]

use std::fmt::Write;
use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use jsontape::{Json, Options};

/// A deterministic array of mixed-shape numbers, the workload the deferred
/// parsing design is built around.
fn make_number_payload(count: usize) -> String {
    let mut out = String::with_capacity(count * 12);
    out.push('[');
    for at in 0..count {
        if at > 0 {
            out.push(',');
        }
        match at % 3 {
            0 => write!(out, "{at}").unwrap(),
            1 => write!(out, "{}.5", at).unwrap(),
            _ => write!(out, "-{}e2", at).unwrap(),
        }
    }
    out.push(']');
    out
}

/// A deterministic object with string values, every eighth one carrying an
/// escape so the unescape path gets exercised too.
fn make_object_payload(count: usize) -> String {
    let mut out = String::with_capacity(count * 24);
    out.push('{');
    for at in 0..count {
        if at > 0 {
            out.push(',');
        }
        if at % 8 == 0 {
            write!(out, "\"key{at}\":\"value\\n{at}\"").unwrap();
        } else {
            write!(out, "\"key{at}\":\"value{at}\"").unwrap();
        }
    }
    out.push('}');
    out
}

fn bench_tokenize(c: &mut Criterion) {
    let numbers = make_number_payload(10_000);
    let objects = make_object_payload(2_000);

    c.bench_function("tokenize/numbers", |b| {
        b.iter(|| Json::from_string(black_box(&numbers), Options::default()).unwrap());
    });

    c.bench_function("tokenize_parse_doubles/numbers", |b| {
        b.iter(|| {
            let mut json = Json::from_string(black_box(&numbers), Options::default()).unwrap();
            json.parse_doubles(0).unwrap();
            json
        });
    });

    c.bench_function("tokenize/objects", |b| {
        b.iter(|| Json::from_string(black_box(&objects), Options::default()).unwrap());
    });

    c.bench_function("tokenize_parse_strings/objects", |b| {
        let options = Options {
            parse_strings: true,
            ..Options::default()
        };
        b.iter(|| Json::from_string(black_box(&objects), options).unwrap());
    });

    // the pass a key lookup pays for, a fraction of the full string pass
    c.bench_function("tokenize_parse_string_keys/objects", |b| {
        let options = Options {
            parse_string_keys: true,
            ..Options::default()
        };
        b.iter(|| Json::from_string(black_box(&objects), options).unwrap());
    });
}

fn criterion() -> Criterion {
    Criterion::default()
        .warm_up_time(Duration::from_secs(2))
        .measurement_time(Duration::from_secs(5))
}

criterion_group! { name = benches; config = criterion(); targets = bench_tokenize }
criterion_main!(benches);
