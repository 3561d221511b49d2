//! Validation benchmarks
//!
//! Measures rule-spec parsing, single rules, and full validation runs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fieldcheck::spec::parse;
use fieldcheck::{Record, RuleRegistry, RuleSpec, Validator};
use serde_json::json;
use std::sync::Arc;

fn signup_data() -> Record {
    serde_json::from_value(json!({
        "username": "  johndoe  ",
        "email": "john@example.com",
        "password": "secret123",
        "password_confirmation": "secret123",
        "age": "25",
        "role": "editor",
        "website": "https://example.com",
        "birth_date": "1999-05-15"
    }))
    .unwrap()
}

const SIGNUP_RULES: [(&str, &str); 8] = [
    ("username", "required|alpha_num|min:5|max:20"),
    ("email", "required|email"),
    ("password", "required|string|min:8"),
    ("password_confirmation", "required|same:password"),
    ("age", "required|int|between:18,99"),
    ("role", "in:admin,editor,viewer"),
    ("website", "url"),
    ("birth_date", "date"),
];

/// Benchmark parsing of rule specs
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    let short = RuleSpec::from("required|email");
    group.bench_function("two_rules", |b| b.iter(|| parse(black_box(&short))));

    let long = RuleSpec::from("bail|required|string|alpha_num|min:5|max:20|not_in:admin,root");
    group.bench_function("seven_rules", |b| b.iter(|| parse(black_box(&long))));

    group.finish();
}

/// Benchmark individual rules through a one-field run
fn bench_single_rule(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_rule");
    let registry = Arc::new(RuleRegistry::default());

    for (rule, value) in [
        ("int", json!("12345")),
        ("email", json!("someone@example.org")),
        ("url", json!("https://example.org/path?q=1")),
        ("date", json!("2024-02-29 13:45:00")),
        ("regex:/^[A-Z]{3}-\\d{4}$/", json!("ABC-1234")),
        ("in:red,green,blue", json!("blue")),
    ] {
        let mut data = Record::new();
        data.insert("field".to_string(), value);
        let mut validator = Validator::with_registry(Arc::clone(&registry));
        validator.set_data(data).set_rules([("field", rule)]);

        group.bench_with_input(BenchmarkId::from_parameter(rule), &rule, |b, _| {
            b.iter(|| black_box(validator.validate()))
        });
    }

    group.finish();
}

/// Benchmark full validation runs
fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    let registry = Arc::new(RuleRegistry::default());

    group.bench_function("signup_passing", |b| {
        let mut validator = Validator::with_registry(Arc::clone(&registry));
        validator.set_data(signup_data()).set_rules(SIGNUP_RULES);
        b.iter(|| black_box(validator.validate()))
    });

    group.bench_function("signup_failing", |b| {
        let mut data = signup_data();
        data.insert("email".to_string(), json!("not-an-email"));
        data.insert("age".to_string(), json!("12"));
        let mut validator = Validator::with_registry(Arc::clone(&registry));
        validator.set_data(data).set_rules(SIGNUP_RULES);
        b.iter(|| black_box(validator.validate()))
    });

    group.bench_function("set_data_and_validate", |b| {
        let data = signup_data();
        let mut validator = Validator::with_registry(Arc::clone(&registry));
        validator.set_rules(SIGNUP_RULES);
        b.iter(|| {
            validator.set_data(black_box(data.clone()));
            validator.validate()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_single_rule, bench_validate);

criterion_main!(benches);
