#![allow(clippy::unwrap_used)]
//! Property tests for the filter cleaner.
//!
//! Trees are generated over a mix of whitelisted and unknown fields, every
//! operator, and raw or already typed values that may or may not parse.

use chrono::{DateTime, FixedOffset};
use mik_filter::{
    Cleaned, DataType, FieldSpec, FilterExpr, Operator, TimeFormat, Value, Whitelist, and, cmp,
    not, or, rules,
};
use proptest::prelude::*;

const UNKNOWN: &str = "password";

fn whitelist() -> Whitelist {
    Whitelist::new([
        FieldSpec::new("age", DataType::int(8)).rule(rules::range(-100, 100)),
        FieldSpec::new("name", DataType::String).rule(rules::max_len(5)),
        FieldSpec::new("active", DataType::Bool),
        FieldSpec::new("nick", DataType::optional(DataType::int(32))),
        FieldSpec::new("score", DataType::float(32)),
        FieldSpec::new("id", DataType::uint(16)),
        FieldSpec::new("at", DataType::timestamp()),
        FieldSpec::new(
            "day",
            DataType::Timestamp(TimeFormat::rfc3339().output("%Y-%m-%d")),
        ),
    ])
}

fn field() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "age", "name", "active", "nick", "score", "id", "at", "day", "secret", UNKNOWN,
    ])
    .prop_map(String::from)
}

fn operator() -> impl Strategy<Value = Operator> {
    prop::sample::select(Operator::ALL.to_vec())
}

fn timestamp() -> impl Strategy<Value = DateTime<FixedOffset>> {
    (0_i64..4_000_000_000, -12_i32..=12).prop_map(|(secs, hours)| {
        let offset = FixedOffset::east_opt(hours * 3600).unwrap();
        DateTime::from_timestamp(secs, 0).unwrap().with_timezone(&offset)
    })
}

fn raw_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-300_i64..300).prop_map(|n| Value::String(n.to_string())),
        prop::sample::select(vec!["yes", "No", "nil", "null", "abc", "", "1.5", "1e40"])
            .prop_map(Value::from),
        any::<i64>().prop_map(Value::Int),
        any::<u64>().prop_map(Value::Uint),
        (-1e6_f64..1e6).prop_map(Value::Float),
        timestamp().prop_map(Value::Timestamp),
        prop_oneof![
            timestamp().prop_map(|t| Value::String(t.to_rfc3339())),
            prop::sample::select(vec!["2024-05-01", "2024-13-01", "24-05-01"])
                .prop_map(Value::from),
        ],
        any::<bool>().prop_map(Value::Bool),
        Just(Value::Null),
        prop::collection::vec((-5_i64..5).prop_map(|n| Value::String(n.to_string())), 0..3)
            .prop_map(Value::Array),
    ]
}

fn leaf() -> impl Strategy<Value = FilterExpr> {
    (field(), operator(), raw_value()).prop_map(|(f, op, v)| cmp(f, op, v))
}

fn expr() -> impl Strategy<Value = FilterExpr> {
    leaf().prop_recursive(5, 48, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| and(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| or(l, r)),
            inner.prop_map(not),
        ]
    })
}

proptest! {
    #[test]
    fn only_whitelisted_comparisons_survive(e in expr()) {
        let w = whitelist();
        if let Cleaned::Tree(tree) = w.clean(&e) {
            tree.for_each_comparison(&mut |c| {
                let spec = w.get(&c.field).unwrap();
                assert!(spec.data_type.is_operator_allowed(c.op), "{c:?}");
                assert!(spec.rules.iter().all(|r| match &c.value {
                    Value::Array(items) => items.iter().all(|v| r.validate(v)),
                    v => r.validate(v),
                }));
            });
        }
    }

    #[test]
    fn double_negation(e in expr()) {
        let w = whitelist();
        let expected = match w.clean(&e) {
            Cleaned::Tree(t) => Cleaned::Tree(not(not(t))),
            constant => constant,
        };
        prop_assert_eq!(w.clean(&not(not(e))), expected);
    }

    #[test]
    fn idempotent(e in expr()) {
        let w = whitelist();
        let once = w.clean(&e);
        if let Some(tree) = once.as_tree() {
            prop_assert_eq!(w.clean(tree), once.clone());
        }
    }

    #[test]
    fn and_with_rejected_side_excludes(e in expr()) {
        let w = whitelist();
        let rejected = cmp(UNKNOWN, Operator::Eq, "x");
        prop_assert_eq!(w.clean(&and(e.clone(), rejected.clone())), Cleaned::AlwaysExclude);
        prop_assert_eq!(w.clean(&and(rejected, e)), Cleaned::AlwaysExclude);
    }

    #[test]
    fn or_with_rejected_side_is_other_side(e in expr()) {
        let w = whitelist();
        let rejected = cmp(UNKNOWN, Operator::Eq, "x");
        prop_assert_eq!(w.clean(&or(rejected.clone(), e.clone())), w.clean(&e));
        prop_assert_eq!(w.clean(&or(e.clone(), rejected)), w.clean(&e));
    }

    #[test]
    fn never_grows(e in expr()) {
        if let Cleaned::Tree(tree) = whitelist().clean(&e) {
            prop_assert!(tree.node_count() <= e.node_count());
        }
    }

    #[test]
    fn input_untouched(e in expr()) {
        let before = e.clone();
        let _ = whitelist().clean(&e);
        prop_assert_eq!(e, before);
    }
}
