#![allow(clippy::unwrap_used)]
//! JSON wire form of queries, as handed over by an external query-string parser.

use mik_filter::{
    Cleaned, DataType, FieldSpec, FilterExpr, Operator, Query, SortDir, SortField, Value,
    Whitelist, and, cmp, not,
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

fn whitelist() -> Whitelist {
    Whitelist::new([
        FieldSpec::new("age", DataType::uint(8)),
        FieldSpec::new("name", DataType::String),
        FieldSpec::new("created", DataType::timestamp()),
        FieldSpec::new("delta", DataType::int(32)),
        FieldSpec::new("score", DataType::float(64)),
    ])
}

fn clean_json(value: serde_json::Value) -> Cleaned {
    let expr: FilterExpr = serde_json::from_value(value).unwrap();
    whitelist().clean(&expr)
}

#[test]
fn test_deserialize_tree() {
    let expr: FilterExpr = serde_json::from_value(json!({
        "and": [
            { "comparison": { "field": "age", "op": "gte", "value": "18" } },
            { "not": { "comparison": { "field": "name", "op": "ilike", "value": "%bot%" } } }
        ]
    }))
    .unwrap();

    assert_eq!(
        expr,
        and(
            cmp("age", Operator::Gte, "18"),
            not(cmp("name", Operator::ILike, "%bot%")),
        )
    );
}

#[test]
fn test_value_forms() {
    let values: Vec<Value> =
        serde_json::from_value(json!([null, true, -3, 18_446_744_073_709_551_615_u64, 1.5, "x", [1, "2"]]))
            .unwrap();
    assert_eq!(
        values,
        [
            Value::Null,
            Value::Bool(true),
            Value::Int(-3),
            Value::Uint(u64::MAX),
            Value::Float(1.5),
            Value::String("x".into()),
            Value::Array(vec![Value::Int(1), Value::String("2".into())]),
        ]
    );
}

#[test]
fn test_numeric_operands_on_unsigned_field() {
    assert_eq!(
        clean_json(json!({ "comparison": { "field": "age", "op": "eq", "value": 18 } })),
        Cleaned::Tree(cmp("age", Operator::Eq, 18_u64))
    );
    assert_eq!(
        clean_json(json!({ "comparison": { "field": "age", "op": "in", "value": [1, "2"] } })),
        Cleaned::Tree(cmp("age", Operator::In, vec![1_u64, 2]))
    );
    assert!(
        clean_json(json!({ "comparison": { "field": "age", "op": "eq", "value": -1 } }))
            .is_always_exclude()
    );
    assert!(
        clean_json(json!({ "comparison": { "field": "age", "op": "eq", "value": 1.5 } }))
            .is_always_exclude()
    );
}

#[test]
fn test_numeric_operands_on_signed_field() {
    assert_eq!(
        clean_json(json!({ "comparison": { "field": "delta", "op": "lt", "value": -3 } })),
        Cleaned::Tree(cmp("delta", Operator::Lt, -3))
    );
    assert!(
        clean_json(json!({ "comparison": { "field": "delta", "op": "lt", "value": 0.5 } }))
            .is_always_exclude()
    );
}

#[test]
fn test_numeric_operands_on_float_field() {
    assert_eq!(
        clean_json(json!({ "comparison": { "field": "score", "op": "gt", "value": 2 } })),
        Cleaned::Tree(cmp("score", Operator::Gt, 2.0))
    );
    assert_eq!(
        clean_json(json!({ "comparison": { "field": "score", "op": "gt", "value": 2.5 } })),
        Cleaned::Tree(cmp("score", Operator::Gt, 2.5))
    );
    assert_eq!(
        clean_json(json!({ "comparison": { "field": "score", "op": "lte", "value": u64::MAX } })),
        Cleaned::Tree(cmp("score", Operator::Lte, 2_f64.powi(64)))
    );
}

#[test]
fn test_numeric_operand_on_string_field() {
    assert!(
        clean_json(json!({ "comparison": { "field": "name", "op": "eq", "value": 5 } }))
            .is_always_exclude()
    );
}

#[test]
fn test_operator_wire_names() {
    for op in Operator::ALL {
        let encoded = serde_json::to_value(op).unwrap();
        assert_eq!(encoded, json!(op.name()), "{op:?}");
    }
}

#[test]
fn test_clean_query_from_json() {
    let query: Query = serde_json::from_value(json!({
        "filter": {
            "or": [
                { "comparison": { "field": "secret", "op": "eq", "value": "1" } },
                { "comparison": { "field": "created", "op": "lt", "value": "2024-06-01T00:00:00Z" } }
            ]
        },
        "orders": [
            { "field": "created", "dir": "desc" },
            { "field": "secret" },
            { "field": "age" }
        ]
    }))
    .unwrap();

    let cleaned = whitelist().clean_query(&query);
    assert_eq!(
        cleaned.orders,
        [
            SortField::new("created", SortDir::Desc),
            SortField::new("age", SortDir::Asc),
        ]
    );

    // Cleaned timestamps serialize back as RFC 3339 text
    let Cleaned::Tree(tree) = cleaned.filter else {
        panic!("expected a tree");
    };
    let encoded = serde_json::to_value(&tree).unwrap();
    let comparison = &encoded["comparison"];
    assert_eq!(comparison["field"], "created");
    assert_eq!(comparison["op"], "lt");
    let instant = DateTime::parse_from_rfc3339(comparison["value"].as_str().unwrap()).unwrap();
    assert_eq!(instant, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
}

#[test]
fn test_missing_filter_is_no_constraint() {
    let query: Query = serde_json::from_value(json!({})).unwrap();
    let cleaned = whitelist().clean_query(&query);
    assert!(cleaned.filter.is_no_constraint());
    assert!(cleaned.orders.is_empty());
}
