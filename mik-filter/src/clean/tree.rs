//! Recursive filter-tree rewrite.

use super::{Cleaned, Whitelist};
use crate::{Comparison, DataType, FieldSpec, FilterExpr, Operator, Value, ValueError};
use thiserror::Error;

/// Why a comparison was dropped. Only ever logged.
#[derive(Error, Debug)]
enum Rejection {
    #[error("field is not whitelisted")]
    UnknownField,
    #[error("operator not allowed for {0}")]
    Operator(DataType),
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error("rule {0} failed")]
    Rule(String),
}

/// Nesting deeper than the whitelist allows. Fails the whole filter.
#[derive(Error, Debug)]
#[error("filter nested deeper than {max} levels")]
pub(super) struct TooDeep {
    pub(super) max: usize,
}

pub(super) fn clean_node(
    whitelist: &Whitelist,
    expr: &FilterExpr,
    depth: usize,
) -> Result<Cleaned, TooDeep> {
    if depth > whitelist.max_depth() {
        return Err(TooDeep {
            max: whitelist.max_depth(),
        });
    }
    let depth = depth + 1;

    Ok(match expr {
        FilterExpr::Comparison(c) => clean_comparison(whitelist, c),
        FilterExpr::Not(inner) => match clean_node(whitelist, inner, depth)? {
            Cleaned::NoConstraint => Cleaned::AlwaysExclude,
            Cleaned::AlwaysExclude => Cleaned::NoConstraint,
            Cleaned::Tree(t) => Cleaned::Tree(FilterExpr::Not(Box::new(t))),
        },
        FilterExpr::And(left, right) => {
            let left = match clean_node(whitelist, left, depth)? {
                Cleaned::AlwaysExclude => return Ok(Cleaned::AlwaysExclude),
                other => other,
            };
            match (left, clean_node(whitelist, right, depth)?) {
                (_, Cleaned::AlwaysExclude) => Cleaned::AlwaysExclude,
                (Cleaned::NoConstraint, right) => right,
                (left, Cleaned::NoConstraint) => left,
                (Cleaned::Tree(l), Cleaned::Tree(r)) => {
                    Cleaned::Tree(FilterExpr::And(Box::new(l), Box::new(r)))
                },
                // Left AlwaysExclude returned above
                (Cleaned::AlwaysExclude, _) => Cleaned::AlwaysExclude,
            }
        },
        FilterExpr::Or(left, right) => {
            let left = match clean_node(whitelist, left, depth)? {
                Cleaned::NoConstraint => return Ok(Cleaned::NoConstraint),
                other => other,
            };
            match (left, clean_node(whitelist, right, depth)?) {
                (_, Cleaned::NoConstraint) => Cleaned::NoConstraint,
                (Cleaned::AlwaysExclude, right) => right,
                (left, Cleaned::AlwaysExclude) => left,
                (Cleaned::Tree(l), Cleaned::Tree(r)) => {
                    Cleaned::Tree(FilterExpr::Or(Box::new(l), Box::new(r)))
                },
                (Cleaned::NoConstraint, _) => Cleaned::NoConstraint,
            }
        },
    })
}

fn clean_comparison(whitelist: &Whitelist, c: &Comparison) -> Cleaned {
    match check(whitelist, c) {
        Ok(value) => Cleaned::Tree(FilterExpr::Comparison(Comparison {
            field: c.field.clone(),
            op: c.op,
            value,
        })),
        Err(reason) => {
            tracing::debug!(
                field = %c.field,
                op = c.op.name(),
                %reason,
                "filter comparison rejected"
            );
            Cleaned::AlwaysExclude
        },
    }
}

fn check(whitelist: &Whitelist, c: &Comparison) -> Result<Value, Rejection> {
    let spec = whitelist.get(&c.field).ok_or(Rejection::UnknownField)?;
    if !spec.data_type.is_operator_allowed(c.op) {
        return Err(Rejection::Operator(spec.data_type.clone()));
    }

    match (c.op, &c.value) {
        (Operator::In, Value::Array(items)) => {
            let parsed = items
                .iter()
                .map(|item| parse_and_validate(spec, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(parsed))
        },
        // Arrays under any other operator fail in DataType::parse
        (_, raw) => parse_and_validate(spec, raw),
    }
}

fn parse_and_validate(spec: &FieldSpec, raw: &Value) -> Result<Value, Rejection> {
    let value = spec.data_type.parse(raw)?;
    if let Some(rule) = spec.rules.iter().find(|rule| !rule.validate(&value)) {
        return Err(Rejection::Rule(format!("{rule:?}")));
    }
    Ok(value)
}
