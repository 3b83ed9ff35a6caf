//! Core types: operators, values, filter trees and sort fields.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operators.
///
/// This is the fixed vocabulary produced by query-string parsers. Which of
/// these are legal for a field is decided by its [`DataType`](crate::DataType).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    /// Equal: `=`
    Eq,
    /// Not equal: `!=`
    Ne,
    /// Greater than: `>`
    Gt,
    /// Greater than or equal: `>=`
    Gte,
    /// Less than: `<`
    Lt,
    /// Less than or equal: `<=`
    Lte,
    /// In set
    In,
    /// Not in set
    #[serde(rename = "nin")]
    NotIn,
    /// Regex match
    Regex,
    /// Pattern match: `LIKE`
    Like,
    /// Case-insensitive pattern match: `ILIKE`
    #[serde(rename = "ilike")]
    ILike,
    /// String starts with
    StartsWith,
    /// String ends with
    EndsWith,
    /// String contains
    Contains,
    /// Between two values
    Between,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::In,
        Self::NotIn,
        Self::Regex,
        Self::Like,
        Self::ILike,
        Self::StartsWith,
        Self::EndsWith,
        Self::Contains,
        Self::Between,
    ];

    /// Parse from the wire name (e.g., "eq", "$gte").
    ///
    /// Accepts both with and without the `$` prefix.
    ///
    /// ```
    /// use mik_filter::Operator;
    ///
    /// assert_eq!(Operator::from_name("$eq"), Some(Operator::Eq));
    /// assert_eq!(Operator::from_name("gte"), Some(Operator::Gte));
    /// assert_eq!(Operator::from_name("$unknown"), None);
    /// ```
    #[must_use]
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.strip_prefix('$').unwrap_or(s);

        match s {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "in" => Some(Self::In),
            "nin" => Some(Self::NotIn),
            "regex" => Some(Self::Regex),
            "like" => Some(Self::Like),
            "ilike" => Some(Self::ILike),
            "startsWith" | "starts_with" => Some(Self::StartsWith),
            "endsWith" | "ends_with" => Some(Self::EndsWith),
            "contains" => Some(Self::Contains),
            "between" => Some(Self::Between),
            _ => None,
        }
    }

    /// The wire name, without `$` prefix.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::In => "in",
            Self::NotIn => "nin",
            Self::Regex => "regex",
            Self::Like => "like",
            Self::ILike => "ilike",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Contains => "contains",
            Self::Between => "between",
        }
    }

    const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Regex => "~",
            Self::Like => "LIKE",
            Self::ILike => "ILIKE",
            Self::StartsWith => "STARTS WITH",
            Self::EndsWith => "ENDS WITH",
            Self::Contains => "CONTAINS",
            Self::Between => "BETWEEN",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Filter values, raw (as received) or canonical (after cleaning).
///
/// `Array` only appears as the operand of [`Operator::In`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer, any width.
    Int(i64),
    /// Unsigned integer, any width.
    Uint(u64),
    /// Floating point value.
    Float(f64),
    /// Text, raw or canonical.
    String(String),
    /// Parsed instant.
    Timestamp(DateTime<FixedOffset>),
    /// Operand list of [`Operator::In`].
    Array(Vec<Value>),
}

impl Value {
    /// Short name of the variant, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Uint(_) => "unsigned integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Timestamp(_) => "timestamp",
            Self::Array(_) => "array",
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The string slice, if this is a `String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of `Int`, `Uint` and `Float` values.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Uint(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Timestamp(t) => f.write_str(&t.to_rfc3339()),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            },
        }
    }
}

macro_rules! value_from {
    ($variant:ident <= $($t:ty),+) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::$variant(v.into())
                }
            }
        )+
    };
}

value_from!(Int <= i8, i16, i32, i64);
value_from!(Uint <= u8, u16, u32, u64);
value_from!(Float <= f32, f64);
value_from!(Bool <= bool);
value_from!(String <= &str, String);
value_from!(Timestamp <= DateTime<FixedOffset>);

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        // isize is at most 64 bits on every supported target
        Self::Int(v as i64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Self::Uint(v as u64)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v.fixed_offset())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

/// A single field comparison: `field op value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Field name as sent by the client.
    pub field: String,
    /// Comparison operator.
    pub op: Operator,
    /// Operand, raw before cleaning and canonical after.
    pub value: Value,
}

impl Comparison {
    /// Create a new comparison.
    pub fn new(field: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

/// A boolean filter tree.
///
/// Trees are produced by an external parser and owned by the caller.
/// Cleaning borrows a tree and builds a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterExpr {
    /// Both sides must match.
    And(Box<FilterExpr>, Box<FilterExpr>),
    /// At least one side must match.
    Or(Box<FilterExpr>, Box<FilterExpr>),
    /// The inner expression must not match.
    Not(Box<FilterExpr>),
    /// A field comparison leaf.
    Comparison(Comparison),
}

impl FilterExpr {
    /// Number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Self::And(l, r) | Self::Or(l, r) => 1 + l.node_count() + r.node_count(),
            Self::Not(inner) => 1 + inner.node_count(),
            Self::Comparison(_) => 1,
        }
    }

    /// Visit every comparison leaf, left to right.
    pub fn for_each_comparison<'a>(&'a self, f: &mut impl FnMut(&'a Comparison)) {
        match self {
            Self::And(l, r) | Self::Or(l, r) => {
                l.for_each_comparison(f);
                r.for_each_comparison(f);
            },
            Self::Not(inner) => inner.for_each_comparison(f),
            Self::Comparison(c) => f(c),
        }
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(l, r) => write!(f, "({l} AND {r})"),
            Self::Or(l, r) => write!(f, "({l} OR {r})"),
            Self::Not(inner) => write!(f, "NOT {inner}"),
            Self::Comparison(c) => write!(f, "{} {} {}", c.field, c.op, c.value),
        }
    }
}

impl From<Comparison> for FilterExpr {
    fn from(c: Comparison) -> Self {
        Self::Comparison(c)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

/// Sort field with direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// Field name to sort by.
    pub field: String,
    /// Sort direction.
    #[serde(default)]
    pub dir: SortDir,
}

impl SortField {
    /// Create a new sort field.
    pub fn new(field: impl Into<String>, dir: SortDir) -> Self {
        Self {
            field: field.into(),
            dir,
        }
    }

    /// Ascending sort on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDir::Asc)
    }

    /// Descending sort on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDir::Desc)
    }
}

/// Parsed query data for one request: an optional filter plus an ordering.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Query {
    /// Filter tree, absent when the request has none.
    #[serde(default)]
    pub filter: Option<FilterExpr>,
    /// Requested ordering.
    #[serde(default)]
    pub orders: Vec<SortField>,
}

impl Query {
    /// Create query data from a filter and orders.
    #[must_use]
    pub const fn new(filter: Option<FilterExpr>, orders: Vec<SortField>) -> Self {
        Self { filter, orders }
    }
}

/// Helper function to create a comparison leaf.
pub fn cmp(field: impl Into<String>, op: Operator, value: impl Into<Value>) -> FilterExpr {
    FilterExpr::Comparison(Comparison::new(field, op, value))
}

/// Helper function to create an AND node.
#[must_use]
pub fn and(left: FilterExpr, right: FilterExpr) -> FilterExpr {
    FilterExpr::And(Box::new(left), Box::new(right))
}

/// Helper function to create an OR node.
#[must_use]
pub fn or(left: FilterExpr, right: FilterExpr) -> FilterExpr {
    FilterExpr::Or(Box::new(left), Box::new(right))
}

/// Helper function to create a NOT node.
#[must_use]
pub fn not(inner: FilterExpr) -> FilterExpr {
    FilterExpr::Not(Box::new(inner))
}

/// Fold expressions into a left-leaning AND chain.
///
/// Returns `None` for an empty input. `n` expressions nest `n - 1` levels
/// deep, which counts against [`Whitelist::max_depth`].
///
/// [`Whitelist::max_depth`]: crate::Whitelist::max_depth
pub fn all(exprs: impl IntoIterator<Item = FilterExpr>) -> Option<FilterExpr> {
    exprs.into_iter().reduce(and)
}

/// Fold expressions into a left-leaning OR chain.
///
/// Returns `None` for an empty input. `n` expressions nest `n - 1` levels
/// deep, which counts against [`Whitelist::max_depth`].
///
/// [`Whitelist::max_depth`]: crate::Whitelist::max_depth
pub fn any(exprs: impl IntoIterator<Item = FilterExpr>) -> Option<FilterExpr> {
    exprs.into_iter().reduce(or)
}
