//! Per-field validation rules.
//!
//! A [`Rule`] runs after a value has been parsed into its canonical form and
//! decides whether the comparison survives. Rules are attached by the caller:
//!
//! ```
//! use mik_filter::{DataType, FieldSpec, rules};
//!
//! let age = FieldSpec::new("age", DataType::int(32)).rule(rules::range(0, 150));
//! assert_eq!(age.rules.len(), 1);
//! ```

use crate::Value;
use std::fmt;
use std::sync::Arc;

/// A predicate over an already parsed value.
pub trait Rule: Send + Sync + fmt::Debug {
    /// `true` if the value is acceptable.
    fn validate(&self, value: &Value) -> bool;
}

/// A named closure rule.
pub struct RuleFn<F> {
    name: &'static str,
    f: F,
}

impl<F> fmt::Debug for RuleFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleFn").field("name", &self.name).finish()
    }
}

impl<F> Rule for RuleFn<F>
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn validate(&self, value: &Value) -> bool {
        (self.f)(value)
    }
}

/// Wrap a closure as a shared [`Rule`].
///
/// ```
/// use mik_filter::{Rule, Value, rule_fn};
///
/// let even = rule_fn("even", |v| matches!(v, Value::Int(n) if n % 2 == 0));
/// assert!(even.validate(&Value::Int(4)));
/// assert!(!even.validate(&Value::Int(3)));
/// ```
pub fn rule_fn<F>(name: &'static str, f: F) -> Arc<dyn Rule>
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Arc::new(RuleFn { name, f })
}

/// Ready-made rules.
///
/// Null values pass every rule here: nullability is decided by the field's
/// [`DataType`](crate::DataType), not by its rules.
pub mod rules {
    use super::{Arc, Rule, Value, rule_fn};

    /// Numeric value within `min..=max`. Non-numeric values fail.
    pub fn range(min: impl Into<f64>, max: impl Into<f64>) -> Arc<dyn Rule> {
        let (min, max) = (min.into(), max.into());
        rule_fn("range", move |v| {
            v.is_null() || v.as_f64().is_some_and(|n| n >= min && n <= max)
        })
    }

    /// Numeric value of at least `min`.
    pub fn min(min: impl Into<f64>) -> Arc<dyn Rule> {
        let min = min.into();
        rule_fn("min", move |v| v.is_null() || v.as_f64().is_some_and(|n| n >= min))
    }

    /// Numeric value of at most `max`.
    pub fn max(max: impl Into<f64>) -> Arc<dyn Rule> {
        let max = max.into();
        rule_fn("max", move |v| v.is_null() || v.as_f64().is_some_and(|n| n <= max))
    }

    /// String of at most `len` characters. Non-strings pass.
    pub fn max_len(len: usize) -> Arc<dyn Rule> {
        rule_fn("max_len", move |v| {
            v.as_str().is_none_or(|s| s.chars().count() <= len)
        })
    }

    /// Non-empty string. Non-strings pass.
    pub fn not_empty() -> Arc<dyn Rule> {
        rule_fn("not_empty", |v| v.as_str().is_none_or(|s| !s.is_empty()))
    }

    /// Value equal to one of `allowed`.
    pub fn one_of<I, V>(allowed: I) -> Arc<dyn Rule>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let allowed: Vec<Value> = allowed.into_iter().map(Into::into).collect();
        rule_fn("one_of", move |v| v.is_null() || allowed.contains(v))
    }
}
