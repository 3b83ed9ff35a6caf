//! Whitelist-driven filter cleaning.
//!
//! A [`Whitelist`] is built once per schema and shared. Each request's
//! filter tree and order list are passed through it:
//!
//! ```
//! use mik_filter::{Cleaned, DataType, FieldSpec, Operator, Whitelist, and, cmp};
//!
//! let whitelist = Whitelist::new([
//!     FieldSpec::new("age", DataType::int(32)),
//!     FieldSpec::new("name", DataType::String),
//! ]);
//!
//! // Unknown fields never survive
//! let filter = and(
//!     cmp("age", Operator::Gte, "18"),
//!     cmp("password", Operator::Eq, "hunter2"),
//! );
//! assert_eq!(whitelist.clean(&filter), Cleaned::AlwaysExclude);
//!
//! // Values come out in canonical form
//! let filter = cmp("age", Operator::Gte, "18");
//! assert_eq!(whitelist.clean(&filter), Cleaned::Tree(cmp("age", Operator::Gte, 18)));
//! ```
//!
//! Rejections never surface as errors. They collapse the enclosing
//! expression and are logged at `debug` level.

mod orders;
mod tree;

use crate::{
    FieldSpec, FilterExpr, Filterable, Query, Rule, SchemaConfig, SchemaError, SortField,
    field_specs,
};
use std::collections::HashMap;
use std::sync::Arc;

/// The outcome of cleaning a filter.
///
/// Keeps "no filter" and "nothing can match" apart so neither can be
/// mistaken for the other.
#[derive(Debug, Clone, PartialEq)]
pub enum Cleaned {
    /// Every row matches: no filter to apply.
    NoConstraint,
    /// No row can match: the caller should short-circuit to an empty result.
    AlwaysExclude,
    /// A reduced tree containing only whitelisted, parsed comparisons.
    Tree(FilterExpr),
}

impl Cleaned {
    /// Returns `true` for [`Cleaned::NoConstraint`].
    #[must_use]
    pub const fn is_no_constraint(&self) -> bool {
        matches!(self, Self::NoConstraint)
    }

    /// Returns `true` for [`Cleaned::AlwaysExclude`].
    #[must_use]
    pub const fn is_always_exclude(&self) -> bool {
        matches!(self, Self::AlwaysExclude)
    }

    /// The reduced tree, if any.
    #[must_use]
    pub const fn as_tree(&self) -> Option<&FilterExpr> {
        match self {
            Self::Tree(expr) => Some(expr),
            _ => None,
        }
    }

    /// Consume into the reduced tree, if any.
    #[must_use]
    pub fn into_tree(self) -> Option<FilterExpr> {
        match self {
            Self::Tree(expr) => Some(expr),
            _ => None,
        }
    }
}

/// A sanitized [`Query`].
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedQuery {
    /// Cleaned filter.
    pub filter: Cleaned,
    /// Whitelisted sort fields, in request order.
    pub orders: Vec<SortField>,
}

/// The set of filterable fields of one schema.
///
/// Read-only once built and `Send + Sync`, so a single instance can serve
/// every request.
#[derive(Debug, Clone)]
pub struct Whitelist {
    fields: HashMap<String, FieldSpec>,
    max_depth: usize,
}

impl Default for Whitelist {
    fn default() -> Self {
        Self::new(Vec::<FieldSpec>::new())
    }
}

impl Whitelist {
    /// Nesting depth allowed by default.
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    /// Build from field specs. A later spec replaces an earlier one with the
    /// same name.
    pub fn new(specs: impl IntoIterator<Item = FieldSpec>) -> Self {
        let fields = specs
            .into_iter()
            .map(|spec| (spec.name.clone(), spec))
            .collect();
        Self {
            fields,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Whitelist of a `#[derive(Filterable)]` type.
    ///
    /// # Panics
    ///
    /// Panics if `T` does not describe itself as a record.
    pub fn for_type<T: Filterable>() -> Self {
        Self::new(field_specs::<T>())
    }

    /// Whitelist from a TOML schema document.
    ///
    /// ```
    /// use mik_filter::Whitelist;
    ///
    /// let whitelist = Whitelist::from_toml(r#"
    ///     [[fields]]
    ///     name = "age"
    ///     type = "uint8"
    /// "#).unwrap();
    /// assert!(whitelist.contains("age"));
    /// ```
    pub fn from_toml(source: &str) -> Result<Self, SchemaError> {
        Ok(Self::new(SchemaConfig::from_toml(source)?.into_specs()?))
    }

    /// Attach a rule to an already whitelisted field.
    ///
    /// Unknown names are ignored with a warning.
    #[must_use]
    pub fn with_rule(mut self, name: &str, rule: Arc<dyn Rule>) -> Self {
        match self.fields.get_mut(name) {
            Some(spec) => spec.rules.push(rule),
            None => tracing::warn!(field = name, "rule attached to unknown field, ignored"),
        }
        self
    }

    /// Set the maximum nesting depth of `AND` / `OR` / `NOT` nodes.
    ///
    /// A filter nested deeper is rejected as a whole with
    /// [`Cleaned::AlwaysExclude`]. Default is [`Self::DEFAULT_MAX_DEPTH`].
    #[must_use]
    pub const fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Maximum nesting depth.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The spec of `name`, if whitelisted.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Whether `name` is whitelisted.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of whitelisted fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field is whitelisted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whitelisted names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Clean a filter tree.
    ///
    /// The input is never modified; surviving nodes are rebuilt.
    #[must_use]
    pub fn clean(&self, filter: &FilterExpr) -> Cleaned {
        tree::clean_node(self, filter, 0).unwrap_or_else(|err| {
            tracing::debug!(max_depth = err.max, %err, "filter rejected");
            Cleaned::AlwaysExclude
        })
    }

    /// Clean a filter that may be absent. No filter means no constraint.
    #[must_use]
    pub fn clean_optional(&self, filter: Option<&FilterExpr>) -> Cleaned {
        filter.map_or(Cleaned::NoConstraint, |expr| self.clean(expr))
    }

    /// Clean a request's filter and orders together.
    #[must_use]
    pub fn clean_query(&self, query: &Query) -> CleanedQuery {
        CleanedQuery {
            filter: self.clean_optional(query.filter.as_ref()),
            orders: self.filter_orders(&query.orders),
        }
    }
}
