// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Type and format names in docs
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self
#![allow(clippy::match_same_arms)] // Operator tables read better one arm per type
#![allow(clippy::cast_possible_truncation)] // isize/usize widening to 64 bits
#![allow(clippy::cast_possible_wrap)] // usize -> i64 only after range checks
#![allow(clippy::cast_sign_loss)]

//! # mik-filter - Whitelist sanitizer for user-supplied filters
//!
//! HTTP query strings are parsed elsewhere into a boolean filter tree and a
//! list of sort keys. Before that data reaches a query builder, it has to be
//! reduced to what the target schema actually allows. This crate does that
//! reduction and nothing else:
//!
//! - comparisons on unknown fields are dropped
//! - operators that make no sense for a field's type are dropped
//! - values are parsed into the field's canonical form, or dropped
//! - caller-supplied [`Rule`]s run on every surviving value
//!
//! A dropped comparison counts as "matches nothing" and the surrounding
//! `AND` / `OR` / `NOT` nodes collapse accordingly.
//!
//! ## Quick Start
//!
//! ```
//! use mik_filter::prelude::*;
//!
//! #[derive(Filterable)]
//! struct Post {
//!     id: u64,
//!     title: String,
//!     published: bool,
//!     #[filter(skip)]
//!     author_email: String,
//! }
//!
//! let whitelist = Whitelist::for_type::<Post>();
//!
//! let filter = and(
//!     cmp("published", Operator::Eq, "yes"),
//!     or(
//!         cmp("title", Operator::ILike, "%rust%"),
//!         cmp("author_email", Operator::Eq, "me@example.com"),
//!     ),
//! );
//! let cleaned = whitelist.clean(&filter);
//! assert_eq!(
//!     cleaned.as_tree().map(ToString::to_string).as_deref(),
//!     Some(r#"(published = true AND title ILIKE "%rust%")"#)
//! );
//! ```
//!
//! ## Results
//!
//! [`Whitelist::clean`] returns a [`Cleaned`]:
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | `NoConstraint` | nothing left to filter on, every row matches |
//! | `AlwaysExclude` | no row can match |
//! | `Tree(expr)` | a reduced tree of whitelisted, parsed comparisons |
//!
//! ## Declared Schemas
//!
//! Schemas only known at deploy time can be loaded from TOML, see
//! [`SchemaConfig`] and [`Whitelist::from_toml`].

mod clean;
mod datatype;
mod error;
mod rule;
mod schema;
mod types;

pub use clean::{Cleaned, CleanedQuery, Whitelist};
pub use datatype::{DataType, FloatWidth, TimeFormat, Width};
pub use error::{SchemaError, ValueError};
pub use rule::{Rule, RuleFn, rule_fn, rules};
pub use schema::{
    FieldConfig, FieldDescriptor, FieldKind, FieldSpec, Filterable, SchemaConfig, Shape,
    field_specs, introspect,
};
pub use types::{
    Comparison, FilterExpr, Operator, Query, SortDir, SortField, Value, all, and, any, cmp, not,
    or,
};

/// Derive [`Filterable`] for a struct with named fields.
///
/// Field attributes:
///
/// | Attribute | Effect |
/// |-----------|--------|
/// | `#[filter(rename = "key")]` | filter on `key` instead of the field name |
/// | `#[filter(skip)]` | never filterable |
/// | `#[filter(input_format = "%Y-%m-%d")]` | timestamp input format |
/// | `#[filter(output_format = "%Y-%m-%d")]` | timestamp output format |
#[cfg(feature = "derive")]
pub use mik_filter_macros::Filterable;

/// Prelude module for convenient imports.
///
/// ```
/// use mik_filter::prelude::*;
///
/// let whitelist = Whitelist::new([FieldSpec::new("id", DataType::uint(64))]);
/// assert!(whitelist.clean(&cmp("id", Operator::Eq, "1")).as_tree().is_some());
/// ```
pub mod prelude {
    pub use crate::{
        Cleaned, CleanedQuery, Comparison, DataType, FieldSpec, FilterExpr, Filterable, Operator,
        Query, Rule, SchemaConfig, SortDir, SortField, TimeFormat, Value, Whitelist, all, and,
        any, cmp, not, or, rule_fn, rules,
    };
}
